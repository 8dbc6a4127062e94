//! Axum route handlers for company management. Job postings reference
//! companies by id, so this surface stays minimal: create, list, get.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::companies::store;
use crate::errors::AppError;
use crate::jobs::handlers::ListParams;
use crate::models::company::CompanyRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CompanyCreate {
    pub name: String,
    pub industry: String,
}

/// POST /api/v1/companies
pub async fn handle_create_company(
    State(state): State<AppState>,
    Json(request): Json<CompanyCreate>,
) -> Result<Json<CompanyRow>, AppError> {
    let company = store::insert_company(&state.db, &request.name, &request.industry).await?;
    Ok(Json(company))
}

/// GET /api/v1/companies
pub async fn handle_list_companies(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<CompanyRow>>, AppError> {
    let companies = store::list_companies(&state.db, params.skip, params.limit).await?;
    Ok(Json(companies))
}

/// GET /api/v1/companies/:id
pub async fn handle_get_company(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CompanyRow>, AppError> {
    let company = store::get_company(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;
    Ok(Json(company))
}
