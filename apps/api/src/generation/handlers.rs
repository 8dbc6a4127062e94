//! Axum route handler for the description-generation endpoint.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::companies::store as companies;
use crate::errors::AppError;
use crate::generation::describe::draft_and_store_description;
use crate::jobs::store;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct JobDescriptionRequest {
    pub required_tools: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct JobDescriptionResponse {
    pub job_id: i64,
    pub description: String,
    pub generated_at: DateTime<Utc>,
}

/// POST /api/v1/jobs/:job_id/description
///
/// NotFound checks run before any LLM traffic.
pub async fn handle_generate_description(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
    Json(request): Json<JobDescriptionRequest>,
) -> Result<Json<JobDescriptionResponse>, AppError> {
    if request.required_tools.is_empty() {
        return Err(AppError::Validation(
            "required_tools cannot be empty".to_string(),
        ));
    }

    let job = store::get_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job posting not found".to_string()))?;

    let company = companies::get_company(&state.db, job.company_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Associated company not found".to_string()))?;

    let description = draft_and_store_description(
        &state.db,
        &state.llm,
        &job,
        &company,
        &request.required_tools,
    )
    .await?;

    Ok(Json(JobDescriptionResponse {
        job_id: job.id,
        description,
        generated_at: Utc::now(),
    }))
}
