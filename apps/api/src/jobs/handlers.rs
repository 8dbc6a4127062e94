//! Axum route handlers for the job-postings CRUD API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::companies::store as companies;
use crate::errors::AppError;
use crate::jobs::store;
use crate::models::job::JobPostingRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct JobPostingCreate {
    pub title: String,
    pub description: Option<String>,
    pub company_id: i64,
}

/// Partial update body. A field left out of the request leaves the stored
/// value untouched; an empty body is an idempotent no-op.
#[derive(Debug, Default, Deserialize)]
pub struct JobPostingUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub company_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

/// Overlays only the provided fields onto the stored row.
fn apply_update(row: &mut JobPostingRow, patch: JobPostingUpdate) {
    if let Some(title) = patch.title {
        row.title = title;
    }
    if let Some(description) = patch.description {
        row.description = Some(description);
    }
    if let Some(company_id) = patch.company_id {
        row.company_id = company_id;
    }
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(request): Json<JobPostingCreate>,
) -> Result<Json<JobPostingRow>, AppError> {
    // Verify company exists
    companies::get_company(&state.db, request.company_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;

    let job = store::insert_job(
        &state.db,
        &request.title,
        request.description.as_deref(),
        request.company_id,
    )
    .await?;

    Ok(Json(job))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<JobPostingRow>>, AppError> {
    let jobs = store::list_jobs(&state.db, params.skip, params.limit).await?;
    Ok(Json(jobs))
}

/// GET /api/v1/jobs/:job_id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
) -> Result<Json<JobPostingRow>, AppError> {
    let job = store::get_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job posting not found".to_string()))?;
    Ok(Json(job))
}

/// PUT /api/v1/jobs/:job_id
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
    Json(patch): Json<JobPostingUpdate>,
) -> Result<Json<JobPostingRow>, AppError> {
    let mut job = store::get_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job posting not found".to_string()))?;

    // If company_id is being updated, verify the new company exists
    if let Some(company_id) = patch.company_id {
        companies::get_company(&state.db, company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;
    }

    apply_update(&mut job, patch);
    let job = store::update_job(&state.db, &job).await?;

    Ok(Json(job))
}

/// DELETE /api/v1/jobs/:job_id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let deleted = store::delete_job(&state.db, job_id).await?;
    if !deleted {
        return Err(AppError::NotFound("Job posting not found".to_string()));
    }
    Ok(Json(json!({"message": "Job posting deleted successfully"})))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn job_row() -> JobPostingRow {
        JobPostingRow {
            id: 10,
            title: "Driver".to_string(),
            description: Some("Existing text".to_string()),
            company_id: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_patch_is_a_no_op() {
        let mut row = job_row();
        apply_update(&mut row, JobPostingUpdate::default());
        assert_eq!(row.title, "Driver");
        assert_eq!(row.description.as_deref(), Some("Existing text"));
        assert_eq!(row.company_id, 1);
    }

    #[test]
    fn test_title_only_patch_leaves_other_fields_unchanged() {
        let mut row = job_row();
        apply_update(
            &mut row,
            JobPostingUpdate {
                title: Some("Senior Driver".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(row.title, "Senior Driver");
        assert_eq!(row.description.as_deref(), Some("Existing text"));
        assert_eq!(row.company_id, 1);
    }

    #[test]
    fn test_company_id_patch_applies() {
        let mut row = job_row();
        apply_update(
            &mut row,
            JobPostingUpdate {
                company_id: Some(2),
                ..Default::default()
            },
        );
        assert_eq!(row.company_id, 2);
        assert_eq!(row.title, "Driver");
    }

    #[test]
    fn test_update_body_with_absent_fields_deserializes_to_none() {
        let patch: JobPostingUpdate = serde_json::from_str("{}").unwrap();
        assert!(patch.title.is_none());
        assert!(patch.description.is_none());
        assert!(patch.company_id.is_none());

        let patch: JobPostingUpdate = serde_json::from_str(r#"{"title": "Pilot"}"#).unwrap();
        assert_eq!(patch.title.as_deref(), Some("Pilot"));
        assert!(patch.company_id.is_none());
    }

    #[test]
    fn test_list_params_default_to_skip_0_limit_100() {
        let params: ListParams = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(params.skip, 0);
        assert_eq!(params.limit, 100);

        let params: ListParams = serde_json::from_value(serde_json::json!({"skip": 5})).unwrap();
        assert_eq!(params.skip, 5);
        assert_eq!(params.limit, 100);
    }

    #[test]
    fn test_create_body_requires_title_and_company_id() {
        let result: Result<JobPostingCreate, _> =
            serde_json::from_str(r#"{"title": "Driver"}"#);
        assert!(result.is_err(), "company_id must be required");

        let job: JobPostingCreate =
            serde_json::from_str(r#"{"title": "Driver", "company_id": 1}"#).unwrap();
        assert!(job.description.is_none());
    }
}
