pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::companies::handlers as companies;
use crate::generation::handlers as generation;
use crate::jobs::handlers as jobs;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Companies
        .route(
            "/api/v1/companies",
            post(companies::handle_create_company).get(companies::handle_list_companies),
        )
        .route("/api/v1/companies/:id", get(companies::handle_get_company))
        // Job postings
        .route(
            "/api/v1/jobs",
            post(jobs::handle_create_job).get(jobs::handle_list_jobs),
        )
        .route(
            "/api/v1/jobs/:job_id",
            get(jobs::handle_get_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        // Description generation
        .route(
            "/api/v1/jobs/:job_id/description",
            post(generation::handle_generate_description),
        )
        .with_state(state)
}
