pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::applicants::handlers as applicants;
use crate::auth::handlers as auth;
use crate::jobs::handlers as jobs;
use crate::state::AppState;
use crate::storage;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/v1/auth/register", post(auth::handle_register))
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/logout", post(auth::handle_logout))
        // Jobs
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/api/v1/jobs/:id",
            get(jobs::handle_get_job)
                .patch(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        .route("/api/v1/jobs/slug/:slug", get(jobs::handle_get_job_by_slug))
        .route(
            "/api/v1/jobs/:id/status",
            patch(jobs::handle_update_job_status),
        )
        // Applications
        .route(
            "/api/v1/jobs/:id/applications",
            get(applicants::handle_list_applications)
                .post(applicants::handle_submit_application),
        )
        .route(
            "/api/v1/jobs/:id/applications/count",
            get(applicants::handle_count_applications),
        )
        .route(
            "/api/v1/applicants/:id",
            get(applicants::handle_get_applicant)
                .patch(applicants::handle_update_applicant)
                .delete(applicants::handle_delete_applicant),
        )
        // Uploads
        .route(
            "/api/v1/uploads/profile-photo",
            post(storage::handle_upload_profile_photo),
        )
        .with_state(state)
}
