//! Axum route handlers for job postings.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::auth::session::{AdminUser, AuthUser};
use crate::errors::AppError;
use crate::forms::fields::{FormConfig, ProfileFieldStates};
use crate::jobs::display::generate_slug;
use crate::jobs::repo::{self, JobChanges, NewJob};
use crate::models::job::{Job, JOB_STATUS, JOB_TYPES};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub job_type: String,
    pub description: String,
    pub number_of_candidates: i32,
    pub salary_min: i64,
    pub salary_max: i64,
    #[serde(default = "default_status")]
    pub status: String,
    /// Per-field visibility for this posting's application form. Defaults
    /// to everything mandatory when omitted.
    #[serde(default = "ProfileFieldStates::all_mandatory")]
    pub application_form: ProfileFieldStates,
}

fn default_status() -> String {
    "active".to_string()
}

#[derive(Debug, Deserialize)]
pub struct UpdateJobRequest {
    pub title: String,
    pub job_type: String,
    pub description: String,
    pub number_of_candidates: i32,
    pub salary_min: i64,
    pub salary_max: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateJobStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ListJobsQuery {
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<Job>,
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

fn validate_posting(
    title: &str,
    job_type: &str,
    description: &str,
    number_of_candidates: i32,
    salary_min: i64,
    salary_max: i64,
) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    if !JOB_TYPES.contains(&job_type) {
        return Err(AppError::Validation(format!(
            "job_type must be one of: {}",
            JOB_TYPES.join(", ")
        )));
    }
    if description.trim().len() < 10 {
        return Err(AppError::Validation(
            "description must be at least 10 characters".to_string(),
        ));
    }
    if number_of_candidates < 1 {
        return Err(AppError::Validation(
            "number_of_candidates must be at least 1".to_string(),
        ));
    }
    if salary_min < 0 || salary_max < 0 {
        return Err(AppError::Validation(
            "salaries cannot be negative".to_string(),
        ));
    }
    if salary_max < salary_min {
        return Err(AppError::Validation(
            "salary_max cannot be below salary_min".to_string(),
        ));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/jobs?active=true
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListJobsQuery>,
) -> Result<Json<JobListResponse>, AppError> {
    let status = query.active.then_some("active");
    let rows = repo::list_jobs(&state.db, status).await?;
    let jobs = rows.into_iter().map(Job::from_row).collect();
    Ok(Json(JobListResponse { jobs }))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Job>, AppError> {
    let row = repo::get_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    Ok(Json(Job::from_row(row)))
}

/// GET /api/v1/jobs/slug/:slug
pub async fn handle_get_job_by_slug(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(slug): Path<String>,
) -> Result<Json<Job>, AppError> {
    let row = repo::get_job_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job '{slug}' not found")))?;
    Ok(Json(Job::from_row(row)))
}

/// POST /api/v1/jobs
///
/// Creates a posting and snapshots its application-form config. The
/// snapshot is the contract applicants are validated against; it never
/// changes after this point.
pub async fn handle_create_job(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(request): Json<CreateJobRequest>,
) -> Result<Json<Job>, AppError> {
    validate_posting(
        &request.title,
        &request.job_type,
        &request.description,
        request.number_of_candidates,
        request.salary_min,
        request.salary_max,
    )?;
    if !JOB_STATUS.contains(&request.status.as_str()) {
        return Err(AppError::Validation(format!(
            "status must be one of: {}",
            JOB_STATUS.join(", ")
        )));
    }
    if let Err(offenders) = request.application_form.check_policy() {
        let keys: Vec<&str> = offenders.iter().map(|f| f.key()).collect();
        return Err(AppError::Validation(format!(
            "these fields are always required and cannot be changed: {}",
            keys.join(", ")
        )));
    }

    let snapshot = FormConfig::from_states(&request.application_form);
    let base_slug = generate_slug(&request.title);
    let slug = repo::ensure_unique_slug(&state.db, &base_slug).await?;

    let row = repo::insert_job(
        &state.db,
        NewJob {
            slug,
            title: request.title,
            job_type: request.job_type,
            description: request.description,
            number_of_candidates: request.number_of_candidates,
            salary_min: request.salary_min,
            salary_max: request.salary_max,
            status: request.status,
            application_form_config: serde_json::to_value(&snapshot)
                .map_err(|e| AppError::Internal(e.into()))?,
        },
    )
    .await?;

    tracing::info!("created job '{}' ({})", row.title, row.id);
    Ok(Json(Job::from_row(row)))
}

/// PATCH /api/v1/jobs/:id
///
/// Updates posting fields. A changed title re-derives the slug. The stored
/// form snapshot is untouched.
pub async fn handle_update_job(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(job_id): Path<Uuid>,
    Json(request): Json<UpdateJobRequest>,
) -> Result<Json<Job>, AppError> {
    validate_posting(
        &request.title,
        &request.job_type,
        &request.description,
        request.number_of_candidates,
        request.salary_min,
        request.salary_max,
    )?;

    let existing = repo::get_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let slug = if existing.title == request.title {
        existing.slug
    } else {
        repo::ensure_unique_slug(&state.db, &generate_slug(&request.title)).await?
    };

    let row = repo::update_job(
        &state.db,
        job_id,
        JobChanges {
            slug,
            title: request.title,
            job_type: request.job_type,
            description: request.description,
            number_of_candidates: request.number_of_candidates,
            salary_min: request.salary_min,
            salary_max: request.salary_max,
        },
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    Ok(Json(Job::from_row(row)))
}

/// PATCH /api/v1/jobs/:id/status
pub async fn handle_update_job_status(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(job_id): Path<Uuid>,
    Json(request): Json<UpdateJobStatusRequest>,
) -> Result<Json<Job>, AppError> {
    if !JOB_STATUS.contains(&request.status.as_str()) {
        return Err(AppError::Validation(format!(
            "status must be one of: {}",
            JOB_STATUS.join(", ")
        )));
    }
    let row = repo::update_job_status(&state.db, job_id, &request.status)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    Ok(Json(Job::from_row(row)))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(job_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !repo::delete_job(&state.db, job_id).await? {
        return Err(AppError::NotFound(format!("Job {job_id} not found")));
    }
    tracing::info!("deleted job {job_id}");
    Ok(Json(json!({ "deleted": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_posting_accepts_reasonable_input() {
        assert!(validate_posting("Backend Engineer", "Full-Time", "Build the backend", 2, 0, 0).is_ok());
    }

    #[test]
    fn test_validate_posting_rejects_unknown_job_type() {
        let err = validate_posting("X", "Gig", "A long description", 1, 0, 0).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_validate_posting_rejects_short_description() {
        let err = validate_posting("X", "Full-Time", "too short", 1, 0, 0).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_validate_posting_rejects_inverted_salary_range() {
        let err = validate_posting("X", "Full-Time", "A long description", 1, 100, 50).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_validate_posting_rejects_zero_candidates() {
        let err = validate_posting("X", "Full-Time", "A long description", 0, 0, 0).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
