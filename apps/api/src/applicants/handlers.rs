//! Axum route handlers for application intake and applicant management.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::applicants::repo;
use crate::auth::session::{AdminUser, AuthUser};
use crate::errors::AppError;
use crate::forms::engine::{filter_payload, validate_partial, validate_submission};
use crate::forms::fields::FormConfig;
use crate::jobs::repo::get_job;
use crate::models::applicant::Applicant;
use crate::models::job::JobRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmissionRequest {
    /// Field key → submitted value, as rendered from the job's snapshot.
    pub data: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct ApplicantListResponse {
    pub applicants: Vec<Applicant>,
}

/// Deserializes the form snapshot stored on a job row.
fn snapshot_of(job: &JobRow) -> Result<FormConfig, AppError> {
    serde_json::from_value(job.application_form_config.clone()).map_err(|e| {
        tracing::error!("job {} carries an unreadable form snapshot: {e}", job.id);
        AppError::Internal(e.into())
    })
}

/// POST /api/v1/jobs/:id/applications
///
/// Validates the submission against the job's stored snapshot and persists
/// only the snapshot-visible fields. Validation failures return the full
/// violation list.
pub async fn handle_submit_application(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(job_id): Path<Uuid>,
    Json(request): Json<SubmissionRequest>,
) -> Result<Json<Applicant>, AppError> {
    let job = get_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    if job.status != "active" {
        return Err(AppError::Validation(
            "this job is not accepting applications".to_string(),
        ));
    }

    let config = snapshot_of(&job)?;
    validate_submission(&config, &request.data).map_err(AppError::FormValidation)?;
    let payload = filter_payload(&config, &request.data);

    let applicant = repo::insert_applicant(&state.db, job_id, &payload).await?;
    tracing::info!("new application {} for job {}", applicant.id, job_id);
    Ok(Json(applicant))
}

/// GET /api/v1/jobs/:id/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(job_id): Path<Uuid>,
) -> Result<Json<ApplicantListResponse>, AppError> {
    if get_job(&state.db, job_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Job {job_id} not found")));
    }
    let applicants = repo::list_by_job(&state.db, job_id).await?;
    Ok(Json(ApplicantListResponse { applicants }))
}

/// GET /api/v1/jobs/:id/applications/count
pub async fn handle_count_applications(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(job_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let count = repo::count_by_job(&state.db, job_id).await?;
    Ok(Json(json!({ "job_id": job_id, "count": count })))
}

/// GET /api/v1/applicants/:id
pub async fn handle_get_applicant(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(applicant_id): Path<Uuid>,
) -> Result<Json<Applicant>, AppError> {
    let applicant = repo::get_applicant(&state.db, applicant_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Applicant {applicant_id} not found")))?;
    Ok(Json(applicant))
}

/// PATCH /api/v1/applicants/:id
///
/// Partial edit. Provided values still pass the snapshot's rules; fields
/// not visible in the snapshot are dropped rather than written.
pub async fn handle_update_applicant(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(applicant_id): Path<Uuid>,
    Json(request): Json<SubmissionRequest>,
) -> Result<Json<Applicant>, AppError> {
    let existing = repo::get_applicant(&state.db, applicant_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Applicant {applicant_id} not found")))?;
    let job = get_job(&state.db, existing.job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", existing.job_id)))?;

    let config = snapshot_of(&job)?;
    validate_partial(&config, &request.data).map_err(AppError::FormValidation)?;
    let payload = filter_payload(&config, &request.data);

    let applicant = repo::update_applicant(&state.db, applicant_id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Applicant {applicant_id} not found")))?;
    Ok(Json(applicant))
}

/// DELETE /api/v1/applicants/:id
pub async fn handle_delete_applicant(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(applicant_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !repo::delete_applicant(&state.db, applicant_id).await? {
        return Err(AppError::NotFound(format!(
            "Applicant {applicant_id} not found"
        )));
    }
    Ok(Json(json!({ "deleted": true })))
}
