// src/handlers/subcontractor.rs
//
// Public endpoints behind the link sent to a subcontractor. The token is the
// only credential.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    models::jobs::{Job, RejectAssignmentRequest, SubcontractorJobSummary},
};

// GET /api/subcontractor/confirm/{token}
#[utoipa::path(
    get,
    path = "/api/subcontractor/confirm/{token}",
    tag = "Subcontractor",
    responses(
        (status = 200, description = "Job summary for the subcontractor", body = SubcontractorJobSummary),
        (status = 404, description = "Unknown or used link")
    ),
    params(("token" = String, Path, description = "Confirmation token"))
)]
pub async fn get_assignment(
    State(app_state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<SubcontractorJobSummary>, ApiError> {
    Ok(Json(app_state.job_service.subcontractor_summary(&token).await?))
}

// POST /api/subcontractor/confirm/{token}
#[utoipa::path(
    post,
    path = "/api/subcontractor/confirm/{token}",
    tag = "Subcontractor",
    responses(
        (status = 200, description = "Assignment confirmed", body = Job),
        (status = 404, description = "Unknown or used link"),
        (status = 409, description = "Job is not awaiting confirmation")
    ),
    params(("token" = String, Path, description = "Confirmation token"))
)]
pub async fn confirm_assignment(
    State(app_state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<Job>, ApiError> {
    Ok(Json(app_state.job_service.confirm_subcontractor(&token).await?))
}

// POST /api/subcontractor/reject/{token}
#[utoipa::path(
    post,
    path = "/api/subcontractor/reject/{token}",
    tag = "Subcontractor",
    request_body = RejectAssignmentRequest,
    responses(
        (status = 200, description = "Assignment rejected; the job goes back to scheduling", body = Job),
        (status = 404, description = "Unknown or used link"),
        (status = 409, description = "Job is not awaiting confirmation")
    ),
    params(("token" = String, Path, description = "Confirmation token"))
)]
pub async fn reject_assignment(
    State(app_state): State<AppState>,
    Path(token): Path<String>,
    payload: Option<Json<RejectAssignmentRequest>>,
) -> Result<Json<Job>, ApiError> {
    let reason = payload.and_then(|Json(body)| body.reason);
    let job = app_state
        .job_service
        .reject_subcontractor(&token, reason.as_deref())
        .await?;
    Ok(Json(job))
}
