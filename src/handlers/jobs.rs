// src/handlers/jobs.rs

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermJobsRead, PermJobsWrite, RequirePermission},
        tenancy::TenantContext,
    },
    models::jobs::{
        AssignJobRequest, AssignmentResponse, Job, JobBoard, JobFilter, JobListEntry,
        JobStatusChange, UpdateJobStatusRequest, UpdateScheduleRequest,
    },
};

// GET /api/admin/jobs
#[utoipa::path(
    get,
    path = "/api/admin/jobs",
    tag = "Jobs",
    responses((status = 200, description = "Jobs with deadline flags", body = Vec<JobListEntry>)),
    params(
        JobFilter,
        ("x-tenant-id" = Uuid, Header, description = "Company id")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_jobs(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermJobsRead>,
    Query(filter): Query<JobFilter>,
) -> Result<Json<Vec<JobListEntry>>, ApiError> {
    let jobs = app_state.job_service.list_jobs(tenant.tenant_id, &filter).await?;
    Ok(Json(jobs))
}

// GET /api/admin/jobs/board
#[utoipa::path(
    get,
    path = "/api/admin/jobs/board",
    tag = "Jobs",
    responses((status = 200, description = "One column per status plus summary counts", body = JobBoard)),
    params(("x-tenant-id" = Uuid, Header, description = "Company id")),
    security(("api_jwt" = []))
)]
pub async fn get_board(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermJobsRead>,
) -> Result<Json<JobBoard>, ApiError> {
    Ok(Json(app_state.job_service.board(tenant.tenant_id).await?))
}

// GET /api/admin/jobs/{id}
#[utoipa::path(
    get,
    path = "/api/admin/jobs/{id}",
    tag = "Jobs",
    responses(
        (status = 200, description = "The job", body = Job),
        (status = 404, description = "Not found")
    ),
    params(
        ("id" = Uuid, Path, description = "Job id"),
        ("x-tenant-id" = Uuid, Header, description = "Company id")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_job(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermJobsRead>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Job>, ApiError> {
    Ok(Json(app_state.job_service.get_job(tenant.tenant_id, job_id).await?))
}

// GET /api/admin/jobs/{id}/history
#[utoipa::path(
    get,
    path = "/api/admin/jobs/{id}/history",
    tag = "Jobs",
    responses(
        (status = 200, description = "Status changes, oldest first", body = Vec<JobStatusChange>),
        (status = 404, description = "Not found")
    ),
    params(
        ("id" = Uuid, Path, description = "Job id"),
        ("x-tenant-id" = Uuid, Header, description = "Company id")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_history(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermJobsRead>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<JobStatusChange>>, ApiError> {
    Ok(Json(app_state.job_service.history(tenant.tenant_id, job_id).await?))
}

// PATCH /api/admin/jobs/{id}/status
#[utoipa::path(
    patch,
    path = "/api/admin/jobs/{id}/status",
    tag = "Jobs",
    request_body = UpdateJobStatusRequest,
    responses(
        (status = 200, description = "Status changed and recorded in the history", body = Job),
        (status = 404, description = "Not found"),
        (status = 409, description = "Transition not allowed")
    ),
    params(
        ("id" = Uuid, Path, description = "Job id"),
        ("x-tenant-id" = Uuid, Header, description = "Company id")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermJobsWrite>,
    user: AuthenticatedUser,
    Path(job_id): Path<Uuid>,
    Json(payload): Json<UpdateJobStatusRequest>,
) -> Result<Json<Job>, ApiError> {
    let job = app_state
        .job_service
        .update_status(tenant.tenant_id, job_id, payload.status, user.id())
        .await?;
    Ok(Json(job))
}

// PATCH /api/admin/jobs/{id}
#[utoipa::path(
    patch,
    path = "/api/admin/jobs/{id}",
    tag = "Jobs",
    request_body = UpdateScheduleRequest,
    responses(
        (status = 200, description = "Schedule saved", body = Job),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Job is completed or cancelled")
    ),
    params(
        ("id" = Uuid, Path, description = "Job id"),
        ("x-tenant-id" = Uuid, Header, description = "Company id")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_schedule(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermJobsWrite>,
    Path(job_id): Path<Uuid>,
    Json(payload): Json<UpdateScheduleRequest>,
) -> Result<Json<Job>, ApiError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let job = app_state
        .job_service
        .update_schedule(tenant.tenant_id, job_id, &payload)
        .await?;
    Ok(Json(job))
}

// POST /api/admin/jobs/{id}/assign
#[utoipa::path(
    post,
    path = "/api/admin/jobs/{id}/assign",
    tag = "Jobs",
    request_body = AssignJobRequest,
    responses(
        (status = 200, description = "Assigned; credential warnings never block", body = AssignmentResponse),
        (status = 400, description = "Missing Fields"),
        (status = 404, description = "Job, team or subcontractor not found"),
        (status = 409, description = "Job cannot be assigned in its current status")
    ),
    params(
        ("id" = Uuid, Path, description = "Job id"),
        ("x-tenant-id" = Uuid, Header, description = "Company id")
    ),
    security(("api_jwt" = []))
)]
pub async fn assign_job(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermJobsWrite>,
    user: AuthenticatedUser,
    Path(job_id): Path<Uuid>,
    Json(payload): Json<AssignJobRequest>,
) -> Result<Json<AssignmentResponse>, ApiError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let response = app_state
        .job_service
        .assign(tenant.tenant_id, job_id, &payload, user.id())
        .await?;
    Ok(Json(response))
}
