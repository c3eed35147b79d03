// src/handlers/leave.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        rbac::{PermCrewsRead, PermLeaveWrite, RequirePermission},
        tenancy::TenantContext,
    },
    models::leave::{CreateLeaveRequest, DecideLeaveRequest, LeaveFilter, LeaveRequestView},
};

// GET /api/admin/leave
#[utoipa::path(
    get,
    path = "/api/admin/leave",
    tag = "Leave",
    responses((status = 200, description = "Leave requests with day counts", body = Vec<LeaveRequestView>)),
    params(
        LeaveFilter,
        ("x-tenant-id" = Uuid, Header, description = "Company id")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_leave(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermCrewsRead>,
    Query(filter): Query<LeaveFilter>,
) -> Result<Json<Vec<LeaveRequestView>>, ApiError> {
    let requests = app_state.leave_service.list(tenant.tenant_id, filter.status).await?;
    Ok(Json(requests))
}

// POST /api/admin/leave
#[utoipa::path(
    post,
    path = "/api/admin/leave",
    tag = "Leave",
    request_body = CreateLeaveRequest,
    responses(
        (status = 201, description = "Leave request stored as PENDING", body = LeaveRequestView),
        (status = 400, description = "Invalid payload or end before start")
    ),
    params(("x-tenant-id" = Uuid, Header, description = "Company id")),
    security(("api_jwt" = []))
)]
pub async fn create_leave(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermLeaveWrite>,
    Json(payload): Json<CreateLeaveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let request = app_state.leave_service.create(tenant.tenant_id, &payload).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

// PATCH /api/admin/leave/{id}
#[utoipa::path(
    patch,
    path = "/api/admin/leave/{id}",
    tag = "Leave",
    request_body = DecideLeaveRequest,
    responses(
        (status = 200, description = "Request approved or rejected", body = LeaveRequestView),
        (status = 404, description = "Not found"),
        (status = 409, description = "Request already decided")
    ),
    params(
        ("id" = Uuid, Path, description = "Leave request id"),
        ("x-tenant-id" = Uuid, Header, description = "Company id")
    ),
    security(("api_jwt" = []))
)]
pub async fn decide_leave(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermLeaveWrite>,
    Path(leave_id): Path<Uuid>,
    Json(payload): Json<DecideLeaveRequest>,
) -> Result<Json<LeaveRequestView>, ApiError> {
    let request = app_state
        .leave_service
        .decide(tenant.tenant_id, leave_id, &payload)
        .await?;
    Ok(Json(request))
}
