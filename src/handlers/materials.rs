// src/handlers/materials.rs

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
        auth::AuthenticatedUser,
        rbac::{PermJobsRead, PermJobsWrite, RequirePermission},
        tenancy::TenantContext,
    },
    models::materials::{
        CreateMaterialOrderRequest, MaterialOrder, MaterialOrderFilter, MaterialOrderListEntry,
        MaterialStatusRequest,
    },
};

// POST /api/admin/jobs/{id}/material-order
#[utoipa::path(
    post,
    path = "/api/admin/jobs/{id}/material-order",
    tag = "Materials",
    request_body = CreateMaterialOrderRequest,
    responses(
        (status = 201, description = "Draft order with the generated material list", body = MaterialOrder),
        (status = 404, description = "Job not found"),
        (status = 409, description = "Job closed or already has an open order")
    ),
    params(
        ("id" = Uuid, Path, description = "Job id"),
        ("x-tenant-id" = Uuid, Header, description = "Company id")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_material_order(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermJobsWrite>,
    Path(job_id): Path<Uuid>,
    Json(payload): Json<CreateMaterialOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let order = app_state
        .material_service
        .create_for_job(tenant.tenant_id, job_id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

// GET /api/admin/jobs/{id}/material-order
#[utoipa::path(
    get,
    path = "/api/admin/jobs/{id}/material-order",
    tag = "Materials",
    responses(
        (status = 200, description = "The job's material order", body = MaterialOrder),
        (status = 404, description = "No order for this job")
    ),
    params(
        ("id" = Uuid, Path, description = "Job id"),
        ("x-tenant-id" = Uuid, Header, description = "Company id")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_material_order(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermJobsRead>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<MaterialOrder>, ApiError> {
    let order = app_state.material_service.get_for_job(tenant.tenant_id, job_id).await?;
    Ok(Json(order))
}

// GET /api/admin/materials
#[utoipa::path(
    get,
    path = "/api/admin/materials",
    tag = "Materials",
    responses((status = 200, description = "Material orders, newest first", body = Vec<MaterialOrderListEntry>)),
    params(
        MaterialOrderFilter,
        ("x-tenant-id" = Uuid, Header, description = "Company id")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_material_orders(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermJobsRead>,
    Query(filter): Query<MaterialOrderFilter>,
) -> Result<Json<Vec<MaterialOrderListEntry>>, ApiError> {
    let orders = app_state.material_service.list(tenant.tenant_id, filter.status).await?;
    Ok(Json(orders))
}

// PATCH /api/admin/materials/{id}/status
#[utoipa::path(
    patch,
    path = "/api/admin/materials/{id}/status",
    tag = "Materials",
    request_body = MaterialStatusRequest,
    responses(
        (status = 200, description = "Order moved; the job follows on SENT and DELIVERED", body = MaterialOrder),
        (status = 404, description = "Not found"),
        (status = 409, description = "Status change not allowed")
    ),
    params(
        ("id" = Uuid, Path, description = "Material order id"),
        ("x-tenant-id" = Uuid, Header, description = "Company id")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_material_status(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _perm: RequirePermission<PermJobsWrite>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<MaterialStatusRequest>,
) -> Result<Json<MaterialOrder>, ApiError> {
    let order = app_state
        .material_service
        .update_status(tenant.tenant_id, order_id, &payload, user.id())
        .await?;
    Ok(Json(order))
}
