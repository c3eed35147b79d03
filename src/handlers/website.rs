// src/handlers/website.rs

use axum::{
    extract::{Path, State},
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
        rbac::{PermCrmRead, PermWebsiteWrite, RequirePermission},
        tenancy::{PublicTenant, TenantContext},
    },
    models::website::{CreateServiceRequest, UpdateServiceRequest, WebsiteService},
};

// GET /api/admin/services
#[utoipa::path(
    get,
    path = "/api/admin/services",
    tag = "Website",
    responses((status = 200, description = "Every service, visible or not", body = Vec<WebsiteService>)),
    params(("x-tenant-id" = Uuid, Header, description = "Company id")),
    security(("api_jwt" = []))
)]
pub async fn list_services(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermCrmRead>,
) -> Result<Json<Vec<WebsiteService>>, ApiError> {
    let services = app_state
        .website_repo
        .list_services(&app_state.db_pool, tenant.tenant_id, false)
        .await?;
    Ok(Json(services))
}

// POST /api/admin/services
#[utoipa::path(
    post,
    path = "/api/admin/services",
    tag = "Website",
    request_body = CreateServiceRequest,
    responses(
        (status = 201, description = "Service created", body = WebsiteService),
        (status = 400, description = "Invalid payload")
    ),
    params(("x-tenant-id" = Uuid, Header, description = "Company id")),
    security(("api_jwt" = []))
)]
pub async fn create_service(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermWebsiteWrite>,
    Json(payload): Json<CreateServiceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let service = app_state
        .website_repo
        .create_service(&app_state.db_pool, tenant.tenant_id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(service)))
}

// PATCH /api/admin/services/{id}
#[utoipa::path(
    patch,
    path = "/api/admin/services/{id}",
    tag = "Website",
    request_body = UpdateServiceRequest,
    responses(
        (status = 200, description = "Service updated", body = WebsiteService),
        (status = 404, description = "Not found")
    ),
    params(
        ("id" = Uuid, Path, description = "Service id"),
        ("x-tenant-id" = Uuid, Header, description = "Company id")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_service(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermWebsiteWrite>,
    Path(service_id): Path<Uuid>,
    Json(payload): Json<UpdateServiceRequest>,
) -> Result<Json<WebsiteService>, ApiError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let service = app_state
        .website_repo
        .update_service(&app_state.db_pool, tenant.tenant_id, service_id, &payload)
        .await?
        .ok_or_else(|| AppError::ResourceNotFound("Service".into()))?;
    Ok(Json(service))
}

// GET /api/public/services
#[utoipa::path(
    get,
    path = "/api/public/services",
    tag = "Website",
    responses(
        (status = 200, description = "Services shown on the public website", body = Vec<WebsiteService>),
        (status = 404, description = "Unknown company")
    ),
    params(("x-tenant-id" = Uuid, Header, description = "Company id"))
)]
pub async fn list_public_services(
    State(app_state): State<AppState>,
    PublicTenant(tenant_id): PublicTenant,
) -> Result<Json<Vec<WebsiteService>>, ApiError> {
    let services = app_state
        .website_repo
        .list_services(&app_state.db_pool, tenant_id, true)
        .await?;
    Ok(Json(services))
}
