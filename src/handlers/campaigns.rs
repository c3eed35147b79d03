// src/handlers/campaigns.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        rbac::{PermCrmRead, PermCrmWrite, RequirePermission},
        tenancy::TenantContext,
    },
    models::campaigns::{CampaignView, SaveCampaignRequest, UpdateCampaignRequest},
};

// GET /api/crm/campaigns
#[utoipa::path(
    get,
    path = "/api/crm/campaigns",
    tag = "Campaigns",
    responses((status = 200, description = "Campaigns with their ordered steps", body = Vec<CampaignView>)),
    params(("x-tenant-id" = Uuid, Header, description = "Company id")),
    security(("api_jwt" = []))
)]
pub async fn list_campaigns(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermCrmRead>,
) -> Result<Json<Vec<CampaignView>>, ApiError> {
    Ok(Json(app_state.campaign_service.list(tenant.tenant_id).await?))
}

// POST /api/crm/campaigns
#[utoipa::path(
    post,
    path = "/api/crm/campaigns",
    tag = "Campaigns",
    request_body = SaveCampaignRequest,
    responses(
        (status = 201, description = "Campaign created", body = CampaignView),
        (status = 400, description = "Missing Fields")
    ),
    params(("x-tenant-id" = Uuid, Header, description = "Company id")),
    security(("api_jwt" = []))
)]
pub async fn create_campaign(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermCrmWrite>,
    Json(payload): Json<SaveCampaignRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let campaign = app_state.campaign_service.create(tenant.tenant_id, &payload).await?;
    Ok((StatusCode::CREATED, Json(campaign)))
}

// PATCH /api/crm/campaigns/{id}
#[utoipa::path(
    patch,
    path = "/api/crm/campaigns/{id}",
    tag = "Campaigns",
    request_body = UpdateCampaignRequest,
    responses(
        (status = 200, description = "Campaign saved or toggled", body = CampaignView),
        (status = 400, description = "Missing Fields"),
        (status = 404, description = "Not found")
    ),
    params(
        ("id" = Uuid, Path, description = "Campaign id"),
        ("x-tenant-id" = Uuid, Header, description = "Company id")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_campaign(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermCrmWrite>,
    Path(campaign_id): Path<Uuid>,
    Json(payload): Json<UpdateCampaignRequest>,
) -> Result<Json<CampaignView>, ApiError> {
    let campaign = app_state
        .campaign_service
        .update(tenant.tenant_id, campaign_id, payload)
        .await?;
    Ok(Json(campaign))
}

// DELETE /api/crm/campaigns/{id}
#[utoipa::path(
    delete,
    path = "/api/crm/campaigns/{id}",
    tag = "Campaigns",
    responses(
        (status = 204, description = "Campaign and its steps deleted"),
        (status = 404, description = "Not found")
    ),
    params(
        ("id" = Uuid, Path, description = "Campaign id"),
        ("x-tenant-id" = Uuid, Header, description = "Company id")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_campaign(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermCrmWrite>,
    Path(campaign_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state.campaign_service.delete(tenant.tenant_id, campaign_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
