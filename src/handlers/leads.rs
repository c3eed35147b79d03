// src/handlers/leads.rs

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
        rbac::{PermCrmRead, PermCrmWrite, RequirePermission},
        tenancy::{PublicTenant, TenantContext},
    },
    models::sales::{Lead, LeadFilter, LeadSubmission, PublicLeadRequest, UpdateLeadRequest},
};

// POST /api/public/leads
#[utoipa::path(
    post,
    path = "/api/public/leads",
    tag = "Leads",
    request_body = PublicLeadRequest,
    responses(
        (status = 201, description = "Lead and draft quote stored", body = LeadSubmission),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Unknown company")
    ),
    params(("x-tenant-id" = Uuid, Header, description = "Company the enquiry is for"))
)]
pub async fn submit_lead(
    State(app_state): State<AppState>,
    PublicTenant(tenant_id): PublicTenant,
    Json(payload): Json<PublicLeadRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let submission = app_state.sales_service.submit_lead(tenant_id, &payload).await?;
    Ok((StatusCode::CREATED, Json(submission)))
}

// GET /api/crm/leads
#[utoipa::path(
    get,
    path = "/api/crm/leads",
    tag = "Leads",
    responses((status = 200, description = "Leads, newest first", body = Vec<Lead>)),
    params(
        LeadFilter,
        ("x-tenant-id" = Uuid, Header, description = "Company id")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermCrmRead>,
    Query(filter): Query<LeadFilter>,
) -> Result<Json<Vec<Lead>>, ApiError> {
    let leads = app_state.sales_service.list_leads(tenant.tenant_id, &filter).await?;
    Ok(Json(leads))
}

// GET /api/crm/leads/{id}
#[utoipa::path(
    get,
    path = "/api/crm/leads/{id}",
    tag = "Leads",
    responses(
        (status = 200, description = "The lead", body = Lead),
        (status = 404, description = "Not found")
    ),
    params(
        ("id" = Uuid, Path, description = "Lead id"),
        ("x-tenant-id" = Uuid, Header, description = "Company id")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_lead(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermCrmRead>,
    Path(lead_id): Path<Uuid>,
) -> Result<Json<Lead>, ApiError> {
    Ok(Json(app_state.sales_service.get_lead(tenant.tenant_id, lead_id).await?))
}

// PATCH /api/crm/leads/{id}
#[utoipa::path(
    patch,
    path = "/api/crm/leads/{id}",
    tag = "Leads",
    request_body = UpdateLeadRequest,
    responses(
        (status = 200, description = "Lead updated", body = Lead),
        (status = 404, description = "Not found")
    ),
    params(
        ("id" = Uuid, Path, description = "Lead id"),
        ("x-tenant-id" = Uuid, Header, description = "Company id")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_lead(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermCrmWrite>,
    Path(lead_id): Path<Uuid>,
    Json(payload): Json<UpdateLeadRequest>,
) -> Result<Json<Lead>, ApiError> {
    let lead = app_state
        .sales_service
        .update_lead(tenant.tenant_id, lead_id, &payload)
        .await?;
    Ok(Json(lead))
}
