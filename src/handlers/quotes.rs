// src/handlers/quotes.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermCrmRead, PermCrmWrite, RequirePermission},
        tenancy::TenantContext,
    },
    models::{
        jobs::Job,
        sales::{CreateQuoteRequest, CustomerQuote, QuoteStatusRequest},
    },
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct QuoteFilter {
    /// Only quotes for this lead
    pub lead_id: Option<Uuid>,
}

// POST /api/quotes
#[utoipa::path(
    post,
    path = "/api/quotes",
    tag = "Quotes",
    request_body = CreateQuoteRequest,
    responses(
        (status = 201, description = "Quote created; the lead becomes QUOTED", body = CustomerQuote),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Lead not found")
    ),
    params(("x-tenant-id" = Uuid, Header, description = "Company id")),
    security(("api_jwt" = []))
)]
pub async fn create_quote(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermCrmWrite>,
    Json(payload): Json<CreateQuoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let quote = app_state.sales_service.create_quote(tenant.tenant_id, &payload).await?;
    Ok((StatusCode::CREATED, Json(quote)))
}

// GET /api/quotes
#[utoipa::path(
    get,
    path = "/api/quotes",
    tag = "Quotes",
    responses((status = 200, description = "Quotes, newest first", body = Vec<CustomerQuote>)),
    params(
        QuoteFilter,
        ("x-tenant-id" = Uuid, Header, description = "Company id")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_quotes(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermCrmRead>,
    Query(filter): Query<QuoteFilter>,
) -> Result<Json<Vec<CustomerQuote>>, ApiError> {
    let quotes = app_state
        .sales_service
        .list_quotes(tenant.tenant_id, filter.lead_id)
        .await?;
    Ok(Json(quotes))
}

// GET /api/quotes/{id}
#[utoipa::path(
    get,
    path = "/api/quotes/{id}",
    tag = "Quotes",
    responses(
        (status = 200, description = "The quote", body = CustomerQuote),
        (status = 404, description = "Not found")
    ),
    params(
        ("id" = Uuid, Path, description = "Quote id"),
        ("x-tenant-id" = Uuid, Header, description = "Company id")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_quote(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermCrmRead>,
    Path(quote_id): Path<Uuid>,
) -> Result<Json<CustomerQuote>, ApiError> {
    Ok(Json(app_state.sales_service.get_quote(tenant.tenant_id, quote_id).await?))
}

// PATCH /api/quotes/{id}/status
#[utoipa::path(
    patch,
    path = "/api/quotes/{id}/status",
    tag = "Quotes",
    request_body = QuoteStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = CustomerQuote),
        (status = 400, description = "Only SENT or DECLINED can be set here"),
        (status = 409, description = "Quote already accepted or declined")
    ),
    params(
        ("id" = Uuid, Path, description = "Quote id"),
        ("x-tenant-id" = Uuid, Header, description = "Company id")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_quote_status(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermCrmWrite>,
    Path(quote_id): Path<Uuid>,
    Json(payload): Json<QuoteStatusRequest>,
) -> Result<Json<CustomerQuote>, ApiError> {
    let quote = app_state
        .sales_service
        .set_quote_status(tenant.tenant_id, quote_id, payload.status)
        .await?;
    Ok(Json(quote))
}

// POST /api/quotes/{id}/accept
#[utoipa::path(
    post,
    path = "/api/quotes/{id}/accept",
    tag = "Quotes",
    responses(
        (status = 201, description = "Quote accepted and job opened in DEPOSIT_PAID", body = Job),
        (status = 404, description = "Quote not found"),
        (status = 409, description = "Quote is not open or already has a job")
    ),
    params(
        ("id" = Uuid, Path, description = "Quote id"),
        ("x-tenant-id" = Uuid, Header, description = "Company id")
    ),
    security(("api_jwt" = []))
)]
pub async fn accept_quote(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermCrmWrite>,
    user: AuthenticatedUser,
    Path(quote_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let job = app_state
        .sales_service
        .accept_quote(tenant.tenant_id, quote_id, user.id())
        .await?;
    Ok((StatusCode::CREATED, Json(job)))
}
