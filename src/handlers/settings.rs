// src/handlers/settings.rs

use axum::{extract::State, Json};
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        rbac::{PermSettingsRead, PermSettingsWrite, RequirePermission},
        tenancy::TenantContext,
    },
    models::settings::{TenantSettings, UpdateSettingsRequest},
};

// GET /api/settings
#[utoipa::path(
    get,
    path = "/api/settings",
    tag = "Settings",
    responses((status = 200, description = "Company profile and deposit rules", body = TenantSettings)),
    params(("x-tenant-id" = Uuid, Header, description = "Company id")),
    security(("api_jwt" = []))
)]
pub async fn get_settings(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermSettingsRead>,
) -> Result<Json<TenantSettings>, ApiError> {
    let settings = app_state
        .settings_repo
        .get_settings(&app_state.db_pool, tenant.tenant_id)
        .await?;
    Ok(Json(settings))
}

// PUT /api/settings
#[utoipa::path(
    put,
    path = "/api/settings",
    tag = "Settings",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Settings saved", body = TenantSettings),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Only ADMIN may change settings")
    ),
    params(("x-tenant-id" = Uuid, Header, description = "Company id")),
    security(("api_jwt" = []))
)]
pub async fn update_settings(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermSettingsWrite>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<Json<TenantSettings>, ApiError> {
    payload.validate().map_err(AppError::ValidationError)?;
    if payload.deposit_percentage < Decimal::ZERO
        || payload.deposit_percentage > Decimal::ONE_HUNDRED
    {
        return Err(AppError::InvalidInput("Deposit percentage must be between 0 and 100".into()).into());
    }
    if payload.deposit_fixed_amount < Decimal::ZERO {
        return Err(AppError::InvalidInput("Fixed deposit must not be negative".into()).into());
    }

    let updated = app_state
        .settings_repo
        .update_settings(&app_state.db_pool, tenant.tenant_id, &payload)
        .await?;
    Ok(Json(updated))
}
