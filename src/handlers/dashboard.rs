// src/handlers/dashboard.rs

use axum::{extract::State, Json};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        rbac::{PermDashboardRead, RequirePermission},
        tenancy::TenantContext,
    },
    models::dashboard::DashboardSummary,
};

// GET /api/admin/dashboard
#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Jobs per status, urgent jobs, open leads, accepted value this month", body = DashboardSummary),
        (status = 403, description = "No access to this company")
    ),
    params(("x-tenant-id" = Uuid, Header, description = "Company id")),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermDashboardRead>,
) -> Result<Json<DashboardSummary>, ApiError> {
    let summary = app_state
        .dashboard_repo
        .get_summary(&app_state.db_pool, tenant.tenant_id, Utc::now().date_naive())
        .await?;
    Ok(Json(summary))
}
