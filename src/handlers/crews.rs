// src/handlers/crews.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        rbac::{PermCrewsRead, PermCrewsWrite, RequirePermission},
        tenancy::TenantContext,
    },
    models::crews::{
        CreateElectricianRequest, CreateSubcontractorRequest, CreateTeamRequest, Electrician,
        Subcontractor, Team,
    },
};

// --- Electricians ---

#[utoipa::path(
    post,
    path = "/api/admin/electricians",
    tag = "Crews",
    request_body = CreateElectricianRequest,
    responses(
        (status = 201, description = "Electrician created", body = Electrician),
        (status = 400, description = "Invalid payload")
    ),
    params(("x-tenant-id" = Uuid, Header, description = "Company id")),
    security(("api_jwt" = []))
)]
pub async fn create_electrician(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermCrewsWrite>,
    Json(payload): Json<CreateElectricianRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let electrician = app_state
        .crew_repo
        .create_electrician(&app_state.db_pool, tenant.tenant_id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(electrician)))
}

#[utoipa::path(
    get,
    path = "/api/admin/electricians",
    tag = "Crews",
    responses((status = 200, description = "Electricians", body = Vec<Electrician>)),
    params(("x-tenant-id" = Uuid, Header, description = "Company id")),
    security(("api_jwt" = []))
)]
pub async fn list_electricians(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermCrewsRead>,
) -> Result<Json<Vec<Electrician>>, ApiError> {
    let electricians = app_state
        .crew_repo
        .list_electricians(&app_state.db_pool, tenant.tenant_id)
        .await?;
    Ok(Json(electricians))
}

// --- Teams ---

#[utoipa::path(
    post,
    path = "/api/admin/teams",
    tag = "Crews",
    request_body = CreateTeamRequest,
    responses(
        (status = 201, description = "Team created", body = Team),
        (status = 404, description = "Lead electrician not found")
    ),
    params(("x-tenant-id" = Uuid, Header, description = "Company id")),
    security(("api_jwt" = []))
)]
pub async fn create_team(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermCrewsWrite>,
    Json(payload): Json<CreateTeamRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate().map_err(AppError::ValidationError)?;

    if let Some(electrician_id) = payload.lead_electrician_id {
        app_state
            .crew_repo
            .find_electrician(&app_state.db_pool, tenant.tenant_id, electrician_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Electrician".into()))?;
    }

    let team = app_state
        .crew_repo
        .create_team(&app_state.db_pool, tenant.tenant_id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(team)))
}

#[utoipa::path(
    get,
    path = "/api/admin/teams",
    tag = "Crews",
    responses((status = 200, description = "Teams", body = Vec<Team>)),
    params(("x-tenant-id" = Uuid, Header, description = "Company id")),
    security(("api_jwt" = []))
)]
pub async fn list_teams(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermCrewsRead>,
) -> Result<Json<Vec<Team>>, ApiError> {
    let teams = app_state
        .crew_repo
        .list_teams(&app_state.db_pool, tenant.tenant_id)
        .await?;
    Ok(Json(teams))
}

// --- Subcontractors ---

#[utoipa::path(
    post,
    path = "/api/admin/subcontractors",
    tag = "Crews",
    request_body = CreateSubcontractorRequest,
    responses(
        (status = 201, description = "Subcontractor created", body = Subcontractor),
        (status = 400, description = "Invalid payload")
    ),
    params(("x-tenant-id" = Uuid, Header, description = "Company id")),
    security(("api_jwt" = []))
)]
pub async fn create_subcontractor(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermCrewsWrite>,
    Json(payload): Json<CreateSubcontractorRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let subcontractor = app_state
        .crew_repo
        .create_subcontractor(&app_state.db_pool, tenant.tenant_id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(subcontractor)))
}

#[utoipa::path(
    get,
    path = "/api/admin/subcontractors",
    tag = "Crews",
    responses((status = 200, description = "Subcontractors", body = Vec<Subcontractor>)),
    params(("x-tenant-id" = Uuid, Header, description = "Company id")),
    security(("api_jwt" = []))
)]
pub async fn list_subcontractors(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermCrewsRead>,
) -> Result<Json<Vec<Subcontractor>>, ApiError> {
    let subcontractors = app_state
        .crew_repo
        .list_subcontractors(&app_state.db_pool, tenant.tenant_id)
        .await?;
    Ok(Json(subcontractors))
}
