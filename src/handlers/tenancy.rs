// src/handlers/tenancy.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermMembersWrite, RequirePermission},
        tenancy::TenantContext,
    },
    models::{
        auth::UserCompany,
        tenancy::{MemberRole, Tenant, TenantMember},
    },
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTenantPayload {
    #[validate(length(min = 1, message = "The company name is required."))]
    #[schema(example = "Sunrise Solar")]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddMemberPayload {
    #[validate(email(message = "The e-mail address is invalid."))]
    pub email: String,
    pub role: MemberRole,
}

// POST /api/tenants
#[utoipa::path(
    post,
    path = "/api/tenants",
    tag = "Tenancy",
    request_body = CreateTenantPayload,
    responses(
        (status = 201, description = "Company created; the caller is its ADMIN", body = Tenant),
        (status = 400, description = "Invalid payload")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_tenant(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateTenantPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let tenant = app_state
        .tenant_service
        .create_tenant_with_owner(&payload.name, payload.description.as_deref(), user.id())
        .await?;

    Ok((StatusCode::CREATED, Json(tenant)))
}

// GET /api/tenants
#[utoipa::path(
    get,
    path = "/api/tenants",
    tag = "Tenancy",
    responses((status = 200, description = "The caller's companies", body = Vec<UserCompany>)),
    security(("api_jwt" = []))
)]
pub async fn list_my_tenants(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<UserCompany>>, ApiError> {
    Ok(Json(app_state.auth_service.my_companies(user.id()).await?))
}

// POST /api/tenants/members
#[utoipa::path(
    post,
    path = "/api/tenants/members",
    tag = "Tenancy",
    request_body = AddMemberPayload,
    responses(
        (status = 201, description = "Member added", body = TenantMember),
        (status = 404, description = "No user with that e-mail"),
        (status = 409, description = "Already a member")
    ),
    params(("x-tenant-id" = Uuid, Header, description = "Company id")),
    security(("api_jwt" = []))
)]
pub async fn add_member(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermMembersWrite>,
    Json(payload): Json<AddMemberPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let member = app_state
        .tenant_service
        .add_member_by_email(tenant.tenant_id, &payload.email, payload.role)
        .await?;

    tracing::info!(tenant_id = %tenant.tenant_id, user_id = %member.user_id, role = ?member.role, "Member added");
    Ok((StatusCode::CREATED, Json(member)))
}
