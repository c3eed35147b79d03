// src/middleware/tenancy.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    models::tenancy::MemberRole,
};

pub const TENANT_ID_HEADER: &str = "x-tenant-id";

pub fn tenant_id_from_headers(headers: &HeaderMap) -> Result<Uuid, AppError> {
    let value = headers
        .get(TENANT_ID_HEADER)
        .ok_or_else(|| AppError::InvalidInput("The x-tenant-id header is required.".into()))?;
    let value = value
        .to_str()
        .map_err(|_| AppError::InvalidInput("The x-tenant-id header has invalid characters.".into()))?;
    Uuid::parse_str(value.trim())
        .map_err(|_| AppError::InvalidInput("The x-tenant-id header is not a valid UUID.".into()))
}

/// The company a guarded request acts on, and the caller's role in it.
/// Inserted by `tenant_guard`.
#[derive(Debug, Clone, Copy)]
pub struct TenantContext {
    pub tenant_id: Uuid,
    pub role: MemberRole,
}

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantContext>()
            .copied()
            .ok_or_else(|| AppError::TenantAccessDenied.into())
    }
}

/// Company named by `x-tenant-id` on public routes (calculator leads, website
/// services). No authentication; the company must exist.
#[derive(Debug, Clone, Copy)]
pub struct PublicTenant(pub Uuid);

impl<S> FromRequestParts<S> for PublicTenant
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let tenant_id = tenant_id_from_headers(&parts.headers)?;

        if !app_state.tenant_service.tenant_exists(tenant_id).await? {
            return Err(AppError::ResourceNotFound("Company".into()).into());
        }
        Ok(PublicTenant(tenant_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn header_must_be_present_and_a_uuid() {
        let mut headers = HeaderMap::new();
        assert!(matches!(tenant_id_from_headers(&headers), Err(AppError::InvalidInput(_))));

        headers.insert(TENANT_ID_HEADER, HeaderValue::from_static("not-a-uuid"));
        assert!(matches!(tenant_id_from_headers(&headers), Err(AppError::InvalidInput(_))));

        let id = Uuid::new_v4();
        headers.insert(TENANT_ID_HEADER, HeaderValue::from_str(&id.to_string()).unwrap());
        assert_eq!(tenant_id_from_headers(&headers).unwrap(), id);
    }
}
