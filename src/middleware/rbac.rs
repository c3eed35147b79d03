// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    common::error::{ApiError, AppError},
    middleware::tenancy::TenantContext,
};

/// A permission a handler can demand.
pub trait PermissionDef: Send + Sync + 'static {
    fn slug() -> &'static str;
}

/// Extractor that fails with 403 unless the member's role grants `T`.
/// Must run behind `tenant_guard`.
pub struct RequirePermission<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tenant = parts
            .extensions
            .get::<TenantContext>()
            .ok_or(AppError::TenantAccessDenied)?;

        let required = T::slug();
        if !tenant.role.grants(required) {
            return Err(AppError::PermissionDenied(required).into());
        }

        Ok(RequirePermission(PhantomData))
    }
}

macro_rules! permission {
    ($name:ident, $slug:literal) => {
        pub struct $name;
        impl PermissionDef for $name {
            fn slug() -> &'static str {
                $slug
            }
        }
    };
}

permission!(PermJobsRead, "jobs:read");
permission!(PermJobsWrite, "jobs:write");
permission!(PermCrmRead, "crm:read");
permission!(PermCrmWrite, "crm:write");
permission!(PermCrewsRead, "crews:read");
permission!(PermCrewsWrite, "crews:write");
permission!(PermChecklistWrite, "checklist:write");
permission!(PermDocumentsRead, "documents:read");
permission!(PermSettingsRead, "settings:read");
permission!(PermSettingsWrite, "settings:write");
permission!(PermMembersWrite, "members:write");
permission!(PermWebsiteWrite, "website:write");
permission!(PermLeaveWrite, "leave:write");
permission!(PermDashboardRead, "dashboard:read");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tenancy::MemberRole;
    use axum::http::Request;
    use uuid::Uuid;

    async fn check<T: PermissionDef>(role: MemberRole) -> Result<(), ApiError> {
        let (mut parts, _) = Request::new(()).into_parts();
        parts.extensions.insert(TenantContext { tenant_id: Uuid::new_v4(), role });
        RequirePermission::<T>::from_request_parts(&mut parts, &()).await.map(|_| ())
    }

    #[tokio::test]
    async fn installers_may_tick_checklists_but_not_move_jobs() {
        assert!(check::<PermChecklistWrite>(MemberRole::Installer).await.is_ok());
        let err = check::<PermJobsWrite>(MemberRole::Installer).await.unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn office_staff_cannot_change_company_settings() {
        assert!(check::<PermSettingsRead>(MemberRole::Office).await.is_ok());
        assert!(check::<PermSettingsWrite>(MemberRole::Office).await.is_err());
        assert!(check::<PermSettingsWrite>(MemberRole::Admin).await.is_ok());
    }

    #[tokio::test]
    async fn missing_tenant_context_is_refused() {
        let (mut parts, _) = Request::new(()).into_parts();
        let result = RequirePermission::<PermJobsRead>::from_request_parts(&mut parts, &()).await;
        assert!(result.is_err());
    }
}
