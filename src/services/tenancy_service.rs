// src/services/tenancy_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    db::{TenantRepository, UserRepository},
    models::tenancy::{MemberRole, Tenant, TenantMember},
};

#[derive(Clone)]
pub struct TenantService {
    tenant_repo: TenantRepository,
    user_repo: UserRepository,
    pool: PgPool,
}

impl TenantService {
    pub fn new(tenant_repo: TenantRepository, user_repo: UserRepository, pool: PgPool) -> Self {
        Self { tenant_repo, user_repo, pool }
    }

    /// Creates a company and makes its creator the first ADMIN, atomically.
    pub async fn create_tenant_with_owner(
        &self,
        name: &str,
        description: Option<&str>,
        owner_id: Uuid,
    ) -> Result<Tenant, AppError> {
        let mut tx = self.pool.begin().await?;

        let tenant = self
            .tenant_repo
            .create_tenant(&mut *tx, name.trim(), description)
            .await?;

        self.tenant_repo
            .add_member(&mut *tx, tenant.id, owner_id, MemberRole::Admin)
            .await?;

        tx.commit().await?;

        tracing::info!(tenant_id = %tenant.id, owner_id = %owner_id, "Company created");
        Ok(tenant)
    }

    pub async fn add_member_by_email(
        &self,
        tenant_id: Uuid,
        email: &str,
        role: MemberRole,
    ) -> Result<TenantMember, AppError> {
        let user = self
            .user_repo
            .find_by_email(email.trim())
            .await?
            .ok_or(AppError::UserNotFound)?;

        self.tenant_repo
            .add_member(&self.pool, tenant_id, user.id, role)
            .await
            .map_err(|e| map_unique_violation(e, || format!("{} is already a member", email)))
    }

    pub async fn member_role(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
    ) -> Result<Option<MemberRole>, AppError> {
        self.tenant_repo.find_member_role(user_id, tenant_id).await
    }

    pub async fn tenant_exists(&self, tenant_id: Uuid) -> Result<bool, AppError> {
        self.tenant_repo.tenant_exists(tenant_id).await
    }
}
