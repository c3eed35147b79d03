// src/db/crew_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::crews::{
        CreateElectricianRequest, CreateSubcontractorRequest, CreateTeamRequest, Electrician,
        Subcontractor, Team,
    },
};

const ELECTRICIAN_COLUMNS: &str = "id, tenant_id, first_name, last_name, license_number, \
     license_expiry, license_verified, cec_number, cec_expiry, cec_verified, created_at";

// Teams, subcontractors and electricians of a company
#[derive(Clone)]
pub struct CrewRepository {
    pool: PgPool,
}

impl CrewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // =========================================================================
    //  ELECTRICIANS
    // =========================================================================

    pub async fn create_electrician<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        req: &CreateElectricianRequest,
    ) -> Result<Electrician, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO electricians (
                tenant_id, first_name, last_name, license_number, license_expiry,
                license_verified, cec_number, cec_expiry, cec_verified
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            ELECTRICIAN_COLUMNS
        );
        let electrician = sqlx::query_as::<_, Electrician>(&sql)
            .bind(tenant_id)
            .bind(req.first_name.trim())
            .bind(req.last_name.trim())
            .bind(req.license_number.trim())
            .bind(req.license_expiry)
            .bind(req.license_verified)
            .bind(req.cec_number.trim())
            .bind(req.cec_expiry)
            .bind(req.cec_verified)
            .fetch_one(executor)
            .await?;
        Ok(electrician)
    }

    pub async fn list_electricians<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
    ) -> Result<Vec<Electrician>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM electricians WHERE tenant_id = $1 ORDER BY last_name, first_name",
            ELECTRICIAN_COLUMNS
        );
        let list = sqlx::query_as::<_, Electrician>(&sql)
            .bind(tenant_id)
            .fetch_all(executor)
            .await?;
        Ok(list)
    }

    pub async fn find_electrician<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        electrician_id: Uuid,
    ) -> Result<Option<Electrician>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM electricians WHERE tenant_id = $1 AND id = $2",
            ELECTRICIAN_COLUMNS
        );
        let electrician = sqlx::query_as::<_, Electrician>(&sql)
            .bind(tenant_id)
            .bind(electrician_id)
            .fetch_optional(executor)
            .await?;
        Ok(electrician)
    }

    // =========================================================================
    //  TEAMS
    // =========================================================================

    pub async fn create_team<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        req: &CreateTeamRequest,
    ) -> Result<Team, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let team = sqlx::query_as::<_, Team>(
            r#"
            INSERT INTO teams (tenant_id, name, color, lead_electrician_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, tenant_id, name, color, lead_electrician_id, is_active, created_at
            "#,
        )
        .bind(tenant_id)
        .bind(req.name.trim())
        .bind(&req.color)
        .bind(req.lead_electrician_id)
        .fetch_one(executor)
        .await?;
        Ok(team)
    }

    pub async fn list_teams<'e, E>(&self, executor: E, tenant_id: Uuid) -> Result<Vec<Team>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let teams = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, tenant_id, name, color, lead_electrician_id, is_active, created_at
            FROM teams WHERE tenant_id = $1 ORDER BY name
            "#,
        )
        .bind(tenant_id)
        .fetch_all(executor)
        .await?;
        Ok(teams)
    }

    pub async fn find_team<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        team_id: Uuid,
    ) -> Result<Option<Team>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let team = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, tenant_id, name, color, lead_electrician_id, is_active, created_at
            FROM teams WHERE tenant_id = $1 AND id = $2
            "#,
        )
        .bind(tenant_id)
        .bind(team_id)
        .fetch_optional(executor)
        .await?;
        Ok(team)
    }

    // =========================================================================
    //  SUBCONTRACTORS
    // =========================================================================

    pub async fn create_subcontractor<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        req: &CreateSubcontractorRequest,
    ) -> Result<Subcontractor, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sub = sqlx::query_as::<_, Subcontractor>(
            r#"
            INSERT INTO subcontractors (tenant_id, company_name, contact_name, email, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, tenant_id, company_name, contact_name, email, phone, is_active, created_at
            "#,
        )
        .bind(tenant_id)
        .bind(req.company_name.trim())
        .bind(req.contact_name.trim())
        .bind(req.email.trim())
        .bind(&req.phone)
        .fetch_one(executor)
        .await?;
        Ok(sub)
    }

    pub async fn list_subcontractors<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
    ) -> Result<Vec<Subcontractor>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let subs = sqlx::query_as::<_, Subcontractor>(
            r#"
            SELECT id, tenant_id, company_name, contact_name, email, phone, is_active, created_at
            FROM subcontractors WHERE tenant_id = $1 ORDER BY company_name
            "#,
        )
        .bind(tenant_id)
        .fetch_all(executor)
        .await?;
        Ok(subs)
    }

    pub async fn find_subcontractor<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        subcontractor_id: Uuid,
    ) -> Result<Option<Subcontractor>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sub = sqlx::query_as::<_, Subcontractor>(
            r#"
            SELECT id, tenant_id, company_name, contact_name, email, phone, is_active, created_at
            FROM subcontractors WHERE tenant_id = $1 AND id = $2
            "#,
        )
        .bind(tenant_id)
        .bind(subcontractor_id)
        .fetch_optional(executor)
        .await?;
        Ok(sub)
    }
}
