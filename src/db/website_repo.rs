// src/db/website_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::website::{CreateServiceRequest, UpdateServiceRequest, WebsiteService},
};

const SERVICE_COLUMNS: &str =
    "id, tenant_id, name, description, price_from, sort_order, show_on_website, created_at, updated_at";

#[derive(Clone)]
pub struct WebsiteRepository {
    pool: PgPool,
}

impl WebsiteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// `only_visible` restricts to services shown on the public website.
    pub async fn list_services<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        only_visible: bool,
    ) -> Result<Vec<WebsiteService>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT {}
            FROM website_services
            WHERE tenant_id = $1 AND (NOT $2 OR show_on_website)
            ORDER BY sort_order, name
            "#,
            SERVICE_COLUMNS
        );
        let services = sqlx::query_as::<_, WebsiteService>(&sql)
            .bind(tenant_id)
            .bind(only_visible)
            .fetch_all(executor)
            .await?;
        Ok(services)
    }

    pub async fn create_service<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        req: &CreateServiceRequest,
    ) -> Result<WebsiteService, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO website_services (
                tenant_id, name, description, price_from, sort_order, show_on_website
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            SERVICE_COLUMNS
        );
        let service = sqlx::query_as::<_, WebsiteService>(&sql)
            .bind(tenant_id)
            .bind(req.name.trim())
            .bind(&req.description)
            .bind(req.price_from)
            .bind(req.sort_order)
            .bind(req.show_on_website)
            .fetch_one(executor)
            .await?;
        Ok(service)
    }

    pub async fn update_service<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        service_id: Uuid,
        req: &UpdateServiceRequest,
    ) -> Result<Option<WebsiteService>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE website_services
            SET name = COALESCE($3, name),
                description = COALESCE($4, description),
                price_from = COALESCE($5, price_from),
                sort_order = COALESCE($6, sort_order),
                show_on_website = COALESCE($7, show_on_website),
                updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            RETURNING {}
            "#,
            SERVICE_COLUMNS
        );
        let service = sqlx::query_as::<_, WebsiteService>(&sql)
            .bind(tenant_id)
            .bind(service_id)
            .bind(req.name.as_deref().map(str::trim))
            .bind(&req.description)
            .bind(req.price_from)
            .bind(req.sort_order)
            .bind(req.show_on_website)
            .fetch_optional(executor)
            .await?;
        Ok(service)
    }
}
