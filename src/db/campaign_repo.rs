// src/db/campaign_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::campaigns::{Campaign, CampaignStep, CampaignTrigger, NewStep},
};

const CAMPAIGN_COLUMNS: &str = "id, tenant_id, name, description, enabled, trigger, \
     enrolled_count, completed_count, created_at, updated_at";

#[derive(Clone)]
pub struct CampaignRepository {
    pool: PgPool,
}

impl CampaignRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_campaigns<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
    ) -> Result<Vec<Campaign>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM campaigns WHERE tenant_id = $1 ORDER BY created_at DESC",
            CAMPAIGN_COLUMNS
        );
        let campaigns = sqlx::query_as::<_, Campaign>(&sql)
            .bind(tenant_id)
            .fetch_all(executor)
            .await?;
        Ok(campaigns)
    }

    pub async fn find_campaign<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        campaign_id: Uuid,
    ) -> Result<Option<Campaign>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM campaigns WHERE tenant_id = $1 AND id = $2",
            CAMPAIGN_COLUMNS
        );
        let campaign = sqlx::query_as::<_, Campaign>(&sql)
            .bind(tenant_id)
            .bind(campaign_id)
            .fetch_optional(executor)
            .await?;
        Ok(campaign)
    }

    /// Steps of every listed campaign, ordered by campaign then position.
    pub async fn list_steps<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        campaign_ids: &[Uuid],
    ) -> Result<Vec<CampaignStep>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let steps = sqlx::query_as::<_, CampaignStep>(
            r#"
            SELECT id, campaign_id, step_order, delay_hours, action, template_id
            FROM campaign_steps
            WHERE tenant_id = $1 AND campaign_id = ANY($2)
            ORDER BY campaign_id, step_order
            "#,
        )
        .bind(tenant_id)
        .bind(campaign_ids)
        .fetch_all(executor)
        .await?;
        Ok(steps)
    }

    pub async fn insert_campaign<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        name: &str,
        description: &str,
        trigger: CampaignTrigger,
        enabled: bool,
    ) -> Result<Campaign, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO campaigns (tenant_id, name, description, trigger, enabled)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            CAMPAIGN_COLUMNS
        );
        let campaign = sqlx::query_as::<_, Campaign>(&sql)
            .bind(tenant_id)
            .bind(name)
            .bind(description)
            .bind(trigger)
            .bind(enabled)
            .fetch_one(executor)
            .await?;
        Ok(campaign)
    }

    pub async fn update_campaign<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        campaign_id: Uuid,
        name: &str,
        description: &str,
        trigger: CampaignTrigger,
        enabled: bool,
    ) -> Result<Option<Campaign>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE campaigns
            SET name = $3, description = $4, trigger = $5, enabled = $6, updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            RETURNING {}
            "#,
            CAMPAIGN_COLUMNS
        );
        let campaign = sqlx::query_as::<_, Campaign>(&sql)
            .bind(tenant_id)
            .bind(campaign_id)
            .bind(name)
            .bind(description)
            .bind(trigger)
            .bind(enabled)
            .fetch_optional(executor)
            .await?;
        Ok(campaign)
    }

    pub async fn set_enabled<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        campaign_id: Uuid,
        enabled: bool,
    ) -> Result<Option<Campaign>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE campaigns SET enabled = $3, updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            RETURNING {}
            "#,
            CAMPAIGN_COLUMNS
        );
        let campaign = sqlx::query_as::<_, Campaign>(&sql)
            .bind(tenant_id)
            .bind(campaign_id)
            .bind(enabled)
            .fetch_optional(executor)
            .await?;
        Ok(campaign)
    }

    pub async fn delete_steps<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        campaign_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM campaign_steps WHERE tenant_id = $1 AND campaign_id = $2")
            .bind(tenant_id)
            .bind(campaign_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn insert_step<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        campaign_id: Uuid,
        step: &NewStep,
    ) -> Result<CampaignStep, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let inserted = sqlx::query_as::<_, CampaignStep>(
            r#"
            INSERT INTO campaign_steps (
                tenant_id, campaign_id, step_order, delay_hours, action, template_id
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, campaign_id, step_order, delay_hours, action, template_id
            "#,
        )
        .bind(tenant_id)
        .bind(campaign_id)
        .bind(step.step_order)
        .bind(step.delay_hours)
        .bind(step.action)
        .bind(&step.template_id)
        .fetch_one(executor)
        .await?;
        Ok(inserted)
    }

    /// Steps go with the campaign (ON DELETE CASCADE).
    pub async fn delete_campaign<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        campaign_id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM campaigns WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id)
            .bind(campaign_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
