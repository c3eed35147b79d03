// src/db/settings_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::settings::{TenantSettings, UpdateSettingsRequest},
};

const SETTINGS_COLUMNS: &str = "tenant_id, company_name, abn, address, phone, email, \
     cec_retailer_number, deposit_type, deposit_percentage, deposit_fixed_amount, updated_at";

#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Stored settings, or the defaults when the company never saved any.
    pub async fn get_settings<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
    ) -> Result<TenantSettings, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM tenant_settings WHERE tenant_id = $1", SETTINGS_COLUMNS);
        let settings = sqlx::query_as::<_, TenantSettings>(&sql)
            .bind(tenant_id)
            .fetch_optional(executor)
            .await?;

        Ok(settings.unwrap_or_else(|| TenantSettings::defaults(tenant_id)))
    }

    pub async fn update_settings<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        input: &UpdateSettingsRequest,
    ) -> Result<TenantSettings, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // UPSERT
        let sql = format!(
            r#"
            INSERT INTO tenant_settings (
                tenant_id, company_name, abn, address, phone, email,
                cec_retailer_number, deposit_type, deposit_percentage, deposit_fixed_amount
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (tenant_id)
            DO UPDATE SET
                company_name = EXCLUDED.company_name,
                abn = EXCLUDED.abn,
                address = EXCLUDED.address,
                phone = EXCLUDED.phone,
                email = EXCLUDED.email,
                cec_retailer_number = EXCLUDED.cec_retailer_number,
                deposit_type = EXCLUDED.deposit_type,
                deposit_percentage = EXCLUDED.deposit_percentage,
                deposit_fixed_amount = EXCLUDED.deposit_fixed_amount,
                updated_at = NOW()
            RETURNING {}
            "#,
            SETTINGS_COLUMNS
        );

        let settings = sqlx::query_as::<_, TenantSettings>(&sql)
            .bind(tenant_id)
            .bind(&input.company_name)
            .bind(&input.abn)
            .bind(&input.address)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.cec_retailer_number)
            .bind(input.deposit_type)
            .bind(input.deposit_percentage)
            .bind(input.deposit_fixed_amount)
            .fetch_one(executor)
            .await?;

        Ok(settings)
    }
}
