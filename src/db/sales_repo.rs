// src/db/sales_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::sales::{
        CreateQuoteRequest, CustomerQuote, Lead, LeadFilter, LeadStatus, PublicLeadRequest,
        QuoteStatus,
    },
};

const LEAD_COLUMNS: &str = "id, tenant_id, name, email, phone, address, suburb, postcode, \
     system_size, panel_count, battery_capacity, annual_bill, source, status, notes, \
     created_at, updated_at";

const QUOTE_COLUMNS: &str = "id, tenant_id, lead_id, reference, system_size, panel_count, \
     battery_capacity, equipment_cost, installation_cost, rebates, total_cost, deposit_amount, \
     status, accepted_at, created_at, updated_at";

/// A quote about to be inserted; money already computed. The id and
/// reference are drawn per insert attempt.
pub struct NewQuote {
    pub lead_id: Uuid,
    pub system_size: f64,
    pub panel_count: i32,
    pub battery_capacity: f64,
    pub equipment_cost: Decimal,
    pub installation_cost: Decimal,
    pub rebates: Decimal,
    pub total_cost: Decimal,
    pub deposit_amount: Decimal,
}

impl NewQuote {
    pub fn from_request(req: &CreateQuoteRequest, total_cost: Decimal, deposit_amount: Decimal) -> Self {
        Self {
            lead_id: req.lead_id,
            system_size: req.system_size,
            panel_count: req.panel_count,
            battery_capacity: req.battery_capacity,
            equipment_cost: req.equipment_cost,
            installation_cost: req.installation_cost,
            rebates: req.rebates,
            total_cost,
            deposit_amount,
        }
    }
}

#[derive(Clone)]
pub struct SalesRepository {
    pool: PgPool,
}

impl SalesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  LEADS
    // =========================================================================

    pub async fn create_lead<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        req: &PublicLeadRequest,
    ) -> Result<Lead, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO leads (
                tenant_id, name, email, phone, address, suburb, postcode,
                system_size, panel_count, battery_capacity, annual_bill, source
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, COALESCE($12, 'calculator'))
            RETURNING {}
            "#,
            LEAD_COLUMNS
        );
        let lead = sqlx::query_as::<_, Lead>(&sql)
            .bind(tenant_id)
            .bind(req.name.trim())
            .bind(req.email.trim())
            .bind(&req.phone)
            .bind(req.address.trim())
            .bind(&req.suburb)
            .bind(&req.postcode)
            .bind(req.system_size)
            .bind(req.panel_count)
            .bind(req.battery_capacity)
            .bind(req.annual_bill)
            .bind(&req.source)
            .fetch_one(executor)
            .await?;
        Ok(lead)
    }

    pub async fn find_lead<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        lead_id: Uuid,
    ) -> Result<Option<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM leads WHERE tenant_id = $1 AND id = $2", LEAD_COLUMNS);
        let lead = sqlx::query_as::<_, Lead>(&sql)
            .bind(tenant_id)
            .bind(lead_id)
            .fetch_optional(executor)
            .await?;
        Ok(lead)
    }

    pub async fn list_leads<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        filter: &LeadFilter,
    ) -> Result<Vec<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT {}
            FROM leads
            WHERE tenant_id = $1
              AND ($2::lead_status IS NULL OR status = $2)
              AND ($3::text IS NULL
                   OR name ILIKE '%' || $3 || '%'
                   OR email ILIKE '%' || $3 || '%'
                   OR address ILIKE '%' || $3 || '%')
            ORDER BY created_at DESC
            "#,
            LEAD_COLUMNS
        );
        let leads = sqlx::query_as::<_, Lead>(&sql)
            .bind(tenant_id)
            .bind(filter.status)
            .bind(filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()))
            .fetch_all(executor)
            .await?;
        Ok(leads)
    }

    pub async fn update_lead<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        lead_id: Uuid,
        status: Option<LeadStatus>,
        notes: Option<&str>,
    ) -> Result<Option<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE leads
            SET status = COALESCE($3, status),
                notes = COALESCE($4, notes),
                updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            RETURNING {}
            "#,
            LEAD_COLUMNS
        );
        let lead = sqlx::query_as::<_, Lead>(&sql)
            .bind(tenant_id)
            .bind(lead_id)
            .bind(status)
            .bind(notes)
            .fetch_optional(executor)
            .await?;
        Ok(lead)
    }

    pub async fn set_lead_status<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        lead_id: Uuid,
        status: LeadStatus,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE leads SET status = $3, updated_at = NOW() WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id)
            .bind(lead_id)
            .bind(status)
            .execute(executor)
            .await?;
        Ok(())
    }

    // =========================================================================
    //  QUOTES
    // =========================================================================

    /// `None` when the reference is already taken for this tenant.
    pub async fn create_quote<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
        reference: &str,
        quote: &NewQuote,
    ) -> Result<Option<CustomerQuote>, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO customer_quotes (
                id, tenant_id, lead_id, reference, system_size, panel_count, battery_capacity,
                equipment_cost, installation_cost, rebates, total_cost, deposit_amount
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (tenant_id, reference) DO NOTHING
            RETURNING {}
            "#,
            QUOTE_COLUMNS
        );
        sqlx::query_as::<_, CustomerQuote>(&sql)
            .bind(id)
            .bind(tenant_id)
            .bind(quote.lead_id)
            .bind(reference)
            .bind(quote.system_size)
            .bind(quote.panel_count)
            .bind(quote.battery_capacity)
            .bind(quote.equipment_cost)
            .bind(quote.installation_cost)
            .bind(quote.rebates)
            .bind(quote.total_cost)
            .bind(quote.deposit_amount)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_quote<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        quote_id: Uuid,
    ) -> Result<Option<CustomerQuote>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM customer_quotes WHERE tenant_id = $1 AND id = $2",
            QUOTE_COLUMNS
        );
        let quote = sqlx::query_as::<_, CustomerQuote>(&sql)
            .bind(tenant_id)
            .bind(quote_id)
            .fetch_optional(executor)
            .await?;
        Ok(quote)
    }

    /// Same as `find_quote` but locks the row for the rest of the transaction.
    pub async fn find_quote_for_update<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        quote_id: Uuid,
    ) -> Result<Option<CustomerQuote>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM customer_quotes WHERE tenant_id = $1 AND id = $2 FOR UPDATE",
            QUOTE_COLUMNS
        );
        let quote = sqlx::query_as::<_, CustomerQuote>(&sql)
            .bind(tenant_id)
            .bind(quote_id)
            .fetch_optional(executor)
            .await?;
        Ok(quote)
    }

    pub async fn list_quotes<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        lead_id: Option<Uuid>,
    ) -> Result<Vec<CustomerQuote>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT {}
            FROM customer_quotes
            WHERE tenant_id = $1 AND ($2::uuid IS NULL OR lead_id = $2)
            ORDER BY created_at DESC
            "#,
            QUOTE_COLUMNS
        );
        let quotes = sqlx::query_as::<_, CustomerQuote>(&sql)
            .bind(tenant_id)
            .bind(lead_id)
            .fetch_all(executor)
            .await?;
        Ok(quotes)
    }

    pub async fn set_quote_status<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        quote_id: Uuid,
        status: QuoteStatus,
        accepted_at: Option<DateTime<Utc>>,
    ) -> Result<CustomerQuote, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE customer_quotes
            SET status = $3,
                accepted_at = COALESCE($4, accepted_at),
                updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            RETURNING {}
            "#,
            QUOTE_COLUMNS
        );
        let quote = sqlx::query_as::<_, CustomerQuote>(&sql)
            .bind(tenant_id)
            .bind(quote_id)
            .bind(status)
            .bind(accepted_at)
            .fetch_one(executor)
            .await?;
        Ok(quote)
    }
}
