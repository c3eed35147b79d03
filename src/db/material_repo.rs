// src/db/material_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{types::Json, Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::materials::{MaterialItem, MaterialOrder, MaterialOrderListEntry, MaterialOrderStatus},
};

const ORDER_COLUMNS: &str = "id, tenant_id, job_id, supplier_name, status, items, subtotal, gst, \
     total, expected_delivery, sent_at, confirmed_at, delivered_at, notes, created_at, updated_at";

const ORDER_COLUMNS_JOINED: &str = "m.id, m.tenant_id, m.job_id, m.supplier_name, m.status, \
     m.items, m.subtotal, m.gst, m.total, m.expected_delivery, m.sent_at, m.confirmed_at, \
     m.delivered_at, m.notes, m.created_at, m.updated_at";

pub struct NewMaterialOrder<'a> {
    pub job_id: Uuid,
    pub supplier_name: Option<&'a str>,
    pub items: &'a [MaterialItem],
    pub subtotal: Decimal,
    pub gst: Decimal,
    pub total: Decimal,
    pub expected_delivery: Option<NaiveDate>,
    pub notes: Option<&'a str>,
}

#[derive(Clone)]
pub struct MaterialRepository {
    pool: PgPool,
}

impl MaterialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Fails with a unique violation when the job already has an open order.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order: &NewMaterialOrder<'_>,
    ) -> Result<MaterialOrder, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO material_orders
                (tenant_id, job_id, supplier_name, items, subtotal, gst, total, expected_delivery, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            ORDER_COLUMNS
        );
        sqlx::query_as::<_, MaterialOrder>(&sql)
            .bind(tenant_id)
            .bind(order.job_id)
            .bind(order.supplier_name)
            .bind(Json(order.items))
            .bind(order.subtotal)
            .bind(order.gst)
            .bind(order.total)
            .bind(order.expected_delivery)
            .bind(order.notes)
            .fetch_one(executor)
            .await
    }

    /// The job's open order, or its most recent cancelled one.
    pub async fn find_for_job<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<MaterialOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT {}
            FROM material_orders
            WHERE tenant_id = $1 AND job_id = $2
            ORDER BY (status = 'CANCELLED'), created_at DESC
            LIMIT 1
            "#,
            ORDER_COLUMNS
        );
        let order = sqlx::query_as::<_, MaterialOrder>(&sql)
            .bind(tenant_id)
            .bind(job_id)
            .fetch_optional(executor)
            .await?;
        Ok(order)
    }

    pub async fn find_for_update<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
    ) -> Result<Option<MaterialOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM material_orders WHERE tenant_id = $1 AND id = $2 FOR UPDATE",
            ORDER_COLUMNS
        );
        let order = sqlx::query_as::<_, MaterialOrder>(&sql)
            .bind(tenant_id)
            .bind(order_id)
            .fetch_optional(executor)
            .await?;
        Ok(order)
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        status: Option<MaterialOrderStatus>,
    ) -> Result<Vec<MaterialOrderListEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT {}, j.job_number
            FROM material_orders m
            JOIN jobs j ON j.id = m.job_id AND j.tenant_id = m.tenant_id
            WHERE m.tenant_id = $1 AND ($2::material_order_status IS NULL OR m.status = $2)
            ORDER BY m.created_at DESC
            "#,
            ORDER_COLUMNS_JOINED
        );
        let orders = sqlx::query_as::<_, MaterialOrderListEntry>(&sql)
            .bind(tenant_id)
            .bind(status)
            .fetch_all(executor)
            .await?;
        Ok(orders)
    }

    /// Moves the order and stamps the milestone the new status marks.
    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
        status: MaterialOrderStatus,
        expected_delivery: Option<NaiveDate>,
    ) -> Result<MaterialOrder, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE material_orders
            SET status = $3,
                expected_delivery = COALESCE($4, expected_delivery),
                sent_at = CASE WHEN $3 = 'SENT' THEN NOW() ELSE sent_at END,
                confirmed_at = CASE WHEN $3 = 'CONFIRMED' THEN NOW() ELSE confirmed_at END,
                delivered_at = CASE WHEN $3 = 'DELIVERED' THEN NOW() ELSE delivered_at END,
                updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            RETURNING {}
            "#,
            ORDER_COLUMNS
        );
        let order = sqlx::query_as::<_, MaterialOrder>(&sql)
            .bind(tenant_id)
            .bind(order_id)
            .bind(status)
            .bind(expected_delivery)
            .fetch_one(executor)
            .await?;
        Ok(order)
    }
}
