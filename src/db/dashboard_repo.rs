// src/db/dashboard_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        dashboard::{DashboardSummary, StatusCount},
        jobs::URGENT_WITHIN_DAYS,
    },
};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn get_summary<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        today: NaiveDate,
    ) -> Result<DashboardSummary, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        // One transaction so every counter reads the same snapshot
        let mut tx = executor.begin().await?;

        let jobs_by_status = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM jobs
            WHERE tenant_id = $1
            GROUP BY status
            ORDER BY status
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&mut *tx)
        .await?;

        let urgent_jobs = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM jobs
            WHERE tenant_id = $1
              AND status = 'PENDING_SCHEDULE'
              AND scheduling_deadline <= $2::date + $3::int
            "#,
        )
        .bind(tenant_id)
        .bind(today)
        .bind(URGENT_WITHIN_DAYS as i32)
        .fetch_one(&mut *tx)
        .await?;

        let open_leads = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM leads WHERE tenant_id = $1 AND status IN ('NEW', 'CONTACTED', 'QUOTED')",
        )
        .bind(tenant_id)
        .fetch_one(&mut *tx)
        .await?;

        let accepted_value_this_month = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(total_cost), 0)
            FROM customer_quotes
            WHERE tenant_id = $1
              AND status = 'ACCEPTED'
              AND accepted_at >= date_trunc('month', $2::date)
            "#,
        )
        .bind(tenant_id)
        .bind(today)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(DashboardSummary { jobs_by_status, urgent_jobs, open_leads, accepted_value_this_month })
    }
}
