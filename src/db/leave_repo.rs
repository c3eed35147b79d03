// src/db/leave_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::leave::{CreateLeaveRequest, LeaveRequest, LeaveStatus},
};

const LEAVE_COLUMNS: &str = "id, tenant_id, staff_name, leave_type, start_date, end_date, \
     reason, status, decided_at, review_notes, created_at";

#[derive(Clone)]
pub struct LeaveRepository {
    pool: PgPool,
}

impl LeaveRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        status: Option<LeaveStatus>,
    ) -> Result<Vec<LeaveRequest>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT {}
            FROM leave_requests
            WHERE tenant_id = $1 AND ($2::leave_status IS NULL OR status = $2)
            ORDER BY start_date DESC
            "#,
            LEAVE_COLUMNS
        );
        let requests = sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(tenant_id)
            .bind(status)
            .fetch_all(executor)
            .await?;
        Ok(requests)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        req: &CreateLeaveRequest,
    ) -> Result<LeaveRequest, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO leave_requests (tenant_id, staff_name, leave_type, start_date, end_date, reason)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            LEAVE_COLUMNS
        );
        let request = sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(tenant_id)
            .bind(req.staff_name.trim())
            .bind(req.leave_type)
            .bind(req.start_date)
            .bind(req.end_date)
            .bind(&req.reason)
            .fetch_one(executor)
            .await?;
        Ok(request)
    }

    pub async fn find<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        leave_id: Uuid,
    ) -> Result<Option<LeaveRequest>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM leave_requests WHERE tenant_id = $1 AND id = $2",
            LEAVE_COLUMNS
        );
        let request = sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(tenant_id)
            .bind(leave_id)
            .fetch_optional(executor)
            .await?;
        Ok(request)
    }

    /// Applies a decision only while the request is still pending; `None` otherwise.
    pub async fn decide<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        leave_id: Uuid,
        status: LeaveStatus,
        review_notes: Option<&str>,
    ) -> Result<Option<LeaveRequest>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE leave_requests
            SET status = $3, review_notes = $4, decided_at = NOW()
            WHERE tenant_id = $1 AND id = $2 AND status = 'PENDING'
            RETURNING {}
            "#,
            LEAVE_COLUMNS
        );
        let request = sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(tenant_id)
            .bind(leave_id)
            .bind(status)
            .bind(review_notes)
            .fetch_optional(executor)
            .await?;
        Ok(request)
    }
}
