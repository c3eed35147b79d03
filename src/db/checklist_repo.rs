// src/db/checklist_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::checklist::ChecklistEntry};

#[derive(Clone)]
pub struct ChecklistRepository {
    pool: PgPool,
}

impl ChecklistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn list_entries<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        job_id: Uuid,
    ) -> Result<Vec<ChecklistEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entries = sqlx::query_as::<_, ChecklistEntry>(
            r#"
            SELECT job_id, item_key, is_completed, completed_by, completed_at
            FROM job_checklist_items
            WHERE tenant_id = $1 AND job_id = $2
            "#,
        )
        .bind(tenant_id)
        .bind(job_id)
        .fetch_all(executor)
        .await?;
        Ok(entries)
    }

    /// Sets one item's flag. Completion stamps who and when; clearing wipes both.
    pub async fn upsert_entry<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        job_id: Uuid,
        item_key: &str,
        is_completed: bool,
        user_id: Uuid,
    ) -> Result<ChecklistEntry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, ChecklistEntry>(
            r#"
            INSERT INTO job_checklist_items (
                tenant_id, job_id, item_key, is_completed, completed_by, completed_at
            )
            VALUES (
                $1, $2, $3, $4,
                CASE WHEN $4 THEN $5 END,
                CASE WHEN $4 THEN NOW() END
            )
            ON CONFLICT (job_id, item_key)
            DO UPDATE SET
                is_completed = EXCLUDED.is_completed,
                completed_by = EXCLUDED.completed_by,
                completed_at = EXCLUDED.completed_at,
                updated_at = NOW()
            RETURNING job_id, item_key, is_completed, completed_by, completed_at
            "#,
        )
        .bind(tenant_id)
        .bind(job_id)
        .bind(item_key)
        .bind(is_completed)
        .bind(user_id)
        .fetch_one(executor)
        .await?;
        Ok(entry)
    }
}
