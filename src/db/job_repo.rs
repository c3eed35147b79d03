// src/db/job_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::jobs::{
        Job, JobFilter, JobListEntry, JobStatus, JobStatusChange, SubcontractorJobSummary,
        UpdateScheduleRequest,
    },
};

const JOB_COLUMNS: &str = "id, tenant_id, job_number, lead_id, quote_id, status, \
     status_changed_at, scheduled_date, scheduled_start_time, scheduling_deadline, \
     estimated_duration, system_size, panel_count, battery_capacity, site_suburb, \
     installation_notes, team_id, subcontractor_id, lead_electrician_id, \
     sub_confirmation_token, sub_confirmed_at, sub_rejected_at, sub_rejection_reason, \
     assigned_at, portal_token, created_at, updated_at";

/// A job derived from an accepted quote.
pub struct NewJob<'a> {
    pub job_number: &'a str,
    pub lead_id: Uuid,
    pub quote_id: Uuid,
    pub scheduling_deadline: NaiveDate,
    pub estimated_duration: i32,
    pub system_size: f64,
    pub panel_count: i32,
    pub battery_capacity: f64,
    pub site_suburb: Option<&'a str>,
    pub portal_token: &'a str,
}

/// Where a team or subcontractor assignment lands.
pub struct ScheduleSlot<'a> {
    pub date: NaiveDate,
    pub start_time: &'a str,
    pub notes: Option<&'a str>,
}

#[derive(Clone)]
pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  CREATION
    // =========================================================================

    /// Next per-company sequence number for the year's job numbers.
    pub async fn next_job_sequence<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        year: i32,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM jobs WHERE tenant_id = $1 AND job_number LIKE $2",
        )
        .bind(tenant_id)
        .bind(format!("SDP-{}-%", year))
        .fetch_one(executor)
        .await?;
        Ok(count + 1)
    }

    pub async fn exists_for_quote<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        quote_id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM jobs WHERE tenant_id = $1 AND quote_id = $2)",
        )
        .bind(tenant_id)
        .bind(quote_id)
        .fetch_one(executor)
        .await?;
        Ok(exists)
    }

    pub async fn create_job<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        job: &NewJob<'_>,
    ) -> Result<Job, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO jobs (
                tenant_id, job_number, lead_id, quote_id, status, scheduling_deadline,
                estimated_duration, system_size, panel_count, battery_capacity,
                site_suburb, portal_token
            )
            VALUES ($1, $2, $3, $4, 'DEPOSIT_PAID', $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            JOB_COLUMNS
        );
        sqlx::query_as::<_, Job>(&sql)
            .bind(tenant_id)
            .bind(job.job_number)
            .bind(job.lead_id)
            .bind(job.quote_id)
            .bind(job.scheduling_deadline)
            .bind(job.estimated_duration)
            .bind(job.system_size)
            .bind(job.panel_count)
            .bind(job.battery_capacity)
            .bind(job.site_suburb)
            .bind(job.portal_token)
            .fetch_one(executor)
            .await
    }

    // =========================================================================
    //  READS
    // =========================================================================

    pub async fn find_job<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<Job>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM jobs WHERE tenant_id = $1 AND id = $2", JOB_COLUMNS);
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(tenant_id)
            .bind(job_id)
            .fetch_optional(executor)
            .await?;
        Ok(job)
    }

    /// Locks the job row until the surrounding transaction ends.
    pub async fn find_job_for_update<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<Job>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM jobs WHERE tenant_id = $1 AND id = $2 FOR UPDATE",
            JOB_COLUMNS
        );
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(tenant_id)
            .bind(job_id)
            .fetch_optional(executor)
            .await?;
        Ok(job)
    }

    pub async fn list_jobs<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        filter: &JobFilter,
    ) -> Result<Vec<JobListEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entries = sqlx::query_as::<_, JobListEntry>(
            r#"
            SELECT
                j.id, j.job_number, j.status, j.scheduled_date, j.scheduling_deadline,
                j.estimated_duration, j.system_size, j.panel_count, j.battery_capacity,
                j.site_suburb, j.lead_id,
                l.name AS lead_name, l.address AS lead_address,
                j.team_id, t.name AS team_name, t.color AS team_color,
                j.subcontractor_id, s.company_name AS subcontractor_name,
                j.created_at
            FROM jobs j
            JOIN leads l ON l.id = j.lead_id
            LEFT JOIN teams t ON t.id = j.team_id
            LEFT JOIN subcontractors s ON s.id = j.subcontractor_id
            WHERE j.tenant_id = $1
              AND ($2::job_status IS NULL OR j.status = $2)
              AND ($3::uuid IS NULL OR j.team_id = $3)
              AND ($4::text IS NULL
                   OR j.job_number ILIKE '%' || $4 || '%'
                   OR l.name ILIKE '%' || $4 || '%'
                   OR l.address ILIKE '%' || $4 || '%'
                   OR j.site_suburb ILIKE '%' || $4 || '%')
            ORDER BY j.scheduling_deadline ASC, j.created_at ASC
            "#,
        )
        .bind(tenant_id)
        .bind(filter.status)
        .bind(filter.team_id)
        .bind(filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()))
        .fetch_all(executor)
        .await?;
        Ok(entries)
    }

    pub async fn list_history<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        job_id: Uuid,
    ) -> Result<Vec<JobStatusChange>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let history = sqlx::query_as::<_, JobStatusChange>(
            r#"
            SELECT id, job_id, from_status, to_status, changed_by, changed_at
            FROM job_status_history
            WHERE tenant_id = $1 AND job_id = $2
            ORDER BY changed_at ASC
            "#,
        )
        .bind(tenant_id)
        .bind(job_id)
        .fetch_all(executor)
        .await?;
        Ok(history)
    }

    // =========================================================================
    //  STATUS
    // =========================================================================

    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        job_id: Uuid,
        status: JobStatus,
    ) -> Result<Job, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE jobs
            SET status = $3, status_changed_at = NOW(), updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            RETURNING {}
            "#,
            JOB_COLUMNS
        );
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(tenant_id)
            .bind(job_id)
            .bind(status)
            .fetch_one(executor)
            .await?;
        Ok(job)
    }

    pub async fn record_status_change<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        job_id: Uuid,
        from: Option<JobStatus>,
        to: JobStatus,
        changed_by: Option<Uuid>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO job_status_history (tenant_id, job_id, from_status, to_status, changed_by)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(tenant_id)
        .bind(job_id)
        .bind(from)
        .bind(to)
        .bind(changed_by)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn update_schedule<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        job_id: Uuid,
        input: &UpdateScheduleRequest,
    ) -> Result<Option<Job>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE jobs
            SET scheduled_date = COALESCE($3, scheduled_date),
                scheduled_start_time = COALESCE($4, scheduled_start_time),
                estimated_duration = COALESCE($5, estimated_duration),
                installation_notes = COALESCE($6, installation_notes),
                updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            RETURNING {}
            "#,
            JOB_COLUMNS
        );
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(tenant_id)
            .bind(job_id)
            .bind(input.scheduled_date)
            .bind(&input.scheduled_start_time)
            .bind(input.estimated_duration)
            .bind(&input.installation_notes)
            .fetch_optional(executor)
            .await?;
        Ok(job)
    }

    // =========================================================================
    //  ASSIGNMENT
    // =========================================================================

    pub async fn assign_team<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        job_id: Uuid,
        team_id: Uuid,
        lead_electrician_id: Option<Uuid>,
        slot: &ScheduleSlot<'_>,
    ) -> Result<Job, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE jobs
            SET team_id = $3,
                lead_electrician_id = $4,
                subcontractor_id = NULL,
                sub_confirmation_token = NULL,
                sub_confirmed_at = NULL,
                status = 'TEAM_ASSIGNED',
                status_changed_at = NOW(),
                scheduled_date = $5,
                scheduled_start_time = $6,
                installation_notes = COALESCE($7, installation_notes),
                assigned_at = NOW(),
                updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            RETURNING {}
            "#,
            JOB_COLUMNS
        );
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(tenant_id)
            .bind(job_id)
            .bind(team_id)
            .bind(lead_electrician_id)
            .bind(slot.date)
            .bind(slot.start_time)
            .bind(slot.notes)
            .fetch_one(executor)
            .await?;
        Ok(job)
    }

    pub async fn assign_subcontractor<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        job_id: Uuid,
        subcontractor_id: Uuid,
        confirmation_token: &str,
        slot: &ScheduleSlot<'_>,
    ) -> Result<Job, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE jobs
            SET subcontractor_id = $3,
                sub_confirmation_token = $4,
                sub_confirmed_at = NULL,
                sub_rejected_at = NULL,
                sub_rejection_reason = NULL,
                team_id = NULL,
                lead_electrician_id = NULL,
                status = 'PENDING_SUB_CONFIRM',
                status_changed_at = NOW(),
                scheduled_date = $5,
                scheduled_start_time = $6,
                installation_notes = COALESCE($7, installation_notes),
                assigned_at = NOW(),
                updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            RETURNING {}
            "#,
            JOB_COLUMNS
        );
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(tenant_id)
            .bind(job_id)
            .bind(subcontractor_id)
            .bind(confirmation_token)
            .bind(slot.date)
            .bind(slot.start_time)
            .bind(slot.notes)
            .fetch_one(executor)
            .await?;
        Ok(job)
    }

    // =========================================================================
    //  TOKEN LOOKUPS (public links, no tenant header)
    // =========================================================================

    pub async fn find_by_confirmation_token<'e, E>(
        &self,
        executor: E,
        token: &str,
    ) -> Result<Option<Job>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM jobs WHERE sub_confirmation_token = $1 FOR UPDATE",
            JOB_COLUMNS
        );
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(token)
            .fetch_optional(executor)
            .await?;
        Ok(job)
    }

    pub async fn subcontractor_summary<'e, E>(
        &self,
        executor: E,
        token: &str,
    ) -> Result<Option<SubcontractorJobSummary>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let summary = sqlx::query_as::<_, SubcontractorJobSummary>(
            r#"
            SELECT
                j.job_number, j.status, j.scheduled_date, j.scheduled_start_time,
                j.estimated_duration, j.system_size, j.panel_count, j.battery_capacity,
                l.address AS site_address, j.installation_notes,
                s.company_name AS subcontractor_name
            FROM jobs j
            JOIN leads l ON l.id = j.lead_id
            JOIN subcontractors s ON s.id = j.subcontractor_id
            WHERE j.sub_confirmation_token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(executor)
        .await?;
        Ok(summary)
    }

    pub async fn confirm_subcontractor<'e, E>(
        &self,
        executor: E,
        job_id: Uuid,
    ) -> Result<Job, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE jobs
            SET status = 'SUB_CONFIRMED',
                status_changed_at = NOW(),
                sub_confirmed_at = NOW(),
                sub_confirmation_token = NULL,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            JOB_COLUMNS
        );
        let job = sqlx::query_as::<_, Job>(&sql).bind(job_id).fetch_one(executor).await?;
        Ok(job)
    }

    pub async fn reject_subcontractor<'e, E>(
        &self,
        executor: E,
        job_id: Uuid,
        reason: Option<&str>,
    ) -> Result<Job, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE jobs
            SET status = 'PENDING_SCHEDULE',
                status_changed_at = NOW(),
                subcontractor_id = NULL,
                sub_confirmation_token = NULL,
                sub_rejected_at = NOW(),
                sub_rejection_reason = $2,
                assigned_at = NULL,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            JOB_COLUMNS
        );
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(job_id)
            .bind(reason)
            .fetch_one(executor)
            .await?;
        Ok(job)
    }

    pub async fn find_by_portal_token<'e, E>(
        &self,
        executor: E,
        token: &str,
    ) -> Result<Option<Job>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM jobs WHERE portal_token = $1", JOB_COLUMNS);
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(token)
            .fetch_optional(executor)
            .await?;
        Ok(job)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
