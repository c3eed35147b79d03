// src/services/job_service.rs

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{job_repo::ScheduleSlot, CrewRepository, JobRepository},
    models::jobs::{
        build_board, AssignJobRequest, Assignee, AssignmentResponse, Job, JobBoard, JobFilter,
        JobListEntry, JobStatus, JobStatusChange, PortalJobView, SubcontractorJobSummary,
        UpdateScheduleRequest, DEFAULT_START_TIME,
    },
    services::portal_token,
};

#[derive(Clone)]
pub struct JobService {
    job_repo: JobRepository,
    crew_repo: CrewRepository,
    pool: PgPool,
    public_base_url: String,
}

impl JobService {
    pub fn new(
        job_repo: JobRepository,
        crew_repo: CrewRepository,
        pool: PgPool,
        public_base_url: String,
    ) -> Self {
        Self { job_repo, crew_repo, pool, public_base_url }
    }

    // =========================================================================
    //  READS
    // =========================================================================

    pub async fn list_jobs(
        &self,
        tenant_id: Uuid,
        filter: &JobFilter,
    ) -> Result<Vec<JobListEntry>, AppError> {
        let today = Utc::now().date_naive();
        let jobs = self.job_repo.list_jobs(&self.pool, tenant_id, filter).await?;
        Ok(jobs.into_iter().map(|j| j.with_deadline_flags(today)).collect())
    }

    pub async fn board(&self, tenant_id: Uuid) -> Result<JobBoard, AppError> {
        let jobs = self.list_jobs(tenant_id, &JobFilter::default()).await?;
        Ok(build_board(jobs))
    }

    pub async fn get_job(&self, tenant_id: Uuid, job_id: Uuid) -> Result<Job, AppError> {
        self.job_repo
            .find_job(&self.pool, tenant_id, job_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Job".into()))
    }

    pub async fn history(
        &self,
        tenant_id: Uuid,
        job_id: Uuid,
    ) -> Result<Vec<JobStatusChange>, AppError> {
        self.get_job(tenant_id, job_id).await?;
        self.job_repo.list_history(&self.pool, tenant_id, job_id).await
    }

    // =========================================================================
    //  STATUS / SCHEDULE
    // =========================================================================

    pub async fn update_status(
        &self,
        tenant_id: Uuid,
        job_id: Uuid,
        next: JobStatus,
        actor: Uuid,
    ) -> Result<Job, AppError> {
        let mut tx = self.pool.begin().await?;

        let job = self
            .job_repo
            .find_job_for_update(&mut *tx, tenant_id, job_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Job".into()))?;

        if !job.status.can_transition_to(next) {
            return Err(AppError::InvalidStatusTransition {
                from: job.status.code().to_string(),
                to: next.code().to_string(),
            });
        }

        let updated = self.job_repo.set_status(&mut *tx, tenant_id, job_id, next).await?;
        self.job_repo
            .record_status_change(&mut *tx, tenant_id, job_id, Some(job.status), next, Some(actor))
            .await?;

        tx.commit().await?;

        tracing::info!(
            job_id = %job_id,
            from = job.status.code(),
            to = next.code(),
            "Job status changed"
        );
        Ok(updated)
    }

    pub async fn update_schedule(
        &self,
        tenant_id: Uuid,
        job_id: Uuid,
        req: &UpdateScheduleRequest,
    ) -> Result<Job, AppError> {
        let job = self.get_job(tenant_id, job_id).await?;
        if job.status.is_terminal() {
            return Err(AppError::Conflict(format!(
                "Job {} is {} and can no longer be rescheduled",
                job.job_number,
                job.status.label()
            )));
        }

        self.job_repo
            .update_schedule(&self.pool, tenant_id, job_id, req)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Job".into()))
    }

    // =========================================================================
    //  ASSIGNMENT
    // =========================================================================

    /// Gives the job to a team or a subcontractor. Credential problems are
    /// reported as warnings and never block the assignment.
    pub async fn assign(
        &self,
        tenant_id: Uuid,
        job_id: Uuid,
        req: &AssignJobRequest,
        actor: Uuid,
    ) -> Result<AssignmentResponse, AppError> {
        let (assignee, date) = req.resolve().map_err(|msg| AppError::MissingFields(msg.into()))?;
        let start_time = req.scheduled_start_time.as_deref().unwrap_or(DEFAULT_START_TIME);
        let slot = ScheduleSlot { date, start_time, notes: req.notes.as_deref() };

        let mut tx = self.pool.begin().await?;

        let job = self
            .job_repo
            .find_job_for_update(&mut *tx, tenant_id, job_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Job".into()))?;

        if !job.status.accepts_assignment() {
            return Err(AppError::Conflict(format!(
                "Job {} cannot be assigned while {}",
                job.job_number,
                job.status.label()
            )));
        }

        let mut warnings = Vec::new();
        let mut confirmation_url = None;

        let updated = match assignee {
            Assignee::Team(team_id) => {
                let team = self
                    .crew_repo
                    .find_team(&mut *tx, tenant_id, team_id)
                    .await?
                    .ok_or_else(|| AppError::ResourceNotFound("Team".into()))?;

                if let Some(electrician_id) = team.lead_electrician_id {
                    if let Some(lead) = self
                        .crew_repo
                        .find_electrician(&mut *tx, tenant_id, electrician_id)
                        .await?
                    {
                        warnings = lead.credential_warnings(Utc::now().date_naive());
                    }
                }

                self.job_repo
                    .assign_team(&mut *tx, tenant_id, job_id, team.id, team.lead_electrician_id, &slot)
                    .await?
            }
            Assignee::Subcontractor(subcontractor_id) => {
                let subcontractor = self
                    .crew_repo
                    .find_subcontractor(&mut *tx, tenant_id, subcontractor_id)
                    .await?
                    .ok_or_else(|| AppError::ResourceNotFound("Subcontractor".into()))?;

                let token = portal_token();
                let job = self
                    .job_repo
                    .assign_subcontractor(&mut *tx, tenant_id, job_id, subcontractor.id, &token, &slot)
                    .await?;
                confirmation_url = Some(self.confirmation_url(&token));
                job
            }
        };

        self.job_repo
            .record_status_change(
                &mut *tx,
                tenant_id,
                job_id,
                Some(job.status),
                updated.status,
                Some(actor),
            )
            .await?;

        tx.commit().await?;

        for warning in &warnings {
            tracing::warn!(job_id = %job_id, "{}", warning);
        }
        tracing::info!(
            job_id = %job_id,
            status = updated.status.code(),
            date = %date,
            "Job assigned"
        );

        Ok(AssignmentResponse { job: updated, warnings, confirmation_url })
    }

    fn confirmation_url(&self, token: &str) -> String {
        format!("{}/subcontractor/confirm/{}", self.public_base_url, token)
    }

    // =========================================================================
    //  SUBCONTRACTOR LINKS
    // =========================================================================

    pub async fn subcontractor_summary(
        &self,
        token: &str,
    ) -> Result<SubcontractorJobSummary, AppError> {
        self.job_repo
            .subcontractor_summary(&self.pool, token)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Assignment".into()))
    }

    pub async fn confirm_subcontractor(&self, token: &str) -> Result<Job, AppError> {
        let mut tx = self.pool.begin().await?;
        let job = self.pending_confirmation(&mut tx, token).await?;

        let updated = self.job_repo.confirm_subcontractor(&mut *tx, job.id).await?;
        self.job_repo
            .record_status_change(&mut *tx, job.tenant_id, job.id, Some(job.status), updated.status, None)
            .await?;
        tx.commit().await?;

        tracing::info!(job_id = %job.id, "Subcontractor confirmed");
        Ok(updated)
    }

    pub async fn reject_subcontractor(
        &self,
        token: &str,
        reason: Option<&str>,
    ) -> Result<Job, AppError> {
        let mut tx = self.pool.begin().await?;
        let job = self.pending_confirmation(&mut tx, token).await?;

        let reason = reason.map(str::trim).filter(|r| !r.is_empty());
        let updated = self.job_repo.reject_subcontractor(&mut *tx, job.id, reason).await?;
        self.job_repo
            .record_status_change(&mut *tx, job.tenant_id, job.id, Some(job.status), updated.status, None)
            .await?;
        tx.commit().await?;

        tracing::info!(job_id = %job.id, "Subcontractor rejected assignment");
        Ok(updated)
    }

    async fn pending_confirmation(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        token: &str,
    ) -> Result<Job, AppError> {
        let job = self
            .job_repo
            .find_by_confirmation_token(&mut **tx, token)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Assignment".into()))?;

        if job.status != JobStatus::PendingSubConfirm {
            return Err(AppError::Conflict(format!(
                "Job {} is not awaiting confirmation",
                job.job_number
            )));
        }
        Ok(job)
    }

    // =========================================================================
    //  CUSTOMER PORTAL
    // =========================================================================

    pub async fn portal_view(&self, token: &str) -> Result<PortalJobView, AppError> {
        let job = self
            .job_repo
            .find_by_portal_token(&self.pool, token)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Job".into()))?;
        Ok(PortalJobView::from(&job))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn service() -> JobService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        JobService::new(
            JobRepository::new(pool.clone()),
            CrewRepository::new(pool.clone()),
            pool,
            "https://ops.example.com.au".into(),
        )
    }

    #[tokio::test]
    async fn confirmation_links_point_at_the_public_site() {
        let url = service().confirmation_url("abc123");
        assert_eq!(url, "https://ops.example.com.au/subcontractor/confirm/abc123");
    }

    #[tokio::test]
    async fn incomplete_assignments_are_refused_before_touching_the_database() {
        let req = AssignJobRequest {
            assignment_type: None,
            team_id: None,
            subcontractor_id: None,
            scheduled_date: None,
            scheduled_start_time: None,
            notes: None,
        };
        let err = service()
            .assign(Uuid::new_v4(), Uuid::new_v4(), &req, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingFields(msg) if msg == "assignmentType is required"));
    }
}
