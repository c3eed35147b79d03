// src/services/checklist_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ChecklistRepository, JobRepository},
    models::checklist::{build_checklist, find_item, ChecklistEntry, JobChecklist},
};

#[derive(Clone)]
pub struct ChecklistService {
    checklist_repo: ChecklistRepository,
    job_repo: JobRepository,
}

impl ChecklistService {
    pub fn new(checklist_repo: ChecklistRepository, job_repo: JobRepository) -> Self {
        Self { checklist_repo, job_repo }
    }

    /// The full catalogue for a job, merged with what has been ticked so far.
    pub async fn get_checklist(&self, tenant_id: Uuid, job_id: Uuid) -> Result<JobChecklist, AppError> {
        self.ensure_job(tenant_id, job_id).await?;
        let saved = self
            .checklist_repo
            .list_entries(self.checklist_repo.pool(), tenant_id, job_id)
            .await?;
        Ok(build_checklist(job_id, &saved))
    }

    pub async fn set_item(
        &self,
        tenant_id: Uuid,
        job_id: Uuid,
        item_key: &str,
        is_completed: bool,
        user_id: Uuid,
    ) -> Result<ChecklistEntry, AppError> {
        let item = find_item(item_key)
            .ok_or_else(|| AppError::ResourceNotFound(format!("Checklist item '{}'", item_key)))?;
        self.ensure_job(tenant_id, job_id).await?;

        let entry = self
            .checklist_repo
            .upsert_entry(self.checklist_repo.pool(), tenant_id, job_id, item.key, is_completed, user_id)
            .await?;

        tracing::debug!(job_id = %job_id, item = item.key, is_completed, "Checklist item updated");
        Ok(entry)
    }

    async fn ensure_job(&self, tenant_id: Uuid, job_id: Uuid) -> Result<(), AppError> {
        self.job_repo
            .find_job(self.job_repo.pool(), tenant_id, job_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::ResourceNotFound("Job".into()))
    }
}
