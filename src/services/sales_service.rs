// src/services/sales_service.rs

use chrono::{Datelike, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    db::{
        job_repo::NewJob, sales_repo::NewQuote, JobRepository, SalesRepository,
        SettingsRepository,
    },
    models::{
        jobs::{self, Job, JobStatus},
        sales::{
            quote_reference, CreateQuoteRequest, CustomerQuote, Lead, LeadFilter, LeadStatus,
            LeadSubmission, PublicLeadRequest, QuoteStatus, UpdateLeadRequest,
        },
    },
    services::{calculators::deposit_amount, portal_token},
};

/// Fresh references drawn before a quote insert gives up.
const QUOTE_REFERENCE_ATTEMPTS: usize = 5;

// Leads, customer quotes and the hand-off from an accepted quote to a job
#[derive(Clone)]
pub struct SalesService {
    sales_repo: SalesRepository,
    job_repo: JobRepository,
    settings_repo: SettingsRepository,
    pool: PgPool,
}

impl SalesService {
    pub fn new(
        sales_repo: SalesRepository,
        job_repo: JobRepository,
        settings_repo: SettingsRepository,
        pool: PgPool,
    ) -> Self {
        Self { sales_repo, job_repo, settings_repo, pool }
    }

    // =========================================================================
    //  LEADS
    // =========================================================================

    /// Stores a calculator submission as a lead plus its draft quote.
    pub async fn submit_lead(
        &self,
        tenant_id: Uuid,
        req: &PublicLeadRequest,
    ) -> Result<LeadSubmission, AppError> {
        let settings = self.settings_repo.get_settings(&self.pool, tenant_id).await?;
        let pricing = req.pricing();
        let total_cost = pricing.total_cost()?;
        let deposit = deposit_amount(total_cost, &settings.deposit_settings())?;

        let mut tx = self.pool.begin().await?;

        let lead = self.sales_repo.create_lead(&mut *tx, tenant_id, req).await?;

        let new_quote = NewQuote {
            lead_id: lead.id,
            system_size: req.system_size,
            panel_count: req.panel_count,
            battery_capacity: req.battery_capacity,
            equipment_cost: pricing.equipment_cost,
            installation_cost: pricing.installation_cost,
            rebates: pricing.rebates,
            total_cost,
            deposit_amount: deposit,
        };
        let quote = self.insert_quote(&mut tx, tenant_id, &new_quote).await?;

        tx.commit().await?;

        tracing::info!(lead_id = %lead.id, quote = %quote.reference, "Lead captured from calculator");
        Ok(LeadSubmission { lead, quote })
    }

    pub async fn list_leads(&self, tenant_id: Uuid, filter: &LeadFilter) -> Result<Vec<Lead>, AppError> {
        self.sales_repo.list_leads(&self.pool, tenant_id, filter).await
    }

    pub async fn get_lead(&self, tenant_id: Uuid, lead_id: Uuid) -> Result<Lead, AppError> {
        self.sales_repo
            .find_lead(&self.pool, tenant_id, lead_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Lead".into()))
    }

    pub async fn update_lead(
        &self,
        tenant_id: Uuid,
        lead_id: Uuid,
        req: &UpdateLeadRequest,
    ) -> Result<Lead, AppError> {
        self.sales_repo
            .update_lead(&self.pool, tenant_id, lead_id, req.status, req.notes.as_deref())
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Lead".into()))
    }

    // =========================================================================
    //  QUOTES
    // =========================================================================

    pub async fn create_quote(
        &self,
        tenant_id: Uuid,
        req: &CreateQuoteRequest,
    ) -> Result<CustomerQuote, AppError> {
        // The lead must belong to the same company
        self.get_lead(tenant_id, req.lead_id).await?;

        let settings = self.settings_repo.get_settings(&self.pool, tenant_id).await?;
        let total_cost = req.pricing().total_cost()?;
        let deposit = deposit_amount(total_cost, &settings.deposit_settings())?;
        let new_quote = NewQuote::from_request(req, total_cost, deposit);

        let mut tx = self.pool.begin().await?;
        let quote = self.insert_quote(&mut tx, tenant_id, &new_quote).await?;
        self.sales_repo
            .set_lead_status(&mut *tx, tenant_id, req.lead_id, LeadStatus::Quoted)
            .await?;
        tx.commit().await?;

        Ok(quote)
    }

    /// Inserts under a new `Q-YYYYMMDD-XXXX` reference, drawing another
    /// when the day's reference is already taken.
    async fn insert_quote(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        quote: &NewQuote,
    ) -> Result<CustomerQuote, AppError> {
        let today = Utc::now().date_naive();

        for _ in 0..QUOTE_REFERENCE_ATTEMPTS {
            let quote_id = Uuid::new_v4();
            let reference = quote_reference(today, quote_id);
            let created = self
                .sales_repo
                .create_quote(&mut *conn, tenant_id, quote_id, &reference, quote)
                .await
                .map_err(|e| map_unique_violation(e, || format!("Quote {} already exists", reference)))?;

            match created {
                Some(created) => return Ok(created),
                None => tracing::warn!(reference = %reference, "Quote reference taken, drawing another"),
            }
        }

        Err(references_exhausted())
    }

    pub async fn list_quotes(
        &self,
        tenant_id: Uuid,
        lead_id: Option<Uuid>,
    ) -> Result<Vec<CustomerQuote>, AppError> {
        self.sales_repo.list_quotes(&self.pool, tenant_id, lead_id).await
    }

    pub async fn get_quote(&self, tenant_id: Uuid, quote_id: Uuid) -> Result<CustomerQuote, AppError> {
        self.sales_repo
            .find_quote(&self.pool, tenant_id, quote_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Quote".into()))
    }

    /// Marks a quote as sent or declined. Acceptance has its own flow.
    pub async fn set_quote_status(
        &self,
        tenant_id: Uuid,
        quote_id: Uuid,
        status: QuoteStatus,
    ) -> Result<CustomerQuote, AppError> {
        if !matches!(status, QuoteStatus::Sent | QuoteStatus::Declined) {
            return Err(AppError::InvalidInput(
                "Use the accept endpoint to accept a quote; only SENT or DECLINED can be set".into(),
            ));
        }

        let mut tx = self.pool.begin().await?;
        let quote = self
            .sales_repo
            .find_quote_for_update(&mut *tx, tenant_id, quote_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Quote".into()))?;

        if !quote.status.can_be_accepted() {
            return Err(AppError::Conflict(format!(
                "Quote {} is already {:?}",
                quote.reference, quote.status
            )));
        }

        let updated = self
            .sales_repo
            .set_quote_status(&mut *tx, tenant_id, quote_id, status, None)
            .await?;
        if status == QuoteStatus::Declined {
            self.sales_repo
                .set_lead_status(&mut *tx, tenant_id, quote.lead_id, LeadStatus::Lost)
                .await?;
        }
        tx.commit().await?;

        Ok(updated)
    }

    /// Accepts a quote and opens the installation job for it.
    pub async fn accept_quote(
        &self,
        tenant_id: Uuid,
        quote_id: Uuid,
        accepted_by: Uuid,
    ) -> Result<Job, AppError> {
        let mut tx = self.pool.begin().await?;

        let quote = self
            .sales_repo
            .find_quote_for_update(&mut *tx, tenant_id, quote_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Quote".into()))?;

        if !quote.status.can_be_accepted() {
            return Err(AppError::Conflict(format!(
                "Quote {} cannot be accepted from {:?}",
                quote.reference, quote.status
            )));
        }
        if self.job_repo.exists_for_quote(&mut *tx, tenant_id, quote_id).await? {
            return Err(AppError::Conflict(format!(
                "Quote {} already has a job",
                quote.reference
            )));
        }

        let lead = self
            .sales_repo
            .find_lead(&mut *tx, tenant_id, quote.lead_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Lead".into()))?;

        let now = Utc::now();
        let today = now.date_naive();
        self.sales_repo
            .set_quote_status(&mut *tx, tenant_id, quote_id, QuoteStatus::Accepted, Some(now))
            .await?;
        self.sales_repo
            .set_lead_status(&mut *tx, tenant_id, lead.id, LeadStatus::Won)
            .await?;

        let sequence = self.job_repo.next_job_sequence(&mut *tx, tenant_id, today.year()).await?;
        let job_number = jobs::job_number(today, sequence);
        let token = portal_token();
        let new_job = NewJob {
            job_number: &job_number,
            lead_id: lead.id,
            quote_id,
            scheduling_deadline: jobs::scheduling_deadline(today),
            estimated_duration: jobs::estimated_duration_hours(
                quote.panel_count,
                quote.battery_capacity,
            ),
            system_size: quote.system_size,
            panel_count: quote.panel_count,
            battery_capacity: quote.battery_capacity,
            site_suburb: lead.suburb.as_deref(),
            portal_token: &token,
        };
        let job = self
            .job_repo
            .create_job(&mut *tx, tenant_id, &new_job)
            .await
            .map_err(|e| map_unique_violation(e, || format!("Job number {} is taken, retry", job_number)))?;

        self.job_repo
            .record_status_change(&mut *tx, tenant_id, job.id, None, JobStatus::DepositPaid, Some(accepted_by))
            .await?;

        tx.commit().await?;

        tracing::info!(job_id = %job.id, job_number = %job.job_number, "Quote accepted, job created");
        Ok(job)
    }
}

fn references_exhausted() -> AppError {
    AppError::UniqueConstraintViolation("No free quote reference could be drawn, retry".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn running_out_of_references_is_a_conflict() {
        let api = references_exhausted().to_api_error();
        assert_eq!(api.status, StatusCode::CONFLICT);
    }

    #[test]
    fn each_attempt_draws_a_distinct_reference() {
        let today = Utc::now().date_naive();
        let references: std::collections::HashSet<String> = (0..QUOTE_REFERENCE_ATTEMPTS)
            .map(|_| quote_reference(today, Uuid::new_v4()))
            .collect();
        assert!(references.len() > 1);
        assert!(references.iter().all(|r| r.starts_with(&format!("Q-{}-", today.format("%Y%m%d")))));
    }
}
