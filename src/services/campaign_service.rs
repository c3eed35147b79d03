// src/services/campaign_service.rs

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::CampaignRepository,
    models::campaigns::{
        number_steps, Campaign, CampaignStep, CampaignView, SaveCampaignRequest,
        UpdateCampaignRequest, MISSING_FIELDS_DESCRIPTION,
    },
};

#[derive(Clone)]
pub struct CampaignService {
    campaign_repo: CampaignRepository,
    pool: PgPool,
}

impl CampaignService {
    pub fn new(campaign_repo: CampaignRepository, pool: PgPool) -> Self {
        Self { campaign_repo, pool }
    }

    pub async fn list(&self, tenant_id: Uuid) -> Result<Vec<CampaignView>, AppError> {
        let campaigns = self.campaign_repo.list_campaigns(&self.pool, tenant_id).await?;
        let ids: Vec<Uuid> = campaigns.iter().map(|c| c.id).collect();
        let steps = self.campaign_repo.list_steps(&self.pool, tenant_id, &ids).await?;

        let mut by_campaign: HashMap<Uuid, Vec<CampaignStep>> = HashMap::new();
        for step in steps {
            by_campaign.entry(step.campaign_id).or_default().push(step);
        }

        Ok(campaigns
            .into_iter()
            .map(|c| {
                let steps = by_campaign.remove(&c.id).unwrap_or_default();
                CampaignView::new(c, steps)
            })
            .collect())
    }

    pub async fn create(
        &self,
        tenant_id: Uuid,
        req: &SaveCampaignRequest,
    ) -> Result<CampaignView, AppError> {
        check_complete(req)?;

        let mut tx = self.pool.begin().await?;
        let campaign = self
            .campaign_repo
            .insert_campaign(&mut *tx, tenant_id, req.name.trim(), &req.description, req.trigger, req.enabled)
            .await?;
        let steps = self.write_steps(&mut tx, tenant_id, &campaign, req).await?;
        tx.commit().await?;

        tracing::info!(campaign_id = %campaign.id, steps = steps.len(), "Campaign created");
        Ok(CampaignView::new(campaign, steps))
    }

    /// `{enabled}` alone flips the switch; anything else is a full save.
    pub async fn update(
        &self,
        tenant_id: Uuid,
        campaign_id: Uuid,
        req: UpdateCampaignRequest,
    ) -> Result<CampaignView, AppError> {
        if let Some(enabled) = req.toggle_only() {
            let campaign = self
                .campaign_repo
                .set_enabled(&self.pool, tenant_id, campaign_id, enabled)
                .await?
                .ok_or_else(|| AppError::ResourceNotFound("Campaign".into()))?;
            let steps = self.campaign_repo.list_steps(&self.pool, tenant_id, &[campaign_id]).await?;
            return Ok(CampaignView::new(campaign, steps));
        }

        let mut tx = self.pool.begin().await?;

        let current = self
            .campaign_repo
            .find_campaign(&mut *tx, tenant_id, campaign_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Campaign".into()))?;
        let current_steps = self
            .campaign_repo
            .list_steps(&mut *tx, tenant_id, &[campaign_id])
            .await?;

        let save = req.into_save(&current, &current_steps);
        check_complete(&save)?;

        let campaign = self
            .campaign_repo
            .update_campaign(
                &mut *tx,
                tenant_id,
                campaign_id,
                save.name.trim(),
                &save.description,
                save.trigger,
                save.enabled,
            )
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Campaign".into()))?;

        self.campaign_repo.delete_steps(&mut *tx, tenant_id, campaign_id).await?;
        let steps = self.write_steps(&mut tx, tenant_id, &campaign, &save).await?;
        tx.commit().await?;

        Ok(CampaignView::new(campaign, steps))
    }

    pub async fn delete(&self, tenant_id: Uuid, campaign_id: Uuid) -> Result<(), AppError> {
        if self.campaign_repo.delete_campaign(&self.pool, tenant_id, campaign_id).await? {
            tracing::info!(campaign_id = %campaign_id, "Campaign deleted");
            Ok(())
        } else {
            Err(AppError::ResourceNotFound("Campaign".into()))
        }
    }

    async fn write_steps(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        tenant_id: Uuid,
        campaign: &Campaign,
        req: &SaveCampaignRequest,
    ) -> Result<Vec<CampaignStep>, AppError> {
        let mut saved = Vec::with_capacity(req.steps.len());
        for step in number_steps(&req.steps) {
            let row = self
                .campaign_repo
                .insert_step(&mut **tx, tenant_id, campaign.id, &step)
                .await?;
            saved.push(row);
        }
        Ok(saved)
    }
}

fn check_complete(req: &SaveCampaignRequest) -> Result<(), AppError> {
    if !req.has_required_fields() {
        return Err(AppError::MissingFields(MISSING_FIELDS_DESCRIPTION.to_string()));
    }
    req.validate()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::campaigns::{CampaignAction, CampaignTrigger, StepInput};

    #[test]
    fn a_campaign_without_steps_is_missing_fields() {
        let req = SaveCampaignRequest {
            name: "Win-back".into(),
            description: String::new(),
            trigger: CampaignTrigger::NoResponse,
            enabled: true,
            steps: vec![],
        };
        let err = check_complete(&req).unwrap_err();
        assert!(matches!(err, AppError::MissingFields(ref d) if d == MISSING_FIELDS_DESCRIPTION));
    }

    #[test]
    fn negative_delays_surface_as_validation_errors() {
        let req = SaveCampaignRequest {
            name: "Win-back".into(),
            description: String::new(),
            trigger: CampaignTrigger::NoResponse,
            enabled: true,
            steps: vec![StepInput {
                delay_hours: -5,
                action: CampaignAction::Sms,
                template_id: "nudge".into(),
            }],
        };
        assert!(matches!(check_complete(&req), Err(AppError::ValidationError(_))));
    }
}
