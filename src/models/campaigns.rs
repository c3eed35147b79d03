// src/models/campaigns.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub const MISSING_FIELDS_DESCRIPTION: &str = "Please provide name and at least one step";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "campaign_trigger", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignTrigger {
    LeadCreated,
    QuoteSent,
    NoResponse,
    DealWon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "campaign_action", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignAction {
    Email,
    Sms,
}

/// Human form of a step delay: hours below a day, whole days otherwise.
pub fn delay_label(hours: i32) -> String {
    if hours < 24 {
        format!("{}h", hours)
    } else {
        format!("{}d", hours / 24)
    }
}

// --- Records ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    #[schema(example = "New lead nurture")]
    pub name: String,
    pub description: String,
    pub enabled: bool,
    pub trigger: CampaignTrigger,
    pub enrolled_count: i32,
    pub completed_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignStep {
    pub id: Uuid,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub campaign_id: Uuid,
    #[schema(example = 1)]
    pub step_order: i32,
    #[schema(example = 24)]
    pub delay_hours: i32,
    pub action: CampaignAction,
    #[schema(example = "welcome-email")]
    pub template_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepView {
    #[serde(flatten)]
    pub step: CampaignStep,
    #[schema(example = "1d")]
    pub delay_label: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignView {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub steps: Vec<StepView>,
}

impl CampaignView {
    pub fn new(campaign: Campaign, steps: Vec<CampaignStep>) -> Self {
        let steps = steps
            .into_iter()
            .map(|step| StepView { delay_label: delay_label(step.delay_hours), step })
            .collect();
        Self { campaign, steps }
    }
}

// --- Payloads ---

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepInput {
    #[validate(range(min = 0, message = "delay must not be negative"))]
    #[schema(example = 24)]
    pub delay_hours: i32,
    pub action: CampaignAction,
    #[serde(default)]
    #[schema(example = "welcome-email")]
    pub template_id: String,
}

/// A step ready to be stored, numbered from 1 in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStep {
    pub step_order: i32,
    pub delay_hours: i32,
    pub action: CampaignAction,
    pub template_id: String,
}

pub fn number_steps(steps: &[StepInput]) -> Vec<NewStep> {
    steps
        .iter()
        .zip(1..)
        .map(|(s, order)| NewStep {
            step_order: order,
            delay_hours: s.delay_hours,
            action: s.action,
            template_id: s.template_id.clone(),
        })
        .collect()
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveCampaignRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub trigger: CampaignTrigger,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    #[validate(nested)]
    pub steps: Vec<StepInput>,
}

fn default_enabled() -> bool {
    true
}

impl SaveCampaignRequest {
    /// A campaign needs a non-blank name and at least one step.
    pub fn has_required_fields(&self) -> bool {
        !self.name.trim().is_empty() && !self.steps.is_empty()
    }
}

/// PATCH body: either `{enabled}` alone or a full save.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaignRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub trigger: Option<CampaignTrigger>,
    pub enabled: Option<bool>,
    #[validate(nested)]
    pub steps: Option<Vec<StepInput>>,
}

impl UpdateCampaignRequest {
    pub fn toggle_only(&self) -> Option<bool> {
        let touches_content = self.name.is_some()
            || self.description.is_some()
            || self.trigger.is_some()
            || self.steps.is_some();
        if touches_content { None } else { self.enabled }
    }

    /// Fills absent fields (steps included) from the stored campaign to form a full save.
    pub fn into_save(self, current: &Campaign, current_steps: &[CampaignStep]) -> SaveCampaignRequest {
        SaveCampaignRequest {
            name: self.name.unwrap_or_else(|| current.name.clone()),
            description: self.description.unwrap_or_else(|| current.description.clone()),
            trigger: self.trigger.unwrap_or(current.trigger),
            enabled: self.enabled.unwrap_or(current.enabled),
            steps: self.steps.unwrap_or_else(|| {
                current_steps
                    .iter()
                    .map(|s| StepInput {
                        delay_hours: s.delay_hours,
                        action: s.action,
                        template_id: s.template_id.clone(),
                    })
                    .collect()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn step(delay_hours: i32) -> StepInput {
        StepInput { delay_hours, action: CampaignAction::Email, template_id: "t".into() }
    }

    #[test]
    fn delay_labels_switch_to_days_at_24_hours() {
        assert_eq!(delay_label(0), "0h");
        assert_eq!(delay_label(23), "23h");
        assert_eq!(delay_label(24), "1d");
        assert_eq!(delay_label(71), "2d");
        assert_eq!(delay_label(168), "7d");
    }

    #[test]
    fn steps_are_renumbered_in_submission_order() {
        let numbered = number_steps(&[step(48), step(0), step(24)]);
        let orders: Vec<(i32, i32)> = numbered.iter().map(|s| (s.step_order, s.delay_hours)).collect();
        assert_eq!(orders, vec![(1, 48), (2, 0), (3, 24)]);
    }

    #[test]
    fn zero_steps_or_blank_name_is_incomplete() {
        let req: SaveCampaignRequest =
            serde_json::from_value(json!({ "name": "Nurture", "trigger": "LEAD_CREATED" })).unwrap();
        assert!(!req.has_required_fields());

        let req: SaveCampaignRequest = serde_json::from_value(json!({
            "name": "  ",
            "trigger": "LEAD_CREATED",
            "steps": [{ "delayHours": 1, "action": "SMS" }]
        }))
        .unwrap();
        assert!(!req.has_required_fields());
        assert!(req.enabled);
    }

    #[test]
    fn negative_delay_fails_validation() {
        let req = SaveCampaignRequest {
            name: "Nurture".into(),
            description: String::new(),
            trigger: CampaignTrigger::QuoteSent,
            enabled: true,
            steps: vec![step(-1)],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn patch_with_only_enabled_is_a_toggle() {
        let toggle: UpdateCampaignRequest = serde_json::from_value(json!({ "enabled": false })).unwrap();
        assert_eq!(toggle.toggle_only(), Some(false));

        let full: UpdateCampaignRequest =
            serde_json::from_value(json!({ "enabled": false, "name": "x" })).unwrap();
        assert_eq!(full.toggle_only(), None);
    }
}
