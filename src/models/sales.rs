// src/models/sales.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::error::AppError;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "lead_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
    New,
    Contacted,
    Quoted,
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "quote_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteStatus {
    Draft,
    Sent,
    Accepted,
    Declined,
}

impl QuoteStatus {
    pub fn can_be_accepted(self) -> bool {
        matches!(self, QuoteStatus::Draft | QuoteStatus::Sent)
    }
}

// --- Records ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    #[schema(example = "Alex Morgan")]
    pub name: String,
    #[schema(example = "alex@example.com")]
    pub email: String,
    pub phone: Option<String>,
    #[schema(example = "12 Ocean Dr, Scarborough WA")]
    pub address: String,
    pub suburb: Option<String>,
    pub postcode: Option<String>,
    #[schema(example = 6.6)]
    pub system_size: f64,
    #[schema(example = 15)]
    pub panel_count: i32,
    #[schema(example = 10.0)]
    pub battery_capacity: f64,
    pub annual_bill: Option<Decimal>,
    #[schema(example = "calculator")]
    pub source: String,
    pub status: LeadStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerQuote {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    pub lead_id: Uuid,
    #[schema(example = "Q-20250314-7F3A")]
    pub reference: String,
    pub system_size: f64,
    pub panel_count: i32,
    pub battery_capacity: f64,
    #[schema(example = "9800.00")]
    pub equipment_cost: Decimal,
    #[schema(example = "2400.00")]
    pub installation_cost: Decimal,
    #[schema(example = "2200.00")]
    pub rebates: Decimal,
    #[schema(example = "10000.00")]
    pub total_cost: Decimal,
    #[schema(example = "3000.00")]
    pub deposit_amount: Decimal,
    pub status: QuoteStatus,
    pub accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Quote pricing inputs.
#[derive(Debug, Clone, Copy)]
pub struct QuotePricing {
    pub equipment_cost: Decimal,
    pub installation_cost: Decimal,
    pub rebates: Decimal,
}

impl QuotePricing {
    /// Equipment plus installation less rebates, never below zero.
    pub fn total_cost(&self) -> Result<Decimal, AppError> {
        self.equipment_cost
            .checked_add(self.installation_cost)
            .and_then(|sum| sum.checked_sub(self.rebates))
            .map(|total| total.max(Decimal::ZERO))
            .ok_or_else(|| AppError::InvalidInput("Quote amounts are out of range".into()))
    }
}

/// Largest money amount accepted in a request.
pub const MAX_AMOUNT: i64 = 1_000_000_000;

pub fn validate_amount(value: &Decimal) -> Result<(), ValidationError> {
    let message = if value.is_sign_negative() {
        "must not be negative"
    } else if *value > Decimal::from(MAX_AMOUNT) {
        "must not exceed 1000000000"
    } else {
        return Ok(());
    };
    let mut err = ValidationError::new("amount");
    err.message = Some(message.into());
    Err(err)
}

// --- Payloads ---

/// Calculator submission from the public website.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicLeadRequest {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    #[validate(email(message = "invalid_email"))]
    pub email: String,
    pub phone: Option<String>,
    #[validate(length(min = 1, message = "required"))]
    pub address: String,
    pub suburb: Option<String>,
    pub postcode: Option<String>,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    #[schema(example = 6.6)]
    pub system_size: f64,
    #[validate(range(min = 0, message = "must not be negative"))]
    #[schema(example = 15)]
    pub panel_count: i32,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub battery_capacity: f64,
    #[validate(custom(function = "validate_amount"))]
    pub annual_bill: Option<Decimal>,
    #[validate(custom(function = "validate_amount"))]
    #[schema(example = "9800.00")]
    pub equipment_cost: Decimal,
    #[validate(custom(function = "validate_amount"))]
    #[schema(example = "2400.00")]
    pub installation_cost: Decimal,
    #[serde(default)]
    #[validate(custom(function = "validate_amount"))]
    #[schema(example = "2200.00")]
    pub rebates: Decimal,
    pub source: Option<String>,
}

impl PublicLeadRequest {
    pub fn pricing(&self) -> QuotePricing {
        QuotePricing {
            equipment_cost: self.equipment_cost,
            installation_cost: self.installation_cost,
            rebates: self.rebates,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    pub lead: Lead,
    pub quote: CustomerQuote,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeadRequest {
    pub status: Option<LeadStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeadFilter {
    pub status: Option<LeadStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuoteRequest {
    pub lead_id: Uuid,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub system_size: f64,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub panel_count: i32,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub battery_capacity: f64,
    #[validate(custom(function = "validate_amount"))]
    pub equipment_cost: Decimal,
    #[validate(custom(function = "validate_amount"))]
    pub installation_cost: Decimal,
    #[serde(default)]
    #[validate(custom(function = "validate_amount"))]
    pub rebates: Decimal,
}

impl CreateQuoteRequest {
    pub fn pricing(&self) -> QuotePricing {
        QuotePricing {
            equipment_cost: self.equipment_cost,
            installation_cost: self.installation_cost,
            rebates: self.rebates,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct QuoteStatusRequest {
    pub status: QuoteStatus,
}

/// `Q-YYYYMMDD-XXXX`, the suffix taken from the quote id.
pub fn quote_reference(date: NaiveDate, id: Uuid) -> String {
    let suffix: String = id.simple().to_string().chars().take(4).collect();
    format!("Q-{}-{}", date.format("%Y%m%d"), suffix.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn total_is_equipment_plus_install_less_rebates() {
        let pricing = QuotePricing {
            equipment_cost: Decimal::from_str("9800").unwrap(),
            installation_cost: Decimal::from_str("2400").unwrap(),
            rebates: Decimal::from_str("2200").unwrap(),
        };
        assert_eq!(pricing.total_cost().unwrap(), Decimal::from(10000));
    }

    #[test]
    fn rebates_never_push_total_negative() {
        let pricing = QuotePricing {
            equipment_cost: Decimal::from(1000),
            installation_cost: Decimal::from(500),
            rebates: Decimal::from(4000),
        };
        assert_eq!(pricing.total_cost().unwrap(), Decimal::ZERO);
    }

    #[test]
    fn overflowing_totals_are_invalid_input() {
        let huge = Decimal::from_str("50000000000000000000000000000").unwrap();
        let pricing = QuotePricing {
            equipment_cost: huge,
            installation_cost: huge,
            rebates: Decimal::ZERO,
        };
        assert!(matches!(pricing.total_cost(), Err(AppError::InvalidInput(_))));
    }

    fn quote_request(equipment_cost: &str) -> CreateQuoteRequest {
        CreateQuoteRequest {
            lead_id: Uuid::new_v4(),
            system_size: 6.6,
            panel_count: 15,
            battery_capacity: 0.0,
            equipment_cost: Decimal::from_str(equipment_cost).unwrap(),
            installation_cost: Decimal::from(2400),
            rebates: Decimal::ZERO,
        }
    }

    #[test]
    fn quote_amounts_must_be_non_negative_and_bounded() {
        assert!(quote_request("9800").validate().is_ok());

        let negative = quote_request("-1").validate().unwrap_err();
        assert!(negative.field_errors().contains_key("equipment_cost"));

        let too_large = quote_request("70000000000000000000000000000").validate().unwrap_err();
        assert!(too_large.field_errors().contains_key("equipment_cost"));
    }

    #[test]
    fn reference_uses_date_and_id_prefix() {
        let id = Uuid::parse_str("7f3a0000-0000-4000-8000-000000000000").unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(quote_reference(date, id), "Q-20250314-7F3A");
    }

    #[test]
    fn only_open_quotes_can_be_accepted() {
        assert!(QuoteStatus::Draft.can_be_accepted());
        assert!(QuoteStatus::Sent.can_be_accepted());
        assert!(!QuoteStatus::Accepted.can_be_accepted());
        assert!(!QuoteStatus::Declined.can_be_accepted());
    }
}
