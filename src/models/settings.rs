// src/models/settings.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "deposit_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepositType {
    Percentage,
    Fixed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantSettings {
    #[schema(ignore)]
    pub tenant_id: Uuid,

    #[schema(example = "Sun Direct Power Pty Ltd")]
    pub company_name: Option<String>,

    #[schema(example = "12 345 678 901")]
    pub abn: Option<String>,

    #[schema(example = "1 Hay St, Perth WA 6000")]
    pub address: Option<String>,

    #[schema(example = "08 9000 0000")]
    pub phone: Option<String>,

    #[schema(example = "hello@sundirect.com.au")]
    pub email: Option<String>,

    #[schema(example = "R12345")]
    pub cec_retailer_number: Option<String>,

    pub deposit_type: DepositType,

    #[schema(example = "30")]
    pub deposit_percentage: Decimal,

    #[schema(example = "500")]
    pub deposit_fixed_amount: Decimal,

    pub updated_at: Option<DateTime<Utc>>,
}

impl TenantSettings {
    pub fn defaults(tenant_id: Uuid) -> Self {
        Self {
            tenant_id,
            company_name: None,
            abn: None,
            address: None,
            phone: None,
            email: None,
            cec_retailer_number: None,
            deposit_type: DepositType::Percentage,
            deposit_percentage: Decimal::from(30),
            deposit_fixed_amount: Decimal::ZERO,
            updated_at: None,
        }
    }

    pub fn deposit_settings(&self) -> DepositSettings {
        DepositSettings {
            deposit_type: self.deposit_type,
            percentage: self.deposit_percentage,
            fixed_amount: self.deposit_fixed_amount,
        }
    }
}

/// The part of the settings the deposit calculator needs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepositSettings {
    pub deposit_type: DepositType,
    #[schema(example = "30")]
    pub percentage: Decimal,
    #[schema(example = "500")]
    pub fixed_amount: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub company_name: Option<String>,
    pub abn: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub cec_retailer_number: Option<String>,
    pub deposit_type: DepositType,
    #[schema(example = "30")]
    pub deposit_percentage: Decimal,
    #[schema(example = "500")]
    pub deposit_fixed_amount: Decimal,
}
