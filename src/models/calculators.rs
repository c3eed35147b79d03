// src/models/calculators.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{sales::validate_amount, settings::DepositType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseType {
    Single,
    Three,
}

impl PhaseType {
    pub fn label(self) -> &'static str {
        match self {
            PhaseType::Single => "Single Phase",
            PhaseType::Three => "Three Phase",
        }
    }
}

/// Copper cable data: conductor size, resistance at 75°C, current rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CableSpec {
    pub size_mm2: f64,
    pub ohms_per_km: f64,
    pub max_current: f64,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoltageRiseRequest {
    #[validate(range(exclusive_min = 0.0, message = "must be greater than zero"))]
    #[schema(example = 230.0)]
    pub voltage: f64,
    #[validate(range(exclusive_min = 0.0, message = "must be greater than zero"))]
    #[schema(example = 20.0)]
    pub current: f64,
    #[validate(range(exclusive_min = 0.0, message = "must be greater than zero"))]
    #[schema(example = 20.0)]
    pub cable_length: f64,
    #[schema(example = 4.0)]
    pub cable_size: f64,
    #[serde(default = "unity")]
    #[validate(range(exclusive_min = 0.0, max = 1.0, message = "must be in (0, 1]"))]
    pub power_factor: f64,
    pub phase_type: PhaseType,
}

fn unity() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoltageRiseResult {
    pub voltage_drop: f64,
    pub voltage_drop_percent: f64,
    pub compliant: bool,
    pub limit_percent: f64,
    pub recommended_size: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepositRequest {
    #[validate(custom(function = "validate_amount"))]
    #[schema(example = "10000")]
    pub total_cost: Decimal,
    pub deposit_type: DepositType,
    #[serde(default)]
    #[schema(example = "30")]
    pub percentage: Option<Decimal>,
    #[serde(default)]
    #[validate(custom(function = "validate_amount"))]
    pub fixed_amount: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepositResponse {
    #[schema(example = "3000")]
    pub deposit_amount: Decimal,
    #[schema(example = "7000")]
    pub balance: Decimal,
}
