// src/handlers/calculators.rs

use axum::{http::header, response::IntoResponse, Json};
use chrono::Utc;
use rust_decimal::Decimal;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    models::{
        calculators::{DepositRequest, DepositResponse, VoltageRiseRequest, VoltageRiseResult},
        settings::DepositSettings,
    },
    services::calculators::{deposit_amount, report_file_name, voltage_rise, voltage_rise_report},
};

const REPORT_SIGNATURE: &str = "SolarOps";

// POST /api/calculators/voltage-rise
#[utoipa::path(
    post,
    path = "/api/calculators/voltage-rise",
    tag = "Calculators",
    request_body = VoltageRiseRequest,
    responses(
        (status = 200, description = "Voltage drop and AS/NZS 3000 compliance", body = VoltageRiseResult),
        (status = 400, description = "Invalid inputs or unknown cable size")
    )
)]
pub async fn calculate_voltage_rise(
    Json(payload): Json<VoltageRiseRequest>,
) -> Result<Json<VoltageRiseResult>, ApiError> {
    payload.validate().map_err(AppError::ValidationError)?;
    Ok(Json(voltage_rise(&payload)?))
}

// POST /api/calculators/voltage-rise/report
#[utoipa::path(
    post,
    path = "/api/calculators/voltage-rise/report",
    tag = "Calculators",
    request_body = VoltageRiseRequest,
    responses(
        (status = 200, description = "Plain-text report download", content_type = "text/plain", body = String),
        (status = 400, description = "Invalid inputs or unknown cable size")
    )
)]
pub async fn voltage_rise_report_download(
    Json(payload): Json<VoltageRiseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate().map_err(AppError::ValidationError)?;
    let result = voltage_rise(&payload)?;

    let generated_at = Utc::now();
    let body = voltage_rise_report(&payload, &result, generated_at, REPORT_SIGNATURE);
    let disposition = format!("attachment; filename=\"{}\"", report_file_name(generated_at));

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

// POST /api/calculators/deposit
#[utoipa::path(
    post,
    path = "/api/calculators/deposit",
    tag = "Calculators",
    request_body = DepositRequest,
    responses(
        (status = 200, description = "Deposit due and remaining balance", body = DepositResponse),
        (status = 400, description = "Negative or out-of-range amount, or percentage outside 0-100")
    )
)]
pub async fn calculate_deposit(
    Json(payload): Json<DepositRequest>,
) -> Result<Json<DepositResponse>, ApiError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let settings = DepositSettings {
        deposit_type: payload.deposit_type,
        percentage: payload.percentage.unwrap_or_else(|| Decimal::from(30)),
        fixed_amount: payload.fixed_amount.unwrap_or_default(),
    };
    let deposit = deposit_amount(payload.total_cost, &settings)?;

    Ok(Json(DepositResponse {
        deposit_amount: deposit,
        balance: (payload.total_cost - deposit).max(Decimal::ZERO),
    }))
}
