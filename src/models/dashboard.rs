// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::jobs::JobStatus;

// Jobs per status (board header counters)
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: JobStatus,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub jobs_by_status: Vec<StatusCount>,
    pub urgent_jobs: i64,
    pub open_leads: i64,
    #[schema(example = "48500.00")]
    pub accepted_value_this_month: Decimal, // sum of accepted quote totals
}
