// src/models/leave.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "leave_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveType {
    Annual,
    Sick,
    Personal,
    Unpaid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "leave_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    /// Decisions are final; only a pending request can change.
    pub fn can_become(self, next: LeaveStatus) -> bool {
        self == LeaveStatus::Pending && next != LeaveStatus::Pending
    }
}

/// Calendar days covered, both ends included.
pub fn leave_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    #[schema(example = "Chris Walker")]
    pub staff_name: String,
    pub leave_type: LeaveType,
    #[schema(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    pub status: LeaveStatus,
    pub decided_at: Option<DateTime<Utc>>,
    pub review_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequestView {
    #[serde(flatten)]
    pub request: LeaveRequest,
    /// Inclusive calendar days.
    #[schema(example = 3)]
    pub days: i64,
}

impl From<LeaveRequest> for LeaveRequestView {
    fn from(request: LeaveRequest) -> Self {
        let days = leave_days(request.start_date, request.end_date);
        Self { request, days }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_dates"))]
pub struct CreateLeaveRequest {
    #[validate(length(min = 1, message = "required"))]
    pub staff_name: String,
    pub leave_type: LeaveType,
    #[schema(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

fn validate_dates(req: &CreateLeaveRequest) -> Result<(), ValidationError> {
    if req.end_date < req.start_date {
        let mut err = ValidationError::new("date_range");
        err.message = Some("End date must not be before start date".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecideLeaveRequest {
    pub status: LeaveStatus,
    pub review_notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaveFilter {
    pub status: Option<LeaveStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    #[test]
    fn days_are_inclusive() {
        assert_eq!(leave_days(day(3, 10), day(3, 10)), 1);
        assert_eq!(leave_days(day(3, 10), day(3, 14)), 5);
        assert_eq!(leave_days(day(2, 27), day(3, 2)), 4);
    }

    #[test]
    fn only_pending_requests_can_be_decided() {
        assert!(LeaveStatus::Pending.can_become(LeaveStatus::Approved));
        assert!(LeaveStatus::Pending.can_become(LeaveStatus::Rejected));
        assert!(!LeaveStatus::Pending.can_become(LeaveStatus::Pending));
        assert!(!LeaveStatus::Approved.can_become(LeaveStatus::Rejected));
    }

    #[test]
    fn reversed_dates_fail_validation() {
        let req = CreateLeaveRequest {
            staff_name: "Chris".into(),
            leave_type: LeaveType::Annual,
            start_date: day(3, 14),
            end_date: day(3, 10),
            reason: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn view_reports_days_alongside_the_request() {
        let view = LeaveRequestView::from(LeaveRequest {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            staff_name: "Chris".into(),
            leave_type: LeaveType::Sick,
            start_date: day(3, 10),
            end_date: day(3, 12),
            reason: None,
            status: LeaveStatus::Pending,
            decided_at: None,
            review_notes: None,
            created_at: Utc::now(),
        });

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["days"], 3);
        assert_eq!(json["staffName"], "Chris");
        assert!(json.get("totalDays").is_none());
    }
}
