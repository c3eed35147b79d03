// src/models/crews.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Credentials expiring within this many days raise a warning on assignment.
pub const EXPIRY_WARNING_DAYS: i64 = 30;

// --- Records ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Electrician {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    #[schema(example = "Sam")]
    pub first_name: String,
    #[schema(example = "Nguyen")]
    pub last_name: String,
    #[schema(example = "EC12345")]
    pub license_number: String,
    #[schema(value_type = Option<String>, format = Date)]
    pub license_expiry: Option<NaiveDate>,
    pub license_verified: bool,
    #[schema(example = "A1234567")]
    pub cec_number: String,
    #[schema(value_type = Option<String>, format = Date)]
    pub cec_expiry: Option<NaiveDate>,
    pub cec_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl Electrician {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Licence and CEC problems as of `today`. Never blocking.
    pub fn credential_warnings(&self, today: NaiveDate) -> Vec<String> {
        let name = self.full_name();
        let mut warnings = Vec::new();
        push_expiry_warning(&mut warnings, &name, "Electrical licence", self.license_expiry, today);
        if !self.license_verified {
            warnings.push(format!("{}: Electrical licence not verified", name));
        }
        push_expiry_warning(&mut warnings, &name, "CEC accreditation", self.cec_expiry, today);
        if !self.cec_verified {
            warnings.push(format!("{}: CEC accreditation not verified", name));
        }
        warnings
    }
}

fn push_expiry_warning(
    out: &mut Vec<String>,
    who: &str,
    what: &str,
    expiry: Option<NaiveDate>,
    today: NaiveDate,
) {
    let Some(expiry) = expiry else { return };
    let days = (expiry - today).num_days();
    if days < 0 {
        out.push(format!("{}: {} expired {} days ago", who, what, -days));
    } else if days < EXPIRY_WARNING_DAYS {
        out.push(format!("{}: {} expires in {} days", who, what, days));
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    #[schema(example = "Team North")]
    pub name: String,
    #[schema(example = "#F59E0B")]
    pub color: Option<String>,
    pub lead_electrician_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Subcontractor {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    #[schema(example = "Bright Sparks Electrical")]
    pub company_name: String,
    #[schema(example = "Dana Price")]
    pub contact_name: String,
    #[schema(example = "jobs@brightsparks.com.au")]
    pub email: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateElectricianRequest {
    #[validate(length(min = 1, message = "required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "required"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "required"))]
    pub license_number: String,
    #[schema(value_type = Option<String>, format = Date)]
    pub license_expiry: Option<NaiveDate>,
    #[serde(default)]
    pub license_verified: bool,
    #[validate(length(min = 1, message = "required"))]
    pub cec_number: String,
    #[schema(value_type = Option<String>, format = Date)]
    pub cec_expiry: Option<NaiveDate>,
    #[serde(default)]
    pub cec_verified: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    pub color: Option<String>,
    pub lead_electrician_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubcontractorRequest {
    #[validate(length(min = 1, message = "required"))]
    pub company_name: String,
    #[validate(length(min = 1, message = "required"))]
    pub contact_name: String,
    #[validate(email(message = "invalid_email"))]
    pub email: String,
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn electrician(license_expiry: Option<NaiveDate>, cec_expiry: Option<NaiveDate>) -> Electrician {
        Electrician {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            first_name: "Sam".into(),
            last_name: "Nguyen".into(),
            license_number: "EC1".into(),
            license_expiry,
            license_verified: true,
            cec_number: "A1".into(),
            cec_expiry,
            cec_verified: true,
            created_at: Utc::now(),
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn valid_credentials_raise_nothing() {
        let today = day(2025, 3, 1);
        let e = electrician(Some(day(2026, 1, 1)), Some(day(2026, 1, 1)));
        assert!(e.credential_warnings(today).is_empty());
    }

    #[test]
    fn expired_and_expiring_are_reported_with_day_counts() {
        let today = day(2025, 3, 1);
        let e = electrician(Some(day(2025, 2, 20)), Some(day(2025, 3, 15)));

        let warnings = e.credential_warnings(today);

        assert_eq!(
            warnings,
            vec![
                "Sam Nguyen: Electrical licence expired 9 days ago".to_string(),
                "Sam Nguyen: CEC accreditation expires in 14 days".to_string(),
            ]
        );
    }

    #[test]
    fn unverified_credentials_warn() {
        let mut e = electrician(None, None);
        e.cec_verified = false;

        let warnings = e.credential_warnings(day(2025, 3, 1));

        assert_eq!(warnings, vec!["Sam Nguyen: CEC accreditation not verified".to_string()]);
    }

    #[test]
    fn thirty_days_out_is_not_yet_a_warning() {
        let today = day(2025, 3, 1);
        let e = electrician(Some(today + chrono::Duration::days(30)), None);
        assert!(e.credential_warnings(today).is_empty());
    }
}
