// src/models/tenancy.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::ToSchema;

// A member's role inside one company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "member_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberRole {
    Admin,
    Office,
    Installer,
}

impl MemberRole {
    /// Whether this role is allowed to perform the action named by `slug`.
    pub fn grants(self, slug: &str) -> bool {
        match self {
            MemberRole::Admin => true,
            MemberRole::Office => slug != "settings:write" && slug != "members:write",
            MemberRole::Installer => {
                matches!(slug, "jobs:read" | "checklist:write" | "documents:read")
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: Uuid,
    #[schema(example = "Sun Direct Power")]
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantMember {
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub role: MemberRole,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admins_hold_every_permission() {
        assert!(MemberRole::Admin.grants("settings:write"));
        assert!(MemberRole::Admin.grants("jobs:write"));
    }

    #[test]
    fn office_cannot_touch_company_settings() {
        assert!(MemberRole::Office.grants("jobs:write"));
        assert!(MemberRole::Office.grants("crm:write"));
        assert!(!MemberRole::Office.grants("settings:write"));
        assert!(!MemberRole::Office.grants("members:write"));
    }

    #[test]
    fn installers_only_see_their_field_work() {
        assert!(MemberRole::Installer.grants("jobs:read"));
        assert!(MemberRole::Installer.grants("checklist:write"));
        assert!(!MemberRole::Installer.grants("jobs:write"));
        assert!(!MemberRole::Installer.grants("crm:read"));
    }
}
