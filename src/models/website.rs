// src/models/website.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteService {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    #[schema(example = "Battery retrofit")]
    pub name: String,
    pub description: String,
    #[schema(example = "7990.00")]
    pub price_from: Option<Decimal>,
    #[schema(example = 1)]
    pub sort_order: i32,
    pub show_on_website: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_from: Option<Decimal>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub show_on_website: bool,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceRequest {
    #[validate(length(min = 1, message = "required"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_from: Option<Decimal>,
    pub sort_order: Option<i32>,
    pub show_on_website: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn visibility_toggle_leaves_other_fields_untouched() {
        let req: UpdateServiceRequest =
            serde_json::from_value(json!({ "showOnWebsite": false })).unwrap();

        assert!(req.validate().is_ok());
        assert_eq!(req.show_on_website, Some(false));
        assert!(req.name.is_none());
        assert!(req.description.is_none());
        assert!(req.price_from.is_none());
        assert!(req.sort_order.is_none());
    }

    #[test]
    fn renaming_to_blank_is_rejected() {
        let req: UpdateServiceRequest = serde_json::from_value(json!({ "name": "" })).unwrap();
        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("name"));
    }

    #[test]
    fn new_services_start_hidden() {
        let req: CreateServiceRequest =
            serde_json::from_value(json!({ "name": "Battery retrofit" })).unwrap();

        assert!(req.validate().is_ok());
        assert!(!req.show_on_website);
        assert_eq!(req.sort_order, 0);
        assert_eq!(req.description, "");
    }

    #[test]
    fn visibility_serializes_in_camel_case() {
        let service = WebsiteService {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            name: "Panel cleaning".into(),
            description: String::new(),
            price_from: None,
            sort_order: 2,
            show_on_website: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&service).unwrap();
        assert_eq!(json["showOnWebsite"], true);
        assert_eq!(json["sortOrder"], 2);
    }
}
