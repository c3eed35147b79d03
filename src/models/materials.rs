// src/models/materials.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    models::{jobs::JobStatus, sales::validate_amount},
};

/// GST charged on supplier orders.
pub const GST_PERCENT: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "material_order_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaterialOrderStatus {
    Draft,
    PendingReview,
    Sent,
    Confirmed,
    InTransit,
    Delivered,
    Cancelled,
}

impl MaterialOrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, MaterialOrderStatus::Delivered | MaterialOrderStatus::Cancelled)
    }

    pub fn can_become(self, next: MaterialOrderStatus) -> bool {
        use MaterialOrderStatus::*;
        if self.is_terminal() || self == next {
            return false;
        }
        if next == Cancelled {
            return true;
        }
        match self {
            Draft => matches!(next, PendingReview | Sent),
            PendingReview => next == Sent,
            Sent => next == Confirmed,
            Confirmed => matches!(next, InTransit | Delivered),
            InTransit => next == Delivered,
            Delivered | Cancelled => false,
        }
    }

    /// The job status an order reaching `self` moves its job to.
    pub fn job_milestone(self) -> Option<JobStatus> {
        match self {
            MaterialOrderStatus::Sent => Some(JobStatus::MaterialsOrdered),
            MaterialOrderStatus::Delivered => Some(JobStatus::MaterialsReady),
            _ => None,
        }
    }
}

/// One line of a material order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialItem {
    #[schema(example = "Mounting")]
    pub category: String,
    #[serde(rename = "type")]
    #[schema(example = "Roof Rails")]
    pub kind: String,
    pub brand: String,
    pub model: String,
    pub quantity: i32,
    #[schema(example = "pcs")]
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn line(category: &str, kind: &str, brand: &str, model: &str, quantity: i32, unit: &str) -> MaterialItem {
    MaterialItem {
        category: category.into(),
        kind: kind.into(),
        brand: brand.into(),
        model: model.into(),
        quantity,
        unit: unit.into(),
        notes: None,
    }
}

fn ceil_div(value: i32, by: i32) -> i32 {
    (value + by - 1) / by
}

/// Bill of materials for a system of the given size. Panels, inverter and
/// battery lines carry the quoted system; the rest is derived from the counts.
pub fn generate_material_list(system_size: f64, panel_count: i32, battery_capacity: f64) -> Vec<MaterialItem> {
    const AS_QUOTED: &str = "As quoted";
    const STANDARD: &str = "Standard";

    let panels = panel_count.max(0);
    let mut items = vec![line(
        "Panel",
        "PV Module",
        AS_QUOTED,
        &format!("{} kW array", system_size),
        panels,
        "pcs",
    )];

    if battery_capacity > 0.0 {
        items.push(line(
            "Battery",
            "Battery Storage",
            AS_QUOTED,
            &format!("{} kWh", battery_capacity),
            1,
            "unit",
        ));
    }
    items.push(line("Inverter", "Solar Inverter", AS_QUOTED, "As quoted", 1, "unit"));

    let mut brackets = line("Mounting", "Roof Brackets", STANDARD, "Tile Hook", ceil_div(panels, 2), "pcs");
    brackets.notes = Some("Adjust based on roof type survey".into());
    items.extend([
        line("Mounting", "Roof Rails", STANDARD, "Aluminium Rail", ceil_div(panels, 3), "3.3m lengths"),
        brackets,
        line("Mounting", "Panel Clamps", STANDARD, "Mid/End Clamp Set", panels * 4, "pcs"),
    ]);

    let dc_cable = (system_size.max(0.0) * 8.0).ceil() as i32;
    items.extend([
        line("Electrical", "DC Cable", STANDARD, "6mm² PV Cable", dc_cable, "meters"),
        line("Electrical", "AC Cable", STANDARD, "4mm² TPS Cable", 20, "meters"),
        line("Electrical", "DC Isolator", STANDARD, "1000V DC Switch", 1, "unit"),
        line("Electrical", "AC Isolator", STANDARD, "2P 32A Switch", 1, "unit"),
        line("Electrical", "MC4 Connectors", STANDARD, "MC4 Pair", panels * 2, "pairs"),
        line("Protection", "PVC Conduit", STANDARD, "25mm Conduit", 30, "meters"),
        line("Protection", "Cable Glands", STANDARD, "PG16 Glands", 10, "pcs"),
    ]);

    items
}

/// `(gst, total)` for a subtotal, GST rounded to cents.
pub fn order_totals(subtotal: Decimal) -> Result<(Decimal, Decimal), AppError> {
    let out_of_range = || AppError::InvalidInput("subtotal is out of range".into());
    let gst = subtotal
        .checked_mul(Decimal::from(GST_PERCENT))
        .ok_or_else(out_of_range)?
        / Decimal::ONE_HUNDRED;
    let gst = gst.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let total = subtotal.checked_add(gst).ok_or_else(out_of_range)?;
    Ok((gst, total))
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialOrder {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    pub job_id: Uuid,
    pub supplier_name: Option<String>,
    pub status: MaterialOrderStatus,
    #[schema(value_type = Vec<MaterialItem>)]
    pub items: Json<Vec<MaterialItem>>,
    pub subtotal: Decimal,
    pub gst: Decimal,
    pub total: Decimal,
    #[schema(value_type = Option<String>, format = Date)]
    pub expected_delivery: Option<NaiveDate>,
    pub sent_at: Option<DateTime<Utc>>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialOrderListEntry {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub order: MaterialOrder,
    #[schema(example = "SDP-2025-0007")]
    pub job_number: String,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaterialOrderRequest {
    #[validate(length(min = 1, message = "required"))]
    pub supplier_name: Option<String>,
    #[validate(custom(function = "validate_amount"))]
    #[schema(example = "8450.00")]
    pub subtotal: Option<Decimal>,
    #[schema(value_type = Option<String>, format = Date)]
    pub expected_delivery: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialStatusRequest {
    pub status: MaterialOrderStatus,
    #[schema(value_type = Option<String>, format = Date)]
    pub expected_delivery: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MaterialOrderFilter {
    pub status: Option<MaterialOrderStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn quantity(items: &[MaterialItem], kind: &str) -> Option<i32> {
        items.iter().find(|i| i.kind == kind).map(|i| i.quantity)
    }

    #[test]
    fn quantities_follow_the_panel_count() {
        let items = generate_material_list(6.6, 15, 0.0);

        assert_eq!(quantity(&items, "PV Module"), Some(15));
        assert_eq!(quantity(&items, "Roof Rails"), Some(5));
        assert_eq!(quantity(&items, "Roof Brackets"), Some(8));
        assert_eq!(quantity(&items, "Panel Clamps"), Some(60));
        assert_eq!(quantity(&items, "MC4 Connectors"), Some(30));
        // 6.6 kW × 8 m, rounded up
        assert_eq!(quantity(&items, "DC Cable"), Some(53));
        assert_eq!(quantity(&items, "Battery Storage"), None);
    }

    #[test]
    fn battery_line_only_with_storage() {
        let items = generate_material_list(10.0, 24, 13.5);
        let battery = items.iter().find(|i| i.category == "Battery").unwrap();
        assert_eq!(battery.quantity, 1);
        assert_eq!(battery.model, "13.5 kWh");
    }

    #[test]
    fn gst_is_ten_percent_to_the_cent() {
        let (gst, total) = order_totals(Decimal::from_str("8450.05").unwrap()).unwrap();
        assert_eq!(gst, Decimal::from_str("845.01").unwrap());
        assert_eq!(total, Decimal::from_str("9295.06").unwrap());
    }

    #[test]
    fn overflowing_subtotal_is_invalid_input() {
        let huge = Decimal::from_str("70000000000000000000000000000").unwrap();
        assert!(matches!(order_totals(huge), Err(AppError::InvalidInput(_))));

        let req = CreateMaterialOrderRequest { subtotal: Some(huge), ..Default::default() };
        assert!(req.validate().is_err());
    }

    #[test]
    fn orders_move_forward_or_get_cancelled() {
        use MaterialOrderStatus::*;

        assert!(Draft.can_become(Sent));
        assert!(Draft.can_become(PendingReview));
        assert!(Sent.can_become(Confirmed));
        assert!(Confirmed.can_become(Delivered));
        assert!(InTransit.can_become(Cancelled));

        assert!(!Draft.can_become(Delivered));
        assert!(!Sent.can_become(Draft));
        assert!(!Delivered.can_become(Cancelled));
        assert!(!Cancelled.can_become(Draft));
    }

    #[test]
    fn sending_and_delivery_drive_the_job() {
        assert_eq!(MaterialOrderStatus::Sent.job_milestone(), Some(JobStatus::MaterialsOrdered));
        assert_eq!(MaterialOrderStatus::Delivered.job_milestone(), Some(JobStatus::MaterialsReady));
        assert_eq!(MaterialOrderStatus::Confirmed.job_milestone(), None);
    }

    #[test]
    fn item_kind_serializes_as_type() {
        let json = serde_json::to_value(line("Mounting", "Roof Rails", "Standard", "Rail", 4, "pcs")).unwrap();
        assert_eq!(json["type"], "Roof Rails");
        assert!(json.get("notes").is_none());
    }
}
