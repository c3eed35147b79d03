// src/services/calculators.rs

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    common::error::AppError,
    models::{
        calculators::{CableSpec, PhaseType, VoltageRiseRequest, VoltageRiseResult},
        settings::{DepositSettings, DepositType},
    },
};

/// Maximum voltage drop for final sub-circuits (AS/NZS 3000:2018).
pub const VOLTAGE_DROP_LIMIT_PERCENT: f64 = 3.0;

const fn cable(size_mm2: f64, ohms_per_km: f64, max_current: f64) -> CableSpec {
    CableSpec { size_mm2, ohms_per_km, max_current }
}

pub static CABLE_TABLE: [CableSpec; 12] = [
    cable(1.5, 16.1, 16.0),
    cable(2.5, 9.61, 24.0),
    cable(4.0, 6.0, 32.0),
    cable(6.0, 4.0, 41.0),
    cable(10.0, 2.4, 57.0),
    cable(16.0, 1.5, 76.0),
    cable(25.0, 0.96, 101.0),
    cable(35.0, 0.69, 125.0),
    cable(50.0, 0.49, 151.0),
    cable(70.0, 0.35, 192.0),
    cable(95.0, 0.25, 232.0),
    cable(120.0, 0.20, 269.0),
];

pub fn find_cable(size_mm2: f64) -> Option<&'static CableSpec> {
    CABLE_TABLE.iter().find(|c| (c.size_mm2 - size_mm2).abs() < 1e-9)
}

// =============================================================================
//  VOLTAGE RISE
// =============================================================================

fn drop_volts(spec: &CableSpec, req: &VoltageRiseRequest) -> f64 {
    let resistance = spec.ohms_per_km * req.cable_length / 1000.0;
    let factor = match req.phase_type {
        PhaseType::Single => 2.0,
        PhaseType::Three => 3f64.sqrt(),
    };
    factor * req.current * resistance * req.power_factor
}

fn drop_percent(spec: &CableSpec, req: &VoltageRiseRequest) -> f64 {
    drop_volts(spec, req) / req.voltage * 100.0
}

pub fn voltage_rise(req: &VoltageRiseRequest) -> Result<VoltageRiseResult, AppError> {
    let spec = find_cable(req.cable_size).ok_or_else(|| {
        AppError::InvalidInput(format!("Unknown cable size: {}mm²", req.cable_size))
    })?;

    let voltage_drop = drop_volts(spec, req);
    let voltage_drop_percent = drop_percent(spec, req);
    let compliant = voltage_drop_percent <= VOLTAGE_DROP_LIMIT_PERCENT;

    let recommended_size = if compliant {
        None
    } else {
        CABLE_TABLE
            .iter()
            .find(|c| {
                drop_percent(c, req) <= VOLTAGE_DROP_LIMIT_PERCENT && c.max_current >= req.current
            })
            .map(|c| c.size_mm2)
    };

    Ok(VoltageRiseResult {
        voltage_drop,
        voltage_drop_percent,
        compliant,
        limit_percent: VOLTAGE_DROP_LIMIT_PERCENT,
        recommended_size,
    })
}

pub fn report_file_name(generated_at: DateTime<Utc>) -> String {
    format!("VRC-Report-{}.txt", generated_at.timestamp_millis())
}

/// Plain-text compliance report for a calculation.
pub fn voltage_rise_report(
    req: &VoltageRiseRequest,
    result: &VoltageRiseResult,
    generated_at: DateTime<Utc>,
    company_name: &str,
) -> String {
    let status = if result.compliant { "COMPLIANT ✓" } else { "NON-COMPLIANT ✗" };

    let mut report = String::new();
    report.push_str("VOLTAGE RISE CALCULATION REPORT\n");
    report.push_str("AS/NZS 3000:2018 Compliance Check\n\n");
    report.push_str("INPUT PARAMETERS:\n");
    report.push_str(&format!("- Nominal Voltage: {}V\n", req.voltage));
    report.push_str(&format!("- Load Current: {}A\n", req.current));
    report.push_str(&format!("- Cable Length: {}m\n", req.cable_length));
    report.push_str(&format!("- Cable Size: {}mm²\n", req.cable_size));
    report.push_str(&format!("- Power Factor: {}\n", req.power_factor));
    report.push_str(&format!("- Phase Type: {}\n\n", req.phase_type.label()));
    report.push_str("RESULTS:\n");
    report.push_str(&format!("- Voltage Drop: {:.2}V\n", result.voltage_drop));
    report.push_str(&format!("- Voltage Drop: {:.2}%\n", result.voltage_drop_percent));
    report.push_str(&format!("- Compliance Status: {}\n", status));
    report.push_str("- Standard: AS/NZS 3000:2018 (Max 3% for final sub-circuits)\n\n");

    if let (false, Some(size)) = (result.compliant, result.recommended_size) {
        report.push_str("RECOMMENDATION:\n");
        report.push_str(&format!("- Recommended Cable Size: {}mm²\n", size));
        report.push_str("- This will reduce voltage drop to acceptable levels\n\n");
    }

    report.push_str(&format!("Generated: {}\n", generated_at.format("%d/%m/%Y, %H:%M:%S UTC")));
    report.push_str(&format!("{} - Professional Solar Design", company_name));
    report
}

// =============================================================================
//  DEPOSIT
// =============================================================================

/// Deposit due on a quote total: a whole-dollar percentage or a flat amount.
pub fn deposit_amount(total: Decimal, settings: &DepositSettings) -> Result<Decimal, AppError> {
    if total.is_sign_negative() {
        return Err(AppError::InvalidInput("Total cost must not be negative".into()));
    }
    match settings.deposit_type {
        DepositType::Fixed => {
            if settings.fixed_amount.is_sign_negative() {
                return Err(AppError::InvalidInput("Fixed deposit must not be negative".into()));
            }
            Ok(settings.fixed_amount)
        }
        DepositType::Percentage => {
            if settings.percentage < Decimal::ZERO || settings.percentage > Decimal::ONE_HUNDRED {
                return Err(AppError::InvalidInput(
                    "Deposit percentage must be between 0 and 100".into(),
                ));
            }
            let scaled = total
                .checked_mul(settings.percentage)
                .ok_or_else(|| AppError::InvalidInput("Total cost is out of range".into()))?;
            Ok((scaled / Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn request(cable_size: f64, phase_type: PhaseType) -> VoltageRiseRequest {
        VoltageRiseRequest {
            voltage: 230.0,
            current: 20.0,
            cable_length: 20.0,
            cable_size,
            power_factor: 1.0,
            phase_type,
        }
    }

    fn pct(value: &str) -> DepositSettings {
        DepositSettings {
            deposit_type: DepositType::Percentage,
            percentage: Decimal::from_str(value).unwrap(),
            fixed_amount: Decimal::ZERO,
        }
    }

    #[test]
    fn single_phase_drop_uses_both_conductors() {
        // 2 × 20A × (6.0 Ω/km × 0.02 km) = 4.8V
        let result = voltage_rise(&request(4.0, PhaseType::Single)).unwrap();
        assert!((result.voltage_drop - 4.8).abs() < 1e-9);
        assert!((result.voltage_drop_percent - 4.8 / 230.0 * 100.0).abs() < 1e-9);
        assert!(result.compliant);
        assert_eq!(result.recommended_size, None);
    }

    #[test]
    fn three_phase_drop_uses_root_three() {
        let result = voltage_rise(&request(4.0, PhaseType::Three)).unwrap();
        let expected = 3f64.sqrt() * 20.0 * 0.12;
        assert!((result.voltage_drop - expected).abs() < 1e-9);
    }

    #[test]
    fn non_compliant_run_recommends_smallest_adequate_cable() {
        let mut req = request(2.5, PhaseType::Single);
        req.cable_length = 50.0;

        let result = voltage_rise(&req).unwrap();

        // 2.5mm² gives 19.22V (8.4%); 6mm² still gives 8V (3.5%); 10mm² gives 4.8V.
        assert!(!result.compliant);
        assert_eq!(result.recommended_size, Some(10.0));
    }

    #[test]
    fn recommendation_respects_current_rating() {
        let mut req = request(1.5, PhaseType::Single);
        req.current = 45.0;
        req.cable_length = 5.0;

        let result = voltage_rise(&req).unwrap();

        assert!(!result.compliant);
        assert_eq!(result.recommended_size, Some(10.0));
    }

    #[test]
    fn unknown_cable_is_rejected() {
        let err = voltage_rise(&request(3.0, PhaseType::Single)).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn report_lists_inputs_results_and_recommendation() {
        let mut req = request(2.5, PhaseType::Single);
        req.cable_length = 50.0;
        let result = voltage_rise(&req).unwrap();
        let at = Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap();

        let report = voltage_rise_report(&req, &result, at, "Sun Direct Power");

        assert!(report.starts_with("VOLTAGE RISE CALCULATION REPORT"));
        assert!(report.contains("- Cable Size: 2.5mm²"));
        assert!(report.contains("- Phase Type: Single Phase"));
        assert!(report.contains("NON-COMPLIANT"));
        assert!(report.contains("- Recommended Cable Size: 10mm²"));
        assert!(report.contains("Generated: 14/03/2025, 09:30:00 UTC"));
        assert_eq!(report_file_name(at), format!("VRC-Report-{}.txt", at.timestamp_millis()));
    }

    #[test]
    fn percentage_deposit_rounds_to_whole_dollars() {
        assert_eq!(deposit_amount(Decimal::from(10000), &pct("30")).unwrap(), Decimal::from(3000));
        assert_eq!(
            deposit_amount(Decimal::from_str("10001.50").unwrap(), &pct("30")).unwrap(),
            Decimal::from(3000)
        );
        // 1005 × 10% = 100.5 -> 101
        assert_eq!(deposit_amount(Decimal::from(1005), &pct("10")).unwrap(), Decimal::from(101));
    }

    #[test]
    fn fixed_deposit_ignores_total() {
        let settings = DepositSettings {
            deposit_type: DepositType::Fixed,
            percentage: Decimal::from(30),
            fixed_amount: Decimal::from(500),
        };
        assert_eq!(deposit_amount(Decimal::from(1), &settings).unwrap(), Decimal::from(500));
        assert_eq!(deposit_amount(Decimal::from(99999), &settings).unwrap(), Decimal::from(500));
    }

    #[test]
    fn huge_totals_are_rejected_instead_of_overflowing() {
        let huge = Decimal::from_str("70000000000000000000000000000").unwrap();
        let err = deposit_amount(huge, &pct("30")).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn negative_amounts_are_rejected() {
        assert!(deposit_amount(Decimal::from(-100), &pct("30")).is_err());

        let settings = DepositSettings {
            deposit_type: DepositType::Fixed,
            percentage: Decimal::from(30),
            fixed_amount: Decimal::from(-500),
        };
        assert!(deposit_amount(Decimal::from(1000), &settings).is_err());
    }

    #[test]
    fn percentage_outside_range_is_rejected() {
        assert!(deposit_amount(Decimal::from(100), &pct("120")).is_err());
        assert!(deposit_amount(Decimal::from(100), &pct("-1")).is_err());
    }
}
