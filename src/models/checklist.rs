// src/models/checklist.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChecklistPhase {
    PreInstall,
    DuringInstall,
    PostInstall,
}

impl ChecklistPhase {
    pub const ALL: [ChecklistPhase; 3] = [
        ChecklistPhase::PreInstall,
        ChecklistPhase::DuringInstall,
        ChecklistPhase::PostInstall,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ChecklistPhase::PreInstall => "Pre-Installation",
            ChecklistPhase::DuringInstall => "During Installation",
            ChecklistPhase::PostInstall => "Post-Installation",
        }
    }
}

/// A compliance checklist item definition.
#[derive(Debug, Clone, Copy)]
pub struct ChecklistItemDef {
    pub key: &'static str,
    pub phase: ChecklistPhase,
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

const fn item(
    phase: ChecklistPhase,
    key: &'static str,
    name: &'static str,
    description: &'static str,
    required: bool,
) -> ChecklistItemDef {
    ChecklistItemDef { key, phase, name, description, required }
}

use ChecklistPhase::{DuringInstall as D, PostInstall as P, PreInstall as R};

pub static CATALOGUE: [ChecklistItemDef; 45] = [
    // Pre-installation
    item(R, "site_photos", "Site photos (4 angles)", "Front, roof, switchboard, battery location", true),
    item(R, "roof_condition", "Roof condition assessment", "Photo of roof surface and structure", true),
    item(R, "shading_analysis", "Shading analysis", "Photos showing potential shading sources", true),
    item(R, "electrical_infra", "Electrical infrastructure", "Switchboard and meter box photos", true),
    item(R, "customer_id", "Customer ID verification", "Driver license or passport", true),
    item(R, "property_ownership", "Property ownership verification", "Rates notice or landlord permission", true),
    item(R, "electricity_account", "Electricity account verification", "Recent bill with account number", true),
    item(R, "safety_setup", "Safety equipment setup", "Harness, signage, fire extinguisher", true),
    item(R, "equipment_verified", "Equipment delivered and verified", "All materials on site and checked", true),
    item(R, "customer_briefing", "Customer briefing completed", "Explained process and timeline", false),
    // During installation
    item(D, "panel_serials", "All panel serial numbers photographed", "Clear photo of each panel serial", true),
    item(D, "inverter_serial", "Inverter serial number photographed", "Clear photo with datasheet", true),
    item(D, "battery_serial", "Battery serial number photographed", "Clear photo with datasheet (if applicable)", false),
    item(D, "cec_verification", "Equipment CEC verification", "All equipment on CEC approved list", true),
    item(D, "mounting_installed", "Mounting rails installed", "Photos of rail installation", true),
    item(D, "panels_installed", "Panels installed", "Photos of panel array", true),
    item(D, "inverter_mounted", "Inverter mounted", "Photo of inverter location", true),
    item(D, "battery_installed", "Battery installed", "Photos of battery installation (if applicable)", false),
    item(D, "isolators_installed", "AC/DC isolators installed", "Photos of all isolators", true),
    item(D, "cable_management", "Cable management completed", "Photos of conduit and cable runs", true),
    item(D, "earthing_bonding", "Earthing and bonding completed", "Photos of earth connections", true),
    item(D, "roof_penetrations", "Roof penetrations sealed", "All penetrations waterproofed", true),
    item(D, "installer_selfie", "Installer selfie with ID badge", "Photo showing installer and ID", true),
    item(D, "cec_card_photo", "CEC accreditation card photographed", "Clear photo of CEC card", true),
    item(D, "license_photo", "Electrical license photographed", "Clear photo of license", true),
    item(D, "safety_photos", "Safety equipment photos", "Harness in use, signage installed", true),
    item(D, "warning_labels", "Warning labels installed", "Photos of all labels", true),
    item(D, "system_label", "System information label", "Photo of system specs label", true),
    item(D, "emergency_shutdown", "Emergency shutdown instructions", "Photo of shutdown label", true),
    item(D, "vpp_enrollment", "VPP enrollment confirmed", "Battery VPP connection (if applicable)", false),
    // Post-installation
    item(P, "insulation_test", "Insulation resistance test", "Test results recorded and photographed", true),
    item(P, "earth_continuity", "Earth continuity test", "Test results recorded and photographed", true),
    item(P, "polarity_test", "Polarity test", "Test results recorded and photographed", true),
    item(P, "voltage_readings", "Open circuit voltage readings", "Readings recorded", true),
    item(P, "current_readings", "Short circuit current readings", "Readings recorded", true),
    item(P, "system_commissioned", "System commissioned", "Inverter showing generation", true),
    item(P, "monitoring_active", "Monitoring system active", "App connected and working", true),
    item(P, "battery_charging", "Battery charging verified", "Battery system operational (if applicable)", false),
    item(P, "final_system_photos", "Final system photos", "Completed installation from all angles", true),
    item(P, "site_cleaned", "Site cleaned", "No debris, tools removed", true),
    item(P, "customer_shown", "Customer shown system operation", "Demonstrated inverter and monitoring", true),
    item(P, "monitoring_demo", "Monitoring app demonstrated", "Customer can access app", true),
    item(P, "emergency_explained", "Emergency procedures explained", "Customer knows shutdown process", true),
    item(P, "handover_photo", "Customer handover photo", "Photo with customer at completion", true),
    item(P, "customer_signature", "Customer signature obtained", "Handover form signed", true),
];

pub fn find_item(key: &str) -> Option<&'static ChecklistItemDef> {
    CATALOGUE.iter().find(|item| item.key == key)
}

// --- Persisted state ---

/// Saved completion flag for one item of one job.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistEntry {
    pub job_id: Uuid,
    pub item_key: String,
    pub is_completed: bool,
    pub completed_by: Option<Uuid>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChecklistItemRequest {
    pub is_completed: bool,
}

// --- View ---

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItemView {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistProgress {
    pub completed: usize,
    pub total: usize,
    pub required_completed: usize,
    pub required_total: usize,
    pub complete: bool,
}

impl ChecklistProgress {
    fn add(&mut self, def: &ChecklistItemDef, done: bool) {
        self.total += 1;
        if def.required {
            self.required_total += 1;
        }
        if done {
            self.completed += 1;
            if def.required {
                self.required_completed += 1;
            }
        }
        self.complete = self.required_completed == self.required_total;
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistSection {
    pub phase: ChecklistPhase,
    pub title: &'static str,
    pub items: Vec<ChecklistItemView>,
    pub progress: ChecklistProgress,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobChecklist {
    pub job_id: Uuid,
    pub sections: Vec<ChecklistSection>,
    pub progress: ChecklistProgress,
}

/// Merges the catalogue with a job's saved flags. Keys no longer in the
/// catalogue are ignored.
pub fn build_checklist(job_id: Uuid, saved: &[ChecklistEntry]) -> JobChecklist {
    let by_key: HashMap<&str, &ChecklistEntry> =
        saved.iter().map(|e| (e.item_key.as_str(), e)).collect();

    let mut overall = ChecklistProgress { complete: true, ..Default::default() };
    let sections = ChecklistPhase::ALL
        .iter()
        .map(|phase| {
            let mut progress = ChecklistProgress { complete: true, ..Default::default() };
            let items = CATALOGUE
                .iter()
                .filter(|def| def.phase == *phase)
                .map(|def| {
                    let entry = by_key.get(def.key);
                    let done = entry.is_some_and(|e| e.is_completed);
                    progress.add(def, done);
                    overall.add(def, done);
                    ChecklistItemView {
                        key: def.key,
                        name: def.name,
                        description: def.description,
                        required: def.required,
                        is_completed: done,
                        completed_at: entry.and_then(|e| e.completed_at),
                    }
                })
                .collect();
            ChecklistSection { phase: *phase, title: phase.title(), items, progress }
        })
        .collect();

    JobChecklist { job_id, sections, progress: overall }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn done(job_id: Uuid, key: &str) -> ChecklistEntry {
        ChecklistEntry {
            job_id,
            item_key: key.to_string(),
            is_completed: true,
            completed_by: None,
            completed_at: Some(Utc::now()),
        }
    }

    #[test]
    fn catalogue_has_expected_shape() {
        let count = |phase| CATALOGUE.iter().filter(|i| i.phase == phase).count();
        assert_eq!(count(ChecklistPhase::PreInstall), 10);
        assert_eq!(count(ChecklistPhase::DuringInstall), 20);
        assert_eq!(count(ChecklistPhase::PostInstall), 15);

        let keys: HashSet<&str> = CATALOGUE.iter().map(|i| i.key).collect();
        assert_eq!(keys.len(), CATALOGUE.len());
    }

    #[test]
    fn empty_checklist_is_incomplete() {
        let checklist = build_checklist(Uuid::new_v4(), &[]);

        assert_eq!(checklist.progress.completed, 0);
        assert_eq!(checklist.progress.total, 45);
        assert_eq!(checklist.progress.required_total, 40);
        assert!(!checklist.progress.complete);
    }

    #[test]
    fn optional_items_do_not_block_completion() {
        let job_id = Uuid::new_v4();
        let saved: Vec<ChecklistEntry> = CATALOGUE
            .iter()
            .filter(|i| i.required)
            .map(|i| done(job_id, i.key))
            .collect();

        let checklist = build_checklist(job_id, &saved);

        assert!(checklist.progress.complete);
        assert_eq!(checklist.progress.completed, 40);
        assert!(checklist.sections.iter().all(|s| s.progress.complete));
    }

    #[test]
    fn items_are_toggled_independently() {
        let job_id = Uuid::new_v4();
        let checklist = build_checklist(job_id, &[done(job_id, "customer_signature")]);

        let post = &checklist.sections[2];
        assert_eq!(post.progress.completed, 1);
        assert!(post.items.iter().any(|i| i.key == "customer_signature" && i.is_completed));
        assert_eq!(checklist.sections[0].progress.completed, 0);
    }

    #[test]
    fn stale_keys_are_ignored() {
        let job_id = Uuid::new_v4();
        let checklist = build_checklist(job_id, &[done(job_id, "retired_item")]);
        assert_eq!(checklist.progress.completed, 0);
        assert!(find_item("retired_item").is_none());
        assert!(find_item("polarity_test").is_some());
    }
}
