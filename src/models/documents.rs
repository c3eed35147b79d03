// src/models/documents.rs

use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::models::{
    checklist::JobChecklist, crews::Electrician, jobs::Job, sales::Lead,
    settings::TenantSettings,
};

pub const STANDARDS_FOOTER: &str = "Standards: AS/NZS 5033:2021, AS/NZS 3000:2018";
const NOT_RECORDED: &str = "Not recorded";
const SIGNATURE_LINE: &str = "______________________________";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    CommissioningReport,
    CustomerDeclaration,
    SingleLineDiagram,
}

impl DocumentKind {
    pub fn title(self) -> &'static str {
        match self {
            DocumentKind::CommissioningReport => "Commissioning Report",
            DocumentKind::CustomerDeclaration => "Customer Declaration",
            DocumentKind::SingleLineDiagram => "Single Line Diagram",
        }
    }

    pub fn file_name(self, job_number: &str) -> String {
        let slug = match self {
            DocumentKind::CommissioningReport => "commissioning-report",
            DocumentKind::CustomerDeclaration => "customer-declaration",
            DocumentKind::SingleLineDiagram => "single-line-diagram",
        };
        format!("{}-{}.pdf", job_number, slug)
    }
}

/// Site test results printed on the commissioning report.
#[derive(Debug, Default, Clone, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TestReadings {
    /// DC string voltage (V)
    pub dc_voltage: Option<f64>,
    /// DC string current (A)
    pub dc_current: Option<f64>,
    /// Insulation resistance, DC side (MΩ)
    pub insulation_dc: Option<f64>,
    /// Insulation resistance, AC side (MΩ)
    pub insulation_ac: Option<f64>,
    /// Earth continuity (Ω)
    pub earth_continuity: Option<f64>,
    /// Voltage rise (%)
    pub voltage_rise: Option<f64>,
}

/// Everything a document can interpolate.
#[derive(Debug)]
pub struct DocumentData {
    pub job: Job,
    pub customer: Lead,
    pub company: TenantSettings,
    pub installer: Option<String>,
    pub lead_electrician: Option<Electrician>,
    pub checklist: Option<JobChecklist>,
    pub portal_url: String,
    pub generated_on: NaiveDate,
}

// =============================================================================
//  CONTENT MODEL
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Fields(Vec<(String, String)>),
    Table { widths: Vec<usize>, header: Vec<String>, rows: Vec<Vec<String>> },
    Paragraphs(Vec<String>),
    Signature(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub heading: String,
    pub block: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentContent {
    pub company: String,
    pub title: String,
    pub subtitle: String,
    pub sections: Vec<Section>,
    pub qr_link: Option<String>,
    pub footer: Vec<String>,
}

impl DocumentContent {
    pub fn section(&self, heading: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.heading == heading)
    }
}

fn section(heading: &str, block: Block) -> Section {
    Section { heading: heading.to_string(), block }
}

fn field(label: &str, value: impl Into<String>) -> (String, String) {
    (label.to_string(), value.into())
}

fn or_dash(value: Option<&str>) -> String {
    value.filter(|v| !v.trim().is_empty()).unwrap_or("-").to_string()
}

pub fn build(kind: DocumentKind, data: &DocumentData, readings: &TestReadings) -> DocumentContent {
    let sections = match kind {
        DocumentKind::CommissioningReport => commissioning_sections(data, readings),
        DocumentKind::CustomerDeclaration => declaration_sections(data),
        DocumentKind::SingleLineDiagram => diagram_sections(data),
    };

    let qr_link = match kind {
        DocumentKind::CommissioningReport => Some(data.portal_url.clone()),
        _ => None,
    };

    let mut footer = vec![format!("Generated {}", data.generated_on.format("%d/%m/%Y"))];
    if kind == DocumentKind::CommissioningReport {
        footer.push(STANDARDS_FOOTER.to_string());
    }
    if let Some(cec) = data.company.cec_retailer_number.as_deref() {
        footer.push(format!("CEC retailer {}", cec));
    }

    DocumentContent {
        company: data
            .company
            .company_name
            .clone()
            .unwrap_or_else(|| "Solar Installations".to_string()),
        title: kind.title().to_string(),
        subtitle: format!("Job {}", data.job.job_number),
        sections,
        qr_link,
        footer,
    }
}

// --- shared sections ---

fn customer_section(data: &DocumentData) -> Section {
    let c = &data.customer;
    let locality = match (c.suburb.as_deref(), c.postcode.as_deref()) {
        (Some(s), Some(p)) => format!("{} {}", s, p),
        (Some(s), None) => s.to_string(),
        (None, Some(p)) => p.to_string(),
        (None, None) => "-".to_string(),
    };
    section(
        "Customer",
        Block::Fields(vec![
            field("Name", c.name.clone()),
            field("Address", c.address.clone()),
            field("Suburb", locality),
            field("E-mail", c.email.clone()),
            field("Phone", or_dash(c.phone.as_deref())),
        ]),
    )
}

fn system_section(job: &Job) -> Section {
    let battery = if job.battery_capacity > 0.0 {
        format!("{:.1} kWh", job.battery_capacity)
    } else {
        "None".to_string()
    };
    section(
        "System",
        Block::Fields(vec![
            field("System size", format!("{:.2} kW", job.system_size)),
            field("Panels", job.panel_count.to_string()),
            field("Battery", battery),
            field("Estimated duration", format!("{} h", job.estimated_duration)),
        ]),
    )
}

fn installation_section(data: &DocumentData) -> Section {
    let job = &data.job;
    let date = job
        .scheduled_date
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "Not scheduled".to_string());
    let (electrician, cec) = match &data.lead_electrician {
        Some(e) => (e.full_name(), e.cec_number.clone()),
        None => ("-".to_string(), "-".to_string()),
    };
    section(
        "Installation",
        Block::Fields(vec![
            field("Job number", job.job_number.clone()),
            field("Status", job.status.label()),
            field("Installation date", date),
            field("Installer", or_dash(data.installer.as_deref())),
            field("Lead electrician", electrician),
            field("CEC accreditation", cec),
        ]),
    )
}

// --- commissioning report ---

fn reading(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{:.2} {}", v, unit),
        None => NOT_RECORDED.to_string(),
    }
}

fn commissioning_sections(data: &DocumentData, readings: &TestReadings) -> Vec<Section> {
    let tests = vec![
        vec!["DC voltage".to_string(), reading(readings.dc_voltage, "V")],
        vec!["DC current".to_string(), reading(readings.dc_current, "A")],
        vec!["Insulation (DC)".to_string(), reading(readings.insulation_dc, "MΩ")],
        vec!["Insulation (AC)".to_string(), reading(readings.insulation_ac, "MΩ")],
        vec!["Earth continuity".to_string(), reading(readings.earth_continuity, "Ω")],
        vec!["Voltage rise".to_string(), reading(readings.voltage_rise, "%")],
    ];

    let mut sections = vec![
        installation_section(data),
        customer_section(data),
        system_section(&data.job),
        section(
            "Electrical Test Results",
            Block::Table {
                widths: vec![3, 2],
                header: vec!["Test".into(), "Reading".into()],
                rows: tests,
            },
        ),
    ];

    if let Some(checklist) = &data.checklist {
        let mut rows: Vec<Vec<String>> = checklist
            .sections
            .iter()
            .map(|s| {
                vec![
                    s.title.to_string(),
                    format!("{}/{}", s.progress.completed, s.progress.total),
                    format!("{}/{}", s.progress.required_completed, s.progress.required_total),
                ]
            })
            .collect();
        let p = &checklist.progress;
        rows.push(vec![
            "Total".to_string(),
            format!("{}/{}", p.completed, p.total),
            format!("{}/{}", p.required_completed, p.required_total),
        ]);
        sections.push(section(
            "Compliance Checklist",
            Block::Table {
                widths: vec![3, 1, 1],
                header: vec!["Phase".into(), "Done".into(), "Required".into()],
                rows,
            },
        ));

        let outstanding = p.required_total - p.required_completed;
        let summary = if p.complete {
            "All required checklist items are complete.".to_string()
        } else {
            format!("{} required checklist item(s) outstanding.", outstanding)
        };
        sections.push(section("Checklist Status", Block::Paragraphs(vec![summary])));
    }

    sections.push(section(
        "Certification",
        Block::Paragraphs(vec![
            "This report certifies that the solar PV system has been installed, tested and \
             commissioned in accordance with Australian Standards."
                .to_string(),
            "Scan the code below to follow this installation on the customer portal.".to_string(),
        ]),
    ));

    sections
}

// --- customer declaration ---

fn declaration_sections(data: &DocumentData) -> Vec<Section> {
    let company = data.company.company_name.as_deref().unwrap_or("the installer");
    let abn = data.company.abn.as_deref().unwrap_or("-");
    let name = &data.customer.name;

    vec![
        customer_section(data),
        system_section(&data.job),
        section(
            "Declarations",
            Block::Paragraphs(vec![
                format!("I, {}, declare that:", name),
                "I am the owner of the property where the solar PV system has been installed, \
                 or I have the authority to make this declaration on behalf of the owner."
                    .to_string(),
                "This is a new solar PV system and has not been installed or commissioned at \
                 any other location."
                    .to_string(),
                "STCs have not previously been created or claimed for this system.".to_string(),
                "All information in this declaration is true and complete to the best of my \
                 knowledge."
                    .to_string(),
                format!(
                    "I authorise {} (ABN {}) to create and claim the STCs for this system and \
                     assign all rights in them to it.",
                    company, abn
                ),
                "Providing false or misleading information is an offence under the Renewable \
                 Energy (Electricity) Act 2000."
                    .to_string(),
            ]),
        ),
        installation_section(data),
        section(
            "Customer Signature",
            Block::Signature(vec![
                format!("Customer name: {}", name),
                format!("Signature: {}", SIGNATURE_LINE),
                format!("Date: {}", SIGNATURE_LINE),
            ]),
        ),
    ]
}

// --- single line diagram ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramComponent {
    pub name: String,
    pub connects_to: String,
    pub detail: String,
}

fn component(name: &str, connects_to: &str, detail: String) -> DiagramComponent {
    DiagramComponent { name: name.into(), connects_to: connects_to.into(), detail }
}

/// Generation path from the array to the grid, with the battery hanging off
/// the inverter when there is one.
pub fn diagram_chain(job: &Job) -> Vec<DiagramComponent> {
    let mut chain = vec![
        component(
            "PV array",
            "DC isolator",
            format!("{} panels, {:.2} kW", job.panel_count, job.system_size),
        ),
        component("DC isolator", "Inverter", "Rooftop and inverter-side isolation".into()),
        component("Inverter", "AC isolator", format!("{:.2} kW system", job.system_size)),
    ];
    if job.battery_capacity > 0.0 {
        chain.push(component(
            "Battery",
            "Inverter",
            format!("{:.1} kWh storage", job.battery_capacity),
        ));
    }
    chain.extend([
        component("AC isolator", "Main switchboard", "Adjacent to inverter".into()),
        component("Main switchboard", "Meter", "Solar supply main switch".into()),
        component("Meter", "Grid", "Bi-directional import/export".into()),
        component("Grid", "-", "Network connection point".into()),
    ]);
    chain
}

fn diagram_sections(data: &DocumentData) -> Vec<Section> {
    let rows = diagram_chain(&data.job)
        .into_iter()
        .zip(1..)
        .map(|(c, n): (DiagramComponent, usize)| {
            vec![n.to_string(), c.name, c.connects_to, c.detail]
        })
        .collect();

    vec![
        section(
            "Site",
            Block::Fields(vec![
                field("Customer", data.customer.name.clone()),
                field("Address", data.customer.address.clone()),
                field("Job number", data.job.job_number.clone()),
            ]),
        ),
        section(
            "Components",
            Block::Table {
                widths: vec![1, 3, 3, 5],
                header: vec!["#".into(), "Component".into(), "Connects to".into(), "Detail".into()],
                rows,
            },
        ),
    ]
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::models::{jobs::JobStatus, sales::LeadStatus};
    use chrono::Utc;
    use uuid::Uuid;

    pub fn job(battery_capacity: f64) -> Job {
        let now = Utc::now();
        Job {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            job_number: "SDP-2025-0042".into(),
            lead_id: Uuid::new_v4(),
            quote_id: Uuid::new_v4(),
            status: JobStatus::Completed,
            status_changed_at: now,
            scheduled_date: NaiveDate::from_ymd_opt(2025, 4, 2),
            scheduled_start_time: Some("09:00".into()),
            scheduling_deadline: NaiveDate::from_ymd_opt(2025, 4, 25).unwrap(),
            estimated_duration: 8,
            system_size: 6.6,
            panel_count: 15,
            battery_capacity,
            site_suburb: Some("Scarborough".into()),
            installation_notes: None,
            team_id: None,
            subcontractor_id: None,
            lead_electrician_id: None,
            sub_confirmation_token: None,
            sub_confirmed_at: None,
            sub_rejected_at: None,
            sub_rejection_reason: None,
            assigned_at: None,
            portal_token: "t".repeat(64),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn data(battery_capacity: f64) -> DocumentData {
        let now = Utc::now();
        let job = job(battery_capacity);
        let tenant_id = job.tenant_id;
        let mut company = TenantSettings::defaults(tenant_id);
        company.company_name = Some("Sunrise Solar".into());
        company.abn = Some("12 345 678 901".into());
        DocumentData {
            customer: Lead {
                id: job.lead_id,
                tenant_id,
                name: "Alex Morgan".into(),
                email: "alex@example.com".into(),
                phone: None,
                address: "12 Ocean Dr".into(),
                suburb: Some("Scarborough".into()),
                postcode: Some("6019".into()),
                system_size: 6.6,
                panel_count: 15,
                battery_capacity,
                annual_bill: None,
                source: "calculator".into(),
                status: LeadStatus::Won,
                notes: None,
                created_at: now,
                updated_at: now,
            },
            job,
            company,
            installer: Some("Team North".into()),
            lead_electrician: None,
            checklist: None,
            portal_url: "https://ops.example.com.au/portal/abc".into(),
            generated_on: NaiveDate::from_ymd_opt(2025, 4, 3).unwrap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::checklist::{build_checklist, CATALOGUE};
    use crate::models::checklist::ChecklistEntry;

    #[test]
    fn diagram_runs_from_array_to_grid() {
        let names: Vec<String> = diagram_chain(&fixtures::job(0.0)).into_iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec!["PV array", "DC isolator", "Inverter", "AC isolator", "Main switchboard", "Meter", "Grid"]
        );
    }

    #[test]
    fn battery_branches_off_the_inverter() {
        let chain = diagram_chain(&fixtures::job(13.5));
        assert_eq!(chain.len(), 8);
        let battery = chain.iter().find(|c| c.name == "Battery").unwrap();
        assert_eq!(battery.connects_to, "Inverter");
        assert_eq!(battery.detail, "13.5 kWh storage");
    }

    #[test]
    fn diagram_rows_are_numbered_from_one() {
        let content = build(DocumentKind::SingleLineDiagram, &fixtures::data(0.0), &TestReadings::default());
        let Some(Section { block: Block::Table { rows, .. }, .. }) = content.section("Components") else {
            panic!("components table missing");
        };
        assert_eq!(rows[0][0], "1");
        assert_eq!(rows[0][1], "PV array");
        assert_eq!(rows.last().unwrap()[0], "7");
        assert!(content.qr_link.is_none());
    }

    #[test]
    fn missing_readings_print_as_not_recorded() {
        let readings = TestReadings { dc_voltage: Some(385.2), ..Default::default() };
        let content = build(DocumentKind::CommissioningReport, &fixtures::data(0.0), &readings);
        let Some(Section { block: Block::Table { rows, .. }, .. }) = content.section("Electrical Test Results")
        else {
            panic!("test table missing");
        };
        assert_eq!(rows[0][1], "385.20 V");
        assert_eq!(rows[1][1], NOT_RECORDED);
        assert_eq!(content.qr_link.as_deref(), Some("https://ops.example.com.au/portal/abc"));
        assert!(content.footer.iter().any(|f| f == STANDARDS_FOOTER));
    }

    #[test]
    fn commissioning_report_summarises_checklist_progress() {
        let mut data = fixtures::data(0.0);
        let saved: Vec<ChecklistEntry> = CATALOGUE
            .iter()
            .filter(|d| d.required)
            .take(3)
            .map(|d| ChecklistEntry {
                job_id: data.job.id,
                item_key: d.key.to_string(),
                is_completed: true,
                completed_by: None,
                completed_at: None,
            })
            .collect();
        data.checklist = Some(build_checklist(data.job.id, &saved));

        let content = build(DocumentKind::CommissioningReport, &data, &TestReadings::default());
        let Some(Section { block: Block::Paragraphs(lines), .. }) = content.section("Checklist Status") else {
            panic!("checklist status missing");
        };
        assert_eq!(lines[0], "37 required checklist item(s) outstanding.");
    }

    #[test]
    fn declaration_names_the_customer_and_the_assignee_company() {
        let content = build(DocumentKind::CustomerDeclaration, &fixtures::data(0.0), &TestReadings::default());
        let Some(Section { block: Block::Paragraphs(lines), .. }) = content.section("Declarations") else {
            panic!("declarations missing");
        };
        assert_eq!(lines[0], "I, Alex Morgan, declare that:");
        assert!(lines.iter().any(|l| l.contains("Sunrise Solar (ABN 12 345 678 901)")));
        assert!(matches!(
            content.section("Customer Signature").map(|s| &s.block),
            Some(Block::Signature(lines)) if lines.len() == 3
        ));
    }

    #[test]
    fn file_names_carry_job_number_and_kind() {
        assert_eq!(
            DocumentKind::SingleLineDiagram.file_name("SDP-2025-0042"),
            "SDP-2025-0042-single-line-diagram.pdf"
        );
    }
}
