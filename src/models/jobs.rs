// src/models/jobs.rs

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// =============================================================================
//  LIFECYCLE
// =============================================================================

/// Installation job status. Declaration order is board (kanban) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "job_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    DepositPaid,
    ApplicationsApproved,
    PendingSchedule,
    TeamAssigned,
    PendingSubConfirm,
    SubConfirmed,
    MaterialsOrdered,
    MaterialsReady,
    Scheduled,
    InProgress,
    Completed,
    DocumentationSubmitted,
    Cancelled,
}

impl JobStatus {
    pub const ALL: [JobStatus; 13] = [
        JobStatus::DepositPaid,
        JobStatus::ApplicationsApproved,
        JobStatus::PendingSchedule,
        JobStatus::TeamAssigned,
        JobStatus::PendingSubConfirm,
        JobStatus::SubConfirmed,
        JobStatus::MaterialsOrdered,
        JobStatus::MaterialsReady,
        JobStatus::Scheduled,
        JobStatus::InProgress,
        JobStatus::Completed,
        JobStatus::DocumentationSubmitted,
        JobStatus::Cancelled,
    ];

    pub fn code(self) -> &'static str {
        match self {
            JobStatus::DepositPaid => "DEPOSIT_PAID",
            JobStatus::ApplicationsApproved => "APPLICATIONS_APPROVED",
            JobStatus::PendingSchedule => "PENDING_SCHEDULE",
            JobStatus::TeamAssigned => "TEAM_ASSIGNED",
            JobStatus::PendingSubConfirm => "PENDING_SUB_CONFIRM",
            JobStatus::SubConfirmed => "SUB_CONFIRMED",
            JobStatus::MaterialsOrdered => "MATERIALS_ORDERED",
            JobStatus::MaterialsReady => "MATERIALS_READY",
            JobStatus::Scheduled => "SCHEDULED",
            JobStatus::InProgress => "IN_PROGRESS",
            JobStatus::Completed => "COMPLETED",
            JobStatus::DocumentationSubmitted => "DOCUMENTATION_SUBMITTED",
            JobStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            JobStatus::DepositPaid => "Deposit Paid",
            JobStatus::ApplicationsApproved => "Approvals Done",
            JobStatus::PendingSchedule => "Pending Schedule",
            JobStatus::TeamAssigned => "Team Assigned",
            JobStatus::PendingSubConfirm => "Awaiting Subcontractor",
            JobStatus::SubConfirmed => "Sub Confirmed",
            JobStatus::MaterialsOrdered => "Materials Ordered",
            JobStatus::MaterialsReady => "Materials Ready",
            JobStatus::Scheduled => "Scheduled",
            JobStatus::InProgress => "In Progress",
            JobStatus::Completed => "Completed",
            JobStatus::DocumentationSubmitted => "Docs Done",
            JobStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::DocumentationSubmitted | JobStatus::Cancelled)
    }

    /// Statuses that carry an assignee and can only be reached through the
    /// assignment and confirmation flows.
    pub fn is_assignment_driven(self) -> bool {
        matches!(
            self,
            JobStatus::TeamAssigned | JobStatus::PendingSubConfirm | JobStatus::SubConfirmed
        )
    }

    /// The assignment window: a team or subcontractor can be (re)assigned.
    pub fn accepts_assignment(self) -> bool {
        matches!(
            self,
            JobStatus::ApplicationsApproved
                | JobStatus::PendingSchedule
                | JobStatus::TeamAssigned
                | JobStatus::PendingSubConfirm
                | JobStatus::SubConfirmed
        )
    }

    /// Forward edges of the lifecycle, including those only the assignment
    /// flows may take.
    pub fn successors(self) -> &'static [JobStatus] {
        use JobStatus::*;
        match self {
            DepositPaid => &[ApplicationsApproved],
            ApplicationsApproved => &[PendingSchedule, TeamAssigned, PendingSubConfirm],
            PendingSchedule => &[TeamAssigned, PendingSubConfirm],
            TeamAssigned => &[MaterialsOrdered, PendingSubConfirm],
            PendingSubConfirm => &[SubConfirmed, PendingSchedule, TeamAssigned],
            SubConfirmed => &[MaterialsOrdered, TeamAssigned, PendingSubConfirm],
            MaterialsOrdered => &[MaterialsReady],
            MaterialsReady => &[Scheduled],
            Scheduled => &[InProgress],
            InProgress => &[Completed],
            Completed => &[DocumentationSubmitted],
            DocumentationSubmitted | Cancelled => &[],
        }
    }

    /// Whether a plain status update (no assignment payload) may move a job
    /// from `self` to `next`.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        if self.is_terminal() || self == next {
            return false;
        }
        if next == JobStatus::Cancelled {
            return true;
        }
        if next.is_assignment_driven() {
            return false;
        }
        // Sending a job back to scheduling drops its subcontractor, so only the
        // rejection flow may do it.
        if self == JobStatus::PendingSubConfirm && next == JobStatus::PendingSchedule {
            return false;
        }
        self.successors().contains(&next)
    }

    /// Customer-facing milestone (1-based) out of `PORTAL_STEPS`; 0 when cancelled.
    pub fn portal_step(self) -> u8 {
        use JobStatus::*;
        match self {
            DepositPaid => 1,
            ApplicationsApproved => 2,
            PendingSchedule | TeamAssigned | PendingSubConfirm | SubConfirmed => 3,
            MaterialsOrdered | MaterialsReady => 4,
            Scheduled => 5,
            InProgress => 6,
            Completed => 7,
            DocumentationSubmitted => 8,
            Cancelled => 0,
        }
    }

    pub fn needs_scheduling(self) -> bool {
        matches!(self, JobStatus::PendingSchedule | JobStatus::PendingSubConfirm)
    }

    pub fn in_pipeline(self) -> bool {
        matches!(
            self,
            JobStatus::TeamAssigned
                | JobStatus::SubConfirmed
                | JobStatus::MaterialsOrdered
                | JobStatus::MaterialsReady
                | JobStatus::Scheduled
                | JobStatus::InProgress
        )
    }
}

pub const PORTAL_STEPS: u8 = 8;

/// Days before the scheduling deadline at which a pending job becomes urgent.
pub const URGENT_WITHIN_DAYS: i64 = 3;

/// Days an accepted quote has until it must be scheduled.
pub const SCHEDULING_WINDOW_DAYS: i64 = 42;

pub fn days_until(deadline: NaiveDate, today: NaiveDate) -> i64 {
    (deadline - today).num_days()
}

pub fn is_urgent(status: JobStatus, deadline: NaiveDate, today: NaiveDate) -> bool {
    status == JobStatus::PendingSchedule && days_until(deadline, today) <= URGENT_WITHIN_DAYS
}

pub fn scheduling_deadline(accepted_on: NaiveDate) -> NaiveDate {
    accepted_on + Duration::days(SCHEDULING_WINDOW_DAYS)
}

/// Installation hours: one hour per four panels plus two for a battery,
/// with a four hour floor and a sixteen hour cap.
pub fn estimated_duration_hours(panel_count: i32, battery_capacity: f64) -> i32 {
    let panels = panel_count.max(0);
    let panel_hours = (panels + 3) / 4;
    let battery_hours = if battery_capacity > 0.0 { 2 } else { 0 };
    (panel_hours + battery_hours).clamp(4, 16)
}

pub fn job_number(accepted_on: NaiveDate, sequence: i64) -> String {
    format!("SDP-{}-{:04}", accepted_on.year(), sequence)
}

// =============================================================================
//  RECORDS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    #[schema(example = "SDP-2025-0042")]
    pub job_number: String,
    pub lead_id: Uuid,
    pub quote_id: Uuid,
    pub status: JobStatus,
    pub status_changed_at: DateTime<Utc>,
    #[schema(value_type = Option<String>, format = Date, example = "2025-04-02")]
    pub scheduled_date: Option<NaiveDate>,
    #[schema(example = "09:00")]
    pub scheduled_start_time: Option<String>,
    #[schema(value_type = String, format = Date, example = "2025-04-25")]
    pub scheduling_deadline: NaiveDate,
    #[schema(example = 6)]
    pub estimated_duration: i32,
    #[schema(example = 6.6)]
    pub system_size: f64,
    #[schema(example = 15)]
    pub panel_count: i32,
    #[schema(example = 10.0)]
    pub battery_capacity: f64,
    pub site_suburb: Option<String>,
    pub installation_notes: Option<String>,
    pub team_id: Option<Uuid>,
    pub subcontractor_id: Option<Uuid>,
    pub lead_electrician_id: Option<Uuid>,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub sub_confirmation_token: Option<String>,
    pub sub_confirmed_at: Option<DateTime<Utc>>,
    pub sub_rejected_at: Option<DateTime<Utc>>,
    pub sub_rejection_reason: Option<String>,
    pub assigned_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub portal_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A job as shown on the board and list views.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobListEntry {
    pub id: Uuid,
    pub job_number: String,
    pub status: JobStatus,
    #[schema(value_type = Option<String>, format = Date)]
    pub scheduled_date: Option<NaiveDate>,
    #[schema(value_type = String, format = Date)]
    pub scheduling_deadline: NaiveDate,
    pub estimated_duration: i32,
    pub system_size: f64,
    pub panel_count: i32,
    pub battery_capacity: f64,
    pub site_suburb: Option<String>,
    pub lead_id: Uuid,
    pub lead_name: String,
    pub lead_address: String,
    pub team_id: Option<Uuid>,
    pub team_name: Option<String>,
    pub team_color: Option<String>,
    pub subcontractor_id: Option<Uuid>,
    pub subcontractor_name: Option<String>,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub days_until_deadline: i64,
    #[sqlx(skip)]
    pub is_urgent: bool,
}

impl JobListEntry {
    pub fn with_deadline_flags(mut self, today: NaiveDate) -> Self {
        self.days_until_deadline = days_until(self.scheduling_deadline, today);
        self.is_urgent = is_urgent(self.status, self.scheduling_deadline, today);
        self
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusChange {
    pub id: Uuid,
    pub job_id: Uuid,
    pub from_status: Option<JobStatus>,
    pub to_status: JobStatus,
    pub changed_by: Option<Uuid>,
    pub changed_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, Deserialize, ToSchema, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    pub team_id: Option<Uuid>,
    pub search: Option<String>,
}

// =============================================================================
//  PAYLOADS
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateJobStatusRequest {
    pub status: JobStatus,
}

/// Scheduling fields; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScheduleRequest {
    #[schema(value_type = Option<String>, format = Date)]
    pub scheduled_date: Option<NaiveDate>,
    #[validate(custom(function = "validate_start_time"))]
    #[schema(example = "07:30")]
    pub scheduled_start_time: Option<String>,
    #[validate(range(min = 1, max = 24, message = "duration must be 1-24 hours"))]
    pub estimated_duration: Option<i32>,
    pub installation_notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentType {
    Team,
    Subcontractor,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignJobRequest {
    pub assignment_type: Option<AssignmentType>,
    pub team_id: Option<Uuid>,
    pub subcontractor_id: Option<Uuid>,
    #[schema(value_type = Option<String>, format = Date)]
    pub scheduled_date: Option<NaiveDate>,
    #[validate(custom(function = "validate_start_time"))]
    pub scheduled_start_time: Option<String>,
    pub notes: Option<String>,
}

/// The assignee resolved from an `AssignJobRequest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignee {
    Team(Uuid),
    Subcontractor(Uuid),
}

impl AssignJobRequest {
    /// Names the first missing field, if any.
    pub fn resolve(&self) -> Result<(Assignee, NaiveDate), &'static str> {
        let assignee = match self.assignment_type {
            None => return Err("assignmentType is required"),
            Some(AssignmentType::Team) => {
                Assignee::Team(self.team_id.ok_or("teamId is required for team assignment")?)
            }
            Some(AssignmentType::Subcontractor) => Assignee::Subcontractor(
                self.subcontractor_id
                    .ok_or("subcontractorId is required for subcontractor assignment")?,
            ),
        };
        let date = self.scheduled_date.ok_or("scheduledDate is required")?;
        Ok((assignee, date))
    }
}

pub const DEFAULT_START_TIME: &str = "09:00";

fn validate_start_time(value: &str) -> Result<(), ValidationError> {
    match NaiveTime::parse_from_str(value, "%H:%M") {
        Ok(_) => Ok(()),
        Err(_) => {
            let mut err = ValidationError::new("time");
            err.message = Some("expected HH:MM".into());
            Err(err)
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentResponse {
    pub job: Job,
    pub warnings: Vec<String>,
    pub confirmation_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RejectAssignmentRequest {
    pub reason: Option<String>,
}

/// What a subcontractor sees behind a confirmation link.
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubcontractorJobSummary {
    pub job_number: String,
    pub status: JobStatus,
    #[schema(value_type = Option<String>, format = Date)]
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_start_time: Option<String>,
    pub estimated_duration: i32,
    pub system_size: f64,
    pub panel_count: i32,
    pub battery_capacity: f64,
    pub site_address: String,
    pub installation_notes: Option<String>,
    pub subcontractor_name: String,
}

// =============================================================================
//  BOARD
// =============================================================================

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardColumn {
    pub status: JobStatus,
    pub label: &'static str,
    pub jobs: Vec<JobListEntry>,
}

#[derive(Debug, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardSummary {
    pub total: usize,
    pub needs_scheduling: usize,
    pub in_pipeline: usize,
    pub completed: usize,
    pub urgent: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobBoard {
    pub columns: Vec<BoardColumn>,
    pub summary: BoardSummary,
}

/// Groups jobs into one column per status, in lifecycle order.
pub fn build_board(jobs: Vec<JobListEntry>) -> JobBoard {
    let mut summary = BoardSummary { total: jobs.len(), ..Default::default() };
    let mut columns: Vec<BoardColumn> = JobStatus::ALL
        .iter()
        .map(|status| BoardColumn { status: *status, label: status.label(), jobs: Vec::new() })
        .collect();

    for job in jobs {
        if job.status.needs_scheduling() {
            summary.needs_scheduling += 1;
        }
        if job.status.in_pipeline() {
            summary.in_pipeline += 1;
        }
        if job.status == JobStatus::Completed {
            summary.completed += 1;
        }
        if job.is_urgent {
            summary.urgent += 1;
        }
        let idx = JobStatus::ALL
            .iter()
            .position(|s| *s == job.status)
            .unwrap_or(0);
        columns[idx].jobs.push(job);
    }

    JobBoard { columns, summary }
}

// =============================================================================
//  CUSTOMER PORTAL
// =============================================================================

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortalJobView {
    pub job_number: String,
    pub status: JobStatus,
    pub status_label: &'static str,
    pub step: u8,
    pub total_steps: u8,
    #[schema(value_type = Option<String>, format = Date)]
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_start_time: Option<String>,
    pub system_size: f64,
    pub panel_count: i32,
    pub battery_capacity: f64,
}

impl From<&Job> for PortalJobView {
    fn from(job: &Job) -> Self {
        Self {
            job_number: job.job_number.clone(),
            status: job.status,
            status_label: job.status.label(),
            step: job.status.portal_step(),
            total_steps: PORTAL_STEPS,
            scheduled_date: job.scheduled_date,
            scheduled_start_time: job.scheduled_start_time.clone(),
            system_size: job.system_size,
            panel_count: job.panel_count,
            battery_capacity: job.battery_capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use JobStatus::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(status: JobStatus, deadline: NaiveDate, today: NaiveDate) -> JobListEntry {
        JobListEntry {
            id: Uuid::new_v4(),
            job_number: "SDP-2025-0001".into(),
            status,
            scheduled_date: None,
            scheduling_deadline: deadline,
            estimated_duration: 6,
            system_size: 6.6,
            panel_count: 15,
            battery_capacity: 0.0,
            site_suburb: None,
            lead_id: Uuid::new_v4(),
            lead_name: "Alex".into(),
            lead_address: "12 Ocean Dr".into(),
            team_id: None,
            team_name: None,
            team_color: None,
            subcontractor_id: None,
            subcontractor_name: None,
            created_at: Utc::now(),
            days_until_deadline: 0,
            is_urgent: false,
        }
        .with_deadline_flags(today)
    }

    #[test]
    fn happy_path_is_walkable_by_plain_updates() {
        let path = [
            (DepositPaid, ApplicationsApproved),
            (ApplicationsApproved, PendingSchedule),
            (TeamAssigned, MaterialsOrdered),
            (SubConfirmed, MaterialsOrdered),
            (MaterialsOrdered, MaterialsReady),
            (MaterialsReady, Scheduled),
            (Scheduled, InProgress),
            (InProgress, Completed),
            (Completed, DocumentationSubmitted),
        ];
        for (from, to) in path {
            assert!(from.can_transition_to(to), "{:?} -> {:?}", from, to);
        }
    }

    #[test]
    fn assignment_states_need_the_assignment_flow() {
        assert!(!PendingSchedule.can_transition_to(TeamAssigned));
        assert!(!PendingSchedule.can_transition_to(PendingSubConfirm));
        assert!(!PendingSubConfirm.can_transition_to(SubConfirmed));
        assert!(!PendingSubConfirm.can_transition_to(PendingSchedule));
    }

    #[test]
    fn skipping_and_going_back_are_refused() {
        assert!(!DepositPaid.can_transition_to(Scheduled));
        assert!(!Completed.can_transition_to(InProgress));
        assert!(!Scheduled.can_transition_to(Scheduled));
    }

    #[test]
    fn any_open_job_can_be_cancelled_but_terminal_ones_stay_put() {
        for status in JobStatus::ALL {
            let expected = !status.is_terminal();
            assert_eq!(status.can_transition_to(Cancelled), expected, "{:?}", status);
        }
        assert!(!Cancelled.can_transition_to(DepositPaid));
        assert!(!DocumentationSubmitted.can_transition_to(Completed));
    }

    #[test]
    fn assignment_window_closes_once_materials_are_ordered() {
        assert!(!DepositPaid.accepts_assignment());
        assert!(ApplicationsApproved.accepts_assignment());
        assert!(SubConfirmed.accepts_assignment());
        assert!(!MaterialsOrdered.accepts_assignment());
        assert!(!Cancelled.accepts_assignment());
    }

    #[test]
    fn codes_match_the_serialized_form() {
        for status in JobStatus::ALL {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, status.code());
        }
    }

    #[test]
    fn pending_jobs_near_their_deadline_are_urgent() {
        let today = date(2025, 3, 10);
        assert!(is_urgent(PendingSchedule, date(2025, 3, 13), today));
        assert!(is_urgent(PendingSchedule, date(2025, 3, 1), today));
        assert!(!is_urgent(PendingSchedule, date(2025, 3, 14), today));
        assert!(!is_urgent(Scheduled, date(2025, 3, 11), today));
    }

    #[test]
    fn duration_has_floor_and_cap() {
        assert_eq!(estimated_duration_hours(6, 0.0), 4);
        assert_eq!(estimated_duration_hours(20, 0.0), 5);
        assert_eq!(estimated_duration_hours(21, 13.5), 8);
        assert_eq!(estimated_duration_hours(120, 10.0), 16);
    }

    #[test]
    fn deadline_and_job_number_follow_acceptance_date() {
        let accepted = date(2025, 3, 14);
        assert_eq!(scheduling_deadline(accepted), date(2025, 4, 25));
        assert_eq!(job_number(accepted, 42), "SDP-2025-0042");
    }

    #[test]
    fn board_has_every_column_in_order_and_counts_aggregates() {
        let today = date(2025, 3, 10);
        let jobs = vec![
            entry(PendingSchedule, date(2025, 3, 12), today),
            entry(PendingSubConfirm, date(2025, 4, 30), today),
            entry(Scheduled, date(2025, 4, 30), today),
            entry(MaterialsReady, date(2025, 4, 30), today),
            entry(Completed, date(2025, 4, 30), today),
            entry(Cancelled, date(2025, 4, 30), today),
        ];

        let board = build_board(jobs);

        let order: Vec<JobStatus> = board.columns.iter().map(|c| c.status).collect();
        assert_eq!(order, JobStatus::ALL.to_vec());
        assert_eq!(board.columns[2].jobs.len(), 1);
        assert_eq!(
            board.summary,
            BoardSummary { total: 6, needs_scheduling: 2, in_pipeline: 2, completed: 1, urgent: 1 }
        );
    }

    #[test]
    fn assignment_request_names_the_missing_field() {
        let mut req = AssignJobRequest {
            assignment_type: None,
            team_id: None,
            subcontractor_id: None,
            scheduled_date: Some(date(2025, 4, 2)),
            scheduled_start_time: None,
            notes: None,
        };
        assert_eq!(req.resolve().unwrap_err(), "assignmentType is required");

        req.assignment_type = Some(AssignmentType::Team);
        assert!(req.resolve().unwrap_err().starts_with("teamId"));

        let team = Uuid::new_v4();
        req.team_id = Some(team);
        req.scheduled_date = None;
        assert_eq!(req.resolve().unwrap_err(), "scheduledDate is required");

        req.scheduled_date = Some(date(2025, 4, 2));
        assert_eq!(req.resolve().unwrap(), (Assignee::Team(team), date(2025, 4, 2)));
    }

    #[test]
    fn start_time_must_be_hh_mm() {
        let mut req = UpdateScheduleRequest {
            scheduled_start_time: Some("7.30am".into()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
        req.scheduled_start_time = Some("07:30".into());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn portal_steps_track_the_customer_path() {
        assert_eq!(DepositPaid.portal_step(), 1);
        assert_eq!(PendingSubConfirm.portal_step(), TeamAssigned.portal_step());
        assert_eq!(DocumentationSubmitted.portal_step(), PORTAL_STEPS);
        assert_eq!(Cancelled.portal_step(), 0);
    }
}
