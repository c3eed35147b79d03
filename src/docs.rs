// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth / Users ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,
        handlers::auth::get_my_companies,

        // --- Tenancy / Settings ---
        handlers::tenancy::create_tenant,
        handlers::tenancy::list_my_tenants,
        handlers::tenancy::add_member,
        handlers::settings::get_settings,
        handlers::settings::update_settings,

        // --- Leads / Quotes ---
        handlers::leads::submit_lead,
        handlers::leads::list_leads,
        handlers::leads::get_lead,
        handlers::leads::update_lead,
        handlers::quotes::create_quote,
        handlers::quotes::list_quotes,
        handlers::quotes::get_quote,
        handlers::quotes::set_quote_status,
        handlers::quotes::accept_quote,

        // --- Jobs ---
        handlers::jobs::list_jobs,
        handlers::jobs::get_board,
        handlers::jobs::get_job,
        handlers::jobs::get_history,
        handlers::jobs::update_status,
        handlers::jobs::update_schedule,
        handlers::jobs::assign_job,
        handlers::checklist::get_checklist,
        handlers::checklist::set_item,
        handlers::documents::generate_document,

        // --- Public links ---
        handlers::subcontractor::get_assignment,
        handlers::subcontractor::confirm_assignment,
        handlers::subcontractor::reject_assignment,
        handlers::portal::get_portal_job,

        // --- Crews / Leave ---
        handlers::crews::create_electrician,
        handlers::crews::list_electricians,
        handlers::crews::create_team,
        handlers::crews::list_teams,
        handlers::crews::create_subcontractor,
        handlers::crews::list_subcontractors,
        handlers::leave::list_leave,
        handlers::leave::create_leave,
        handlers::leave::decide_leave,

        // --- Materials ---
        handlers::materials::create_material_order,
        handlers::materials::get_material_order,
        handlers::materials::list_material_orders,
        handlers::materials::update_material_status,

        // --- Campaigns / Website ---
        handlers::campaigns::list_campaigns,
        handlers::campaigns::create_campaign,
        handlers::campaigns::update_campaign,
        handlers::campaigns::delete_campaign,
        handlers::website::list_services,
        handlers::website::create_service,
        handlers::website::update_service,
        handlers::website::list_public_services,

        // --- Calculators / Dashboard ---
        handlers::calculators::calculate_voltage_rise,
        handlers::calculators::voltage_rise_report_download,
        handlers::calculators::calculate_deposit,
        handlers::dashboard::get_summary,
    ),
    components(
        schemas(
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::UserCompany,

            models::tenancy::Tenant,
            models::tenancy::TenantMember,
            models::tenancy::MemberRole,
            handlers::tenancy::CreateTenantPayload,
            handlers::tenancy::AddMemberPayload,

            models::settings::TenantSettings,
            models::settings::UpdateSettingsRequest,
            models::settings::DepositType,

            models::sales::Lead,
            models::sales::LeadStatus,
            models::sales::PublicLeadRequest,
            models::sales::LeadSubmission,
            models::sales::UpdateLeadRequest,
            models::sales::CustomerQuote,
            models::sales::QuoteStatus,
            models::sales::CreateQuoteRequest,
            models::sales::QuoteStatusRequest,

            models::jobs::Job,
            models::jobs::JobStatus,
            models::jobs::JobListEntry,
            models::jobs::JobStatusChange,
            models::jobs::UpdateJobStatusRequest,
            models::jobs::UpdateScheduleRequest,
            models::jobs::AssignmentType,
            models::jobs::AssignJobRequest,
            models::jobs::AssignmentResponse,
            models::jobs::RejectAssignmentRequest,
            models::jobs::SubcontractorJobSummary,
            models::jobs::BoardColumn,
            models::jobs::BoardSummary,
            models::jobs::JobBoard,
            models::jobs::PortalJobView,

            models::checklist::ChecklistPhase,
            models::checklist::ChecklistEntry,
            models::checklist::UpdateChecklistItemRequest,
            models::checklist::ChecklistItemView,
            models::checklist::ChecklistProgress,
            models::checklist::ChecklistSection,
            models::checklist::JobChecklist,

            models::documents::DocumentKind,

            models::crews::Electrician,
            models::crews::Team,
            models::crews::Subcontractor,
            models::crews::CreateElectricianRequest,
            models::crews::CreateTeamRequest,
            models::crews::CreateSubcontractorRequest,

            models::leave::LeaveType,
            models::leave::LeaveStatus,
            models::leave::LeaveRequestView,
            models::leave::CreateLeaveRequest,
            models::leave::DecideLeaveRequest,

            models::materials::MaterialOrderStatus,
            models::materials::MaterialItem,
            models::materials::MaterialOrder,
            models::materials::MaterialOrderListEntry,
            models::materials::CreateMaterialOrderRequest,
            models::materials::MaterialStatusRequest,

            models::campaigns::CampaignTrigger,
            models::campaigns::CampaignAction,
            models::campaigns::CampaignView,
            models::campaigns::StepView,
            models::campaigns::StepInput,
            models::campaigns::SaveCampaignRequest,
            models::campaigns::UpdateCampaignRequest,

            models::website::WebsiteService,
            models::website::CreateServiceRequest,
            models::website::UpdateServiceRequest,

            models::calculators::PhaseType,
            models::calculators::VoltageRiseRequest,
            models::calculators::VoltageRiseResult,
            models::calculators::DepositRequest,
            models::calculators::DepositResponse,

            models::dashboard::StatusCount,
            models::dashboard::DashboardSummary,
        )
    ),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Users", description = "The caller and their companies"),
        (name = "Tenancy", description = "Companies and their members"),
        (name = "Settings", description = "Company profile and deposit rules"),
        (name = "Leads", description = "Calculator enquiries and the CRM lead list"),
        (name = "Quotes", description = "Customer quotes and acceptance"),
        (name = "Jobs", description = "Installation jobs, scheduling and assignment"),
        (name = "Checklist", description = "Installation checklist per job"),
        (name = "Documents", description = "Compliance PDFs"),
        (name = "Subcontractor", description = "Public confirmation links"),
        (name = "Portal", description = "Customer progress page"),
        (name = "Crews", description = "Electricians, teams and subcontractors"),
        (name = "Leave", description = "Staff leave requests"),
        (name = "Materials", description = "Supplier material orders per job"),
        (name = "Campaigns", description = "Follow-up campaigns"),
        (name = "Website", description = "Services listed on the public website"),
        (name = "Calculators", description = "Voltage rise and deposit calculators"),
        (name = "Dashboard", description = "Operational summary")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
