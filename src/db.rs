pub mod user_repo;
pub use user_repo::UserRepository;
pub mod tenancy_repo;
pub use tenancy_repo::TenantRepository;
pub mod settings_repo;
pub use settings_repo::SettingsRepository;
pub mod sales_repo;
pub use sales_repo::SalesRepository;
pub mod job_repo;
pub use job_repo::JobRepository;
pub mod crew_repo;
pub use crew_repo::CrewRepository;
pub mod checklist_repo;
pub use checklist_repo::ChecklistRepository;
pub mod campaign_repo;
pub use campaign_repo::CampaignRepository;
pub mod website_repo;
pub use website_repo::WebsiteRepository;
pub mod leave_repo;
pub use leave_repo::LeaveRepository;
pub mod material_repo;
pub use material_repo::MaterialRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
