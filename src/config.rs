// src/config.rs

use std::{env, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        CampaignRepository, ChecklistRepository, CrewRepository, DashboardRepository,
        JobRepository, LeaveRepository, MaterialRepository, SalesRepository, SettingsRepository,
        TenantRepository, UserRepository, WebsiteRepository,
    },
    services::{
        auth::AuthService, campaign_service::CampaignService,
        checklist_service::ChecklistService, document_service::DocumentService,
        job_service::JobService, leave_service::LeaveService,
        material_service::MaterialService, sales_service::SalesService,
        tenancy_service::TenantService,
    },
};

/// Runtime configuration read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub fonts_dir: String,
    pub public_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests don't touch the process env.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt_secret = lookup("JWT_SECRET").context("JWT_SECRET must be set")?;

        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("DB_MAX_CONNECTIONS is not a number: {}", raw))?,
            None => 5,
        };

        let public_base_url = lookup("PUBLIC_BASE_URL")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            db_max_connections,
            fonts_dir: lookup("FONTS_DIR").unwrap_or_else(|| "./fonts".to_string()),
            public_base_url,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: AppConfig,
    pub auth_service: AuthService,
    pub tenant_service: TenantService,
    pub sales_service: SalesService,
    pub job_service: JobService,
    pub checklist_service: ChecklistService,
    pub campaign_service: CampaignService,
    pub leave_service: LeaveService,
    pub material_service: MaterialService,
    pub document_service: DocumentService,
    pub settings_repo: SettingsRepository,
    pub crew_repo: CrewRepository,
    pub website_repo: WebsiteRepository,
    pub dashboard_repo: DashboardRepository,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("Database connection established");

        Ok(Self::from_pool(db_pool, config))
    }

    // Wires the dependency graph on top of an existing pool.
    pub fn from_pool(db_pool: PgPool, config: AppConfig) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let tenant_repo = TenantRepository::new(db_pool.clone());
        let settings_repo = SettingsRepository::new(db_pool.clone());
        let sales_repo = SalesRepository::new(db_pool.clone());
        let job_repo = JobRepository::new(db_pool.clone());
        let crew_repo = CrewRepository::new(db_pool.clone());
        let checklist_repo = ChecklistRepository::new(db_pool.clone());
        let campaign_repo = CampaignRepository::new(db_pool.clone());
        let website_repo = WebsiteRepository::new(db_pool.clone());
        let leave_repo = LeaveRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());
        let material_repo = MaterialRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), config.jwt_secret.clone(), db_pool.clone());
        let tenant_service = TenantService::new(tenant_repo, user_repo, db_pool.clone());
        let sales_service = SalesService::new(
            sales_repo.clone(),
            job_repo.clone(),
            settings_repo.clone(),
            db_pool.clone(),
        );
        let job_service = JobService::new(
            job_repo.clone(),
            crew_repo.clone(),
            db_pool.clone(),
            config.public_base_url.clone(),
        );
        let checklist_service = ChecklistService::new(checklist_repo.clone(), job_repo.clone());
        let campaign_service = CampaignService::new(campaign_repo, db_pool.clone());
        let leave_service = LeaveService::new(leave_repo);
        let material_service = MaterialService::new(material_repo, job_repo.clone(), db_pool.clone());
        let document_service = DocumentService::new(
            job_repo,
            sales_repo,
            crew_repo.clone(),
            checklist_repo,
            settings_repo.clone(),
            config.fonts_dir.clone(),
            config.public_base_url.clone(),
        );

        Self {
            db_pool,
            config,
            auth_service,
            tenant_service,
            sales_service,
            job_service,
            checklist_service,
            campaign_service,
            leave_service,
            material_service,
            document_service,
            settings_repo,
            crew_repo,
            website_repo,
            dashboard_repo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_optional_keys_are_absent() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/solar"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.fonts_dir, "./fonts");
        assert_eq!(config.public_base_url, "http://localhost:3000");
    }

    #[test]
    fn required_keys_are_enforced() {
        let err = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "secret")])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn base_url_loses_its_trailing_slash() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/solar"),
            ("JWT_SECRET", "secret"),
            ("PUBLIC_BASE_URL", "https://ops.example.com.au/"),
            ("DB_MAX_CONNECTIONS", "12"),
        ]))
        .unwrap();

        assert_eq!(config.public_base_url, "https://ops.example.com.au");
        assert_eq!(config.db_max_connections, 12);
    }

    #[test]
    fn bad_pool_size_is_rejected() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/solar"),
            ("JWT_SECRET", "secret"),
            ("DB_MAX_CONNECTIONS", "lots"),
        ]));
        assert!(result.is_err());
    }
}
