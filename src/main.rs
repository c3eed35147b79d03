// src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post, put},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppConfig, AppState};
use crate::docs::ApiDoc;
use crate::middleware::auth::{auth_guard, tenant_guard};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = AppConfig::from_env()?;
    let bind_addr = config.bind_addr.clone();
    let app_state = AppState::new(config).await?;

    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("Database migrations applied");

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app(app_state)).await?;
    Ok(())
}

pub fn app(app_state: AppState) -> Router {
    let tenant_layer = || axum_middleware::from_fn_with_state(app_state.clone(), tenant_guard);
    let auth_layer = || axum_middleware::from_fn_with_state(app_state.clone(), auth_guard);

    // Public: no token; company-scoped routes read `x-tenant-id`
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    let public_routes = Router::new()
        .route("/leads", post(handlers::leads::submit_lead))
        .route("/services", get(handlers::website::list_public_services));

    let calculator_routes = Router::new()
        .route("/voltage-rise", post(handlers::calculators::calculate_voltage_rise))
        .route(
            "/voltage-rise/report",
            post(handlers::calculators::voltage_rise_report_download),
        )
        .route("/deposit", post(handlers::calculators::calculate_deposit));

    let subcontractor_routes = Router::new()
        .route(
            "/confirm/{token}",
            get(handlers::subcontractor::get_assignment)
                .post(handlers::subcontractor::confirm_assignment),
        )
        .route("/reject/{token}", post(handlers::subcontractor::reject_assignment));

    let portal_routes = Router::new().route("/jobs/{token}", get(handlers::portal::get_portal_job));

    // Token only
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/me/companies", get(handlers::auth::get_my_companies))
        .layer(auth_layer());

    let tenancy_routes = Router::new()
        .route(
            "/",
            post(handlers::tenancy::create_tenant).get(handlers::tenancy::list_my_tenants),
        )
        .layer(auth_layer());

    // Token + company membership
    let member_routes = Router::new()
        .route("/members", post(handlers::tenancy::add_member))
        .layer(tenant_layer());

    let settings_routes = Router::new()
        .route(
            "/",
            get(handlers::settings::get_settings).put(handlers::settings::update_settings),
        )
        .layer(tenant_layer());

    let crm_routes = Router::new()
        .route("/leads", get(handlers::leads::list_leads))
        .route(
            "/leads/{id}",
            get(handlers::leads::get_lead).patch(handlers::leads::update_lead),
        )
        .route(
            "/campaigns",
            get(handlers::campaigns::list_campaigns).post(handlers::campaigns::create_campaign),
        )
        .route(
            "/campaigns/{id}",
            patch(handlers::campaigns::update_campaign)
                .delete(handlers::campaigns::delete_campaign),
        )
        .layer(tenant_layer());

    let quote_routes = Router::new()
        .route(
            "/",
            post(handlers::quotes::create_quote).get(handlers::quotes::list_quotes),
        )
        .route("/{id}", get(handlers::quotes::get_quote))
        .route("/{id}/status", patch(handlers::quotes::set_quote_status))
        .route("/{id}/accept", post(handlers::quotes::accept_quote))
        .layer(tenant_layer());

    let admin_routes = Router::new()
        .route("/dashboard", get(handlers::dashboard::get_summary))
        // Jobs
        .route("/jobs", get(handlers::jobs::list_jobs))
        .route("/jobs/board", get(handlers::jobs::get_board))
        .route(
            "/jobs/{id}",
            get(handlers::jobs::get_job).patch(handlers::jobs::update_schedule),
        )
        .route("/jobs/{id}/history", get(handlers::jobs::get_history))
        .route("/jobs/{id}/status", patch(handlers::jobs::update_status))
        .route("/jobs/{id}/assign", post(handlers::jobs::assign_job))
        .route("/jobs/{id}/checklist", get(handlers::checklist::get_checklist))
        .route("/jobs/{id}/checklist/{item_key}", put(handlers::checklist::set_item))
        .route(
            "/jobs/{id}/documents/{kind}",
            get(handlers::documents::generate_document),
        )
        .route(
            "/jobs/{id}/material-order",
            post(handlers::materials::create_material_order).get(handlers::materials::get_material_order),
        )
        // Materials
        .route("/materials", get(handlers::materials::list_material_orders))
        .route("/materials/{id}/status", patch(handlers::materials::update_material_status))
        // Crews
        .route(
            "/electricians",
            post(handlers::crews::create_electrician).get(handlers::crews::list_electricians),
        )
        .route(
            "/teams",
            post(handlers::crews::create_team).get(handlers::crews::list_teams),
        )
        .route(
            "/subcontractors",
            post(handlers::crews::create_subcontractor).get(handlers::crews::list_subcontractors),
        )
        // Leave
        .route(
            "/leave",
            get(handlers::leave::list_leave).post(handlers::leave::create_leave),
        )
        .route("/leave/{id}", patch(handlers::leave::decide_leave))
        // Website services
        .route(
            "/services",
            get(handlers::website::list_services).post(handlers::website::create_service),
        )
        .route("/services/{id}", patch(handlers::website::update_service))
        .layer(tenant_layer());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/public", public_routes)
        .nest("/api/calculators", calculator_routes)
        .nest("/api/subcontractor", subcontractor_routes)
        .nest("/api/portal", portal_routes)
        .nest("/api/users", user_routes)
        .nest("/api/tenants", tenancy_routes)
        .nest("/api/tenants", member_routes)
        .nest("/api/settings", settings_routes)
        .nest("/api/crm", crm_routes)
        .nest("/api/quotes", quote_routes)
        .nest("/api/admin", admin_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    // None of the paths below reach the database.
    fn test_app() -> Router {
        let config = AppConfig {
            database_url: "postgres://localhost/unused".into(),
            jwt_secret: "test-secret".into(),
            bind_addr: "127.0.0.1:0".into(),
            db_max_connections: 1,
            fonts_dir: "./fonts".into(),
            public_base_url: "http://localhost:3000".into(),
        };
        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        app(AppState::from_pool(pool, config))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn voltage_rise_body(cable_size: f64, cable_length: f64) -> Value {
        json!({
            "voltage": 230.0,
            "current": 20.0,
            "cableLength": cable_length,
            "cableSize": cable_size,
            "powerFactor": 1.0,
            "phaseType": "SINGLE"
        })
    }

    #[tokio::test]
    async fn health_check_responds() {
        let response = test_app()
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn voltage_rise_is_public() {
        let response = test_app()
            .oneshot(post_json("/api/calculators/voltage-rise", voltage_rise_body(2.5, 50.0)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["compliant"], json!(false));
        assert_eq!(body["recommendedSize"].as_f64(), Some(10.0));
    }

    #[tokio::test]
    async fn unknown_cable_size_is_a_bad_request() {
        let response = test_app()
            .oneshot(post_json("/api/calculators/voltage-rise", voltage_rise_body(3.0, 20.0)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn report_downloads_as_text() {
        let response = test_app()
            .oneshot(post_json("/api/calculators/voltage-rise/report", voltage_rise_body(16.0, 20.0)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap();
        assert!(disposition.starts_with("attachment; filename=\"VRC-Report-"));
        assert!(disposition.ends_with(".txt\""));

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("COMPLIANT ✓"));
    }

    #[tokio::test]
    async fn deposit_calculator_splits_the_total() {
        let response = test_app()
            .oneshot(post_json(
                "/api/calculators/deposit",
                json!({ "totalCost": 10000, "depositType": "PERCENTAGE", "percentage": 30 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["depositAmount"].as_f64(), Some(3000.0));
        assert_eq!(body["balance"].as_f64(), Some(7000.0));
    }

    #[tokio::test]
    async fn deposit_calculator_refuses_bad_amounts() {
        for body in [
            json!({ "totalCost": -100, "depositType": "PERCENTAGE", "percentage": 30 }),
            json!({ "totalCost": 1000, "depositType": "FIXED", "fixedAmount": -50 }),
            json!({ "totalCost": 5000000000u64, "depositType": "PERCENTAGE", "percentage": 30 }),
        ] {
            let response = test_app()
                .oneshot(post_json("/api/calculators/deposit", body.clone()))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", body);
        }
    }

    #[tokio::test]
    async fn public_services_need_a_company_header() {
        let response = test_app()
            .oneshot(Request::builder().uri("/api/public/services").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn admin_routes_need_a_token() {
        for uri in ["/api/admin/jobs", "/api/admin/materials", "/api/admin/services"] {
            let response = test_app()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        }
    }

    #[tokio::test]
    async fn forged_tokens_are_rejected() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/users/me")
                    .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn public_lead_needs_a_company_header() {
        let response = test_app()
            .oneshot(post_json("/api/public/leads", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let response = test_app()
            .oneshot(Request::builder().uri("/api-docs/openapi.json").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert!(body["paths"]["/api/admin/jobs/{id}/assign"].is_object());
        assert!(body["paths"]["/api/admin/jobs/{id}/material-order"].is_object());
        assert!(body["components"]["securitySchemes"]["api_jwt"].is_object());
    }
}
