// src/handlers/portal.rs

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{common::error::ApiError, config::AppState, models::jobs::PortalJobView};

// GET /api/portal/jobs/{token}
#[utoipa::path(
    get,
    path = "/api/portal/jobs/{token}",
    tag = "Portal",
    responses(
        (status = 200, description = "Customer-facing progress of the installation", body = PortalJobView),
        (status = 404, description = "Unknown link")
    ),
    params(("token" = String, Path, description = "Portal token from the customer's link"))
)]
pub async fn get_portal_job(
    State(app_state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<PortalJobView>, ApiError> {
    Ok(Json(app_state.job_service.portal_view(&token).await?))
}
