// src/handlers/checklist.rs

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermChecklistWrite, PermJobsRead, RequirePermission},
        tenancy::TenantContext,
    },
    models::checklist::{ChecklistEntry, JobChecklist, UpdateChecklistItemRequest},
};

// GET /api/admin/jobs/{id}/checklist
#[utoipa::path(
    get,
    path = "/api/admin/jobs/{id}/checklist",
    tag = "Checklist",
    responses(
        (status = 200, description = "Catalogue grouped by phase with progress", body = JobChecklist),
        (status = 404, description = "Job not found")
    ),
    params(
        ("id" = Uuid, Path, description = "Job id"),
        ("x-tenant-id" = Uuid, Header, description = "Company id")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_checklist(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermJobsRead>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobChecklist>, ApiError> {
    let checklist = app_state
        .checklist_service
        .get_checklist(tenant.tenant_id, job_id)
        .await?;
    Ok(Json(checklist))
}

// PUT /api/admin/jobs/{id}/checklist/{itemKey}
#[utoipa::path(
    put,
    path = "/api/admin/jobs/{id}/checklist/{itemKey}",
    tag = "Checklist",
    request_body = UpdateChecklistItemRequest,
    responses(
        (status = 200, description = "Item saved", body = ChecklistEntry),
        (status = 404, description = "Job or catalogue item not found")
    ),
    params(
        ("id" = Uuid, Path, description = "Job id"),
        ("itemKey" = String, Path, description = "Catalogue key, e.g. panels_mounted"),
        ("x-tenant-id" = Uuid, Header, description = "Company id")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_item(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermChecklistWrite>,
    user: AuthenticatedUser,
    Path((job_id, item_key)): Path<(Uuid, String)>,
    Json(payload): Json<UpdateChecklistItemRequest>,
) -> Result<Json<ChecklistEntry>, ApiError> {
    let entry = app_state
        .checklist_service
        .set_item(tenant.tenant_id, job_id, &item_key, payload.is_completed, user.id())
        .await?;
    Ok(Json(entry))
}
