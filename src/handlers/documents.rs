// src/handlers/documents.rs

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        rbac::{PermDocumentsRead, RequirePermission},
        tenancy::TenantContext,
    },
    models::documents::{DocumentKind, TestReadings},
};

// GET /api/admin/jobs/{id}/documents/{kind}
#[utoipa::path(
    get,
    path = "/api/admin/jobs/{id}/documents/{kind}",
    tag = "Documents",
    responses(
        (status = 200, description = "PDF download", content_type = "application/pdf", body = Vec<u8>),
        (status = 400, description = "Unknown document kind"),
        (status = 404, description = "Job not found")
    ),
    params(
        ("id" = Uuid, Path, description = "Job id"),
        ("kind" = DocumentKind, Path, description = "commissioning-report, customer-declaration or single-line-diagram"),
        TestReadings,
        ("x-tenant-id" = Uuid, Header, description = "Company id")
    ),
    security(("api_jwt" = []))
)]
pub async fn generate_document(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _perm: RequirePermission<PermDocumentsRead>,
    Path((job_id, kind)): Path<(Uuid, DocumentKind)>,
    Query(readings): Query<TestReadings>,
) -> Result<impl IntoResponse, ApiError> {
    let document = app_state
        .document_service
        .generate(tenant.tenant_id, job_id, kind, &readings)
        .await?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", document.file_name),
        ),
    ];
    Ok((headers, document.bytes))
}
