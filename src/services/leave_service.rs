// src/services/leave_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::LeaveRepository,
    models::leave::{CreateLeaveRequest, DecideLeaveRequest, LeaveRequestView, LeaveStatus},
};

#[derive(Clone)]
pub struct LeaveService {
    leave_repo: LeaveRepository,
}

impl LeaveService {
    pub fn new(leave_repo: LeaveRepository) -> Self {
        Self { leave_repo }
    }

    pub async fn list(
        &self,
        tenant_id: Uuid,
        status: Option<LeaveStatus>,
    ) -> Result<Vec<LeaveRequestView>, AppError> {
        let requests = self.leave_repo.list(self.leave_repo.pool(), tenant_id, status).await?;
        Ok(requests.into_iter().map(LeaveRequestView::from).collect())
    }

    pub async fn create(
        &self,
        tenant_id: Uuid,
        req: &CreateLeaveRequest,
    ) -> Result<LeaveRequestView, AppError> {
        let request = self.leave_repo.create(self.leave_repo.pool(), tenant_id, req).await?;
        Ok(request.into())
    }

    /// Approves or rejects a pending request. Decided requests are final.
    pub async fn decide(
        &self,
        tenant_id: Uuid,
        leave_id: Uuid,
        req: &DecideLeaveRequest,
    ) -> Result<LeaveRequestView, AppError> {
        if req.status == LeaveStatus::Pending {
            return Err(AppError::InvalidInput("A decision must be APPROVED or REJECTED".into()));
        }

        let pool = self.leave_repo.pool();
        let current = self
            .leave_repo
            .find(pool, tenant_id, leave_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Leave request".into()))?;

        if !current.status.can_become(req.status) {
            return Err(AppError::Conflict(format!(
                "Leave request was already {:?}",
                current.status
            )));
        }

        // The pending check is repeated in SQL; a concurrent decision loses here.
        let decided = self
            .leave_repo
            .decide(pool, tenant_id, leave_id, req.status, req.review_notes.as_deref())
            .await?
            .ok_or_else(|| AppError::Conflict("Leave request was decided concurrently".into()))?;

        tracing::info!(leave_id = %leave_id, status = ?decided.status, "Leave request decided");
        Ok(decided.into())
    }
}
