// src/services/material_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    db::{material_repo::NewMaterialOrder, JobRepository, MaterialRepository},
    models::materials::{
        generate_material_list, order_totals, CreateMaterialOrderRequest, MaterialOrder,
        MaterialOrderListEntry, MaterialOrderStatus, MaterialStatusRequest,
    },
};

#[derive(Clone)]
pub struct MaterialService {
    material_repo: MaterialRepository,
    job_repo: JobRepository,
    pool: PgPool,
}

impl MaterialService {
    pub fn new(material_repo: MaterialRepository, job_repo: JobRepository, pool: PgPool) -> Self {
        Self { material_repo, job_repo, pool }
    }

    /// Opens a draft order with the bill of materials for the job's system.
    pub async fn create_for_job(
        &self,
        tenant_id: Uuid,
        job_id: Uuid,
        req: &CreateMaterialOrderRequest,
    ) -> Result<MaterialOrder, AppError> {
        let subtotal = req.subtotal.unwrap_or(Decimal::ZERO);
        if subtotal.is_sign_negative() {
            return Err(AppError::InvalidInput("subtotal cannot be negative".into()));
        }

        let job = self
            .job_repo
            .find_job(&self.pool, tenant_id, job_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Job".into()))?;
        if job.status.is_terminal() {
            return Err(AppError::Conflict(format!(
                "Job {} is {} and needs no materials",
                job.job_number,
                job.status.label()
            )));
        }

        let items = generate_material_list(job.system_size, job.panel_count, job.battery_capacity);
        let (gst, total) = order_totals(subtotal)?;
        let new_order = NewMaterialOrder {
            job_id,
            supplier_name: req.supplier_name.as_deref().map(str::trim),
            items: &items,
            subtotal,
            gst,
            total,
            expected_delivery: req.expected_delivery,
            notes: req.notes.as_deref(),
        };

        let order = self
            .material_repo
            .create(&self.pool, tenant_id, &new_order)
            .await
            .map_err(|e| {
                map_unique_violation(e, || format!("Job {} already has an open material order", job.job_number))
            })?;

        tracing::info!(job_id = %job_id, order_id = %order.id, lines = items.len(), "Material order drafted");
        Ok(order)
    }

    pub async fn get_for_job(&self, tenant_id: Uuid, job_id: Uuid) -> Result<MaterialOrder, AppError> {
        self.material_repo
            .find_for_job(&self.pool, tenant_id, job_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Material order".into()))
    }

    pub async fn list(
        &self,
        tenant_id: Uuid,
        status: Option<MaterialOrderStatus>,
    ) -> Result<Vec<MaterialOrderListEntry>, AppError> {
        self.material_repo.list(&self.pool, tenant_id, status).await
    }

    /// Advances the order. Sending it and taking delivery move the job along
    /// when the job is at the matching stage.
    pub async fn update_status(
        &self,
        tenant_id: Uuid,
        order_id: Uuid,
        req: &MaterialStatusRequest,
        actor: Uuid,
    ) -> Result<MaterialOrder, AppError> {
        let next = req.status;
        let mut tx = self.pool.begin().await?;

        let order = self
            .material_repo
            .find_for_update(&mut *tx, tenant_id, order_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Material order".into()))?;

        if !order.status.can_become(next) {
            return Err(AppError::Conflict(format!(
                "A material order cannot move from {:?} to {:?}.",
                order.status, next
            )));
        }

        let updated = self
            .material_repo
            .set_status(&mut *tx, tenant_id, order_id, next, req.expected_delivery)
            .await?;

        if let Some(target) = next.job_milestone() {
            let job = self
                .job_repo
                .find_job_for_update(&mut *tx, tenant_id, order.job_id)
                .await?
                .ok_or_else(|| AppError::ResourceNotFound("Job".into()))?;

            if job.status.can_transition_to(target) {
                self.job_repo.set_status(&mut *tx, tenant_id, job.id, target).await?;
                self.job_repo
                    .record_status_change(&mut *tx, tenant_id, job.id, Some(job.status), target, Some(actor))
                    .await?;
                tracing::info!(
                    job_id = %job.id,
                    from = job.status.code(),
                    to = target.code(),
                    "Job advanced by material order"
                );
            }
        }

        tx.commit().await?;

        tracing::info!(order_id = %order_id, from = ?order.status, to = ?next, "Material order status changed");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;
    use std::str::FromStr;

    #[tokio::test]
    async fn negative_subtotals_are_refused_before_touching_the_database() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let service = MaterialService::new(
            MaterialRepository::new(pool.clone()),
            JobRepository::new(pool.clone()),
            pool,
        );
        let req = CreateMaterialOrderRequest {
            subtotal: Some(Decimal::from_str("-1.00").unwrap()),
            ..Default::default()
        };

        let err = service
            .create_for_job(Uuid::new_v4(), Uuid::new_v4(), &req)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
