//! Workflow definition repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use isotrack_core::UserRole;
use isotrack_core::status::{
    BatchStatus, InvoiceStatus, OrderStatus, PaymentRequestStatus, ShipmentStatus, StatusFlow,
    TicketStatus,
};
use isotrack_core::workflow::{EntityKind, WorkflowRunner};
use isotrack_shared::error::{AppError, AppResult};

use crate::entities::{approval_steps, workflow_definitions};
use crate::repositories::{map_db_err, map_workflow_err};

/// One step in a new workflow definition.
#[derive(Debug, Clone)]
pub struct NewStep {
    /// 1-based position; orders must be contiguous.
    pub step_order: i16,
    /// Human label, e.g. "Sales review".
    pub label: String,
    /// The single role permitted to act on this step.
    pub approver_role: UserRole,
    /// Stored for reporting only.
    pub timeout_hours: Option<i32>,
}

/// Input for creating a workflow definition.
#[derive(Debug, Clone)]
pub struct NewWorkflow {
    /// Display name.
    pub name: String,
    /// Entity type this workflow governs.
    pub entity_type: EntityKind,
    /// Status that auto-triggers a request, if any.
    pub trigger_status: Option<String>,
    /// Whether every step must be approved.
    pub requires_all_steps: bool,
    /// The ordered approval steps.
    pub steps: Vec<NewStep>,
}

/// Repository for workflow definitions and their steps.
#[derive(Debug, Clone)]
pub struct WorkflowDefinitionRepository {
    db: DatabaseConnection,
}

impl WorkflowDefinitionRepository {
    /// Creates a new workflow definition repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a workflow definition with its steps.
    ///
    /// Step orders must be unique and contiguous from 1. A trigger
    /// status, when given, must be a valid status string for the
    /// governed entity type.
    ///
    /// # Errors
    ///
    /// * `Validation` for bad step orders or an unknown trigger status.
    /// * `DuplicateEntry` if another active workflow already triggers
    ///   on the same `(entity type, status)` pair.
    pub async fn create(
        &self,
        input: NewWorkflow,
    ) -> AppResult<(workflow_definitions::Model, Vec<approval_steps::Model>)> {
        let orders: Vec<i16> = input.steps.iter().map(|s| s.step_order).collect();
        WorkflowRunner::validate_step_orders(&orders).map_err(map_workflow_err)?;

        if let Some(ref trigger) = input.trigger_status
            && !trigger_status_is_valid(input.entity_type, trigger)
        {
            return Err(AppError::Validation(format!(
                "'{trigger}' is not a valid {} status",
                input.entity_type
            )));
        }

        let now = Utc::now().into();
        let workflow_id = Uuid::new_v4();

        let txn = self.db.begin().await.map_err(map_db_err)?;

        let workflow = workflow_definitions::ActiveModel {
            id: Set(workflow_id),
            name: Set(input.name),
            entity_type: Set(input.entity_type.into()),
            trigger_status: Set(input.trigger_status),
            requires_all_steps: Set(input.requires_all_steps),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        let mut steps = Vec::with_capacity(input.steps.len());
        for step in input.steps {
            let inserted = approval_steps::ActiveModel {
                id: Set(Uuid::new_v4()),
                workflow_id: Set(workflow_id),
                step_order: Set(step.step_order),
                label: Set(step.label),
                approver_role: Set(step.approver_role.into()),
                timeout_hours: Set(step.timeout_hours),
                created_at: Set(now),
            }
            .insert(&txn)
            .await
            .map_err(map_db_err)?;
            steps.push(inserted);
        }

        txn.commit().await.map_err(map_db_err)?;

        Ok((workflow, steps))
    }

    /// Finds a workflow definition with its steps, ordered by step
    /// order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such workflow exists.
    pub async fn find_with_steps(
        &self,
        id: Uuid,
    ) -> AppResult<(workflow_definitions::Model, Vec<approval_steps::Model>)> {
        let workflow = workflow_definitions::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("workflow {id}")))?;

        let steps = approval_steps::Entity::find()
            .filter(approval_steps::Column::WorkflowId.eq(id))
            .order_by_asc(approval_steps::Column::StepOrder)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok((workflow, steps))
    }

    /// Lists workflow definitions, optionally filtered by entity type.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        entity_type: Option<EntityKind>,
    ) -> AppResult<Vec<workflow_definitions::Model>> {
        let mut select = workflow_definitions::Entity::find();
        if let Some(kind) = entity_type {
            let db_kind: crate::entities::sea_orm_active_enums::EntityKind = kind.into();
            select = select.filter(workflow_definitions::Column::EntityType.eq(db_kind));
        }
        select
            .order_by_asc(workflow_definitions::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }

    /// Deactivates a workflow so it no longer triggers new requests.
    /// In-flight requests are unaffected.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the workflow does not exist.
    pub async fn deactivate(&self, id: Uuid) -> AppResult<workflow_definitions::Model> {
        let workflow = workflow_definitions::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("workflow {id}")))?;

        let mut active: workflow_definitions::ActiveModel = workflow.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await.map_err(map_db_err)
    }
}

/// Whether `status` is a valid wire-level status string for the entity
/// type. Customers have no lifecycle, so they can never auto-trigger.
fn trigger_status_is_valid(kind: EntityKind, status: &str) -> bool {
    match kind {
        EntityKind::Order => OrderStatus::parse(status).is_some(),
        EntityKind::Batch => BatchStatus::parse(status).is_some(),
        EntityKind::Shipment => ShipmentStatus::parse(status).is_some(),
        EntityKind::Invoice => InvoiceStatus::parse(status).is_some(),
        EntityKind::PaymentRequest => PaymentRequestStatus::parse(status).is_some(),
        EntityKind::SupportTicket => TicketStatus::parse(status).is_some(),
        EntityKind::Customer | EntityKind::Product | EntityKind::User => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_status_validation() {
        assert!(trigger_status_is_valid(EntityKind::Order, "SUBMITTED"));
        assert!(trigger_status_is_valid(EntityKind::Batch, "QC_PASSED"));
        assert!(!trigger_status_is_valid(EntityKind::Order, "submitted"));
        assert!(!trigger_status_is_valid(EntityKind::Order, "QC_PASSED"));
        assert!(!trigger_status_is_valid(EntityKind::Customer, "ACTIVE"));
    }
}
