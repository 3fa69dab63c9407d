//! Approval request repository.
//!
//! Requests are created automatically when an entity enters a status
//! an active workflow triggers on, and advance through the stateless
//! [`WorkflowRunner`]. Every decision appends an action row; nothing is
//! ever rewritten.

use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use isotrack_core::UserRole;
use isotrack_core::workflow::{
    Advancement, ApprovalDecision, EntityKind, RequestView, StepView, WorkflowError,
    WorkflowRunner,
};
use isotrack_shared::error::{AppError, AppResult};

use crate::entities::sea_orm_active_enums;
use crate::entities::{approval_actions, approval_requests, approval_steps, workflow_definitions};
use crate::repositories::{map_db_err, map_workflow_err};

/// Repository for approval requests and their actions.
#[derive(Debug, Clone)]
pub struct ApprovalRepository {
    db: DatabaseConnection,
}

impl ApprovalRepository {
    /// Creates a new approval repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a PENDING approval request if an active workflow
    /// triggers on the entity entering `status`.
    ///
    /// Runs inside the status-change transaction so the request commits
    /// or rolls back with the transition itself. Re-entering a trigger
    /// status raises a fresh request each time; requests are never
    /// deduplicated. The due date is the sum of the steps' timeout
    /// hours from now, or NULL when no step carries one.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn trigger_in_txn<C: ConnectionTrait>(
        conn: &C,
        entity_type: EntityKind,
        entity_id: Uuid,
        status: &str,
    ) -> AppResult<Option<approval_requests::Model>> {
        let db_kind: sea_orm_active_enums::EntityKind = entity_type.into();

        let Some(workflow) = workflow_definitions::Entity::find()
            .filter(workflow_definitions::Column::EntityType.eq(db_kind))
            .filter(workflow_definitions::Column::TriggerStatus.eq(status))
            .filter(workflow_definitions::Column::IsActive.eq(true))
            .one(conn)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        let steps = approval_steps::Entity::find()
            .filter(approval_steps::Column::WorkflowId.eq(workflow.id))
            .all(conn)
            .await
            .map_err(map_db_err)?;
        let total_timeout: i64 = steps
            .iter()
            .filter_map(|s| s.timeout_hours)
            .map(i64::from)
            .sum();
        let due_date: Option<sea_orm::prelude::DateTimeWithTimeZone> =
            (total_timeout > 0).then(|| (Utc::now() + Duration::hours(total_timeout)).into());

        let now = Utc::now().into();
        let request = approval_requests::ActiveModel {
            id: Set(Uuid::new_v4()),
            workflow_id: Set(workflow.id),
            entity_type: Set(entity_type.into()),
            entity_id: Set(entity_id),
            current_step_order: Set(1),
            status: Set(sea_orm_active_enums::ApprovalRequestStatus::Pending),
            priority: Set(0),
            due_date: Set(due_date),
            completed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await
        .map_err(map_db_err)?;

        tracing::info!(
            request_id = %request.id,
            workflow = %workflow.name,
            entity_id = %entity_id,
            "approval request triggered"
        );

        Ok(Some(request))
    }

    /// Applies one approver's decision to a pending request.
    ///
    /// Loads the request and its workflow's steps, lets the runner
    /// decide the outcome, then appends the action row and updates the
    /// request in one transaction.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the request or its workflow is gone.
    /// * `RequestNotPending` if the request is already terminal.
    /// * `StepMismatch` for an out-of-order or unknown step.
    /// * `Forbidden` if the actor's role may not act on the step.
    pub async fn act(
        &self,
        request_id: Uuid,
        step_id: Uuid,
        actor_id: Uuid,
        actor_role: UserRole,
        decision: ApprovalDecision,
        comment: Option<String>,
    ) -> AppResult<(approval_requests::Model, Advancement)> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let request = approval_requests::Entity::find_by_id(request_id)
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| map_workflow_err(WorkflowError::RequestNotFound(request_id)))?;

        let workflow = workflow_definitions::Entity::find_by_id(request.workflow_id)
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| map_workflow_err(WorkflowError::WorkflowNotFound(request.workflow_id)))?;

        let steps = approval_steps::Entity::find()
            .filter(approval_steps::Column::WorkflowId.eq(workflow.id))
            .order_by_asc(approval_steps::Column::StepOrder)
            .all(&txn)
            .await
            .map_err(map_db_err)?;

        let step_views: Vec<StepView> = steps
            .iter()
            .map(|s| StepView {
                id: s.id,
                step_order: s.step_order,
                label: s.label.clone(),
                approver_role: s.approver_role.clone().into(),
                timeout_hours: s.timeout_hours,
            })
            .collect();

        let request_view = RequestView {
            id: request.id,
            current_step_order: request.current_step_order,
            status: request.status.clone().into(),
            requires_all_steps: workflow.requires_all_steps,
        };

        let advancement =
            WorkflowRunner::advance(&request_view, &step_views, step_id, actor_role, decision)
                .map_err(map_workflow_err)?;

        let now = Utc::now().into();

        approval_actions::ActiveModel {
            id: Set(Uuid::new_v4()),
            request_id: Set(request_id),
            step_id: Set(step_id),
            actor_id: Set(actor_id),
            decision: Set(decision.into()),
            comment: Set(comment),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        let mut active: approval_requests::ActiveModel = request.into();
        match advancement {
            Advancement::Advanced { next_step_order } => {
                active.current_step_order = Set(next_step_order);
            }
            Advancement::Approved => {
                active.status = Set(sea_orm_active_enums::ApprovalRequestStatus::Approved);
                active.completed_at = Set(Some(now));
            }
            Advancement::Rejected => {
                active.status = Set(sea_orm_active_enums::ApprovalRequestStatus::Rejected);
                active.completed_at = Set(Some(now));
            }
        }
        active.updated_at = Set(now);
        let updated = active.update(&txn).await.map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;

        Ok((updated, advancement))
    }

    /// Finds a request with its actions, oldest action first.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such request exists.
    pub async fn find_with_actions(
        &self,
        id: Uuid,
    ) -> AppResult<(approval_requests::Model, Vec<approval_actions::Model>)> {
        let request = approval_requests::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("approval request {id}")))?;

        let actions = approval_actions::Entity::find()
            .filter(approval_actions::Column::RequestId.eq(id))
            .order_by_asc(approval_actions::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok((request, actions))
    }

    /// Lists pending requests whose current step the given role can act
    /// on. Admins see every pending request.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn list_pending_for_role(
        &self,
        role: UserRole,
    ) -> AppResult<Vec<(approval_requests::Model, approval_steps::Model)>> {
        let pending = approval_requests::Entity::find()
            .filter(
                approval_requests::Column::Status
                    .eq(sea_orm_active_enums::ApprovalRequestStatus::Pending),
            )
            .order_by_asc(approval_requests::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let mut actionable = Vec::new();
        for request in pending {
            let step = approval_steps::Entity::find()
                .filter(approval_steps::Column::WorkflowId.eq(request.workflow_id))
                .filter(approval_steps::Column::StepOrder.eq(request.current_step_order))
                .one(&self.db)
                .await
                .map_err(map_db_err)?;

            if let Some(step) = step {
                let step_role: UserRole = step.approver_role.clone().into();
                if role.satisfies(step_role) {
                    actionable.push((request, step));
                }
            }
        }

        Ok(actionable)
    }

    /// Lists requests raised against one entity, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_for_entity(
        &self,
        entity_type: EntityKind,
        entity_id: Uuid,
    ) -> AppResult<Vec<approval_requests::Model>> {
        let db_kind: sea_orm_active_enums::EntityKind = entity_type.into();
        approval_requests::Entity::find()
            .filter(approval_requests::Column::EntityType.eq(db_kind))
            .filter(approval_requests::Column::EntityId.eq(entity_id))
            .order_by_desc(approval_requests::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }
}
