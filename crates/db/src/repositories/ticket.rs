//! Support ticket repository.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde_json::json;
use uuid::Uuid;

use isotrack_core::UserRole;
use isotrack_core::audit::{AuditAction, AuditEntry};
use isotrack_core::status::{StatusFlow, TicketStatus, check_transition};
use isotrack_core::workflow::EntityKind;
use isotrack_shared::error::{AppError, AppResult};

use crate::entities::sea_orm_active_enums;
use crate::entities::support_tickets;
use crate::repositories::{
    ApprovalRepository, AuditRepository, RequestMeta, entity_number, map_db_err,
    map_transition_err, snapshot,
};

/// Input for opening a support ticket.
#[derive(Debug, Clone)]
pub struct NewTicket {
    /// Customer raising the issue.
    pub customer_id: Uuid,
    /// Related order, if any.
    pub order_id: Option<Uuid>,
    /// Short subject line.
    pub subject: String,
    /// Full issue description.
    pub description: String,
}

/// Repository for support tickets.
#[derive(Debug, Clone)]
pub struct TicketRepository {
    db: DatabaseConnection,
}

impl TicketRepository {
    /// Creates a new ticket repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Opens a ticket in OPEN status.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the customer (or referenced order) does
    /// not exist.
    pub async fn create(
        &self,
        input: NewTicket,
        created_by: Uuid,
        meta: RequestMeta,
    ) -> AppResult<support_tickets::Model> {
        crate::entities::customers::Entity::find_by_id(input.customer_id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("customer {}", input.customer_id)))?;

        if let Some(order_id) = input.order_id {
            crate::entities::orders::Entity::find_by_id(order_id)
                .one(&self.db)
                .await
                .map_err(map_db_err)?
                .ok_or_else(|| AppError::NotFound(format!("order {order_id}")))?;
        }

        let now = Utc::now().into();
        let id = Uuid::new_v4();

        let txn = self.db.begin().await.map_err(map_db_err)?;

        let ticket = support_tickets::ActiveModel {
            id: Set(id),
            ticket_number: Set(entity_number("TKT")),
            customer_id: Set(input.customer_id),
            order_id: Set(input.order_id),
            subject: Set(input.subject),
            description: Set(input.description),
            status: Set(sea_orm_active_enums::TicketStatus::Open),
            assigned_to: Set(None),
            row_version: Set(0),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        AuditRepository::record_in_txn(
            &txn,
            AuditEntry::created(
                Some(created_by),
                EntityKind::SupportTicket,
                id,
                snapshot(&ticket),
            )
            .with_request_meta(meta.ip_address, meta.user_agent),
        )
        .await?;

        txn.commit().await.map_err(map_db_err)?;

        Ok(ticket)
    }

    /// Moves a ticket to a new status.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the ticket does not exist.
    /// * `InvalidTransition` if the `(from, to)` pair is not allowed.
    /// * `Conflict` if the row changed since it was read.
    pub async fn transition_status(
        &self,
        id: Uuid,
        to: TicketStatus,
        actor_id: Uuid,
        actor_role: UserRole,
        meta: RequestMeta,
    ) -> AppResult<support_tickets::Model> {
        let ticket = self.find_by_id(id).await?;
        let from: TicketStatus = ticket.status.clone().into();
        check_transition(from, to, actor_role).map_err(map_transition_err)?;

        let to_db: sea_orm_active_enums::TicketStatus = to.into();
        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();

        let txn = self.db.begin().await.map_err(map_db_err)?;

        let result = support_tickets::Entity::update_many()
            .col_expr(support_tickets::Column::Status, to_db.as_enum())
            .col_expr(
                support_tickets::Column::RowVersion,
                Expr::value(ticket.row_version + 1),
            )
            .col_expr(support_tickets::Column::UpdatedAt, Expr::value(now))
            .filter(support_tickets::Column::Id.eq(id))
            .filter(support_tickets::Column::RowVersion.eq(ticket.row_version))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(AppError::Conflict(format!(
                "ticket {id} was modified concurrently"
            )));
        }

        AuditRepository::record_in_txn(
            &txn,
            AuditEntry::status_changed(
                Some(actor_id),
                EntityKind::SupportTicket,
                id,
                json!({ "status": from.as_str() }),
                json!({ "status": to.as_str() }),
            )
            .with_request_meta(meta.ip_address, meta.user_agent),
        )
        .await?;

        ApprovalRepository::trigger_in_txn(&txn, EntityKind::SupportTicket, id, to.as_str())
            .await?;

        txn.commit().await.map_err(map_db_err)?;

        self.find_by_id(id).await
    }

    /// Assigns a ticket to a user.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the ticket or assignee does not exist.
    pub async fn assign(
        &self,
        id: Uuid,
        assignee_id: Uuid,
        actor_id: Uuid,
        meta: RequestMeta,
    ) -> AppResult<support_tickets::Model> {
        crate::entities::users::Entity::find_by_id(assignee_id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("user {assignee_id}")))?;

        let ticket = self.find_by_id(id).await?;
        let old = snapshot(&ticket);

        let mut active: support_tickets::ActiveModel = ticket.into();
        active.assigned_to = Set(Some(assignee_id));
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&self.db).await.map_err(map_db_err)?;

        AuditRepository::new(self.db.clone())
            .record(AuditEntry {
                actor_id: Some(actor_id),
                action: AuditAction::Update,
                entity_type: EntityKind::SupportTicket,
                entity_id: id,
                old_value: Some(old),
                new_value: json!({ "assignedTo": assignee_id }),
                ip_address: meta.ip_address,
                user_agent: meta.user_agent,
            })
            .await;

        Ok(updated)
    }

    /// Finds a ticket by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such ticket exists.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<support_tickets::Model> {
        support_tickets::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("ticket {id}")))
    }

    /// Lists tickets, optionally filtered by customer and status.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        customer_id: Option<Uuid>,
        status: Option<TicketStatus>,
    ) -> AppResult<Vec<support_tickets::Model>> {
        let mut select = support_tickets::Entity::find();
        if let Some(customer_id) = customer_id {
            select = select.filter(support_tickets::Column::CustomerId.eq(customer_id));
        }
        if let Some(status) = status {
            let db_status: sea_orm_active_enums::TicketStatus = status.into();
            select = select.filter(support_tickets::Column::Status.eq(db_status));
        }
        select
            .order_by_desc(support_tickets::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }
}
