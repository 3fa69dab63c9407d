//! Audit log repository.
//!
//! The audit trail is append-only: this repository can insert and read
//! rows, never update or delete them. Status-change audits ride inside
//! the surrounding database transaction; standalone audits are
//! best-effort and never fail the operation they describe.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use isotrack_core::audit::{AuditAction, AuditEntry};
use isotrack_core::workflow::EntityKind;
use isotrack_shared::error::AppResult;

use crate::entities::audit_logs;
use crate::repositories::map_db_err;

/// Filter for listing audit rows. All fields are optional and combine
/// with AND.
#[derive(Debug, Clone)]
pub struct AuditQuery {
    /// Restrict to one entity type.
    pub entity_type: Option<EntityKind>,
    /// Restrict to one entity instance.
    pub entity_id: Option<Uuid>,
    /// Restrict to one actor.
    pub actor_id: Option<Uuid>,
    /// Restrict to one action kind.
    pub action: Option<AuditAction>,
    /// Page size.
    pub limit: u64,
    /// Page offset.
    pub offset: u64,
}

impl Default for AuditQuery {
    fn default() -> Self {
        Self {
            entity_type: None,
            entity_id: None,
            actor_id: None,
            action: None,
            limit: 50,
            offset: 0,
        }
    }
}

/// Repository for the append-only audit trail.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    db: DatabaseConnection,
}

impl AuditRepository {
    /// Creates a new audit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an audit entry, best-effort.
    ///
    /// A failed audit insert is logged and swallowed: the mutation it
    /// describes has already succeeded and must not be rolled back.
    pub async fn record(&self, entry: AuditEntry) {
        if let Err(err) = Self::insert(&self.db, entry).await {
            tracing::warn!(error = %err, "failed to write audit log entry");
        }
    }

    /// Records an audit entry inside an open transaction.
    ///
    /// Used for status changes, where the audit row must commit or roll
    /// back together with the entity write.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn record_in_txn<C: ConnectionTrait>(conn: &C, entry: AuditEntry) -> AppResult<()> {
        Self::insert(conn, entry).await.map_err(map_db_err)
    }

    async fn insert<C: ConnectionTrait>(conn: &C, entry: AuditEntry) -> Result<(), DbErr> {
        audit_logs::ActiveModel {
            id: Set(Uuid::new_v4()),
            actor_id: Set(entry.actor_id),
            action: Set(entry.action.into()),
            entity_type: Set(entry.entity_type.into()),
            entity_id: Set(entry.entity_id),
            old_value: Set(entry.old_value),
            new_value: Set(entry.new_value),
            ip_address: Set(entry.ip_address),
            user_agent: Set(entry.user_agent),
            created_at: Set(Utc::now().into()),
        }
        .insert(conn)
        .await?;

        Ok(())
    }

    /// Lists audit rows matching the filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self, query: AuditQuery) -> AppResult<Vec<audit_logs::Model>> {
        let mut select = audit_logs::Entity::find();

        if let Some(entity_type) = query.entity_type {
            let db_kind: crate::entities::sea_orm_active_enums::EntityKind = entity_type.into();
            select = select.filter(audit_logs::Column::EntityType.eq(db_kind));
        }
        if let Some(entity_id) = query.entity_id {
            select = select.filter(audit_logs::Column::EntityId.eq(entity_id));
        }
        if let Some(actor_id) = query.actor_id {
            select = select.filter(audit_logs::Column::ActorId.eq(actor_id));
        }
        if let Some(action) = query.action {
            let db_action: crate::entities::sea_orm_active_enums::AuditAction = action.into();
            select = select.filter(audit_logs::Column::Action.eq(db_action));
        }

        select
            .order_by_desc(audit_logs::Column::CreatedAt)
            .limit(query.limit)
            .offset(query.offset)
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }
}
