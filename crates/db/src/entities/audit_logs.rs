//! `SeaORM` Entity for the audit_logs table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{AuditAction, EntityKind};

/// Append-only audit trail. Rows are never updated or deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Null for system-initiated mutations.
    pub actor_id: Option<Uuid>,
    pub action: AuditAction,
    pub entity_type: EntityKind,
    pub entity_id: Uuid,
    pub old_value: Option<Json>,
    pub new_value: Json,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
