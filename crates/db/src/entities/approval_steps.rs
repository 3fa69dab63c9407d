//! `SeaORM` Entity for the approval_steps table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::UserRole;

/// One step in a workflow definition. `(workflow_id, step_order)` is
/// unique; orders are contiguous starting at 1.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "approval_steps")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub workflow_id: Uuid,
    pub step_order: i16,
    pub label: String,
    pub approver_role: UserRole,
    /// Stored for reporting only; nothing expires requests automatically.
    pub timeout_hours: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::workflow_definitions::Entity",
        from = "Column::WorkflowId",
        to = "super::workflow_definitions::Column::Id"
    )]
    WorkflowDefinitions,
}

impl Related<super::workflow_definitions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkflowDefinitions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
