//! `SeaORM` Entity for the approval_requests table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{ApprovalRequestStatus, EntityKind};

/// One in-flight instance of a workflow applied to one entity record.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "approval_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub workflow_id: Uuid,
    pub entity_type: EntityKind,
    pub entity_id: Uuid,
    pub current_step_order: i16,
    pub status: ApprovalRequestStatus,
    pub priority: i16,
    pub due_date: Option<DateTimeWithTimeZone>,
    pub completed_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::workflow_definitions::Entity",
        from = "Column::WorkflowId",
        to = "super::workflow_definitions::Column::Id"
    )]
    WorkflowDefinitions,
    #[sea_orm(has_many = "super::approval_actions::Entity")]
    ApprovalActions,
}

impl Related<super::workflow_definitions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkflowDefinitions.def()
    }
}

impl Related<super::approval_actions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ApprovalActions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
