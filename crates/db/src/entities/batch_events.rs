//! `SeaORM` Entity for the batch_events table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::BatchStatus;

/// Append-only transition history for production batches.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "batch_events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub batch_id: Uuid,
    pub from_status: Option<BatchStatus>,
    pub to_status: BatchStatus,
    pub actor_id: Option<Uuid>,
    pub note: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::production_batches::Entity",
        from = "Column::BatchId",
        to = "super::production_batches::Column::Id"
    )]
    ProductionBatches,
}

impl Related<super::production_batches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductionBatches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
