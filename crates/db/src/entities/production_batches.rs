//! `SeaORM` Entity for the production_batches table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::BatchStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "production_batches")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub batch_number: String,
    pub product_id: Uuid,
    /// The order this batch is dedicated to, if any.
    pub order_id: Option<Uuid>,
    pub production_date: Date,
    /// Activity produced at end of synthesis, in MBq.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub activity_mbq: Decimal,
    pub status: BatchStatus,
    pub synthesis_started_at: Option<DateTimeWithTimeZone>,
    pub qc_completed_at: Option<DateTimeWithTimeZone>,
    /// Qualified person who released the batch.
    pub released_by: Option<Uuid>,
    pub released_at: Option<DateTimeWithTimeZone>,
    /// Optimistic concurrency token, bumped on every status change.
    pub row_version: i32,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id"
    )]
    Products,
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderId",
        to = "super::orders::Column::Id"
    )]
    Orders,
    #[sea_orm(has_many = "super::batch_events::Entity")]
    BatchEvents,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::batch_events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BatchEvents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
