//! Shipment repository.
//!
//! A shipment can only be created against a RELEASED batch; nothing
//! leaves the site without a qualified person's release.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde_json::json;
use uuid::Uuid;

use isotrack_core::UserRole;
use isotrack_core::audit::AuditEntry;
use isotrack_core::status::{ShipmentStatus, StatusFlow, check_transition};
use isotrack_core::workflow::EntityKind;
use isotrack_shared::error::{AppError, AppResult};

use crate::entities::sea_orm_active_enums;
use crate::entities::{shipment_events, shipments};
use crate::repositories::{
    ApprovalRepository, AuditRepository, RequestMeta, entity_number, map_db_err,
    map_transition_err, snapshot,
};

/// Input for creating a shipment.
#[derive(Debug, Clone)]
pub struct NewShipment {
    /// Order being fulfilled.
    pub order_id: Uuid,
    /// Source batch; must be RELEASED.
    pub batch_id: Uuid,
    /// Carrier name.
    pub carrier: String,
    /// Carrier tracking number, if already assigned.
    pub tracking_number: Option<String>,
}

/// Repository for shipments.
#[derive(Debug, Clone)]
pub struct ShipmentRepository {
    db: DatabaseConnection,
}

impl ShipmentRepository {
    /// Creates a new shipment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a shipment in PENDING status.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the order or batch does not exist.
    /// * `BatchNotReleased` if the batch is in any status other than
    ///   RELEASED.
    pub async fn create(
        &self,
        input: NewShipment,
        created_by: Uuid,
        meta: RequestMeta,
    ) -> AppResult<shipments::Model> {
        crate::entities::orders::Entity::find_by_id(input.order_id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("order {}", input.order_id)))?;

        let batch = crate::entities::production_batches::Entity::find_by_id(input.batch_id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("batch {}", input.batch_id)))?;

        if batch.status != sea_orm_active_enums::BatchStatus::Released {
            return Err(AppError::BatchNotReleased(format!(
                "batch {} is {:?}",
                batch.batch_number, batch.status
            )));
        }

        let now = Utc::now().into();
        let id = Uuid::new_v4();

        let txn = self.db.begin().await.map_err(map_db_err)?;

        let shipment = shipments::ActiveModel {
            id: Set(id),
            shipment_number: Set(entity_number("SHP")),
            order_id: Set(input.order_id),
            batch_id: Set(input.batch_id),
            carrier: Set(input.carrier),
            tracking_number: Set(input.tracking_number),
            status: Set(sea_orm_active_enums::ShipmentStatus::Pending),
            dispatched_at: Set(None),
            delivered_at: Set(None),
            row_version: Set(0),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        shipment_events::ActiveModel {
            id: Set(Uuid::new_v4()),
            shipment_id: Set(id),
            from_status: Set(None),
            to_status: Set(sea_orm_active_enums::ShipmentStatus::Pending),
            actor_id: Set(Some(created_by)),
            note: Set(None),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        AuditRepository::record_in_txn(
            &txn,
            AuditEntry::created(
                Some(created_by),
                EntityKind::Shipment,
                id,
                snapshot(&shipment),
            )
            .with_request_meta(meta.ip_address, meta.user_agent),
        )
        .await?;

        txn.commit().await.map_err(map_db_err)?;

        Ok(shipment)
    }

    /// Moves a shipment to a new status.
    ///
    /// `PICKED_UP` stamps `dispatched_at`; `DELIVERED` stamps
    /// `delivered_at`.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the shipment does not exist.
    /// * `InvalidTransition` if the `(from, to)` pair is not allowed.
    /// * `Conflict` if the row changed since it was read.
    pub async fn transition_status(
        &self,
        id: Uuid,
        to: ShipmentStatus,
        actor_id: Uuid,
        actor_role: UserRole,
        note: Option<String>,
        meta: RequestMeta,
    ) -> AppResult<shipments::Model> {
        let shipment = self.find_by_id(id).await?;
        let from: ShipmentStatus = shipment.status.clone().into();
        check_transition(from, to, actor_role).map_err(map_transition_err)?;

        let to_db: sea_orm_active_enums::ShipmentStatus = to.into();
        let now = Utc::now().into();

        let txn = self.db.begin().await.map_err(map_db_err)?;

        let mut update = shipments::Entity::update_many()
            .col_expr(shipments::Column::Status, to_db.as_enum())
            .col_expr(
                shipments::Column::RowVersion,
                Expr::value(shipment.row_version + 1),
            )
            .col_expr(shipments::Column::UpdatedAt, Expr::value(now));

        match to {
            ShipmentStatus::PickedUp => {
                update = update.col_expr(shipments::Column::DispatchedAt, Expr::value(Some(now)));
            }
            ShipmentStatus::Delivered => {
                update = update.col_expr(shipments::Column::DeliveredAt, Expr::value(Some(now)));
            }
            _ => {}
        }

        let result = update
            .filter(shipments::Column::Id.eq(id))
            .filter(shipments::Column::RowVersion.eq(shipment.row_version))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(AppError::Conflict(format!(
                "shipment {id} was modified concurrently"
            )));
        }

        shipment_events::ActiveModel {
            id: Set(Uuid::new_v4()),
            shipment_id: Set(id),
            from_status: Set(Some(shipment.status.clone())),
            to_status: Set(to_db),
            actor_id: Set(Some(actor_id)),
            note: Set(note),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        AuditRepository::record_in_txn(
            &txn,
            AuditEntry::status_changed(
                Some(actor_id),
                EntityKind::Shipment,
                id,
                json!({ "status": from.as_str() }),
                json!({ "status": to.as_str() }),
            )
            .with_request_meta(meta.ip_address, meta.user_agent),
        )
        .await?;

        ApprovalRepository::trigger_in_txn(&txn, EntityKind::Shipment, id, to.as_str()).await?;

        txn.commit().await.map_err(map_db_err)?;

        self.find_by_id(id).await
    }

    /// Finds a shipment by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such shipment exists.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<shipments::Model> {
        shipments::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("shipment {id}")))
    }

    /// Lists shipments, optionally filtered by order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self, order_id: Option<Uuid>) -> AppResult<Vec<shipments::Model>> {
        let mut select = shipments::Entity::find();
        if let Some(order_id) = order_id {
            select = select.filter(shipments::Column::OrderId.eq(order_id));
        }
        select
            .order_by_desc(shipments::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }

    /// Returns the transition history of a shipment, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the shipment does not exist.
    pub async fn events(&self, id: Uuid) -> AppResult<Vec<shipment_events::Model>> {
        self.find_by_id(id).await?;

        shipment_events::Entity::find()
            .filter(shipment_events::Column::ShipmentId.eq(id))
            .order_by_asc(shipment_events::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }
}
