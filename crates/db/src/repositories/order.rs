//! Order repository.
//!
//! Status changes validate against the core transition guard, then
//! compare-and-swap on `row_version` so two concurrent writers cannot
//! both succeed. The entity update, its event row, its audit row, and
//! any workflow trigger commit in one database transaction.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde_json::json;
use uuid::Uuid;

use isotrack_core::UserRole;
use isotrack_core::audit::AuditEntry;
use isotrack_core::status::{OrderStatus, StatusFlow, check_transition};
use isotrack_core::workflow::EntityKind;
use isotrack_shared::error::{AppError, AppResult};

use crate::entities::{order_events, orders};
use crate::repositories::{
    ApprovalRepository, AuditRepository, RequestMeta, entity_number, map_db_err,
    map_transition_err, snapshot,
};

/// Input for creating an order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    /// Ordering customer.
    pub customer_id: Uuid,
    /// Ordered product.
    pub product_id: Uuid,
    /// Requested activity at calibration time, in MBq.
    pub quantity_mbq: Decimal,
    /// Instant the requested activity is calibrated to.
    pub calibration_time: chrono::DateTime<Utc>,
    /// Delivery address.
    pub delivery_address: String,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Repository for customer orders.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    db: DatabaseConnection,
}

impl OrderRepository {
    /// Creates a new order repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an order in DRAFT status.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the customer or product does not exist.
    /// * `Validation` for an inactive customer or product, or a
    ///   non-positive quantity.
    /// * `LicenseExpired` if the customer's handling license has lapsed.
    pub async fn create(
        &self,
        input: NewOrder,
        created_by: Uuid,
        meta: RequestMeta,
    ) -> AppResult<orders::Model> {
        let customer = crate::entities::customers::Entity::find_by_id(input.customer_id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("customer {}", input.customer_id)))?;

        if !customer.is_active {
            return Err(AppError::Validation("customer is inactive".to_string()));
        }
        if customer.license_expires_at < Utc::now().date_naive() {
            return Err(AppError::LicenseExpired(format!(
                "license {} expired on {}",
                customer.license_number, customer.license_expires_at
            )));
        }

        let product = crate::entities::products::Entity::find_by_id(input.product_id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("product {}", input.product_id)))?;

        if !product.is_active {
            return Err(AppError::Validation("product is inactive".to_string()));
        }
        if input.quantity_mbq <= Decimal::ZERO {
            return Err(AppError::Validation(
                "quantity must be positive".to_string(),
            ));
        }

        let now = Utc::now().into();
        let id = Uuid::new_v4();

        let txn = self.db.begin().await.map_err(map_db_err)?;

        let order = orders::ActiveModel {
            id: Set(id),
            order_number: Set(entity_number("ORD")),
            customer_id: Set(input.customer_id),
            product_id: Set(input.product_id),
            quantity_mbq: Set(input.quantity_mbq),
            calibration_time: Set(input.calibration_time.into()),
            delivery_address: Set(input.delivery_address),
            status: Set(crate::entities::sea_orm_active_enums::OrderStatus::Draft),
            notes: Set(input.notes),
            row_version: Set(0),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        order_events::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(id),
            from_status: Set(None),
            to_status: Set(crate::entities::sea_orm_active_enums::OrderStatus::Draft),
            actor_id: Set(Some(created_by)),
            note: Set(None),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        AuditRepository::record_in_txn(
            &txn,
            AuditEntry::created(Some(created_by), EntityKind::Order, id, snapshot(&order))
                .with_request_meta(meta.ip_address, meta.user_agent),
        )
        .await?;

        txn.commit().await.map_err(map_db_err)?;

        Ok(order)
    }

    /// Moves an order to a new status.
    ///
    /// Validates the transition against the allow-list, then performs a
    /// compare-and-swap on `row_version`. A stale version means another
    /// writer won the race and the caller gets `Conflict` with nothing
    /// written.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the order does not exist.
    /// * `InvalidTransition` if the `(from, to)` pair is not allowed.
    /// * `Forbidden` if the transition is gated to another role.
    /// * `Conflict` if the row changed since it was read.
    pub async fn transition_status(
        &self,
        id: Uuid,
        to: OrderStatus,
        actor_id: Uuid,
        actor_role: UserRole,
        note: Option<String>,
        meta: RequestMeta,
    ) -> AppResult<orders::Model> {
        let order = self.find_by_id(id).await?;
        let from: OrderStatus = order.status.clone().into();
        check_transition(from, to, actor_role).map_err(map_transition_err)?;

        let to_db: crate::entities::sea_orm_active_enums::OrderStatus = to.into();
        let now = Utc::now().into();

        let txn = self.db.begin().await.map_err(map_db_err)?;

        let result = orders::Entity::update_many()
            .col_expr(orders::Column::Status, to_db.as_enum())
            .col_expr(orders::Column::RowVersion, Expr::value(order.row_version + 1))
            .col_expr(orders::Column::UpdatedAt, Expr::value(now))
            .filter(orders::Column::Id.eq(id))
            .filter(orders::Column::RowVersion.eq(order.row_version))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(AppError::Conflict(format!(
                "order {id} was modified concurrently"
            )));
        }

        order_events::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(id),
            from_status: Set(Some(order.status.clone())),
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
                EntityKind::Order,
                id,
                json!({ "status": from.as_str() }),
                json!({ "status": to.as_str() }),
            )
            .with_request_meta(meta.ip_address, meta.user_agent),
        )
        .await?;

        ApprovalRepository::trigger_in_txn(&txn, EntityKind::Order, id, to.as_str()).await?;

        txn.commit().await.map_err(map_db_err)?;

        self.find_by_id(id).await
    }

    /// Finds an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such order exists.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<orders::Model> {
        orders::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("order {id}")))
    }

    /// Lists orders, optionally filtered by customer and status.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        customer_id: Option<Uuid>,
        status: Option<OrderStatus>,
    ) -> AppResult<Vec<orders::Model>> {
        let mut select = orders::Entity::find();
        if let Some(customer_id) = customer_id {
            select = select.filter(orders::Column::CustomerId.eq(customer_id));
        }
        if let Some(status) = status {
            let db_status: crate::entities::sea_orm_active_enums::OrderStatus = status.into();
            select = select.filter(orders::Column::Status.eq(db_status));
        }
        select
            .order_by_desc(orders::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }

    /// Returns the transition history of an order, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the order does not exist.
    pub async fn events(&self, id: Uuid) -> AppResult<Vec<order_events::Model>> {
        self.find_by_id(id).await?;

        order_events::Entity::find()
            .filter(order_events::Column::OrderId.eq(id))
            .order_by_asc(order_events::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }
}
