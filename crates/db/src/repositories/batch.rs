//! Production batch repository.
//!
//! Same transition discipline as orders: guard, `row_version` CAS, and
//! event, audit, and workflow-trigger rows in one transaction. Release
//! is additionally gated to the qualified person role by the guard.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde_json::json;
use uuid::Uuid;

use isotrack_core::UserRole;
use isotrack_core::audit::{AuditAction, AuditEntry};
use isotrack_core::status::{BatchStatus, StatusFlow, check_transition};
use isotrack_core::workflow::EntityKind;
use isotrack_shared::error::{AppError, AppResult};

use crate::entities::sea_orm_active_enums;
use crate::entities::{batch_events, production_batches};
use crate::repositories::{
    ApprovalRepository, AuditRepository, RequestMeta, entity_number, map_db_err,
    map_transition_err, snapshot,
};

/// Input for planning a production batch.
#[derive(Debug, Clone)]
pub struct NewBatch {
    /// Product to synthesize.
    pub product_id: Uuid,
    /// Order this batch is dedicated to, if any.
    pub order_id: Option<Uuid>,
    /// Planned production day.
    pub production_date: NaiveDate,
}

/// Repository for production batches.
#[derive(Debug, Clone)]
pub struct BatchRepository {
    db: DatabaseConnection,
}

impl BatchRepository {
    /// Creates a new batch repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Plans a batch in PLANNED status.
    ///
    /// Counts non-cancelled batches already planned for the product on
    /// that day against the product's daily capacity.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the product does not exist.
    /// * `Validation` if the product is inactive.
    /// * `CapacityFull` if the day's batch slots are taken.
    pub async fn create(
        &self,
        input: NewBatch,
        created_by: Uuid,
        meta: RequestMeta,
    ) -> AppResult<production_batches::Model> {
        let product = crate::entities::products::Entity::find_by_id(input.product_id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("product {}", input.product_id)))?;

        if !product.is_active {
            return Err(AppError::Validation("product is inactive".to_string()));
        }

        let planned = production_batches::Entity::find()
            .filter(production_batches::Column::ProductId.eq(input.product_id))
            .filter(production_batches::Column::ProductionDate.eq(input.production_date))
            .filter(
                production_batches::Column::Status.ne(sea_orm_active_enums::BatchStatus::Cancelled),
            )
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        if planned >= u64::try_from(product.daily_batch_capacity).unwrap_or(0) {
            return Err(AppError::CapacityFull(format!(
                "{} batches already planned for {} on {}",
                planned, product.code, input.production_date
            )));
        }

        let now = Utc::now().into();
        let id = Uuid::new_v4();

        let txn = self.db.begin().await.map_err(map_db_err)?;

        let batch = production_batches::ActiveModel {
            id: Set(id),
            batch_number: Set(entity_number("BAT")),
            product_id: Set(input.product_id),
            order_id: Set(input.order_id),
            production_date: Set(input.production_date),
            activity_mbq: Set(Decimal::ZERO),
            status: Set(sea_orm_active_enums::BatchStatus::Planned),
            synthesis_started_at: Set(None),
            qc_completed_at: Set(None),
            released_by: Set(None),
            released_at: Set(None),
            row_version: Set(0),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        batch_events::ActiveModel {
            id: Set(Uuid::new_v4()),
            batch_id: Set(id),
            from_status: Set(None),
            to_status: Set(sea_orm_active_enums::BatchStatus::Planned),
            actor_id: Set(Some(created_by)),
            note: Set(None),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        AuditRepository::record_in_txn(
            &txn,
            AuditEntry::created(Some(created_by), EntityKind::Batch, id, snapshot(&batch))
                .with_request_meta(meta.ip_address, meta.user_agent),
        )
        .await?;

        txn.commit().await.map_err(map_db_err)?;

        Ok(batch)
    }

    /// Records the measured activity after synthesis.
    ///
    /// Same `row_version` compare-and-swap as a status change, and the
    /// update and its audit row commit together.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the batch does not exist.
    /// * `Validation` for a non-positive activity.
    /// * `Conflict` if the row changed since it was read.
    pub async fn set_activity(
        &self,
        id: Uuid,
        activity_mbq: Decimal,
        actor_id: Uuid,
        meta: RequestMeta,
    ) -> AppResult<production_batches::Model> {
        if activity_mbq <= Decimal::ZERO {
            return Err(AppError::Validation(
                "activity must be positive".to_string(),
            ));
        }

        let batch = self.find_by_id(id).await?;
        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();

        let txn = self.db.begin().await.map_err(map_db_err)?;

        let result = production_batches::Entity::update_many()
            .col_expr(
                production_batches::Column::ActivityMbq,
                Expr::value(activity_mbq),
            )
            .col_expr(
                production_batches::Column::RowVersion,
                Expr::value(batch.row_version + 1),
            )
            .col_expr(production_batches::Column::UpdatedAt, Expr::value(now))
            .filter(production_batches::Column::Id.eq(id))
            .filter(production_batches::Column::RowVersion.eq(batch.row_version))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(AppError::Conflict(format!(
                "batch {id} was modified concurrently"
            )));
        }

        AuditRepository::record_in_txn(
            &txn,
            AuditEntry {
                actor_id: Some(actor_id),
                action: AuditAction::Update,
                entity_type: EntityKind::Batch,
                entity_id: id,
                old_value: Some(json!({ "activityMbq": batch.activity_mbq })),
                new_value: json!({ "activityMbq": activity_mbq }),
                ip_address: meta.ip_address,
                user_agent: meta.user_agent,
            },
        )
        .await?;

        txn.commit().await.map_err(map_db_err)?;

        self.find_by_id(id).await
    }

    /// Moves a batch to a new status.
    ///
    /// Side effects by target status:
    /// * `SYNTHESIS` stamps `synthesis_started_at`;
    /// * `QC_PASSED` / `QC_FAILED` stamp `qc_completed_at`;
    /// * `RELEASED` stamps `released_by` / `released_at`. The guard only
    ///   lets a qualified person (or admin) through.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the batch does not exist.
    /// * `InvalidTransition` if the `(from, to)` pair is not allowed.
    /// * `Forbidden` if the caller lacks the release role.
    /// * `Conflict` if the row changed since it was read.
    pub async fn transition_status(
        &self,
        id: Uuid,
        to: BatchStatus,
        actor_id: Uuid,
        actor_role: UserRole,
        note: Option<String>,
        meta: RequestMeta,
    ) -> AppResult<production_batches::Model> {
        let batch = self.find_by_id(id).await?;
        let from: BatchStatus = batch.status.clone().into();
        check_transition(from, to, actor_role).map_err(map_transition_err)?;

        let to_db: sea_orm_active_enums::BatchStatus = to.into();
        let now = Utc::now().into();

        let txn = self.db.begin().await.map_err(map_db_err)?;

        let mut update = production_batches::Entity::update_many()
            .col_expr(production_batches::Column::Status, to_db.as_enum())
            .col_expr(
                production_batches::Column::RowVersion,
                Expr::value(batch.row_version + 1),
            )
            .col_expr(production_batches::Column::UpdatedAt, Expr::value(now));

        match to {
            BatchStatus::Synthesis => {
                update = update.col_expr(
                    production_batches::Column::SynthesisStartedAt,
                    Expr::value(Some(now)),
                );
            }
            BatchStatus::QcPassed | BatchStatus::QcFailed => {
                update = update.col_expr(
                    production_batches::Column::QcCompletedAt,
                    Expr::value(Some(now)),
                );
            }
            BatchStatus::Released => {
                update = update
                    .col_expr(
                        production_batches::Column::ReleasedBy,
                        Expr::value(Some(actor_id)),
                    )
                    .col_expr(
                        production_batches::Column::ReleasedAt,
                        Expr::value(Some(now)),
                    );
            }
            _ => {}
        }

        let result = update
            .filter(production_batches::Column::Id.eq(id))
            .filter(production_batches::Column::RowVersion.eq(batch.row_version))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(AppError::Conflict(format!(
                "batch {id} was modified concurrently"
            )));
        }

        batch_events::ActiveModel {
            id: Set(Uuid::new_v4()),
            batch_id: Set(id),
            from_status: Set(Some(batch.status.clone())),
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
                EntityKind::Batch,
                id,
                json!({ "status": from.as_str() }),
                json!({ "status": to.as_str() }),
            )
            .with_request_meta(meta.ip_address, meta.user_agent),
        )
        .await?;

        ApprovalRepository::trigger_in_txn(&txn, EntityKind::Batch, id, to.as_str()).await?;

        txn.commit().await.map_err(map_db_err)?;

        self.find_by_id(id).await
    }

    /// Finds a batch by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such batch exists.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<production_batches::Model> {
        production_batches::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("batch {id}")))
    }

    /// Lists batches, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self, status: Option<BatchStatus>) -> AppResult<Vec<production_batches::Model>> {
        let mut select = production_batches::Entity::find();
        if let Some(status) = status {
            let db_status: sea_orm_active_enums::BatchStatus = status.into();
            select = select.filter(production_batches::Column::Status.eq(db_status));
        }
        select
            .order_by_desc(production_batches::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }

    /// Returns the transition history of a batch, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the batch does not exist.
    pub async fn events(&self, id: Uuid) -> AppResult<Vec<batch_events::Model>> {
        self.find_by_id(id).await?;

        batch_events::Entity::find()
            .filter(batch_events::Column::BatchId.eq(id))
            .order_by_asc(batch_events::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }
}
