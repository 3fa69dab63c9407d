//! Product repository.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde_json::json;
use uuid::Uuid;

use isotrack_core::audit::{AuditAction, AuditEntry};
use isotrack_core::workflow::EntityKind;
use isotrack_shared::error::{AppError, AppResult};

use crate::entities::products;
use crate::repositories::{AuditRepository, RequestMeta, map_db_err, snapshot};

/// Input for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Unique product code, e.g. "FDG".
    pub code: String,
    /// Display name.
    pub name: String,
    /// Radionuclide symbol, e.g. "F-18".
    pub radionuclide: String,
    /// Physical half-life in minutes.
    pub half_life_minutes: i32,
    /// Price per unit of activity.
    pub unit_price: Decimal,
    /// Batches producible per production day.
    pub daily_batch_capacity: i32,
}

/// Repository for the product catalogue.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
    audit: AuditRepository,
}

impl ProductRepository {
    /// Creates a new product repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        let audit = AuditRepository::new(db.clone());
        Self { db, audit }
    }

    /// Creates a product and records a CREATE audit entry.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for non-positive half-life or capacity,
    /// `DuplicateEntry` for a reused code, or a database error.
    pub async fn create(
        &self,
        input: NewProduct,
        actor_id: Uuid,
        meta: RequestMeta,
    ) -> AppResult<products::Model> {
        if input.half_life_minutes <= 0 {
            return Err(AppError::Validation(
                "half-life must be positive".to_string(),
            ));
        }
        if input.daily_batch_capacity <= 0 {
            return Err(AppError::Validation(
                "daily batch capacity must be positive".to_string(),
            ));
        }

        let now = Utc::now().into();
        let product = products::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(input.code),
            name: Set(input.name),
            radionuclide: Set(input.radionuclide),
            half_life_minutes: Set(input.half_life_minutes),
            unit_price: Set(input.unit_price),
            daily_batch_capacity: Set(input.daily_batch_capacity),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        self.audit
            .record(
                AuditEntry::created(
                    Some(actor_id),
                    EntityKind::Product,
                    product.id,
                    snapshot(&product),
                )
                .with_request_meta(meta.ip_address, meta.user_agent),
            )
            .await;

        Ok(product)
    }

    /// Finds a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such product exists.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<products::Model> {
        products::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("product {id}")))
    }

    /// Lists products, optionally restricted to active ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self, active_only: bool) -> AppResult<Vec<products::Model>> {
        let mut select = products::Entity::find();
        if active_only {
            select = select.filter(products::Column::IsActive.eq(true));
        }
        select.all(&self.db).await.map_err(map_db_err)
    }

    /// Deactivates a product so new orders cannot reference it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the product does not exist.
    pub async fn deactivate(
        &self,
        id: Uuid,
        actor_id: Uuid,
        meta: RequestMeta,
    ) -> AppResult<products::Model> {
        let existing = self.find_by_id(id).await?;
        let old = snapshot(&existing);

        let mut active: products::ActiveModel = existing.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&self.db).await.map_err(map_db_err)?;

        self.audit
            .record(
                AuditEntry {
                    actor_id: Some(actor_id),
                    action: AuditAction::Delete,
                    entity_type: EntityKind::Product,
                    entity_id: id,
                    old_value: Some(old),
                    new_value: json!({"isActive": false}),
                    ip_address: meta.ip_address,
                    user_agent: meta.user_agent,
                },
            )
            .await;

        Ok(updated)
    }
}
