//! Customer repository.

use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde_json::json;
use uuid::Uuid;

use isotrack_core::audit::{AuditAction, AuditEntry};
use isotrack_core::workflow::EntityKind;
use isotrack_shared::error::{AppError, AppResult};

use crate::entities::customers;
use crate::repositories::{AuditRepository, RequestMeta, map_db_err, snapshot};

/// Input for creating a customer.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    /// Legal name.
    pub name: String,
    /// Radioactive-material handling license number.
    pub license_number: String,
    /// License expiry date.
    pub license_expires_at: NaiveDate,
    /// Delivery address.
    pub address: String,
    /// Contact email.
    pub contact_email: String,
    /// Contact phone, optional.
    pub contact_phone: Option<String>,
}

/// Updatable customer fields. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateCustomer {
    /// New name.
    pub name: Option<String>,
    /// New license expiry.
    pub license_expires_at: Option<NaiveDate>,
    /// New address.
    pub address: Option<String>,
    /// New contact email.
    pub contact_email: Option<String>,
    /// New contact phone.
    pub contact_phone: Option<Option<String>>,
}

/// Repository for customer master data.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: DatabaseConnection,
    audit: AuditRepository,
}

impl CustomerRepository {
    /// Creates a new customer repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        let audit = AuditRepository::new(db.clone());
        Self { db, audit }
    }

    /// Creates a customer and records a CREATE audit entry.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateEntry` if the license number is already
    /// registered, or a database error.
    pub async fn create(
        &self,
        input: NewCustomer,
        actor_id: Uuid,
        meta: RequestMeta,
    ) -> AppResult<customers::Model> {
        let now = Utc::now().into();
        let customer = customers::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            license_number: Set(input.license_number),
            license_expires_at: Set(input.license_expires_at),
            address: Set(input.address),
            contact_email: Set(input.contact_email),
            contact_phone: Set(input.contact_phone),
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
                    EntityKind::Customer,
                    customer.id,
                    snapshot(&customer),
                )
                .with_request_meta(meta.ip_address, meta.user_agent),
            )
            .await;

        Ok(customer)
    }

    /// Updates a customer's mutable fields and records an UPDATE audit
    /// entry with before/after snapshots.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the customer does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateCustomer,
        actor_id: Uuid,
        meta: RequestMeta,
    ) -> AppResult<customers::Model> {
        let existing = self.find_by_id(id).await?;
        let old = snapshot(&existing);

        let mut active: customers::ActiveModel = existing.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(expires) = input.license_expires_at {
            active.license_expires_at = Set(expires);
        }
        if let Some(address) = input.address {
            active.address = Set(address);
        }
        if let Some(email) = input.contact_email {
            active.contact_email = Set(email);
        }
        if let Some(phone) = input.contact_phone {
            active.contact_phone = Set(phone);
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&self.db).await.map_err(map_db_err)?;

        self.audit
            .record(
                AuditEntry {
                    actor_id: Some(actor_id),
                    action: AuditAction::Update,
                    entity_type: EntityKind::Customer,
                    entity_id: id,
                    old_value: Some(old),
                    new_value: snapshot(&updated),
                    ip_address: meta.ip_address,
                    user_agent: meta.user_agent,
                },
            )
            .await;

        Ok(updated)
    }

    /// Soft-deletes a customer by marking it inactive.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the customer does not exist.
    pub async fn deactivate(
        &self,
        id: Uuid,
        actor_id: Uuid,
        meta: RequestMeta,
    ) -> AppResult<customers::Model> {
        let existing = self.find_by_id(id).await?;
        let old = snapshot(&existing);

        let mut active: customers::ActiveModel = existing.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&self.db).await.map_err(map_db_err)?;

        self.audit
            .record(
                AuditEntry {
                    actor_id: Some(actor_id),
                    action: AuditAction::Delete,
                    entity_type: EntityKind::Customer,
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

    /// Finds a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such customer exists.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<customers::Model> {
        customers::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("customer {id}")))
    }

    /// Lists customers, optionally restricted to active ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self, active_only: bool) -> AppResult<Vec<customers::Model>> {
        let mut select = customers::Entity::find();
        if active_only {
            select = select.filter(customers::Column::IsActive.eq(true));
        }
        select.all(&self.db).await.map_err(map_db_err)
    }
}
