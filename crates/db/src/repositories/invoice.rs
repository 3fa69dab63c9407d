//! Invoice and payment request repository.
//!
//! Payment requests are the finance approval gate: only a finance user
//! (or admin) can move one out of PENDING, enforced by the core guard.

use chrono::{Duration, Utc};
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
use isotrack_core::status::{InvoiceStatus, PaymentRequestStatus, StatusFlow, check_transition};
use isotrack_core::workflow::EntityKind;
use isotrack_shared::error::{AppError, AppResult};

use crate::entities::sea_orm_active_enums;
use crate::entities::{invoices, payment_requests};
use crate::repositories::{
    ApprovalRepository, AuditRepository, RequestMeta, entity_number, map_db_err,
    map_transition_err, snapshot,
};

/// Days until an issued invoice falls due.
const PAYMENT_TERM_DAYS: i64 = 30;

/// Input for creating an invoice.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    /// Order being invoiced.
    pub order_id: Uuid,
    /// Invoice total.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: String,
}

/// Repository for invoices and their payment requests.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an invoice in DRAFT status for an order.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the order does not exist.
    /// * `Validation` for a non-positive amount or malformed currency.
    pub async fn create(
        &self,
        input: NewInvoice,
        created_by: Uuid,
        meta: RequestMeta,
    ) -> AppResult<invoices::Model> {
        if input.amount <= Decimal::ZERO {
            return Err(AppError::Validation("amount must be positive".to_string()));
        }
        if input.currency.len() != 3 || !input.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(AppError::Validation(
                "currency must be a 3-letter ISO 4217 code".to_string(),
            ));
        }

        let order = crate::entities::orders::Entity::find_by_id(input.order_id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("order {}", input.order_id)))?;

        let now = Utc::now().into();
        let id = Uuid::new_v4();

        let txn = self.db.begin().await.map_err(map_db_err)?;

        let invoice = invoices::ActiveModel {
            id: Set(id),
            invoice_number: Set(entity_number("INV")),
            order_id: Set(order.id),
            customer_id: Set(order.customer_id),
            amount: Set(input.amount),
            currency: Set(input.currency),
            status: Set(sea_orm_active_enums::InvoiceStatus::Draft),
            issued_at: Set(None),
            due_date: Set(None),
            paid_at: Set(None),
            row_version: Set(0),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        AuditRepository::record_in_txn(
            &txn,
            AuditEntry::created(
                Some(created_by),
                EntityKind::Invoice,
                id,
                snapshot(&invoice),
            )
            .with_request_meta(meta.ip_address, meta.user_agent),
        )
        .await?;

        txn.commit().await.map_err(map_db_err)?;

        Ok(invoice)
    }

    /// Moves an invoice to a new status.
    ///
    /// `ISSUED` stamps `issued_at` and a due date 30 days out; `PAID`
    /// stamps `paid_at`.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the invoice does not exist.
    /// * `InvalidTransition` if the `(from, to)` pair is not allowed.
    /// * `Conflict` if the row changed since it was read.
    pub async fn transition_status(
        &self,
        id: Uuid,
        to: InvoiceStatus,
        actor_id: Option<Uuid>,
        actor_role: UserRole,
        meta: RequestMeta,
    ) -> AppResult<invoices::Model> {
        let invoice = self.find_by_id(id).await?;
        let from: InvoiceStatus = invoice.status.clone().into();
        check_transition(from, to, actor_role).map_err(map_transition_err)?;

        let to_db: sea_orm_active_enums::InvoiceStatus = to.into();
        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();

        let txn = self.db.begin().await.map_err(map_db_err)?;

        let mut update = invoices::Entity::update_many()
            .col_expr(invoices::Column::Status, to_db.as_enum())
            .col_expr(
                invoices::Column::RowVersion,
                Expr::value(invoice.row_version + 1),
            )
            .col_expr(invoices::Column::UpdatedAt, Expr::value(now));

        match to {
            InvoiceStatus::Issued => {
                let due = (Utc::now() + Duration::days(PAYMENT_TERM_DAYS)).date_naive();
                update = update
                    .col_expr(invoices::Column::IssuedAt, Expr::value(Some(now)))
                    .col_expr(invoices::Column::DueDate, Expr::value(Some(due)));
            }
            InvoiceStatus::Paid => {
                update = update.col_expr(invoices::Column::PaidAt, Expr::value(Some(now)));
            }
            _ => {}
        }

        let result = update
            .filter(invoices::Column::Id.eq(id))
            .filter(invoices::Column::RowVersion.eq(invoice.row_version))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(AppError::Conflict(format!(
                "invoice {id} was modified concurrently"
            )));
        }

        AuditRepository::record_in_txn(
            &txn,
            AuditEntry::status_changed(
                actor_id,
                EntityKind::Invoice,
                id,
                json!({ "status": from.as_str() }),
                json!({ "status": to.as_str() }),
            )
            .with_request_meta(meta.ip_address, meta.user_agent),
        )
        .await?;

        ApprovalRepository::trigger_in_txn(&txn, EntityKind::Invoice, id, to.as_str()).await?;

        txn.commit().await.map_err(map_db_err)?;

        self.find_by_id(id).await
    }

    /// Finds an invoice by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such invoice exists.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<invoices::Model> {
        invoices::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("invoice {id}")))
    }

    /// Lists invoices, optionally filtered by customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self, customer_id: Option<Uuid>) -> AppResult<Vec<invoices::Model>> {
        let mut select = invoices::Entity::find();
        if let Some(customer_id) = customer_id {
            select = select.filter(invoices::Column::CustomerId.eq(customer_id));
        }
        select
            .order_by_desc(invoices::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }

    // ------------------------------------------------------------------
    // Payment requests
    // ------------------------------------------------------------------

    /// Creates a PENDING payment request against an invoice.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the invoice does not exist.
    /// * `Validation` if the invoice is still a draft or cancelled, or
    ///   the amount is non-positive.
    pub async fn create_payment_request(
        &self,
        invoice_id: Uuid,
        amount: Decimal,
        requested_by: Uuid,
        meta: RequestMeta,
    ) -> AppResult<payment_requests::Model> {
        if amount <= Decimal::ZERO {
            return Err(AppError::Validation("amount must be positive".to_string()));
        }

        let invoice = self.find_by_id(invoice_id).await?;
        if matches!(
            invoice.status,
            sea_orm_active_enums::InvoiceStatus::Draft
                | sea_orm_active_enums::InvoiceStatus::Cancelled
        ) {
            return Err(AppError::Validation(format!(
                "invoice {} cannot accept payment requests in status {:?}",
                invoice.invoice_number, invoice.status
            )));
        }

        let now = Utc::now().into();
        let id = Uuid::new_v4();

        let txn = self.db.begin().await.map_err(map_db_err)?;

        let request = payment_requests::ActiveModel {
            id: Set(id),
            invoice_id: Set(invoice_id),
            amount: Set(amount),
            status: Set(sea_orm_active_enums::PaymentRequestStatus::Pending),
            requested_by: Set(requested_by),
            decided_by: Set(None),
            decided_at: Set(None),
            row_version: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        AuditRepository::record_in_txn(
            &txn,
            AuditEntry::created(
                Some(requested_by),
                EntityKind::PaymentRequest,
                id,
                snapshot(&request),
            )
            .with_request_meta(meta.ip_address, meta.user_agent),
        )
        .await?;

        txn.commit().await.map_err(map_db_err)?;

        Ok(request)
    }

    /// Moves a payment request to a new status.
    ///
    /// The PENDING exits are finance-gated by the core guard; approval
    /// and rejection stamp `decided_by` / `decided_at`.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the request does not exist.
    /// * `Forbidden` if a non-finance caller decides a pending request.
    /// * `InvalidTransition` if the `(from, to)` pair is not allowed.
    /// * `Conflict` if the row changed since it was read.
    pub async fn transition_payment_request(
        &self,
        id: Uuid,
        to: PaymentRequestStatus,
        actor_id: Uuid,
        actor_role: UserRole,
        meta: RequestMeta,
    ) -> AppResult<payment_requests::Model> {
        let request = payment_requests::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("payment request {id}")))?;

        let from: PaymentRequestStatus = request.status.clone().into();
        check_transition(from, to, actor_role).map_err(map_transition_err)?;

        let to_db: sea_orm_active_enums::PaymentRequestStatus = to.into();
        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();

        let txn = self.db.begin().await.map_err(map_db_err)?;

        let mut update = payment_requests::Entity::update_many()
            .col_expr(payment_requests::Column::Status, to_db.as_enum())
            .col_expr(
                payment_requests::Column::RowVersion,
                Expr::value(request.row_version + 1),
            )
            .col_expr(payment_requests::Column::UpdatedAt, Expr::value(now));

        if matches!(
            to,
            PaymentRequestStatus::Approved | PaymentRequestStatus::Rejected
        ) {
            update = update
                .col_expr(
                    payment_requests::Column::DecidedBy,
                    Expr::value(Some(actor_id)),
                )
                .col_expr(
                    payment_requests::Column::DecidedAt,
                    Expr::value(Some(now)),
                );
        }

        let result = update
            .filter(payment_requests::Column::Id.eq(id))
            .filter(payment_requests::Column::RowVersion.eq(request.row_version))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(AppError::Conflict(format!(
                "payment request {id} was modified concurrently"
            )));
        }

        AuditRepository::record_in_txn(
            &txn,
            AuditEntry::status_changed(
                Some(actor_id),
                EntityKind::PaymentRequest,
                id,
                json!({ "status": from.as_str() }),
                json!({ "status": to.as_str() }),
            )
            .with_request_meta(meta.ip_address, meta.user_agent),
        )
        .await?;

        ApprovalRepository::trigger_in_txn(&txn, EntityKind::PaymentRequest, id, to.as_str())
            .await?;

        txn.commit().await.map_err(map_db_err)?;

        payment_requests::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("payment request {id}")))
    }

    /// Lists payment requests for an invoice.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the invoice does not exist.
    pub async fn list_payment_requests(
        &self,
        invoice_id: Uuid,
    ) -> AppResult<Vec<payment_requests::Model>> {
        self.find_by_id(invoice_id).await?;

        payment_requests::Entity::find()
            .filter(payment_requests::Column::InvoiceId.eq(invoice_id))
            .order_by_asc(payment_requests::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }
}
