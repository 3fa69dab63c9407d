//! Repository layer wrapping `SeaORM` access.
//!
//! Each repository owns a [`DatabaseConnection`] clone and exposes the
//! operations one entity needs. Status changes always go through the
//! core transition guard, perform a compare-and-swap on `row_version`,
//! and append their event and audit rows in the same database
//! transaction.

pub mod approval;
pub mod audit;
pub mod batch;
pub mod customer;
pub mod invoice;
pub mod order;
pub mod product;
pub mod shipment;
pub mod ticket;
pub mod user;
pub mod workflow;

pub use approval::ApprovalRepository;
pub use audit::{AuditQuery, AuditRepository};
pub use batch::BatchRepository;
pub use customer::CustomerRepository;
pub use invoice::InvoiceRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use shipment::ShipmentRepository;
pub use ticket::TicketRepository;
pub use user::UserRepository;
pub use workflow::WorkflowDefinitionRepository;

use chrono::Utc;
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use uuid::Uuid;

use isotrack_core::status::TransitionError;
use isotrack_core::workflow::WorkflowError;
use isotrack_shared::error::AppError;

/// Request metadata forwarded into audit rows.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    /// Origin IP, if known.
    pub ip_address: Option<String>,
    /// User agent header, if present.
    pub user_agent: Option<String>,
}

/// Maps a `SeaORM` error onto the application error space.
pub(crate) fn map_db_err(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => AppError::DuplicateEntry(msg),
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => AppError::Validation(msg),
        _ => AppError::Database(err.to_string()),
    }
}

pub(crate) fn map_transition_err(err: TransitionError) -> AppError {
    match err {
        TransitionError::NotAllowed { .. } => AppError::InvalidTransition(err.to_string()),
        TransitionError::RoleRequired { .. } => AppError::Forbidden(err.to_string()),
    }
}

pub(crate) fn map_workflow_err(err: WorkflowError) -> AppError {
    match err {
        WorkflowError::RequestNotPending { .. } => AppError::RequestNotPending(err.to_string()),
        WorkflowError::StepMismatch { .. } => AppError::StepMismatch(err.to_string()),
        WorkflowError::NoSteps | WorkflowError::NonContiguousSteps(_) => {
            AppError::Validation(err.to_string())
        }
        WorkflowError::RoleMismatch { .. } => AppError::Forbidden(err.to_string()),
        WorkflowError::RequestNotFound(_) | WorkflowError::WorkflowNotFound(_) => {
            AppError::NotFound(err.to_string())
        }
        WorkflowError::Database(msg) => AppError::Database(msg),
    }
}

/// Serializes an entity snapshot for an audit row. Falls back to JSON
/// null rather than failing the surrounding write.
pub(crate) fn snapshot<T: Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}

/// Generates a human-readable entity number, e.g. `ORD-20260815-1A2B3C4D`.
pub(crate) fn entity_number(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("{prefix}-{}-{}", Utc::now().format("%Y%m%d"), &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_number_format() {
        let number = entity_number("ORD");
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ORD");
        assert_eq!(parts[1].len(), 8);
        assert_eq!(parts[2].len(), 8);
    }

    #[test]
    fn test_entity_numbers_are_unique() {
        assert_ne!(entity_number("INV"), entity_number("INV"));
    }

    #[test]
    fn test_transition_err_mapping() {
        let err = map_transition_err(TransitionError::NotAllowed {
            entity: "order",
            from: "DRAFT",
            to: "DELIVERED",
        });
        assert!(matches!(err, AppError::InvalidTransition(_)));

        let err = map_transition_err(TransitionError::RoleRequired {
            entity: "batch",
            from: "QC_PASSED",
            to: "RELEASED",
            required: isotrack_core::UserRole::QualifiedPerson,
        });
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_workflow_err_mapping() {
        assert!(matches!(
            map_workflow_err(WorkflowError::RequestNotFound(Uuid::nil())),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            map_workflow_err(WorkflowError::NoSteps),
            AppError::Validation(_)
        ));

        // A decided request and an out-of-order step carry their own
        // wire codes, both 400.
        let err = map_workflow_err(WorkflowError::RequestNotPending {
            status: isotrack_core::workflow::ApprovalRequestStatus::Approved,
        });
        assert!(matches!(err, AppError::RequestNotPending(_)));
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "REQUEST_NOT_PENDING");

        let err = map_workflow_err(WorkflowError::StepMismatch {
            expected_order: 1,
            acted_step: Uuid::nil(),
        });
        assert!(matches!(err, AppError::StepMismatch(_)));
        assert_eq!(err.error_code(), "STEP_MISMATCH");
    }
}
