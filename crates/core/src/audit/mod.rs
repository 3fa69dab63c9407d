//! Audit trail domain types.
//!
//! Every mutating operation appends an audit record for compliance
//! traceability. Records are append-only and never updated.

pub mod types;

pub use types::{AuditAction, AuditEntry};
