//! Core business logic for Isotrack.
//!
//! Pure domain logic with zero web or database dependencies:
//! - Entity status enums and the transition guard
//! - The approval workflow runner
//! - Audit record types
//! - User roles and password hashing

pub mod audit;
pub mod auth;
pub mod roles;
pub mod status;
pub mod workflow;

pub use roles::UserRole;
