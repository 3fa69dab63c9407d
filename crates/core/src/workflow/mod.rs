//! Approval workflow domain logic.
//!
//! A workflow definition is an ordered list of approval steps bound to
//! one entity type and optionally one triggering status. An approval
//! request is one in-flight instance of a workflow applied to one entity
//! record; it advances step by step as role-holders approve, and
//! terminates on the first rejection.

pub mod error;
pub mod runner;
pub mod types;

#[cfg(test)]
mod runner_props;

pub use error::WorkflowError;
pub use runner::{Advancement, WorkflowRunner};
pub use types::{ApprovalDecision, ApprovalRequestStatus, EntityKind, RequestView, StepView};
