//! Workflow error types.

use thiserror::Error;
use uuid::Uuid;

use crate::roles::UserRole;
use crate::workflow::types::ApprovalRequestStatus;

/// Errors that can occur during workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The request has already been approved or rejected.
    #[error("approval request is {status}, not pending")]
    RequestNotPending {
        /// The request's terminal status.
        status: ApprovalRequestStatus,
    },

    /// The acted-on step is not the step currently pending.
    #[error("step {acted_step} is not the pending step (order {expected_order})")]
    StepMismatch {
        /// The step order currently pending.
        expected_order: i16,
        /// The step the caller tried to act on.
        acted_step: Uuid,
    },

    /// The actor's role does not match the pending step's approver role.
    #[error("role {actual} cannot act on a step reserved for {required}")]
    RoleMismatch {
        /// The role bound to the pending step.
        required: UserRole,
        /// The actor's role.
        actual: UserRole,
    },

    /// The workflow has no steps.
    #[error("workflow has no steps")]
    NoSteps,

    /// Step orders are not contiguous starting from 1.
    #[error("step orders must be contiguous starting at 1, got {0:?}")]
    NonContiguousSteps(Vec<i16>),

    /// Approval request not found.
    #[error("approval request {0} not found")]
    RequestNotFound(Uuid),

    /// Workflow definition not found.
    #[error("workflow definition {0} not found")]
    WorkflowNotFound(Uuid),

    /// Database error.
    #[error("database error: {0}")]
    Database(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_mismatch_names_both_roles() {
        let err = WorkflowError::RoleMismatch {
            required: UserRole::Sales,
            actual: UserRole::Logistics,
        };
        assert!(err.to_string().contains("sales"));
        assert!(err.to_string().contains("logistics"));
    }

    #[test]
    fn test_not_pending_names_terminal_status() {
        let err = WorkflowError::RequestNotPending {
            status: ApprovalRequestStatus::Approved,
        };
        assert!(err.to_string().contains("not pending"));
    }

    #[test]
    fn test_not_found_carries_id() {
        let id = Uuid::new_v4();
        assert!(
            WorkflowError::RequestNotFound(id)
                .to_string()
                .contains(&id.to_string())
        );
    }
}
