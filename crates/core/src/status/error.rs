//! Errors produced by the status transition guard.

use thiserror::Error;

use crate::roles::UserRole;

/// Errors that can occur when validating a status transition.
#[derive(Debug, Error)]
pub enum TransitionError {
    /// The `(from, to)` pair is not on the entity's allow-list.
    #[error("invalid {entity} status transition from {from} to {to}")]
    NotAllowed {
        /// Entity kind, e.g. `"order"`.
        entity: &'static str,
        /// Current status.
        from: &'static str,
        /// Attempted target status.
        to: &'static str,
    },

    /// The transition is gated to a role the caller does not hold.
    #[error("{entity} transition from {from} to {to} requires role {required}")]
    RoleRequired {
        /// Entity kind.
        entity: &'static str,
        /// Current status.
        from: &'static str,
        /// Attempted target status.
        to: &'static str,
        /// The role allowed to perform this transition.
        required: UserRole,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_allowed_names_both_statuses() {
        let err = TransitionError::NotAllowed {
            entity: "order",
            from: "DRAFT",
            to: "DELIVERED",
        };
        assert!(err.to_string().contains("DRAFT"));
        assert!(err.to_string().contains("DELIVERED"));
    }

    #[test]
    fn test_role_required_names_the_role() {
        let err = TransitionError::RoleRequired {
            entity: "batch",
            from: "QC_PASSED",
            to: "RELEASED",
            required: UserRole::QualifiedPerson,
        };
        assert!(err.to_string().contains("qualified_person"));
    }
}
