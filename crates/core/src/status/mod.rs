//! Entity status enums and the transition guard.
//!
//! Each entity with a lifecycle carries a closed status enum and an
//! explicit allow-list of `(from, to)` pairs. The guard rejects any
//! pair not on the list - backward moves, skips, and self-transitions
//! included. Route handlers never check transitions inline; they call
//! [`check_transition`].

pub mod batch;
pub mod error;
pub mod invoice;
pub mod order;
pub mod payment;
pub mod shipment;
pub mod ticket;

#[cfg(test)]
mod props;

pub use batch::BatchStatus;
pub use error::TransitionError;
pub use invoice::InvoiceStatus;
pub use order::OrderStatus;
pub use payment::PaymentRequestStatus;
pub use shipment::ShipmentStatus;
pub use ticket::TicketStatus;

use crate::roles::UserRole;
use std::fmt;

/// A closed status enum with an explicit transition allow-list.
pub trait StatusFlow: Copy + Eq + fmt::Display + Sized {
    /// Entity name used in error payloads, e.g. `"order"`.
    const ENTITY: &'static str;

    /// Returns the wire-level string for this status.
    fn as_str(&self) -> &'static str;

    /// Parses a status from its wire-level string.
    fn parse(s: &str) -> Option<Self>;

    /// Whether moving from `self` to `to` is on the allow-list.
    fn can_transition(self, to: Self) -> bool;

    /// The role required to perform this transition, if it is gated.
    fn required_role(self, _to: Self) -> Option<UserRole> {
        None
    }
}

/// Validates a requested status change.
///
/// Pure function of `(current, requested, caller role)`. On success the
/// caller performs the write; on failure the entity must be left
/// unmodified.
///
/// # Errors
///
/// * [`TransitionError::NotAllowed`] if the pair is not enumerated.
/// * [`TransitionError::RoleRequired`] if the transition is gated to a
///   role the caller does not hold.
pub fn check_transition<S: StatusFlow>(
    from: S,
    to: S,
    actor_role: UserRole,
) -> Result<(), TransitionError> {
    if !from.can_transition(to) {
        return Err(TransitionError::NotAllowed {
            entity: S::ENTITY,
            from: from.as_str(),
            to: to.as_str(),
        });
    }

    if let Some(required) = from.required_role(to)
        && !actor_role.satisfies(required)
    {
        return Err(TransitionError::RoleRequired {
            entity: S::ENTITY,
            from: from.as_str(),
            to: to.as_str(),
            required,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_rejects_self_transition() {
        let result = check_transition(
            OrderStatus::Submitted,
            OrderStatus::Submitted,
            UserRole::Admin,
        );
        assert!(matches!(result, Err(TransitionError::NotAllowed { .. })));
    }

    #[test]
    fn test_guard_rejects_backward_transition() {
        let result = check_transition(
            OrderStatus::Validated,
            OrderStatus::Submitted,
            UserRole::Admin,
        );
        assert!(matches!(result, Err(TransitionError::NotAllowed { .. })));
    }

    #[test]
    fn test_guard_rejects_skip() {
        let result = check_transition(
            OrderStatus::Draft,
            OrderStatus::Delivered,
            UserRole::Admin,
        );
        assert!(matches!(result, Err(TransitionError::NotAllowed { .. })));
    }

    #[test]
    fn test_guard_enforces_release_role() {
        let result = check_transition(
            BatchStatus::QcPassed,
            BatchStatus::Released,
            UserRole::QcAnalyst,
        );
        assert!(matches!(result, Err(TransitionError::RoleRequired { .. })));

        assert!(
            check_transition(
                BatchStatus::QcPassed,
                BatchStatus::Released,
                UserRole::QualifiedPerson,
            )
            .is_ok()
        );
    }

    #[test]
    fn test_guard_admin_passes_role_gate() {
        assert!(
            check_transition(
                BatchStatus::QcPassed,
                BatchStatus::Released,
                UserRole::Admin,
            )
            .is_ok()
        );
    }

    #[test]
    fn test_guard_allows_listed_pair() {
        assert!(
            check_transition(
                OrderStatus::Draft,
                OrderStatus::Submitted,
                UserRole::Sales,
            )
            .is_ok()
        );
    }
}
