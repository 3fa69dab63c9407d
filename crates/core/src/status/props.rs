//! Property-based tests for the status machines and transition guard.

use proptest::prelude::*;
use proptest::sample::select;

use crate::roles::UserRole;
use crate::status::{
    BatchStatus, InvoiceStatus, OrderStatus, PaymentRequestStatus, ShipmentStatus, StatusFlow,
    TicketStatus, check_transition,
};

const ALL_ORDER: [OrderStatus; 13] = [
    OrderStatus::Draft,
    OrderStatus::Submitted,
    OrderStatus::Validated,
    OrderStatus::Scheduled,
    OrderStatus::InProduction,
    OrderStatus::QcPending,
    OrderStatus::Released,
    OrderStatus::Dispatched,
    OrderStatus::Delivered,
    OrderStatus::Cancelled,
    OrderStatus::Rejected,
    OrderStatus::FailedQc,
    OrderStatus::Rework,
];

const ALL_BATCH: [BatchStatus; 8] = [
    BatchStatus::Planned,
    BatchStatus::Synthesis,
    BatchStatus::QcPending,
    BatchStatus::QcPassed,
    BatchStatus::QcFailed,
    BatchStatus::Released,
    BatchStatus::Dispatched,
    BatchStatus::Cancelled,
];

const ALL_SHIPMENT: [ShipmentStatus; 7] = [
    ShipmentStatus::Pending,
    ShipmentStatus::PickedUp,
    ShipmentStatus::InTransit,
    ShipmentStatus::Delivered,
    ShipmentStatus::Failed,
    ShipmentStatus::Returned,
    ShipmentStatus::Cancelled,
];

const ALL_ROLES: [UserRole; 8] = [
    UserRole::Sales,
    UserRole::ProductionPlanner,
    UserRole::ProductionOperator,
    UserRole::QcAnalyst,
    UserRole::QualifiedPerson,
    UserRole::Logistics,
    UserRole::Finance,
    UserRole::Admin,
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Admins pass every role gate, so the guard accepts exactly the
    /// allow-listed pairs for them.
    #[test]
    fn prop_admin_guard_mirrors_allow_list(
        from in select(&ALL_ORDER[..]),
        to in select(&ALL_ORDER[..]),
    ) {
        let allowed = from.can_transition(to);
        let result = check_transition(from, to, UserRole::Admin);
        prop_assert_eq!(result.is_ok(), allowed);
    }

    /// The guard never accepts a pair off the allow-list, whatever the
    /// caller's role.
    #[test]
    fn prop_guard_accepts_only_listed_pairs(
        from in select(&ALL_BATCH[..]),
        to in select(&ALL_BATCH[..]),
        role in select(&ALL_ROLES[..]),
    ) {
        if check_transition(from, to, role).is_ok() {
            prop_assert!(from.can_transition(to));
        }
    }

    /// Batch release is gated: only a qualified person or an admin gets
    /// through the QC_PASSED to RELEASED edge.
    #[test]
    fn prop_batch_release_gate(role in select(&ALL_ROLES[..])) {
        let result = check_transition(BatchStatus::QcPassed, BatchStatus::Released, role);
        let permitted = matches!(role, UserRole::QualifiedPerson | UserRole::Admin);
        prop_assert_eq!(result.is_ok(), permitted);
    }

    /// Shipment transitions carry no role gates; outcome depends only on
    /// the allow-list.
    #[test]
    fn prop_shipment_transitions_role_independent(
        from in select(&ALL_SHIPMENT[..]),
        to in select(&ALL_SHIPMENT[..]),
        role_a in select(&ALL_ROLES[..]),
        role_b in select(&ALL_ROLES[..]),
    ) {
        let a = check_transition(from, to, role_a).is_ok();
        let b = check_transition(from, to, role_b).is_ok();
        prop_assert_eq!(a, b);
    }
}

#[cfg(test)]
mod exhaustive_tests {
    use super::*;

    fn assert_machine_invariants<S: StatusFlow + std::fmt::Debug>(all: &[S]) {
        for &status in all {
            // Wire strings parse back to the same variant.
            assert_eq!(S::parse(status.as_str()), Some(status), "{status}");
            // Lowercase wire strings are rejected.
            assert_eq!(S::parse(&status.as_str().to_lowercase()), None, "{status}");
            // No status may transition to itself.
            assert!(!status.can_transition(status), "{status}");
        }
        assert_eq!(S::parse(""), None);
        assert_eq!(S::parse("NO_SUCH_STATUS"), None);
    }

    #[test]
    fn test_all_machines_hold_invariants() {
        assert_machine_invariants(&ALL_ORDER);
        assert_machine_invariants(&ALL_BATCH);
        assert_machine_invariants(&ALL_SHIPMENT);
        assert_machine_invariants(&[
            InvoiceStatus::Draft,
            InvoiceStatus::Issued,
            InvoiceStatus::Paid,
            InvoiceStatus::Overdue,
            InvoiceStatus::Cancelled,
        ]);
        assert_machine_invariants(&[
            PaymentRequestStatus::Pending,
            PaymentRequestStatus::Approved,
            PaymentRequestStatus::Rejected,
            PaymentRequestStatus::Paid,
        ]);
        assert_machine_invariants(&[
            TicketStatus::Open,
            TicketStatus::InProgress,
            TicketStatus::Resolved,
            TicketStatus::Closed,
            TicketStatus::Reopened,
        ]);
    }
}
