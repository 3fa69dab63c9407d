//! Property-based tests for the workflow runner.

use proptest::prelude::*;
use uuid::Uuid;

use crate::roles::UserRole;
use crate::workflow::error::WorkflowError;
use crate::workflow::runner::{Advancement, WorkflowRunner};
use crate::workflow::types::{ApprovalDecision, ApprovalRequestStatus, RequestView, StepView};

/// Strategy for generating random non-admin roles.
fn arb_non_admin_role() -> impl Strategy<Value = UserRole> {
    prop_oneof![
        Just(UserRole::Sales),
        Just(UserRole::ProductionPlanner),
        Just(UserRole::ProductionOperator),
        Just(UserRole::QcAnalyst),
        Just(UserRole::QualifiedPerson),
        Just(UserRole::Logistics),
        Just(UserRole::Finance),
    ]
}

/// Builds a contiguous step list, one step per role in the input.
fn steps_for(roles: &[UserRole]) -> Vec<StepView> {
    roles
        .iter()
        .enumerate()
        .map(|(i, &role)| {
            #[allow(clippy::cast_possible_truncation)]
            let step_order = i as i16 + 1;
            StepView {
                id: Uuid::new_v4(),
                step_order,
                label: format!("Step {}", i + 1),
                approver_role: role,
                timeout_hours: None,
            }
        })
        .collect()
}

fn pending_at(current: i16, requires_all: bool) -> RequestView {
    RequestView {
        id: Uuid::new_v4(),
        current_step_order: current,
        status: ApprovalRequestStatus::Pending,
        requires_all_steps: requires_all,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any permutation of 1..=n passes step order validation.
    #[test]
    fn prop_permutations_of_contiguous_orders_valid(n in 1i16..20) {
        let mut orders: Vec<i16> = (1..=n).collect();
        // Deterministic shuffle is enough; validation sorts internally.
        orders.reverse();
        prop_assert!(WorkflowRunner::validate_step_orders(&orders).is_ok());
    }

    /// Removing any interior order from 1..=n breaks contiguity.
    #[test]
    fn prop_gap_in_orders_invalid(n in 3i16..20, gap_idx in 0usize..17) {
        let mut orders: Vec<i16> = (1..=n).collect();
        let idx = gap_idx % (orders.len() - 2) + 1;
        orders.remove(idx);
        prop_assert!(matches!(
            WorkflowRunner::validate_step_orders(&orders),
            Err(WorkflowError::NonContiguousSteps(_))
        ));
    }

    /// Duplicated orders are rejected even when the range looks right.
    #[test]
    fn prop_duplicate_orders_invalid(n in 2i16..20, dup_idx in 0usize..18) {
        let mut orders: Vec<i16> = (1..=n).collect();
        let idx = dup_idx % orders.len();
        let dup = orders[idx];
        orders.push(dup);
        prop_assert!(matches!(
            WorkflowRunner::validate_step_orders(&orders),
            Err(WorkflowError::NonContiguousSteps(_))
        ));
    }

    /// Approving the pending step advances to the next order except on
    /// the final step, which completes the request.
    #[test]
    fn prop_in_order_approval_advances_or_completes(
        roles in proptest::collection::vec(arb_non_admin_role(), 1..6),
        step_idx in 0usize..5,
    ) {
        let steps = steps_for(&roles);
        let idx = step_idx % steps.len();
        let current = steps[idx].step_order;
        let request = pending_at(current, true);

        let result = WorkflowRunner::advance(
            &request,
            &steps,
            steps[idx].id,
            steps[idx].approver_role,
            ApprovalDecision::Approved,
        );

        let advancement = result.unwrap();
        if idx + 1 == steps.len() {
            prop_assert_eq!(advancement, Advancement::Approved);
        } else {
            prop_assert_eq!(advancement, Advancement::Advanced { next_step_order: current + 1 });
        }
    }

    /// When not all steps are required, one approval completes the
    /// request from any step.
    #[test]
    fn prop_single_approval_suffices_when_not_all_required(
        roles in proptest::collection::vec(arb_non_admin_role(), 1..6),
        step_idx in 0usize..5,
    ) {
        let steps = steps_for(&roles);
        let idx = step_idx % steps.len();
        let request = pending_at(steps[idx].step_order, false);

        let result = WorkflowRunner::advance(
            &request,
            &steps,
            steps[idx].id,
            steps[idx].approver_role,
            ApprovalDecision::Approved,
        );

        prop_assert_eq!(result.unwrap(), Advancement::Approved);
    }

    /// A rejection terminates the request at any step.
    #[test]
    fn prop_rejection_always_terminates(
        roles in proptest::collection::vec(arb_non_admin_role(), 1..6),
        step_idx in 0usize..5,
        requires_all in any::<bool>(),
    ) {
        let steps = steps_for(&roles);
        let idx = step_idx % steps.len();
        let request = pending_at(steps[idx].step_order, requires_all);

        let result = WorkflowRunner::advance(
            &request,
            &steps,
            steps[idx].id,
            steps[idx].approver_role,
            ApprovalDecision::Rejected,
        );

        prop_assert_eq!(result.unwrap(), Advancement::Rejected);
    }

    /// Only the step's role or an admin may act; any other role fails
    /// with a role mismatch whatever the decision.
    #[test]
    fn prop_role_gate_holds_for_all_role_pairs(
        step_role in arb_non_admin_role(),
        actor_role in arb_non_admin_role(),
        decision in prop_oneof![
            Just(ApprovalDecision::Approved),
            Just(ApprovalDecision::Rejected),
        ],
    ) {
        let steps = steps_for(&[step_role]);
        let request = pending_at(1, true);

        let result = WorkflowRunner::advance(
            &request,
            &steps,
            steps[0].id,
            actor_role,
            decision,
        );

        if actor_role == step_role {
            prop_assert!(result.is_ok());
        } else {
            prop_assert!(
                matches!(result, Err(WorkflowError::RoleMismatch { .. })),
                "expected RoleMismatch, got {:?}",
                result
            );
        }
    }

    /// Terminal requests never advance, whoever acts.
    #[test]
    fn prop_terminal_requests_are_frozen(
        status in prop_oneof![
            Just(ApprovalRequestStatus::Approved),
            Just(ApprovalRequestStatus::Rejected),
        ],
        actor_role in arb_non_admin_role(),
    ) {
        let steps = steps_for(&[actor_role]);
        let mut request = pending_at(1, true);
        request.status = status;

        let result = WorkflowRunner::advance(
            &request,
            &steps,
            steps[0].id,
            actor_role,
            ApprovalDecision::Approved,
        );

        prop_assert!(
            matches!(result, Err(WorkflowError::RequestNotPending { .. })),
            "expected RequestNotPending, got {:?}",
            result
        );
    }
}
