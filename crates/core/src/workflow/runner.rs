//! The approval workflow runner.
//!
//! Stateless advancement logic: given the current request state, the
//! workflow's steps, and one approver's decision, compute the next
//! request state. Persistence happens in the repository layer; this
//! module never touches the database.

use uuid::Uuid;

use crate::roles::UserRole;
use crate::workflow::error::WorkflowError;
use crate::workflow::types::{ApprovalDecision, ApprovalRequestStatus, RequestView, StepView};

/// Outcome of applying one approval decision to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advancement {
    /// Step approved, more steps remain. `current_step_order` moves on.
    Advanced {
        /// The step order now pending.
        next_step_order: i16,
    },
    /// All required steps approved; the request is terminal.
    Approved,
    /// Rejected; the request is terminal regardless of remaining steps.
    Rejected,
}

/// Stateless engine for validating and advancing approval requests.
pub struct WorkflowRunner;

impl WorkflowRunner {
    /// Applies one approver's decision to a pending request.
    ///
    /// Preconditions, checked in order:
    /// 1. the request is PENDING;
    /// 2. `acted_step_id` is the step at `current_step_order`;
    /// 3. the actor's role matches the step's approver role.
    ///
    /// On approval of the final step - or of any step when the workflow
    /// does not require all steps - the request completes. A rejection
    /// terminates the request unconditionally.
    ///
    /// # Errors
    ///
    /// * `RequestNotPending` if the request is already terminal.
    /// * `StepMismatch` for out-of-order or unknown steps.
    /// * `RoleMismatch` if the actor may not act on the pending step.
    /// * `NoSteps` if the workflow has no steps at all.
    pub fn advance(
        request: &RequestView,
        steps: &[StepView],
        acted_step_id: Uuid,
        actor_role: UserRole,
        decision: ApprovalDecision,
    ) -> Result<Advancement, WorkflowError> {
        if request.status != ApprovalRequestStatus::Pending {
            return Err(WorkflowError::RequestNotPending {
                status: request.status,
            });
        }

        let pending = steps
            .iter()
            .find(|s| s.step_order == request.current_step_order)
            .ok_or(WorkflowError::NoSteps)?;

        if pending.id != acted_step_id {
            return Err(WorkflowError::StepMismatch {
                expected_order: request.current_step_order,
                acted_step: acted_step_id,
            });
        }

        if !actor_role.satisfies(pending.approver_role) {
            return Err(WorkflowError::RoleMismatch {
                required: pending.approver_role,
                actual: actor_role,
            });
        }

        match decision {
            ApprovalDecision::Rejected => Ok(Advancement::Rejected),
            ApprovalDecision::Approved => {
                let last_order = steps.iter().map(|s| s.step_order).max().unwrap_or(0);

                if pending.step_order >= last_order || !request.requires_all_steps {
                    Ok(Advancement::Approved)
                } else {
                    Ok(Advancement::Advanced {
                        next_step_order: request.current_step_order + 1,
                    })
                }
            }
        }
    }

    /// Validates that step orders are unique and contiguous from 1.
    ///
    /// Called when a workflow definition is created or its steps replaced.
    ///
    /// # Errors
    ///
    /// * `NoSteps` if the list is empty.
    /// * `NonContiguousSteps` if orders are not exactly `1..=n`.
    pub fn validate_step_orders(orders: &[i16]) -> Result<(), WorkflowError> {
        if orders.is_empty() {
            return Err(WorkflowError::NoSteps);
        }

        let mut sorted = orders.to_vec();
        sorted.sort_unstable();

        let contiguous = sorted
            .iter()
            .enumerate()
            .all(|(i, &order)| i64::from(order) == i as i64 + 1);

        if contiguous {
            Ok(())
        } else {
            Err(WorkflowError::NonContiguousSteps(sorted))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(order: i16, role: UserRole) -> StepView {
        StepView {
            id: Uuid::new_v4(),
            step_order: order,
            label: format!("Step {order}"),
            approver_role: role,
            timeout_hours: None,
        }
    }

    fn pending_request(current: i16, requires_all: bool) -> RequestView {
        RequestView {
            id: Uuid::new_v4(),
            current_step_order: current,
            status: ApprovalRequestStatus::Pending,
            requires_all_steps: requires_all,
        }
    }

    #[test]
    fn test_approve_intermediate_step_advances() {
        let steps = vec![
            step(1, UserRole::Sales),
            step(2, UserRole::ProductionPlanner),
        ];
        let request = pending_request(1, true);

        let result = WorkflowRunner::advance(
            &request,
            &steps,
            steps[0].id,
            UserRole::Sales,
            ApprovalDecision::Approved,
        )
        .unwrap();

        assert_eq!(result, Advancement::Advanced { next_step_order: 2 });
    }

    #[test]
    fn test_approve_final_step_completes() {
        let steps = vec![
            step(1, UserRole::Sales),
            step(2, UserRole::ProductionPlanner),
        ];
        let request = pending_request(2, true);

        let result = WorkflowRunner::advance(
            &request,
            &steps,
            steps[1].id,
            UserRole::ProductionPlanner,
            ApprovalDecision::Approved,
        )
        .unwrap();

        assert_eq!(result, Advancement::Approved);
    }

    #[test]
    fn test_any_step_suffices_when_not_all_required() {
        let steps = vec![step(1, UserRole::Sales), step(2, UserRole::Finance)];
        let request = pending_request(1, false);

        let result = WorkflowRunner::advance(
            &request,
            &steps,
            steps[0].id,
            UserRole::Sales,
            ApprovalDecision::Approved,
        )
        .unwrap();

        assert_eq!(result, Advancement::Approved);
    }

    #[test]
    fn test_reject_terminates_regardless_of_remaining_steps() {
        let steps = vec![
            step(1, UserRole::Sales),
            step(2, UserRole::ProductionPlanner),
            step(3, UserRole::QualifiedPerson),
        ];
        let request = pending_request(1, true);

        let result = WorkflowRunner::advance(
            &request,
            &steps,
            steps[0].id,
            UserRole::Sales,
            ApprovalDecision::Rejected,
        )
        .unwrap();

        assert_eq!(result, Advancement::Rejected);
    }

    #[test]
    fn test_out_of_order_step_rejected() {
        let steps = vec![
            step(1, UserRole::Sales),
            step(2, UserRole::ProductionPlanner),
        ];
        let request = pending_request(1, true);

        let result = WorkflowRunner::advance(
            &request,
            &steps,
            steps[1].id, // acting on step 2 while step 1 is pending
            UserRole::ProductionPlanner,
            ApprovalDecision::Approved,
        );

        assert!(matches!(result, Err(WorkflowError::StepMismatch { .. })));
    }

    #[test]
    fn test_wrong_role_rejected_without_side_effects() {
        let steps = vec![step(1, UserRole::Sales)];
        let request = pending_request(1, true);

        let result = WorkflowRunner::advance(
            &request,
            &steps,
            steps[0].id,
            UserRole::Logistics,
            ApprovalDecision::Approved,
        );

        assert!(matches!(result, Err(WorkflowError::RoleMismatch { .. })));
    }

    #[test]
    fn test_admin_can_act_on_any_step() {
        let steps = vec![step(1, UserRole::QualifiedPerson)];
        let request = pending_request(1, true);

        let result = WorkflowRunner::advance(
            &request,
            &steps,
            steps[0].id,
            UserRole::Admin,
            ApprovalDecision::Approved,
        );

        assert!(result.is_ok());
    }

    #[test]
    fn test_terminal_request_cannot_advance() {
        let steps = vec![step(1, UserRole::Sales)];
        let mut request = pending_request(1, true);
        request.status = ApprovalRequestStatus::Approved;

        let result = WorkflowRunner::advance(
            &request,
            &steps,
            steps[0].id,
            UserRole::Sales,
            ApprovalDecision::Approved,
        );

        assert!(matches!(
            result,
            Err(WorkflowError::RequestNotPending { .. })
        ));
    }

    #[test]
    fn test_validate_step_orders() {
        assert!(WorkflowRunner::validate_step_orders(&[1]).is_ok());
        assert!(WorkflowRunner::validate_step_orders(&[2, 1, 3]).is_ok());
        assert!(matches!(
            WorkflowRunner::validate_step_orders(&[]),
            Err(WorkflowError::NoSteps)
        ));
        assert!(matches!(
            WorkflowRunner::validate_step_orders(&[1, 3]),
            Err(WorkflowError::NonContiguousSteps(_))
        ));
        assert!(matches!(
            WorkflowRunner::validate_step_orders(&[0, 1]),
            Err(WorkflowError::NonContiguousSteps(_))
        ));
        assert!(matches!(
            WorkflowRunner::validate_step_orders(&[1, 1, 2]),
            Err(WorkflowError::NonContiguousSteps(_))
        ));
    }

    #[test]
    fn test_full_sequence_in_order() {
        // Walk a three-step workflow to completion.
        let steps = vec![
            step(1, UserRole::Sales),
            step(2, UserRole::ProductionPlanner),
            step(3, UserRole::Finance),
        ];
        let mut request = pending_request(1, true);

        let roles = [UserRole::Sales, UserRole::ProductionPlanner, UserRole::Finance];
        for (i, role) in roles.iter().enumerate() {
            let result = WorkflowRunner::advance(
                &request,
                &steps,
                steps[i].id,
                *role,
                ApprovalDecision::Approved,
            )
            .unwrap();

            if i < 2 {
                let Advancement::Advanced { next_step_order } = result else {
                    panic!("expected advancement at step {}", i + 1);
                };
                request.current_step_order = next_step_order;
            } else {
                assert_eq!(result, Advancement::Approved);
            }
        }
    }
}
