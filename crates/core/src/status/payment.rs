//! Payment request lifecycle statuses.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StatusFlow;
use crate::roles::UserRole;

/// Status of a payment request raised against an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentRequestStatus {
    /// Awaiting finance approval.
    Pending,
    /// Approved by finance.
    Approved,
    /// Rejected by finance.
    Rejected,
    /// Payment executed.
    Paid,
}

impl StatusFlow for PaymentRequestStatus {
    const ENTITY: &'static str = "payment_request";

    fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Paid => "PAID",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            "PAID" => Some(Self::Paid),
            _ => None,
        }
    }

    fn can_transition(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Approved | Self::Rejected) | (Self::Approved, Self::Paid)
        )
    }

    fn required_role(self, to: Self) -> Option<UserRole> {
        match (self, to) {
            (Self::Pending, Self::Approved | Self::Rejected) => Some(UserRole::Finance),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        assert!(PaymentRequestStatus::Pending.can_transition(PaymentRequestStatus::Approved));
        assert!(PaymentRequestStatus::Pending.can_transition(PaymentRequestStatus::Rejected));
        assert!(PaymentRequestStatus::Approved.can_transition(PaymentRequestStatus::Paid));
        assert!(!PaymentRequestStatus::Pending.can_transition(PaymentRequestStatus::Paid));
        assert!(!PaymentRequestStatus::Rejected.can_transition(PaymentRequestStatus::Approved));
    }

    #[test]
    fn test_finance_gate() {
        assert_eq!(
            PaymentRequestStatus::Pending.required_role(PaymentRequestStatus::Approved),
            Some(UserRole::Finance)
        );
        assert_eq!(
            PaymentRequestStatus::Approved.required_role(PaymentRequestStatus::Paid),
            None
        );
    }
}
