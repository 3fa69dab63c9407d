//! Order lifecycle statuses.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StatusFlow;

/// Status of a customer order.
///
/// The main line runs intake through delivery:
/// DRAFT → SUBMITTED → VALIDATED → SCHEDULED → IN_PRODUCTION →
/// QC_PENDING → RELEASED → DISPATCHED → DELIVERED.
///
/// Side exits: CANCELLED (from DRAFT, SUBMITTED, VALIDATED, SCHEDULED),
/// REJECTED (from SUBMITTED), FAILED_QC (from QC_PENDING), and REWORK
/// (from FAILED_QC, looping back to IN_PRODUCTION).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order is being drafted by sales.
    Draft,
    /// Submitted by the customer or sales for validation.
    Submitted,
    /// Validated against customer license and product availability.
    Validated,
    /// Assigned to a production slot.
    Scheduled,
    /// Synthesis in progress.
    InProduction,
    /// Awaiting quality control results.
    QcPending,
    /// Released for dispatch by a qualified person.
    Released,
    /// Handed to the carrier.
    Dispatched,
    /// Delivered to the customer.
    Delivered,
    /// Cancelled before production started.
    Cancelled,
    /// Rejected during validation.
    Rejected,
    /// Quality control failed.
    FailedQc,
    /// Scheduled for a production rework after failed QC.
    Rework,
}

impl StatusFlow for OrderStatus {
    const ENTITY: &'static str = "order";

    fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Submitted => "SUBMITTED",
            Self::Validated => "VALIDATED",
            Self::Scheduled => "SCHEDULED",
            Self::InProduction => "IN_PRODUCTION",
            Self::QcPending => "QC_PENDING",
            Self::Released => "RELEASED",
            Self::Dispatched => "DISPATCHED",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
            Self::Rejected => "REJECTED",
            Self::FailedQc => "FAILED_QC",
            Self::Rework => "REWORK",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "DRAFT" => Some(Self::Draft),
            "SUBMITTED" => Some(Self::Submitted),
            "VALIDATED" => Some(Self::Validated),
            "SCHEDULED" => Some(Self::Scheduled),
            "IN_PRODUCTION" => Some(Self::InProduction),
            "QC_PENDING" => Some(Self::QcPending),
            "RELEASED" => Some(Self::Released),
            "DISPATCHED" => Some(Self::Dispatched),
            "DELIVERED" => Some(Self::Delivered),
            "CANCELLED" => Some(Self::Cancelled),
            "REJECTED" => Some(Self::Rejected),
            "FAILED_QC" => Some(Self::FailedQc),
            "REWORK" => Some(Self::Rework),
            _ => None,
        }
    }

    fn can_transition(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Draft, Self::Submitted | Self::Cancelled)
                | (
                    Self::Submitted,
                    Self::Validated | Self::Rejected | Self::Cancelled
                )
                | (Self::Validated, Self::Scheduled | Self::Cancelled)
                | (Self::Scheduled, Self::InProduction | Self::Cancelled)
                | (Self::InProduction, Self::QcPending)
                | (Self::QcPending, Self::Released | Self::FailedQc)
                | (Self::FailedQc, Self::Rework)
                | (Self::Rework, Self::InProduction)
                | (Self::Released, Self::Dispatched)
                | (Self::Dispatched, Self::Delivered)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [OrderStatus; 13] = [
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

    #[test]
    fn test_parse_round_trip() {
        for status in ALL {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("draft"), None);
        assert_eq!(OrderStatus::parse("UNKNOWN"), None);
    }

    #[test]
    fn test_main_line() {
        assert!(OrderStatus::Draft.can_transition(OrderStatus::Submitted));
        assert!(OrderStatus::Submitted.can_transition(OrderStatus::Validated));
        assert!(OrderStatus::Validated.can_transition(OrderStatus::Scheduled));
        assert!(OrderStatus::Scheduled.can_transition(OrderStatus::InProduction));
        assert!(OrderStatus::InProduction.can_transition(OrderStatus::QcPending));
        assert!(OrderStatus::QcPending.can_transition(OrderStatus::Released));
        assert!(OrderStatus::Released.can_transition(OrderStatus::Dispatched));
        assert!(OrderStatus::Dispatched.can_transition(OrderStatus::Delivered));
    }

    #[test]
    fn test_side_exits() {
        assert!(OrderStatus::Submitted.can_transition(OrderStatus::Rejected));
        assert!(OrderStatus::QcPending.can_transition(OrderStatus::FailedQc));
        assert!(OrderStatus::FailedQc.can_transition(OrderStatus::Rework));
        assert!(OrderStatus::Rework.can_transition(OrderStatus::InProduction));
        for from in [
            OrderStatus::Draft,
            OrderStatus::Submitted,
            OrderStatus::Validated,
            OrderStatus::Scheduled,
        ] {
            assert!(from.can_transition(OrderStatus::Cancelled), "{from}");
        }
    }

    #[test]
    fn test_no_self_transitions() {
        for status in ALL {
            assert!(!status.can_transition(status), "{status}");
        }
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for terminal in [
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
            OrderStatus::Rejected,
        ] {
            for to in ALL {
                assert!(!terminal.can_transition(to), "{terminal} -> {to}");
            }
        }
    }

    #[test]
    fn test_no_backward_or_skip() {
        assert!(!OrderStatus::Validated.can_transition(OrderStatus::Submitted));
        assert!(!OrderStatus::Draft.can_transition(OrderStatus::Delivered));
        assert!(!OrderStatus::Submitted.can_transition(OrderStatus::Scheduled));
        assert!(!OrderStatus::InProduction.can_transition(OrderStatus::Cancelled));
    }

    #[test]
    fn test_serde_wire_format() {
        let json = serde_json::to_string(&OrderStatus::QcPending).unwrap();
        assert_eq!(json, "\"QC_PENDING\"");
        let parsed: OrderStatus = serde_json::from_str("\"IN_PRODUCTION\"").unwrap();
        assert_eq!(parsed, OrderStatus::InProduction);
    }
}
