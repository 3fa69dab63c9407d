//! Invoice lifecycle statuses.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StatusFlow;

/// Status of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    /// Drafted, not yet sent to the customer.
    Draft,
    /// Issued to the customer.
    Issued,
    /// Payment received in full.
    Paid,
    /// Past the due date without payment.
    Overdue,
    /// Cancelled before payment.
    Cancelled,
}

impl StatusFlow for InvoiceStatus {
    const ENTITY: &'static str = "invoice";

    fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Issued => "ISSUED",
            Self::Paid => "PAID",
            Self::Overdue => "OVERDUE",
            Self::Cancelled => "CANCELLED",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "DRAFT" => Some(Self::Draft),
            "ISSUED" => Some(Self::Issued),
            "PAID" => Some(Self::Paid),
            "OVERDUE" => Some(Self::Overdue),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    fn can_transition(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Draft, Self::Issued | Self::Cancelled)
                | (Self::Issued, Self::Paid | Self::Overdue | Self::Cancelled)
                | (Self::Overdue, Self::Paid)
        )
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for status in [
            InvoiceStatus::Draft,
            InvoiceStatus::Issued,
            InvoiceStatus::Paid,
            InvoiceStatus::Overdue,
            InvoiceStatus::Cancelled,
        ] {
            assert_eq!(InvoiceStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_transitions() {
        assert!(InvoiceStatus::Draft.can_transition(InvoiceStatus::Issued));
        assert!(InvoiceStatus::Issued.can_transition(InvoiceStatus::Paid));
        assert!(InvoiceStatus::Issued.can_transition(InvoiceStatus::Overdue));
        assert!(InvoiceStatus::Overdue.can_transition(InvoiceStatus::Paid));
        assert!(!InvoiceStatus::Paid.can_transition(InvoiceStatus::Issued));
        assert!(!InvoiceStatus::Draft.can_transition(InvoiceStatus::Paid));
        assert!(!InvoiceStatus::Overdue.can_transition(InvoiceStatus::Cancelled));
    }
}
