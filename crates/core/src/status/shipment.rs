//! Shipment lifecycle statuses.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StatusFlow;

/// Status of a shipment.
///
/// PENDING → PICKED_UP → IN_TRANSIT → DELIVERED, with CANCELLED (before
/// pickup), FAILED (in transit), and RETURNED (after failure) side exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipmentStatus {
    /// Awaiting carrier pickup.
    Pending,
    /// Collected by the carrier.
    PickedUp,
    /// In transit to the customer.
    InTransit,
    /// Delivered to the customer.
    Delivered,
    /// Delivery failed in transit.
    Failed,
    /// Returned to the production site after a failed delivery.
    Returned,
    /// Cancelled before pickup.
    Cancelled,
}

impl StatusFlow for ShipmentStatus {
    const ENTITY: &'static str = "shipment";

    fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::PickedUp => "PICKED_UP",
            Self::InTransit => "IN_TRANSIT",
            Self::Delivered => "DELIVERED",
            Self::Failed => "FAILED",
            Self::Returned => "RETURNED",
            Self::Cancelled => "CANCELLED",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "PICKED_UP" => Some(Self::PickedUp),
            "IN_TRANSIT" => Some(Self::InTransit),
            "DELIVERED" => Some(Self::Delivered),
            "FAILED" => Some(Self::Failed),
            "RETURNED" => Some(Self::Returned),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    fn can_transition(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::PickedUp | Self::Cancelled)
                | (Self::PickedUp, Self::InTransit)
                | (Self::InTransit, Self::Delivered | Self::Failed)
                | (Self::Failed, Self::Returned)
        )
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ShipmentStatus; 7] = [
        ShipmentStatus::Pending,
        ShipmentStatus::PickedUp,
        ShipmentStatus::InTransit,
        ShipmentStatus::Delivered,
        ShipmentStatus::Failed,
        ShipmentStatus::Returned,
        ShipmentStatus::Cancelled,
    ];

    #[test]
    fn test_parse_round_trip() {
        for status in ALL {
            assert_eq!(ShipmentStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_main_line() {
        assert!(ShipmentStatus::Pending.can_transition(ShipmentStatus::PickedUp));
        assert!(ShipmentStatus::PickedUp.can_transition(ShipmentStatus::InTransit));
        assert!(ShipmentStatus::InTransit.can_transition(ShipmentStatus::Delivered));
    }

    #[test]
    fn test_failure_path() {
        assert!(ShipmentStatus::InTransit.can_transition(ShipmentStatus::Failed));
        assert!(ShipmentStatus::Failed.can_transition(ShipmentStatus::Returned));
        assert!(!ShipmentStatus::Failed.can_transition(ShipmentStatus::Delivered));
    }

    #[test]
    fn test_no_self_or_backward() {
        for status in ALL {
            assert!(!status.can_transition(status), "{status}");
        }
        assert!(!ShipmentStatus::InTransit.can_transition(ShipmentStatus::PickedUp));
        assert!(!ShipmentStatus::Delivered.can_transition(ShipmentStatus::InTransit));
    }
}
