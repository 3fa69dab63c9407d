//! Workflow domain types.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::roles::UserRole;

/// Entity types a workflow definition can govern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    /// Customer order.
    Order,
    /// Production batch.
    Batch,
    /// Shipment.
    Shipment,
    /// Invoice.
    Invoice,
    /// Payment request.
    PaymentRequest,
    /// Support ticket.
    SupportTicket,
    /// Customer record.
    Customer,
    /// Product catalogue entry. Audit-only; products have no lifecycle.
    Product,
    /// User account. Audit-only; workflows never govern users.
    User,
}

impl EntityKind {
    /// Returns the wire-level string for this entity kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Order => "ORDER",
            Self::Batch => "BATCH",
            Self::Shipment => "SHIPMENT",
            Self::Invoice => "INVOICE",
            Self::PaymentRequest => "PAYMENT_REQUEST",
            Self::SupportTicket => "SUPPORT_TICKET",
            Self::Customer => "CUSTOMER",
            Self::Product => "PRODUCT",
            Self::User => "USER",
        }
    }

    /// Parses an entity kind from its wire-level string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ORDER" => Some(Self::Order),
            "BATCH" => Some(Self::Batch),
            "SHIPMENT" => Some(Self::Shipment),
            "INVOICE" => Some(Self::Invoice),
            "PAYMENT_REQUEST" => Some(Self::PaymentRequest),
            "SUPPORT_TICKET" => Some(Self::SupportTicket),
            "CUSTOMER" => Some(Self::Customer),
            "PRODUCT" => Some(Self::Product),
            "USER" => Some(Self::User),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Overall status of an approval request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalRequestStatus {
    /// Awaiting one or more approvals.
    Pending,
    /// All required steps approved. Terminal.
    Approved,
    /// Rejected at some step. Terminal.
    Rejected,
}

impl ApprovalRequestStatus {
    /// Returns the wire-level string for this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Parses a status from its wire-level string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for ApprovalRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One approver's decision on a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalDecision {
    /// Step approved.
    Approved,
    /// Step rejected; terminates the whole request.
    Rejected,
}

impl ApprovalDecision {
    /// Returns the wire-level string for this decision.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Parses a decision from its wire-level string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// Read-model of an approval step, as the runner sees it.
#[derive(Debug, Clone)]
pub struct StepView {
    /// Step ID.
    pub id: Uuid,
    /// 1-based position within the workflow.
    pub step_order: i16,
    /// Human label, e.g. "Sales review".
    pub label: String,
    /// The single role permitted to act on this step.
    pub approver_role: UserRole,
    /// Optional timeout in hours. Stored only; no automated enforcement.
    pub timeout_hours: Option<i32>,
}

/// Read-model of an approval request, as the runner sees it.
#[derive(Debug, Clone)]
pub struct RequestView {
    /// Request ID.
    pub id: Uuid,
    /// The step order currently pending.
    pub current_step_order: i16,
    /// Overall request status.
    pub status: ApprovalRequestStatus,
    /// Whether every step must be approved (from the workflow definition).
    pub requires_all_steps: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_round_trip() {
        for kind in [
            EntityKind::Order,
            EntityKind::Batch,
            EntityKind::Shipment,
            EntityKind::Invoice,
            EntityKind::PaymentRequest,
            EntityKind::SupportTicket,
            EntityKind::Customer,
            EntityKind::Product,
            EntityKind::User,
        ] {
            assert_eq!(EntityKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(EntityKind::parse("order"), None);
    }

    #[test]
    fn test_request_status_round_trip() {
        for status in [
            ApprovalRequestStatus::Pending,
            ApprovalRequestStatus::Approved,
            ApprovalRequestStatus::Rejected,
        ] {
            assert_eq!(ApprovalRequestStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_decision_parse() {
        assert_eq!(
            ApprovalDecision::parse("APPROVED"),
            Some(ApprovalDecision::Approved)
        );
        assert_eq!(
            ApprovalDecision::parse("REJECTED"),
            Some(ApprovalDecision::Rejected)
        );
        assert_eq!(ApprovalDecision::parse("MAYBE"), None);
    }
}
