//! `SeaORM` active enums backing Postgres enum types.
//!
//! Each enum mirrors a core domain enum; `From` impls convert in both
//! directions so repositories can run the pure guards from
//! `isotrack-core` against stored values.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User role (`user_role`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
pub enum UserRole {
    /// Customer-facing order intake.
    #[sea_orm(string_value = "sales")]
    Sales,
    /// Plans production batches and schedules orders.
    #[sea_orm(string_value = "production_planner")]
    ProductionPlanner,
    /// Runs synthesis on the production line.
    #[sea_orm(string_value = "production_operator")]
    ProductionOperator,
    /// Performs quality control analysis.
    #[sea_orm(string_value = "qc_analyst")]
    QcAnalyst,
    /// Authorized to release batches after QC passes.
    #[sea_orm(string_value = "qualified_person")]
    QualifiedPerson,
    /// Dispatch and delivery tracking.
    #[sea_orm(string_value = "logistics")]
    Logistics,
    /// Invoicing and payment approval.
    #[sea_orm(string_value = "finance")]
    Finance,
    /// Full administrative access.
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl From<isotrack_core::UserRole> for UserRole {
    fn from(role: isotrack_core::UserRole) -> Self {
        use isotrack_core::UserRole as Core;
        match role {
            Core::Sales => Self::Sales,
            Core::ProductionPlanner => Self::ProductionPlanner,
            Core::ProductionOperator => Self::ProductionOperator,
            Core::QcAnalyst => Self::QcAnalyst,
            Core::QualifiedPerson => Self::QualifiedPerson,
            Core::Logistics => Self::Logistics,
            Core::Finance => Self::Finance,
            Core::Admin => Self::Admin,
        }
    }
}

impl From<UserRole> for isotrack_core::UserRole {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Sales => Self::Sales,
            UserRole::ProductionPlanner => Self::ProductionPlanner,
            UserRole::ProductionOperator => Self::ProductionOperator,
            UserRole::QcAnalyst => Self::QcAnalyst,
            UserRole::QualifiedPerson => Self::QualifiedPerson,
            UserRole::Logistics => Self::Logistics,
            UserRole::Finance => Self::Finance,
            UserRole::Admin => Self::Admin,
        }
    }
}

/// Order status (`order_status`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "order_status")]
pub enum OrderStatus {
    /// Being drafted.
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    /// Submitted for validation.
    #[sea_orm(string_value = "SUBMITTED")]
    Submitted,
    /// Validated.
    #[sea_orm(string_value = "VALIDATED")]
    Validated,
    /// Assigned to a production slot.
    #[sea_orm(string_value = "SCHEDULED")]
    Scheduled,
    /// Synthesis in progress.
    #[sea_orm(string_value = "IN_PRODUCTION")]
    InProduction,
    /// Awaiting QC results.
    #[sea_orm(string_value = "QC_PENDING")]
    QcPending,
    /// Released for dispatch.
    #[sea_orm(string_value = "RELEASED")]
    Released,
    /// Handed to the carrier.
    #[sea_orm(string_value = "DISPATCHED")]
    Dispatched,
    /// Delivered.
    #[sea_orm(string_value = "DELIVERED")]
    Delivered,
    /// Cancelled.
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
    /// Rejected during validation.
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
    /// QC failed.
    #[sea_orm(string_value = "FAILED_QC")]
    FailedQc,
    /// Queued for rework.
    #[sea_orm(string_value = "REWORK")]
    Rework,
}

impl From<isotrack_core::status::OrderStatus> for OrderStatus {
    fn from(status: isotrack_core::status::OrderStatus) -> Self {
        use isotrack_core::status::OrderStatus as Core;
        match status {
            Core::Draft => Self::Draft,
            Core::Submitted => Self::Submitted,
            Core::Validated => Self::Validated,
            Core::Scheduled => Self::Scheduled,
            Core::InProduction => Self::InProduction,
            Core::QcPending => Self::QcPending,
            Core::Released => Self::Released,
            Core::Dispatched => Self::Dispatched,
            Core::Delivered => Self::Delivered,
            Core::Cancelled => Self::Cancelled,
            Core::Rejected => Self::Rejected,
            Core::FailedQc => Self::FailedQc,
            Core::Rework => Self::Rework,
        }
    }
}

impl From<OrderStatus> for isotrack_core::status::OrderStatus {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Draft => Self::Draft,
            OrderStatus::Submitted => Self::Submitted,
            OrderStatus::Validated => Self::Validated,
            OrderStatus::Scheduled => Self::Scheduled,
            OrderStatus::InProduction => Self::InProduction,
            OrderStatus::QcPending => Self::QcPending,
            OrderStatus::Released => Self::Released,
            OrderStatus::Dispatched => Self::Dispatched,
            OrderStatus::Delivered => Self::Delivered,
            OrderStatus::Cancelled => Self::Cancelled,
            OrderStatus::Rejected => Self::Rejected,
            OrderStatus::FailedQc => Self::FailedQc,
            OrderStatus::Rework => Self::Rework,
        }
    }
}

/// Production batch status (`batch_status`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "batch_status")]
pub enum BatchStatus {
    /// Planned.
    #[sea_orm(string_value = "PLANNED")]
    Planned,
    /// Synthesis running.
    #[sea_orm(string_value = "SYNTHESIS")]
    Synthesis,
    /// Awaiting QC.
    #[sea_orm(string_value = "QC_PENDING")]
    QcPending,
    /// QC passed.
    #[sea_orm(string_value = "QC_PASSED")]
    QcPassed,
    /// QC failed.
    #[sea_orm(string_value = "QC_FAILED")]
    QcFailed,
    /// Released by a qualified person.
    #[sea_orm(string_value = "RELEASED")]
    Released,
    /// Dispatched.
    #[sea_orm(string_value = "DISPATCHED")]
    Dispatched,
    /// Cancelled.
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

impl From<isotrack_core::status::BatchStatus> for BatchStatus {
    fn from(status: isotrack_core::status::BatchStatus) -> Self {
        use isotrack_core::status::BatchStatus as Core;
        match status {
            Core::Planned => Self::Planned,
            Core::Synthesis => Self::Synthesis,
            Core::QcPending => Self::QcPending,
            Core::QcPassed => Self::QcPassed,
            Core::QcFailed => Self::QcFailed,
            Core::Released => Self::Released,
            Core::Dispatched => Self::Dispatched,
            Core::Cancelled => Self::Cancelled,
        }
    }
}

impl From<BatchStatus> for isotrack_core::status::BatchStatus {
    fn from(status: BatchStatus) -> Self {
        match status {
            BatchStatus::Planned => Self::Planned,
            BatchStatus::Synthesis => Self::Synthesis,
            BatchStatus::QcPending => Self::QcPending,
            BatchStatus::QcPassed => Self::QcPassed,
            BatchStatus::QcFailed => Self::QcFailed,
            BatchStatus::Released => Self::Released,
            BatchStatus::Dispatched => Self::Dispatched,
            BatchStatus::Cancelled => Self::Cancelled,
        }
    }
}

/// Shipment status (`shipment_status`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "shipment_status")]
pub enum ShipmentStatus {
    /// Awaiting carrier pickup.
    #[sea_orm(string_value = "PENDING")]
    Pending,
    /// Collected by the carrier.
    #[sea_orm(string_value = "PICKED_UP")]
    PickedUp,
    /// In transit.
    #[sea_orm(string_value = "IN_TRANSIT")]
    InTransit,
    /// Delivered.
    #[sea_orm(string_value = "DELIVERED")]
    Delivered,
    /// Delivery failed.
    #[sea_orm(string_value = "FAILED")]
    Failed,
    /// Returned after failure.
    #[sea_orm(string_value = "RETURNED")]
    Returned,
    /// Cancelled before pickup.
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

impl From<isotrack_core::status::ShipmentStatus> for ShipmentStatus {
    fn from(status: isotrack_core::status::ShipmentStatus) -> Self {
        use isotrack_core::status::ShipmentStatus as Core;
        match status {
            Core::Pending => Self::Pending,
            Core::PickedUp => Self::PickedUp,
            Core::InTransit => Self::InTransit,
            Core::Delivered => Self::Delivered,
            Core::Failed => Self::Failed,
            Core::Returned => Self::Returned,
            Core::Cancelled => Self::Cancelled,
        }
    }
}

impl From<ShipmentStatus> for isotrack_core::status::ShipmentStatus {
    fn from(status: ShipmentStatus) -> Self {
        match status {
            ShipmentStatus::Pending => Self::Pending,
            ShipmentStatus::PickedUp => Self::PickedUp,
            ShipmentStatus::InTransit => Self::InTransit,
            ShipmentStatus::Delivered => Self::Delivered,
            ShipmentStatus::Failed => Self::Failed,
            ShipmentStatus::Returned => Self::Returned,
            ShipmentStatus::Cancelled => Self::Cancelled,
        }
    }
}

/// Invoice status (`invoice_status`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "invoice_status")]
pub enum InvoiceStatus {
    /// Drafted.
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    /// Issued to the customer.
    #[sea_orm(string_value = "ISSUED")]
    Issued,
    /// Paid in full.
    #[sea_orm(string_value = "PAID")]
    Paid,
    /// Past due date.
    #[sea_orm(string_value = "OVERDUE")]
    Overdue,
    /// Cancelled.
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

impl From<isotrack_core::status::InvoiceStatus> for InvoiceStatus {
    fn from(status: isotrack_core::status::InvoiceStatus) -> Self {
        use isotrack_core::status::InvoiceStatus as Core;
        match status {
            Core::Draft => Self::Draft,
            Core::Issued => Self::Issued,
            Core::Paid => Self::Paid,
            Core::Overdue => Self::Overdue,
            Core::Cancelled => Self::Cancelled,
        }
    }
}

impl From<InvoiceStatus> for isotrack_core::status::InvoiceStatus {
    fn from(status: InvoiceStatus) -> Self {
        match status {
            InvoiceStatus::Draft => Self::Draft,
            InvoiceStatus::Issued => Self::Issued,
            InvoiceStatus::Paid => Self::Paid,
            InvoiceStatus::Overdue => Self::Overdue,
            InvoiceStatus::Cancelled => Self::Cancelled,
        }
    }
}

/// Payment request status (`payment_request_status`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "payment_request_status"
)]
pub enum PaymentRequestStatus {
    /// Awaiting finance approval.
    #[sea_orm(string_value = "PENDING")]
    Pending,
    /// Approved by finance.
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    /// Rejected by finance.
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
    /// Paid.
    #[sea_orm(string_value = "PAID")]
    Paid,
}

impl From<isotrack_core::status::PaymentRequestStatus> for PaymentRequestStatus {
    fn from(status: isotrack_core::status::PaymentRequestStatus) -> Self {
        use isotrack_core::status::PaymentRequestStatus as Core;
        match status {
            Core::Pending => Self::Pending,
            Core::Approved => Self::Approved,
            Core::Rejected => Self::Rejected,
            Core::Paid => Self::Paid,
        }
    }
}

impl From<PaymentRequestStatus> for isotrack_core::status::PaymentRequestStatus {
    fn from(status: PaymentRequestStatus) -> Self {
        match status {
            PaymentRequestStatus::Pending => Self::Pending,
            PaymentRequestStatus::Approved => Self::Approved,
            PaymentRequestStatus::Rejected => Self::Rejected,
            PaymentRequestStatus::Paid => Self::Paid,
        }
    }
}

/// Support ticket status (`ticket_status`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "ticket_status")]
pub enum TicketStatus {
    /// Open.
    #[sea_orm(string_value = "OPEN")]
    Open,
    /// In progress.
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    /// Resolved.
    #[sea_orm(string_value = "RESOLVED")]
    Resolved,
    /// Closed.
    #[sea_orm(string_value = "CLOSED")]
    Closed,
    /// Reopened.
    #[sea_orm(string_value = "REOPENED")]
    Reopened,
}

impl From<isotrack_core::status::TicketStatus> for TicketStatus {
    fn from(status: isotrack_core::status::TicketStatus) -> Self {
        use isotrack_core::status::TicketStatus as Core;
        match status {
            Core::Open => Self::Open,
            Core::InProgress => Self::InProgress,
            Core::Resolved => Self::Resolved,
            Core::Closed => Self::Closed,
            Core::Reopened => Self::Reopened,
        }
    }
}

impl From<TicketStatus> for isotrack_core::status::TicketStatus {
    fn from(status: TicketStatus) -> Self {
        match status {
            TicketStatus::Open => Self::Open,
            TicketStatus::InProgress => Self::InProgress,
            TicketStatus::Resolved => Self::Resolved,
            TicketStatus::Closed => Self::Closed,
            TicketStatus::Reopened => Self::Reopened,
        }
    }
}

/// Entity type governed by workflows and referenced by audit logs
/// (`entity_kind`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entity_kind")]
pub enum EntityKind {
    /// Customer order.
    #[sea_orm(string_value = "ORDER")]
    Order,
    /// Production batch.
    #[sea_orm(string_value = "BATCH")]
    Batch,
    /// Shipment.
    #[sea_orm(string_value = "SHIPMENT")]
    Shipment,
    /// Invoice.
    #[sea_orm(string_value = "INVOICE")]
    Invoice,
    /// Payment request.
    #[sea_orm(string_value = "PAYMENT_REQUEST")]
    PaymentRequest,
    /// Support ticket.
    #[sea_orm(string_value = "SUPPORT_TICKET")]
    SupportTicket,
    /// Product catalogue entry (audit trail only).
    #[sea_orm(string_value = "PRODUCT")]
    Product,
    /// User account (audit trail only).
    #[sea_orm(string_value = "USER")]
    User,
    /// Customer record.
    #[sea_orm(string_value = "CUSTOMER")]
    Customer,
}

impl From<isotrack_core::workflow::EntityKind> for EntityKind {
    fn from(kind: isotrack_core::workflow::EntityKind) -> Self {
        use isotrack_core::workflow::EntityKind as Core;
        match kind {
            Core::Order => Self::Order,
            Core::Batch => Self::Batch,
            Core::Shipment => Self::Shipment,
            Core::Invoice => Self::Invoice,
            Core::PaymentRequest => Self::PaymentRequest,
            Core::SupportTicket => Self::SupportTicket,
            Core::Customer => Self::Customer,
            Core::Product => Self::Product,
            Core::User => Self::User,
        }
    }
}

impl From<EntityKind> for isotrack_core::workflow::EntityKind {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Order => Self::Order,
            EntityKind::Batch => Self::Batch,
            EntityKind::Shipment => Self::Shipment,
            EntityKind::Invoice => Self::Invoice,
            EntityKind::PaymentRequest => Self::PaymentRequest,
            EntityKind::SupportTicket => Self::SupportTicket,
            EntityKind::Customer => Self::Customer,
            EntityKind::Product => Self::Product,
            EntityKind::User => Self::User,
        }
    }
}

/// Approval request status (`approval_request_status`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "approval_request_status"
)]
pub enum ApprovalRequestStatus {
    /// Awaiting approvals.
    #[sea_orm(string_value = "PENDING")]
    Pending,
    /// Approved. Terminal.
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    /// Rejected. Terminal.
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

impl From<isotrack_core::workflow::ApprovalRequestStatus> for ApprovalRequestStatus {
    fn from(status: isotrack_core::workflow::ApprovalRequestStatus) -> Self {
        use isotrack_core::workflow::ApprovalRequestStatus as Core;
        match status {
            Core::Pending => Self::Pending,
            Core::Approved => Self::Approved,
            Core::Rejected => Self::Rejected,
        }
    }
}

impl From<ApprovalRequestStatus> for isotrack_core::workflow::ApprovalRequestStatus {
    fn from(status: ApprovalRequestStatus) -> Self {
        match status {
            ApprovalRequestStatus::Pending => Self::Pending,
            ApprovalRequestStatus::Approved => Self::Approved,
            ApprovalRequestStatus::Rejected => Self::Rejected,
        }
    }
}

/// Approval decision (`approval_decision`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "approval_decision")]
pub enum ApprovalDecision {
    /// Step approved.
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    /// Step rejected.
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

impl From<isotrack_core::workflow::ApprovalDecision> for ApprovalDecision {
    fn from(decision: isotrack_core::workflow::ApprovalDecision) -> Self {
        use isotrack_core::workflow::ApprovalDecision as Core;
        match decision {
            Core::Approved => Self::Approved,
            Core::Rejected => Self::Rejected,
        }
    }
}

/// Audit action kind (`audit_action`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "audit_action")]
pub enum AuditAction {
    /// Entity created.
    #[sea_orm(string_value = "CREATE")]
    Create,
    /// Entity updated.
    #[sea_orm(string_value = "UPDATE")]
    Update,
    /// Entity deleted.
    #[sea_orm(string_value = "DELETE")]
    Delete,
    /// Status changed.
    #[sea_orm(string_value = "STATUS_CHANGE")]
    StatusChange,
    /// User signed in.
    #[sea_orm(string_value = "LOGIN")]
    Login,
}

impl From<isotrack_core::audit::AuditAction> for AuditAction {
    fn from(action: isotrack_core::audit::AuditAction) -> Self {
        use isotrack_core::audit::AuditAction as Core;
        match action {
            Core::Create => Self::Create,
            Core::Update => Self::Update,
            Core::Delete => Self::Delete,
            Core::StatusChange => Self::StatusChange,
            Core::Login => Self::Login,
        }
    }
}
