//! `SeaORM` entity definitions.

pub mod approval_actions;
pub mod approval_requests;
pub mod approval_steps;
pub mod audit_logs;
pub mod batch_events;
pub mod customers;
pub mod invoices;
pub mod order_events;
pub mod orders;
pub mod payment_requests;
pub mod production_batches;
pub mod products;
pub mod sea_orm_active_enums;
pub mod shipment_events;
pub mod shipments;
pub mod support_tickets;
pub mod users;
pub mod workflow_definitions;
