//! Initial database migration.
//!
//! Creates all enums, tables, and indexes for the order management
//! backend.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: USERS & MASTER DATA
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(CUSTOMERS_SQL).await?;
        db.execute_unprepared(PRODUCTS_SQL).await?;

        // ============================================================
        // PART 3: ORDERS & PRODUCTION
        // ============================================================
        db.execute_unprepared(ORDERS_SQL).await?;
        db.execute_unprepared(ORDER_EVENTS_SQL).await?;
        db.execute_unprepared(PRODUCTION_BATCHES_SQL).await?;
        db.execute_unprepared(BATCH_EVENTS_SQL).await?;

        // ============================================================
        // PART 4: LOGISTICS
        // ============================================================
        db.execute_unprepared(SHIPMENTS_SQL).await?;
        db.execute_unprepared(SHIPMENT_EVENTS_SQL).await?;

        // ============================================================
        // PART 5: FINANCE
        // ============================================================
        db.execute_unprepared(INVOICES_SQL).await?;
        db.execute_unprepared(PAYMENT_REQUESTS_SQL).await?;

        // ============================================================
        // PART 6: SUPPORT
        // ============================================================
        db.execute_unprepared(SUPPORT_TICKETS_SQL).await?;

        // ============================================================
        // PART 7: APPROVAL WORKFLOW
        // ============================================================
        db.execute_unprepared(WORKFLOW_DEFINITIONS_SQL).await?;
        db.execute_unprepared(APPROVAL_STEPS_SQL).await?;
        db.execute_unprepared(APPROVAL_REQUESTS_SQL).await?;
        db.execute_unprepared(APPROVAL_ACTIONS_SQL).await?;

        // ============================================================
        // PART 8: AUDIT TRAIL
        // ============================================================
        db.execute_unprepared(AUDIT_LOGS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- User roles
CREATE TYPE user_role AS ENUM (
    'sales',
    'production_planner',
    'production_operator',
    'qc_analyst',
    'qualified_person',
    'logistics',
    'finance',
    'admin'
);

-- Order lifecycle
CREATE TYPE order_status AS ENUM (
    'DRAFT',
    'SUBMITTED',
    'VALIDATED',
    'SCHEDULED',
    'IN_PRODUCTION',
    'QC_PENDING',
    'RELEASED',
    'DISPATCHED',
    'DELIVERED',
    'CANCELLED',
    'REJECTED',
    'FAILED_QC',
    'REWORK'
);

-- Production batch lifecycle
CREATE TYPE batch_status AS ENUM (
    'PLANNED',
    'SYNTHESIS',
    'QC_PENDING',
    'QC_PASSED',
    'QC_FAILED',
    'RELEASED',
    'DISPATCHED',
    'CANCELLED'
);

-- Shipment lifecycle
CREATE TYPE shipment_status AS ENUM (
    'PENDING',
    'PICKED_UP',
    'IN_TRANSIT',
    'DELIVERED',
    'FAILED',
    'RETURNED',
    'CANCELLED'
);

-- Invoice lifecycle
CREATE TYPE invoice_status AS ENUM (
    'DRAFT',
    'ISSUED',
    'PAID',
    'OVERDUE',
    'CANCELLED'
);

-- Payment request lifecycle
CREATE TYPE payment_request_status AS ENUM (
    'PENDING',
    'APPROVED',
    'REJECTED',
    'PAID'
);

-- Support ticket lifecycle
CREATE TYPE ticket_status AS ENUM (
    'OPEN',
    'IN_PROGRESS',
    'RESOLVED',
    'CLOSED',
    'REOPENED'
);

-- Entity types governed by workflows and audited
CREATE TYPE entity_kind AS ENUM (
    'ORDER',
    'BATCH',
    'SHIPMENT',
    'INVOICE',
    'PAYMENT_REQUEST',
    'SUPPORT_TICKET',
    'CUSTOMER',
    'PRODUCT',
    'USER'
);

-- Approval request lifecycle
CREATE TYPE approval_request_status AS ENUM (
    'PENDING',
    'APPROVED',
    'REJECTED'
);

-- Approval decision
CREATE TYPE approval_decision AS ENUM (
    'APPROVED',
    'REJECTED'
);

-- Audit action kind
CREATE TYPE audit_action AS ENUM (
    'CREATE',
    'UPDATE',
    'DELETE',
    'STATUS_CHANGE',
    'LOGIN'
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    full_name VARCHAR(255) NOT NULL,
    role user_role NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_users_email ON users(email) WHERE is_active = true;
";

const CUSTOMERS_SQL: &str = r"
CREATE TABLE customers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    license_number VARCHAR(100) NOT NULL UNIQUE,
    license_expires_at DATE NOT NULL,
    address TEXT NOT NULL,
    contact_email VARCHAR(255) NOT NULL,
    contact_phone VARCHAR(50),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_customers_license ON customers(license_number);
";

const PRODUCTS_SQL: &str = r"
CREATE TABLE products (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    code VARCHAR(50) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    radionuclide VARCHAR(20) NOT NULL,
    half_life_minutes INTEGER NOT NULL,
    unit_price NUMERIC(19, 4) NOT NULL,
    daily_batch_capacity INTEGER NOT NULL DEFAULT 1,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_half_life_positive CHECK (half_life_minutes > 0),
    CONSTRAINT chk_capacity_positive CHECK (daily_batch_capacity > 0)
);
";

const ORDERS_SQL: &str = r"
CREATE TABLE orders (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    order_number VARCHAR(50) NOT NULL UNIQUE,
    customer_id UUID NOT NULL REFERENCES customers(id),
    product_id UUID NOT NULL REFERENCES products(id),
    quantity_mbq NUMERIC(19, 4) NOT NULL,
    calibration_time TIMESTAMPTZ NOT NULL,
    delivery_address TEXT NOT NULL,
    status order_status NOT NULL DEFAULT 'DRAFT',
    notes TEXT,
    row_version INTEGER NOT NULL DEFAULT 0,
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_quantity_positive CHECK (quantity_mbq > 0)
);

CREATE INDEX idx_orders_customer ON orders(customer_id);
CREATE INDEX idx_orders_status ON orders(status);
CREATE INDEX idx_orders_calibration ON orders(calibration_time);
";

const ORDER_EVENTS_SQL: &str = r"
CREATE TABLE order_events (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    order_id UUID NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
    from_status order_status,
    to_status order_status NOT NULL,
    actor_id UUID REFERENCES users(id),
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_order_events_order ON order_events(order_id, created_at);
";

const PRODUCTION_BATCHES_SQL: &str = r"
CREATE TABLE production_batches (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    batch_number VARCHAR(50) NOT NULL UNIQUE,
    product_id UUID NOT NULL REFERENCES products(id),
    order_id UUID REFERENCES orders(id),
    production_date DATE NOT NULL,
    activity_mbq NUMERIC(19, 4) NOT NULL DEFAULT 0,
    status batch_status NOT NULL DEFAULT 'PLANNED',
    synthesis_started_at TIMESTAMPTZ,
    qc_completed_at TIMESTAMPTZ,
    released_by UUID REFERENCES users(id),
    released_at TIMESTAMPTZ,
    row_version INTEGER NOT NULL DEFAULT 0,
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_batches_product_date ON production_batches(product_id, production_date);
CREATE INDEX idx_batches_status ON production_batches(status);
";

const BATCH_EVENTS_SQL: &str = r"
CREATE TABLE batch_events (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    batch_id UUID NOT NULL REFERENCES production_batches(id) ON DELETE CASCADE,
    from_status batch_status,
    to_status batch_status NOT NULL,
    actor_id UUID REFERENCES users(id),
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_batch_events_batch ON batch_events(batch_id, created_at);
";

const SHIPMENTS_SQL: &str = r"
CREATE TABLE shipments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    shipment_number VARCHAR(50) NOT NULL UNIQUE,
    order_id UUID NOT NULL REFERENCES orders(id),
    batch_id UUID NOT NULL REFERENCES production_batches(id),
    carrier VARCHAR(100) NOT NULL,
    tracking_number VARCHAR(100),
    status shipment_status NOT NULL DEFAULT 'PENDING',
    dispatched_at TIMESTAMPTZ,
    delivered_at TIMESTAMPTZ,
    row_version INTEGER NOT NULL DEFAULT 0,
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_shipments_order ON shipments(order_id);
CREATE INDEX idx_shipments_status ON shipments(status);
";

const SHIPMENT_EVENTS_SQL: &str = r"
CREATE TABLE shipment_events (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    shipment_id UUID NOT NULL REFERENCES shipments(id) ON DELETE CASCADE,
    from_status shipment_status,
    to_status shipment_status NOT NULL,
    actor_id UUID REFERENCES users(id),
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_shipment_events_shipment ON shipment_events(shipment_id, created_at);
";

const INVOICES_SQL: &str = r"
CREATE TABLE invoices (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    invoice_number VARCHAR(50) NOT NULL UNIQUE,
    order_id UUID NOT NULL REFERENCES orders(id),
    customer_id UUID NOT NULL REFERENCES customers(id),
    amount NUMERIC(19, 4) NOT NULL,
    currency CHAR(3) NOT NULL DEFAULT 'EUR',
    status invoice_status NOT NULL DEFAULT 'DRAFT',
    issued_at TIMESTAMPTZ,
    due_date DATE,
    paid_at TIMESTAMPTZ,
    row_version INTEGER NOT NULL DEFAULT 0,
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_amount_positive CHECK (amount > 0),
    CONSTRAINT chk_currency_format CHECK (currency ~ '^[A-Z]{3}$')
);

CREATE INDEX idx_invoices_customer ON invoices(customer_id);
CREATE INDEX idx_invoices_status ON invoices(status);
";

const PAYMENT_REQUESTS_SQL: &str = r"
CREATE TABLE payment_requests (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    invoice_id UUID NOT NULL REFERENCES invoices(id),
    amount NUMERIC(19, 4) NOT NULL,
    status payment_request_status NOT NULL DEFAULT 'PENDING',
    requested_by UUID NOT NULL REFERENCES users(id),
    decided_by UUID REFERENCES users(id),
    decided_at TIMESTAMPTZ,
    row_version INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_pr_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_payment_requests_invoice ON payment_requests(invoice_id);
CREATE INDEX idx_payment_requests_status ON payment_requests(status);
";

const SUPPORT_TICKETS_SQL: &str = r"
CREATE TABLE support_tickets (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    ticket_number VARCHAR(50) NOT NULL UNIQUE,
    customer_id UUID NOT NULL REFERENCES customers(id),
    order_id UUID REFERENCES orders(id),
    subject VARCHAR(255) NOT NULL,
    description TEXT NOT NULL,
    status ticket_status NOT NULL DEFAULT 'OPEN',
    assigned_to UUID REFERENCES users(id),
    row_version INTEGER NOT NULL DEFAULT 0,
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_tickets_customer ON support_tickets(customer_id);
CREATE INDEX idx_tickets_status ON support_tickets(status);
";

const WORKFLOW_DEFINITIONS_SQL: &str = r"
CREATE TABLE workflow_definitions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    entity_type entity_kind NOT NULL,
    trigger_status VARCHAR(50),
    requires_all_steps BOOLEAN NOT NULL DEFAULT true,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- At most one active auto-trigger per (entity type, trigger status)
CREATE UNIQUE INDEX idx_workflows_trigger ON workflow_definitions(entity_type, trigger_status)
    WHERE is_active = true AND trigger_status IS NOT NULL;
";

const APPROVAL_STEPS_SQL: &str = r"
CREATE TABLE approval_steps (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    workflow_id UUID NOT NULL REFERENCES workflow_definitions(id) ON DELETE CASCADE,
    step_order SMALLINT NOT NULL,
    label VARCHAR(255) NOT NULL,
    approver_role user_role NOT NULL,
    timeout_hours INTEGER,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_step_order_positive CHECK (step_order >= 1),
    CONSTRAINT uq_workflow_step_order UNIQUE (workflow_id, step_order)
);
";

const APPROVAL_REQUESTS_SQL: &str = r"
CREATE TABLE approval_requests (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    workflow_id UUID NOT NULL REFERENCES workflow_definitions(id),
    entity_type entity_kind NOT NULL,
    entity_id UUID NOT NULL,
    current_step_order SMALLINT NOT NULL DEFAULT 1,
    status approval_request_status NOT NULL DEFAULT 'PENDING',
    priority SMALLINT NOT NULL DEFAULT 0,
    due_date TIMESTAMPTZ,
    completed_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_approval_requests_entity ON approval_requests(entity_type, entity_id);
CREATE INDEX idx_approval_requests_status ON approval_requests(status);
";

const APPROVAL_ACTIONS_SQL: &str = r"
CREATE TABLE approval_actions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    request_id UUID NOT NULL REFERENCES approval_requests(id) ON DELETE CASCADE,
    step_id UUID NOT NULL REFERENCES approval_steps(id),
    actor_id UUID NOT NULL REFERENCES users(id),
    decision approval_decision NOT NULL,
    comment TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_approval_actions_request ON approval_actions(request_id, created_at);
";

const AUDIT_LOGS_SQL: &str = r"
CREATE TABLE audit_logs (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    actor_id UUID,
    action audit_action NOT NULL,
    entity_type entity_kind NOT NULL,
    entity_id UUID NOT NULL,
    old_value JSONB,
    new_value JSONB NOT NULL,
    ip_address VARCHAR(45),
    user_agent VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_audit_logs_entity ON audit_logs(entity_type, entity_id, created_at);
CREATE INDEX idx_audit_logs_actor ON audit_logs(actor_id, created_at);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS audit_logs CASCADE;
DROP TABLE IF EXISTS approval_actions CASCADE;
DROP TABLE IF EXISTS approval_requests CASCADE;
DROP TABLE IF EXISTS approval_steps CASCADE;
DROP TABLE IF EXISTS workflow_definitions CASCADE;
DROP TABLE IF EXISTS support_tickets CASCADE;
DROP TABLE IF EXISTS payment_requests CASCADE;
DROP TABLE IF EXISTS invoices CASCADE;
DROP TABLE IF EXISTS shipment_events CASCADE;
DROP TABLE IF EXISTS shipments CASCADE;
DROP TABLE IF EXISTS batch_events CASCADE;
DROP TABLE IF EXISTS production_batches CASCADE;
DROP TABLE IF EXISTS order_events CASCADE;
DROP TABLE IF EXISTS orders CASCADE;
DROP TABLE IF EXISTS products CASCADE;
DROP TABLE IF EXISTS customers CASCADE;
DROP TABLE IF EXISTS users CASCADE;

DROP TYPE IF EXISTS audit_action;
DROP TYPE IF EXISTS approval_decision;
DROP TYPE IF EXISTS approval_request_status;
DROP TYPE IF EXISTS entity_kind;
DROP TYPE IF EXISTS ticket_status;
DROP TYPE IF EXISTS payment_request_status;
DROP TYPE IF EXISTS invoice_status;
DROP TYPE IF EXISTS shipment_status;
DROP TYPE IF EXISTS batch_status;
DROP TYPE IF EXISTS order_status;
DROP TYPE IF EXISTS user_role;
";
