//! Invoice and payment request routes.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use isotrack_core::status::{InvoiceStatus, PaymentRequestStatus, StatusFlow};
use isotrack_db::InvoiceRepository;
use isotrack_db::entities::{invoices, payment_requests};
use isotrack_db::repositories::invoice::NewInvoice;
use isotrack_shared::error::AppError;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::routes::request_meta;

/// Creates the invoices router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", post(create_invoice))
        .route("/invoices", get(list_invoices))
        .route("/invoices/{id}", get(get_invoice))
        .route("/invoices/{id}/status", put(transition_invoice))
        .route(
            "/invoices/{id}/payment-requests",
            post(create_payment_request),
        )
        .route(
            "/invoices/{id}/payment-requests",
            get(list_payment_requests),
        )
        .route(
            "/payment-requests/{id}/status",
            put(transition_payment_request),
        )
}

/// Request body for creating an invoice.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    /// Order being invoiced.
    pub order_id: Uuid,
    /// Invoice total.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: String,
}

/// Request body for a status transition.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRequest {
    /// Target status, wire-level string.
    pub status: String,
}

/// Request body for raising a payment request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequestRequest {
    /// Amount requested for payment.
    pub amount: Decimal,
}

/// List filter.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListInvoicesQuery {
    /// Restrict to one customer.
    pub customer_id: Option<Uuid>,
}

/// POST /invoices - Create a draft invoice for an order.
async fn create_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    Json(payload): Json<CreateInvoiceRequest>,
) -> ApiResult<(StatusCode, Json<invoices::Model>)> {
    let invoice = InvoiceRepository::new((*state.db).clone())
        .create(
            NewInvoice {
                order_id: payload.order_id,
                amount: payload.amount,
                currency: payload.currency,
            },
            auth.id,
            request_meta(&headers),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

/// GET /invoices - List invoices.
async fn list_invoices(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListInvoicesQuery>,
) -> ApiResult<Json<Vec<invoices::Model>>> {
    let invoices = InvoiceRepository::new((*state.db).clone())
        .list(query.customer_id)
        .await?;
    Ok(Json(invoices))
}

/// GET `/invoices/{id}` - Fetch one invoice.
async fn get_invoice(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<invoices::Model>> {
    let invoice = InvoiceRepository::new((*state.db).clone())
        .find_by_id(id)
        .await?;
    Ok(Json(invoice))
}

/// PUT `/invoices/{id}/status` - Move an invoice to a new status.
async fn transition_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<TransitionRequest>,
) -> ApiResult<Json<invoices::Model>> {
    let to = InvoiceStatus::parse(&payload.status).ok_or_else(|| {
        AppError::Validation(format!("'{}' is not a valid invoice status", payload.status))
    })?;
    let invoice = InvoiceRepository::new((*state.db).clone())
        .transition_status(id, to, Some(auth.id), auth.role, request_meta(&headers))
        .await?;
    Ok(Json(invoice))
}

/// POST `/invoices/{id}/payment-requests` - Raise a payment request.
async fn create_payment_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<CreatePaymentRequestRequest>,
) -> ApiResult<(StatusCode, Json<payment_requests::Model>)> {
    let request = InvoiceRepository::new((*state.db).clone())
        .create_payment_request(id, payload.amount, auth.id, request_meta(&headers))
        .await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// GET `/invoices/{id}/payment-requests` - List an invoice's payment requests.
async fn list_payment_requests(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<payment_requests::Model>>> {
    let requests = InvoiceRepository::new((*state.db).clone())
        .list_payment_requests(id)
        .await?;
    Ok(Json(requests))
}

/// PUT `/payment-requests/{id}/status` - Decide a payment request.
///
/// The PENDING exits are finance-gated.
async fn transition_payment_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<TransitionRequest>,
) -> ApiResult<Json<payment_requests::Model>> {
    let to = PaymentRequestStatus::parse(&payload.status).ok_or_else(|| {
        AppError::Validation(format!(
            "'{}' is not a valid payment request status",
            payload.status
        ))
    })?;
    let request = InvoiceRepository::new((*state.db).clone())
        .transition_payment_request(id, to, auth.id, auth.role, request_meta(&headers))
        .await?;
    Ok(Json(request))
}
