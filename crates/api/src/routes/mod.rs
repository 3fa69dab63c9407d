//! API route definitions.

use axum::http::HeaderMap;
use axum::{Router, middleware};

use isotrack_db::RequestMeta;

use crate::{AppState, middleware::auth::auth_middleware};

pub mod approvals;
pub mod audit_logs;
pub mod auth;
pub mod batches;
pub mod customers;
pub mod health;
pub mod invoices;
pub mod orders;
pub mod products;
pub mod shipments;
pub mod tickets;
pub mod workflows;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(customers::routes())
        .merge(products::routes())
        .merge(orders::routes())
        .merge(batches::routes())
        .merge(shipments::routes())
        .merge(invoices::routes())
        .merge(tickets::routes())
        .merge(workflows::routes())
        .merge(approvals::routes())
        .merge(audit_logs::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

/// Pulls the request origin out of the headers for the audit trail.
pub(crate) fn request_meta(headers: &HeaderMap) -> RequestMeta {
    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string());
    let user_agent = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .map(ToString::to_string);

    RequestMeta {
        ip_address,
        user_agent,
    }
}
