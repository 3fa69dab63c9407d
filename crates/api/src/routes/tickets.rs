//! Support ticket routes.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use isotrack_core::status::{StatusFlow, TicketStatus};
use isotrack_db::TicketRepository;
use isotrack_db::entities::support_tickets;
use isotrack_db::repositories::ticket::NewTicket;
use isotrack_shared::error::AppError;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::routes::request_meta;

/// Creates the tickets router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tickets", post(create_ticket))
        .route("/tickets", get(list_tickets))
        .route("/tickets/{id}", get(get_ticket))
        .route("/tickets/{id}/status", put(transition_ticket))
        .route("/tickets/{id}/assign", put(assign_ticket))
}

/// Request body for opening a ticket.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    /// Customer raising the issue.
    pub customer_id: Uuid,
    /// Related order, if any.
    pub order_id: Option<Uuid>,
    /// Short subject line.
    pub subject: String,
    /// Full issue description.
    pub description: String,
}

/// Request body for a status transition.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRequest {
    /// Target status, wire-level string.
    pub status: String,
}

/// Request body for assigning a ticket.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignTicketRequest {
    /// User the ticket is assigned to.
    pub assignee_id: Uuid,
}

/// List filters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTicketsQuery {
    /// Restrict to one customer.
    pub customer_id: Option<Uuid>,
    /// Restrict to one status.
    pub status: Option<String>,
}

/// POST /tickets - Open a support ticket.
async fn create_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    Json(payload): Json<CreateTicketRequest>,
) -> ApiResult<(StatusCode, Json<support_tickets::Model>)> {
    let ticket = TicketRepository::new((*state.db).clone())
        .create(
            NewTicket {
                customer_id: payload.customer_id,
                order_id: payload.order_id,
                subject: payload.subject,
                description: payload.description,
            },
            auth.id,
            request_meta(&headers),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// GET /tickets - List tickets.
async fn list_tickets(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListTicketsQuery>,
) -> ApiResult<Json<Vec<support_tickets::Model>>> {
    let status = query.status.as_deref().map(parse_status).transpose()?;
    let tickets = TicketRepository::new((*state.db).clone())
        .list(query.customer_id, status)
        .await?;
    Ok(Json(tickets))
}

/// GET `/tickets/{id}` - Fetch one ticket.
async fn get_ticket(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<support_tickets::Model>> {
    let ticket = TicketRepository::new((*state.db).clone())
        .find_by_id(id)
        .await?;
    Ok(Json(ticket))
}

/// PUT `/tickets/{id}/status` - Move a ticket to a new status.
async fn transition_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<TransitionRequest>,
) -> ApiResult<Json<support_tickets::Model>> {
    let to = parse_status(&payload.status)?;
    let ticket = TicketRepository::new((*state.db).clone())
        .transition_status(id, to, auth.id, auth.role, request_meta(&headers))
        .await?;
    Ok(Json(ticket))
}

/// PUT `/tickets/{id}/assign` - Assign a ticket to a user.
async fn assign_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<AssignTicketRequest>,
) -> ApiResult<Json<support_tickets::Model>> {
    let ticket = TicketRepository::new((*state.db).clone())
        .assign(id, payload.assignee_id, auth.id, request_meta(&headers))
        .await?;
    Ok(Json(ticket))
}

fn parse_status(s: &str) -> Result<TicketStatus, AppError> {
    TicketStatus::parse(s)
        .ok_or_else(|| AppError::Validation(format!("'{s}' is not a valid ticket status")))
}
