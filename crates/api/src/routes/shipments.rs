//! Shipment routes.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use isotrack_core::status::{ShipmentStatus, StatusFlow};
use isotrack_db::ShipmentRepository;
use isotrack_db::entities::{shipment_events, shipments};
use isotrack_db::repositories::shipment::NewShipment;
use isotrack_shared::error::AppError;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::routes::request_meta;

/// Creates the shipments router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shipments", post(create_shipment))
        .route("/shipments", get(list_shipments))
        .route("/shipments/{id}", get(get_shipment))
        .route("/shipments/{id}/status", put(transition_shipment))
        .route("/shipments/{id}/events", get(list_shipment_events))
}

/// Request body for creating a shipment.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShipmentRequest {
    /// Order being fulfilled.
    pub order_id: Uuid,
    /// Batch the doses come from; must be RELEASED.
    pub batch_id: Uuid,
    /// Carrier name.
    pub carrier: String,
    /// Carrier tracking number, if already known.
    pub tracking_number: Option<String>,
}

/// Request body for a status transition.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRequest {
    /// Target status, wire-level string.
    pub status: String,
    /// Optional note recorded on the event row.
    pub note: Option<String>,
}

/// List filter.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListShipmentsQuery {
    /// Restrict to one order.
    pub order_id: Option<Uuid>,
}

/// POST /shipments - Create a shipment for a released batch.
async fn create_shipment(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    Json(payload): Json<CreateShipmentRequest>,
) -> ApiResult<(StatusCode, Json<shipments::Model>)> {
    let shipment = ShipmentRepository::new((*state.db).clone())
        .create(
            NewShipment {
                order_id: payload.order_id,
                batch_id: payload.batch_id,
                carrier: payload.carrier,
                tracking_number: payload.tracking_number,
            },
            auth.id,
            request_meta(&headers),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(shipment)))
}

/// GET /shipments - List shipments.
async fn list_shipments(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListShipmentsQuery>,
) -> ApiResult<Json<Vec<shipments::Model>>> {
    let shipments = ShipmentRepository::new((*state.db).clone())
        .list(query.order_id)
        .await?;
    Ok(Json(shipments))
}

/// GET `/shipments/{id}` - Fetch one shipment.
async fn get_shipment(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<shipments::Model>> {
    let shipment = ShipmentRepository::new((*state.db).clone())
        .find_by_id(id)
        .await?;
    Ok(Json(shipment))
}

/// PUT `/shipments/{id}/status` - Move a shipment to a new status.
async fn transition_shipment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<TransitionRequest>,
) -> ApiResult<Json<shipments::Model>> {
    let to = parse_status(&payload.status)?;
    let shipment = ShipmentRepository::new((*state.db).clone())
        .transition_status(
            id,
            to,
            auth.id,
            auth.role,
            payload.note,
            request_meta(&headers),
        )
        .await?;
    Ok(Json(shipment))
}

/// GET `/shipments/{id}/events` - Transition history, oldest first.
async fn list_shipment_events(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<shipment_events::Model>>> {
    let events = ShipmentRepository::new((*state.db).clone())
        .events(id)
        .await?;
    Ok(Json(events))
}

fn parse_status(s: &str) -> Result<ShipmentStatus, AppError> {
    ShipmentStatus::parse(s)
        .ok_or_else(|| AppError::Validation(format!("'{s}' is not a valid shipment status")))
}
