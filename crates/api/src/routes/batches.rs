//! Production batch routes.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use isotrack_core::status::{BatchStatus, StatusFlow};
use isotrack_db::BatchRepository;
use isotrack_db::entities::{batch_events, production_batches};
use isotrack_db::repositories::batch::NewBatch;
use isotrack_shared::error::AppError;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::routes::request_meta;

/// Creates the batches router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/batches", post(create_batch))
        .route("/batches", get(list_batches))
        .route("/batches/{id}", get(get_batch))
        .route("/batches/{id}/status", put(transition_batch))
        .route("/batches/{id}/activity", put(set_activity))
        .route("/batches/{id}/events", get(list_batch_events))
}

/// Request body for planning a batch.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBatchRequest {
    /// Product to produce.
    pub product_id: Uuid,
    /// Order this batch is planned against, if any.
    pub order_id: Option<Uuid>,
    /// Production date; capacity is checked per product and date.
    pub production_date: NaiveDate,
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

/// Request body for recording measured activity.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetActivityRequest {
    /// Measured activity in MBq.
    pub activity_mbq: Decimal,
}

/// List filter.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBatchesQuery {
    /// Restrict to one status.
    pub status: Option<String>,
}

/// POST /batches - Plan a batch for a production date.
async fn create_batch(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    Json(payload): Json<CreateBatchRequest>,
) -> ApiResult<(StatusCode, Json<production_batches::Model>)> {
    let batch = BatchRepository::new((*state.db).clone())
        .create(
            NewBatch {
                product_id: payload.product_id,
                order_id: payload.order_id,
                production_date: payload.production_date,
            },
            auth.id,
            request_meta(&headers),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(batch)))
}

/// GET /batches - List batches.
async fn list_batches(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListBatchesQuery>,
) -> ApiResult<Json<Vec<production_batches::Model>>> {
    let status = query.status.as_deref().map(parse_status).transpose()?;
    let batches = BatchRepository::new((*state.db).clone())
        .list(status)
        .await?;
    Ok(Json(batches))
}

/// GET `/batches/{id}` - Fetch one batch.
async fn get_batch(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<production_batches::Model>> {
    let batch = BatchRepository::new((*state.db).clone())
        .find_by_id(id)
        .await?;
    Ok(Json(batch))
}

/// PUT `/batches/{id}/status` - Move a batch to a new status.
///
/// Release is gated on the qualified person role inside the guard.
async fn transition_batch(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<TransitionRequest>,
) -> ApiResult<Json<production_batches::Model>> {
    let to = parse_status(&payload.status)?;
    let batch = BatchRepository::new((*state.db).clone())
        .transition_status(
            id,
            to,
            auth.id,
            auth.role,
            payload.note,
            request_meta(&headers),
        )
        .await?;
    Ok(Json(batch))
}

/// PUT `/batches/{id}/activity` - Record the measured activity.
async fn set_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<SetActivityRequest>,
) -> ApiResult<Json<production_batches::Model>> {
    let batch = BatchRepository::new((*state.db).clone())
        .set_activity(id, payload.activity_mbq, auth.id, request_meta(&headers))
        .await?;
    Ok(Json(batch))
}

/// GET `/batches/{id}/events` - Transition history, oldest first.
async fn list_batch_events(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<batch_events::Model>>> {
    let events = BatchRepository::new((*state.db).clone()).events(id).await?;
    Ok(Json(events))
}

fn parse_status(s: &str) -> Result<BatchStatus, AppError> {
    BatchStatus::parse(s)
        .ok_or_else(|| AppError::Validation(format!("'{s}' is not a valid batch status")))
}
