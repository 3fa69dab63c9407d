//! Product catalogue routes.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use isotrack_db::ProductRepository;
use isotrack_db::entities::products;
use isotrack_db::repositories::product::NewProduct;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::routes::request_meta;

/// Creates the products router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(create_product))
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
        .route("/products/{id}", delete(deactivate_product))
}

/// Request body for creating a product.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    /// Unique product code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Radionuclide symbol.
    pub radionuclide: String,
    /// Physical half-life in minutes.
    pub half_life_minutes: i32,
    /// Price per unit of activity.
    pub unit_price: Decimal,
    /// Batches producible per production day.
    pub daily_batch_capacity: i32,
}

/// List filter.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsQuery {
    /// Restrict to active products.
    #[serde(default)]
    pub active_only: bool,
}

/// POST /products - Add a product to the catalogue.
async fn create_product(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    Json(payload): Json<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<products::Model>)> {
    let product = ProductRepository::new((*state.db).clone())
        .create(
            NewProduct {
                code: payload.code,
                name: payload.name,
                radionuclide: payload.radionuclide,
                half_life_minutes: payload.half_life_minutes,
                unit_price: payload.unit_price,
                daily_batch_capacity: payload.daily_batch_capacity,
            },
            auth.id,
            request_meta(&headers),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /products - List products.
async fn list_products(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListProductsQuery>,
) -> ApiResult<Json<Vec<products::Model>>> {
    let products = ProductRepository::new((*state.db).clone())
        .list(query.active_only)
        .await?;
    Ok(Json(products))
}

/// GET `/products/{id}` - Fetch one product.
async fn get_product(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<products::Model>> {
    let product = ProductRepository::new((*state.db).clone())
        .find_by_id(id)
        .await?;
    Ok(Json(product))
}

/// DELETE `/products/{id}` - Deactivate a product.
async fn deactivate_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> ApiResult<Json<products::Model>> {
    let product = ProductRepository::new((*state.db).clone())
        .deactivate(id, auth.id, request_meta(&headers))
        .await?;
    Ok(Json(product))
}
