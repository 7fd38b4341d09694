//! # Product Routes
//!
//! ```text
//! GET /products          any session  ──► [Product]
//! PUT /products/{name}   Admin        ──► 201 created | 200 updated
//! ```
//!
//! Prices travel as decimal strings (`"2.50"`) so no float ever touches money.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use ecotrack_core::{Money, Product};
use ecotrack_db::SaveOutcome;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;
use crate::state::{AdminSession, AppState, Session};

#[derive(Debug, Deserialize)]
pub struct SaveProductRequest {
    pub stock: i64,
    pub price: String,
    pub cost_price: String,
}

#[derive(Debug, Serialize)]
pub struct SaveProductResponse {
    pub product: Product,
    pub outcome: SaveOutcome,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/{name}", put(save_product))
}

pub async fn list_products(
    State(state): State<AppState>,
    _session: Session,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.db.products().list().await?))
}

pub async fn save_product(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path(name): Path<String>,
    Json(payload): Json<SaveProductRequest>,
) -> Result<(StatusCode, Json<SaveProductResponse>), ApiError> {
    let product = Product::new(
        name.trim(),
        payload.stock,
        Money::parse_decimal(&payload.price)?,
        Money::parse_decimal(&payload.cost_price)?,
    );

    let outcome = state.db.products().save(&product).await?;
    info!(admin = %admin.username, product = %product.name, ?outcome, "Product saved");

    let status = match outcome {
        SaveOutcome::Created => StatusCode::CREATED,
        SaveOutcome::Updated => StatusCode::OK,
    };
    Ok((status, Json(SaveProductResponse { product, outcome })))
}
