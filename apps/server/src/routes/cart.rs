//! # Cart Routes
//!
//! ```text
//! GET    /cart         ──► CartView
//! POST   /cart/items   {product_name, quantity} ──► CartView | 404 | 422
//! DELETE /cart         ──► CartView (empty)
//! ```
//!
//! The session lock is held across the product lookup and the append, so
//! two adds from the same terminal can't interleave.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use ecotrack_core::{Cart, CoreError, LineItem, Money};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::{AppState, Session};

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_name: String,
    pub quantity: i64,
}

/// Cart lines plus the totals the terminal displays.
#[derive(Debug, Serialize, Deserialize)]
pub struct CartView {
    pub items: Vec<LineItem>,
    pub total: Money,
    pub total_cost: Money,
    pub total_quantity: i64,
}

impl TryFrom<&Cart> for CartView {
    type Error = CoreError;

    fn try_from(cart: &Cart) -> Result<Self, Self::Error> {
        Ok(CartView {
            items: cart.items().to_vec(),
            total: cart.total()?,
            total_cost: cart.total_cost()?,
            total_quantity: cart.total_quantity(),
        })
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(get_cart).delete(clear_cart))
        .route("/cart/items", post(add_item))
}

pub async fn get_cart(session: Session) -> Result<Json<CartView>, ApiError> {
    let ctx = session.context.lock().await;
    Ok(Json(CartView::try_from(&ctx.cart)?))
}

pub async fn add_item(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<AddItemRequest>,
) -> Result<Json<CartView>, ApiError> {
    let mut ctx = session.context.lock().await;

    let name = payload.product_name.trim();
    let product = state
        .db
        .products()
        .get_by_name(name)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", name))?;

    ctx.cart.add(&product, payload.quantity)?;
    debug!(
        username = %session.username,
        product = %product.name,
        quantity = payload.quantity,
        "Added to cart"
    );

    Ok(Json(CartView::try_from(&ctx.cart)?))
}

pub async fn clear_cart(session: Session) -> Result<Json<CartView>, ApiError> {
    let mut ctx = session.context.lock().await;
    ctx.cart.clear();
    Ok(Json(CartView::try_from(&ctx.cart)?))
}
