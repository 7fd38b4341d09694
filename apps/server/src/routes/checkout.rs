//! # Checkout
//!
//! ## User Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /checkout                                                        │
//! │       │                                                                 │
//! │       ├── lock session ──► cart empty? ──► 422                         │
//! │       │                                                                 │
//! │       ├── SaleDraft::from_cart(cart, cashier)                          │
//! │       │                                                                 │
//! │       ├── db.sales().record_sale(draft, policy)   ← one transaction    │
//! │       │        └── error? cart kept, error returned                    │
//! │       │                                                                 │
//! │       ├── render_invoice(id, timestamp, lines, total, cashier)         │
//! │       │                                                                 │
//! │       └── cart.clear() ──► 200 Invoice_{id}.txt                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::State;
use axum::http::header::{self, HeaderName};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use ecotrack_core::{render_invoice, InvoiceInput, SaleDraft};
use tracing::info;

use crate::error::{ApiError, ErrorCode};
use crate::state::{AppState, Session};

/// Response header carrying the new invoice number.
pub const INVOICE_ID_HEADER: &str = "x-invoice-id";

pub fn routes() -> Router<AppState> {
    Router::new().route("/checkout", post(checkout))
}

pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, ApiError> {
    let mut ctx = session.context.lock().await;

    if ctx.cart.is_empty() {
        return Err(ApiError::new(ErrorCode::CartError, "Cart is empty"));
    }

    let draft = SaleDraft::from_cart(&ctx.cart, &session.username)?;
    let receipt = state
        .db
        .sales()
        .record_sale(&draft, state.config.stock_policy)
        .await?;

    let document = render_invoice(&InvoiceInput {
        invoice_id: receipt.invoice_id,
        date: &receipt.timestamp,
        cashier: &session.username,
        items: draft.line_items(),
        total: draft.total_price(),
        currency: &state.config.currency,
    })?;

    ctx.cart.clear();

    info!(
        invoice_id = receipt.invoice_id,
        cashier = %session.username,
        "Checkout complete"
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"Invoice_{}.txt\"", receipt.invoice_id),
            ),
            (
                HeaderName::from_static(INVOICE_ID_HEADER),
                receipt.invoice_id.to_string(),
            ),
        ],
        document,
    ))
}
