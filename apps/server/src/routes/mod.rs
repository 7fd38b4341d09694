//! # HTTP Routes
//!
//! ```text
//! routes/
//! ├── auth.rs      POST /auth/login, /auth/logout, /auth/register
//! ├── product.rs   GET /products, PUT /products/{name}
//! ├── cart.rs      GET /cart, POST /cart/items, DELETE /cart
//! ├── checkout.rs  POST /checkout
//! ├── admin.rs     GET /admin/summary, /admin/sales, /admin/export/sales.csv, /admin/backup
//! └── health.rs    GET /health
//! ```
//!
//! Handlers stay thin: resolve the session, call the repository or cart,
//! map errors through [`ApiError`](crate::error::ApiError).

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod health;
pub mod product;

use axum::Router;

use crate::state::AppState;

/// Every API route, without middleware.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::routes())
        .merge(product::routes())
        .merge(cart::routes())
        .merge(checkout::routes())
        .merge(admin::routes())
        .merge(health::routes())
}
