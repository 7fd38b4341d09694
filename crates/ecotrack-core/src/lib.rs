//! # ecotrack-core: Pure Business Logic for EcoTrack POS
//!
//! Everything the till needs to reason about a sale *before* it touches the
//! database lives here, as plain functions over plain data.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        EcoTrack Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  HTTP API (apps/server)                         │   │
//! │  │   login, add_to_cart, checkout, admin reports                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ ecotrack-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌──────────┐  ┌───────────┐        │   │
//! │  │   │  types  │  │  money  │  │   cart   │  │  invoice  │        │   │
//! │  │   │ Product │  │  Money  │  │   Cart   │  │  render   │        │   │
//! │  │   │  Sale   │  │         │  │ LineItem │  │           │        │   │
//! │  │   └─────────┘  └─────────┘  └──────────┘  └───────────┘        │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ecotrack-db (Database Layer)                     │   │
//! │  │        SQLite, migrations, repositories, sale transaction       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, User, Sale, StockPolicy)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Session cart and the checkout draft built from it
//! - [`invoice`] - Fixed-layout invoice document rendering
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use ecotrack_core::{Cart, Money, Product};
//!
//! let pen = Product::new("Pen", 10, Money::from_cents(200), Money::from_cents(100));
//!
//! let mut cart = Cart::new();
//! cart.add(&pen, 3).unwrap();
//!
//! assert_eq!(cart.total().unwrap(), Money::from_cents(600));
//! assert_eq!(cart.total_cost().unwrap(), Money::from_cents(300));
//! ```

pub mod cart;
pub mod error;
pub mod invoice;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, LineItem, SaleDraft};
pub use error::{CoreError, CoreResult, ValidationError};
pub use invoice::{render_invoice, InvoiceInput};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of lines allowed in a single cart.
///
/// Prevents runaway carts and keeps the stored `items_json` blob small.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity on a single cart line.
///
/// Catches typing 1000 instead of 10 at the till.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest unit price or cost accepted into the catalog, in minor units
/// (10,000,000,000.00).
///
/// A full cart of lines at this price stays far inside `i64`.
pub const MAX_UNIT_PRICE_CENTS: i64 = 1_000_000_000_000;

/// Username of the administrator created on first run.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Password of the administrator created on first run.
///
/// Operators must rotate this after installation; the bootstrap logs a
/// warning every time it has to create the account.
pub const DEFAULT_ADMIN_PASSWORD: &str = "1234";

/// Format of the sale timestamp stored with every sale and printed on the
/// invoice. Lexicographic order matches chronological order.
pub const SALE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
