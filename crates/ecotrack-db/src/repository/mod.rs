//! # Repository Module
//!
//! Database repository implementations for EcoTrack.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.sales().record_sale(&draft, policy)                        │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── record_sale(&self, draft, policy)                                 │
//! │  ├── get(&self, id)                                                    │
//! │  └── list(&self)                                                       │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Catalog add/update/lookup
//! - [`SaleRepository`](sale::SaleRepository) - The sale transaction and sale reads
//! - [`UserRepository`](user::UserRepository) - Credentials and bootstrap admin

pub mod product;
pub mod sale;
pub mod user;
