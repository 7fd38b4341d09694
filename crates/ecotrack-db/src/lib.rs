//! # ecotrack-db: Database Layer for EcoTrack POS
//!
//! SQLite storage for the catalog, staff accounts and sales, with sqlx for
//! async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        EcoTrack Data Flow                               │
//! │                                                                         │
//! │  HTTP handler (POST /checkout)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   ecotrack-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ ProductRepo   │    │ 001_initial  │  │   │
//! │  │   │ SqlitePool    │◄───│ SaleRepo      │    │ 002_cost     │  │   │
//! │  │   │               │    │ UserRepo      │    │              │  │   │
//! │  │   │               │    │ ReportRepo    │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ~/.local/share/ecotrack/erp_data.db                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Products, sales, users
//! - [`report`] - Summary, CSV export, backup
//! - [`password`] - Password digests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ecotrack_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("erp_data.db")).await?;
//! db.users().ensure_default_admin().await?;
//!
//! let receipt = db.sales().record_sale(&draft, StockPolicy::Reject).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod password;
pub mod pool;
pub mod report;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use report::{DatabaseBackup, ReportRepository, SALES_CSV_FILE_NAME};

// Repository re-exports for convenience
pub use repository::product::{ProductRepository, SaveOutcome};
pub use repository::sale::SaleRepository;
pub use repository::user::UserRepository;
