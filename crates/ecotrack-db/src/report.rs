//! # Reports
//!
//! Read-only projections over the `sales` table for the admin dashboard,
//! plus the raw database backup.
//!
//! ## Outputs
//! ```text
//! ┌───────────────────┬──────────────────────────────────────────────────┐
//! │ summary()         │ count, revenue, cost → profit and margin         │
//! │ sales_csv()       │ every sale row, RFC 4180 CSV (sales_report.csv)  │
//! │ backup()          │ VACUUM INTO a temp file → bytes                  │
//! │                   │ (erp_backup_YYYYMMDD.db)                         │
//! └───────────────────┴──────────────────────────────────────────────────┘
//! ```
//!
//! `VACUUM INTO` produces a consistent snapshot even while other
//! connections keep writing, unlike copying the file (and its `-wal`
//! sidecar) by hand.

use ecotrack_core::{Money, SalesSummary};
use sqlx::SqlitePool;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// File name offered for the CSV download.
pub const SALES_CSV_FILE_NAME: &str = "sales_report.csv";

const CSV_HEADER: &str = "id,items_json,total_price,date,cashier,total_cost";

/// A snapshot of the whole database file.
#[derive(Debug, Clone)]
pub struct DatabaseBackup {
    /// `erp_backup_YYYYMMDD.db`, local date.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Repository for reporting queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Revenue and cost of goods over every recorded sale.
    pub async fn summary(&self) -> DbResult<SalesSummary> {
        let (sale_count, revenue, cost): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(total_price_cents), 0),
                COALESCE(SUM(total_cost_cents), 0)
            FROM sales
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        debug!(sale_count, revenue, cost, "Computed sales summary");

        Ok(SalesSummary {
            sale_count,
            revenue: Money::from_cents(revenue),
            cost_of_goods: Money::from_cents(cost),
        })
    }

    /// The whole sales table as CSV, oldest first.
    ///
    /// Header only when there are no sales.
    pub async fn sales_csv(&self) -> DbResult<String> {
        let rows: Vec<(i64, String, Money, String, String, Money)> = sqlx::query_as(
            r#"
            SELECT id, items_json, total_price_cents, date, cashier, total_cost_cents
            FROM sales
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut out = String::with_capacity(64 * (rows.len() + 1));
        out.push_str(CSV_HEADER);
        out.push_str("\r\n");

        for (id, items, total_price, date, cashier, total_cost) in &rows {
            let fields = [
                id.to_string(),
                csv_field(items),
                total_price.to_string(),
                csv_field(date),
                csv_field(cashier),
                total_cost.to_string(),
            ];
            out.push_str(&fields.join(","));
            out.push_str("\r\n");
        }

        debug!(rows = rows.len(), "Exported sales CSV");
        Ok(out)
    }

    /// Snapshots the database into memory.
    pub async fn backup(&self) -> DbResult<DatabaseBackup> {
        let temp_path: PathBuf =
            std::env::temp_dir().join(format!("ecotrack-backup-{}.db", Uuid::new_v4()));
        let temp_str = temp_path
            .to_str()
            .ok_or_else(|| DbError::Internal("temporary path is not UTF-8".to_string()))?
            .to_string();

        sqlx::query("VACUUM INTO ?1")
            .bind(&temp_str)
            .execute(&self.pool)
            .await?;

        let read = tokio::fs::read(&temp_path).await;
        if let Err(e) = tokio::fs::remove_file(&temp_path).await {
            warn!(path = %temp_str, error = %e, "Could not remove temporary backup file");
        }
        let bytes = read.map_err(|e| DbError::Internal(format!("reading backup: {e}")))?;

        let file_name = format!("erp_backup_{}.db", chrono::Local::now().format("%Y%m%d"));
        info!(file_name = %file_name, size = bytes.len(), "Database backup created");

        Ok(DatabaseBackup { file_name, bytes })
    }
}

/// Quotes a CSV field when it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
