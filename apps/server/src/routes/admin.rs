//! # Admin Routes
//!
//! Read-only analytics and exports; every route requires the Admin role.
//!
//! ```text
//! GET /admin/summary            ──► SummaryView
//! GET /admin/sales              ──► [Sale], newest first
//! GET /admin/export/sales.csv   ──► text/csv attachment
//! GET /admin/backup             ──► erp_backup_YYYYMMDD.db attachment
//! ```

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use ecotrack_core::{Money, Sale};
use ecotrack_db::SALES_CSV_FILE_NAME;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;
use crate::state::{AdminSession, AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryView {
    pub sale_count: i64,
    pub revenue: Money,
    pub cost_of_goods: Money,
    pub profit: Money,
    pub margin_percent: f64,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/summary", get(summary))
        .route("/admin/sales", get(list_sales))
        .route("/admin/export/sales.csv", get(export_sales_csv))
        .route("/admin/backup", get(backup))
}

pub async fn summary(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<SummaryView>, ApiError> {
    let summary = state.db.reports().summary().await?;
    Ok(Json(SummaryView {
        sale_count: summary.sale_count,
        revenue: summary.revenue,
        cost_of_goods: summary.cost_of_goods,
        profit: summary.profit(),
        margin_percent: summary.margin_percent(),
    }))
}

pub async fn list_sales(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<Sale>>, ApiError> {
    Ok(Json(state.db.sales().list().await?))
}

pub async fn export_sales_csv(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<impl IntoResponse, ApiError> {
    let csv = state.db.reports().sales_csv().await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", SALES_CSV_FILE_NAME),
            ),
        ],
        csv,
    ))
}

pub async fn backup(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
) -> Result<impl IntoResponse, ApiError> {
    let backup = state.db.reports().backup().await?;
    info!(admin = %admin.username, file = %backup.file_name, "Backup downloaded");
    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", backup.file_name),
            ),
        ],
        backup.bytes,
    ))
}
