//! `GET /health`: liveness plus a database round-trip.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use ecotrack_db::migrations::migration_status;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: bool,
    pub migrations_applied: usize,
    pub migrations_total: usize,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = state.db.health_check().await;
    let (total, applied) = match migration_status(state.db.pool()).await {
        Ok(counts) => counts,
        Err(e) => {
            warn!(error = %e, "Migration status unavailable");
            (0, 0)
        }
    };

    let healthy = database && applied == total && total > 0;
    let status = if healthy { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };

    (
        status,
        Json(HealthResponse {
            status: if healthy { "ok" } else { "degraded" }.to_string(),
            database,
            migrations_applied: applied,
            migrations_total: total,
        }),
    )
}
