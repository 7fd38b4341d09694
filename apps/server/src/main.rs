//! # EcoTrack Server binary
//!
//! ## Startup
//! ```text
//! init_tracing ──► ServerConfig::load ──► Database::new (migrations)
//!      ──► ensure_default_admin ──► bind ──► serve until Ctrl-C
//! ```

use anyhow::Context;
use ecotrack_db::{Database, DbConfig};
use ecotrack_server::{build_router, init_tracing, AppState, ServerConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting EcoTrack server...");

    let config = ServerConfig::load().context("loading configuration")?;
    info!(
        bind = %config.bind_addr,
        database = %config.database_path.display(),
        stock_policy = ?config.stock_policy,
        "Configuration loaded"
    );

    let db = Database::new(
        DbConfig::new(&config.database_path).max_connections(config.db_max_connections),
    )
    .await
    .context("opening database")?;

    if db.users().ensure_default_admin().await? {
        info!("Default administrator created");
    }

    let bind_addr = config.bind_addr;
    let app = build_router(AppState::new(db.clone(), config));

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("binding {}", bind_addr))?;
    info!(addr = %bind_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    db.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
