//! # EcoTrack Server
//!
//! HTTP API shared by the sales terminals and the admin dashboard.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Terminal / Dashboard                                                   │
//! │       │  x-session-token: <uuid>                                        │
//! │       ▼                                                                 │
//! │  ┌──────────────┐   ┌──────────────────┐   ┌────────────────────────┐  │
//! │  │  TraceLayer  │──►│  Session / Admin │──►│  Handler (routes/*)    │  │
//! │  │  (tower-http)│   │  extractor       │   │  Result<T, ApiError>   │  │
//! │  └──────────────┘   └──────────────────┘   └───────────┬────────────┘  │
//! │                                                        │               │
//! │                           ecotrack-core ◄──────────────┤               │
//! │                           ecotrack-db   ◄──────────────┘               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ErrorCode};
pub use state::AppState;

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,ecotrack=debug,sqlx=warn";

/// Builds the full application router.
pub fn build_router(state: AppState) -> Router {
    routes::api_routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` overrides the filter; `LOG_FORMAT=json` switches to one JSON
/// object per line.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
