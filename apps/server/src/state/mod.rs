//! # Shared Server State
//!
//! Cloned into every handler by axum; all fields are cheap handles.
//!
//! ```text
//! AppState
//! ├── db: Database          ← pool + repositories
//! ├── config: Arc<ServerConfig>
//! └── sessions: SessionStore ← token → SessionContext (cart)
//! ```

mod session;

pub use session::{AdminSession, Session, SessionContext, SessionStore, SESSION_HEADER};

use ecotrack_db::Database;
use std::sync::Arc;

use crate::config::ServerConfig;

#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<ServerConfig>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(db: Database, config: ServerConfig) -> Self {
        AppState {
            db,
            sessions: SessionStore::new(config.session_idle_timeout),
            config: Arc::new(config),
        }
    }
}
