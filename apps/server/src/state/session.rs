//! # Session State
//!
//! One context per logged-in terminal: who is logged in and their cart.
//!
//! ## Locking
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SessionStore                                                           │
//! │  RwLock<HashMap<token, Arc<Mutex<SessionContext>>>>                     │
//! │       │                                                                 │
//! │       │  read lock: only long enough to clone the Arc                  │
//! │       ▼                                                                 │
//! │  Mutex<SessionContext> ← held for the WHOLE request                    │
//! │                                                                         │
//! │  Terminal A: POST /checkout ─── lock A ──────────────── unlock A       │
//! │  Terminal A: POST /cart/items ──────── waits ──────────► lock A        │
//! │  Terminal B: POST /checkout ─── lock B (runs in parallel with A)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! A double-clicked checkout therefore runs twice in sequence; the second
//! sees the cleared cart and is rejected.
//!
//! ## Expiry
//! A terminal that closes without logging out leaves its session behind.
//! Every request refreshes `last_seen`; a session idle longer than the
//! store's timeout is refused by the extractor and swept out on the next
//! login.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use ecotrack_core::{Cart, Role};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the token returned by `POST /auth/login`.
pub const SESSION_HEADER: &str = "x-session-token";

/// Everything that belongs to one login.
#[derive(Debug)]
pub struct SessionContext {
    pub username: String,
    pub role: Role,
    pub cart: Cart,
    /// Last time a request used this session.
    pub last_seen: Instant,
}

impl SessionContext {
    /// A fresh context starts with an empty cart.
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        SessionContext {
            username: username.into(),
            role,
            cart: Cart::new(),
            last_seen: Instant::now(),
        }
    }

    fn is_idle(&self, idle_timeout: Duration) -> bool {
        self.last_seen.elapsed() > idle_timeout
    }
}

/// All live sessions, keyed by token.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<Mutex<SessionContext>>>>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        SessionStore {
            sessions: Arc::default(),
            idle_timeout,
        }
    }

    /// Creates a session and returns its token, sweeping idle ones first.
    pub async fn create(&self, username: &str, role: Role) -> Uuid {
        let token = Uuid::new_v4();
        let context = Arc::new(Mutex::new(SessionContext::new(username, role)));

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        // A context locked right now is mid-request, hence not idle.
        sessions.retain(|_, ctx| match ctx.try_lock() {
            Ok(ctx) => !ctx.is_idle(self.idle_timeout),
            Err(_) => true,
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(evicted, live = sessions.len(), "Swept idle sessions");
        }

        sessions.insert(token, context);
        token
    }

    /// Looks up a live session and marks it as used.
    ///
    /// An idle session is removed and reported as missing.
    pub async fn get(&self, token: &Uuid) -> Option<Arc<Mutex<SessionContext>>> {
        let context = self.sessions.read().await.get(token).cloned()?;

        let expired = {
            let mut ctx = context.lock().await;
            if ctx.is_idle(self.idle_timeout) {
                true
            } else {
                ctx.last_seen = Instant::now();
                false
            }
        };

        if expired {
            self.sessions.write().await.remove(token);
            debug!(%token, "Session expired");
            return None;
        }
        Some(context)
    }

    /// Drops the session and its cart. Returns false for an unknown token.
    pub async fn remove(&self, token: &Uuid) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

// =============================================================================
// Extractors
// =============================================================================

/// The caller's session, resolved from [`SESSION_HEADER`].
///
/// Rejects with 401 when the header is missing, malformed or unknown.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: Uuid,
    pub username: String,
    pub role: Role,
    pub context: Arc<Mutex<SessionContext>>,
}

impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| Uuid::parse_str(s.trim()).ok())
            .ok_or_else(ApiError::unauthorized)?;

        let context = state
            .sessions
            .get(&token)
            .await
            .ok_or_else(ApiError::unauthorized)?;

        let (username, role) = {
            let ctx = context.lock().await;
            (ctx.username.clone(), ctx.role)
        };

        Ok(Session {
            token,
            username,
            role,
            context,
        })
    }
}

/// A session whose role is `Admin`; 403 otherwise.
#[derive(Debug, Clone)]
pub struct AdminSession(pub Session);

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        if !session.role.is_admin() {
            tracing::debug!(username = %session.username, "Admin route refused");
            return Err(ApiError::forbidden());
        }
        Ok(AdminSession(session))
    }
}
