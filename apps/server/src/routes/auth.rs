//! # Auth Routes
//!
//! ```text
//! POST /auth/login     {username, password} ──► {token, username, role}
//! POST /auth/logout    x-session-token      ──► 204, cart discarded
//! POST /auth/register  {username, password, role} ──► 201 | 409
//! ```

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use ecotrack_core::Role;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;
use crate::state::{AppState, Session};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub username: String,
    pub role: Role,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/register", post(register))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let username = payload.username.trim();

    let role = state
        .db
        .users()
        .authenticate(username, &payload.password)
        .await?
        .ok_or_else(ApiError::unauthorized)?;

    let token = state.sessions.create(username, role).await;
    let live_sessions = state.sessions.len().await;
    info!(
        username = %username,
        role = %role,
        live_sessions = live_sessions,
        "Session started"
    );

    Ok(Json(LoginResponse {
        token: token.to_string(),
        username: username.to_string(),
        role,
    }))
}

pub async fn logout(State(state): State<AppState>, session: Session) -> StatusCode {
    state.sessions.remove(&session.token).await;
    info!(username = %session.username, "Session ended");
    StatusCode::NO_CONTENT
}

/// Open registration: any client may create a Sales or Admin account.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let username = payload.username.trim();

    state
        .db
        .users()
        .register(username, &payload.password, payload.role)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            username: username.to_string(),
            role: payload.role,
        }),
    ))
}
