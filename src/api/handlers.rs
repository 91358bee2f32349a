//! API request handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use log::info;
use serde::Serialize;
use tracing::instrument;

use crate::auth::{AuthError, Credentials, Session};

use super::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Login response body.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
}

/// Login endpoint.
///
/// Verifies the credentials with the configured backend and sets the session
/// cookie. Failures use the same `{success, message}` envelope.
#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<(CookieJar, Json<LoginResponse>), AuthError> {
    let Json(credentials) =
        payload.map_err(|e| AuthError::Internal(format!("invalid login body: {}", e)))?;
    credentials.require_present()?;

    let subject = state.verifier.verify(&credentials).await?;
    let token = state.auth.keys().issue(&subject, state.verifier.provider())?;

    info!(
        "User {} logged in via {}",
        subject.id,
        state.verifier.provider()
    );

    Ok((
        jar.add(state.auth.keys().session_cookie(token)),
        Json(LoginResponse {
            success: true,
            message: "Login successful".to_string(),
        }),
    ))
}

/// Logout endpoint (clears the session cookie and goes home).
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    (
        jar.add(state.auth.keys().removal_cookie()),
        Redirect::to("/"),
    )
}

/// Session introspection response.
#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub authenticated: bool,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
}

/// Report whether the caller holds a valid session. Never fails.
pub async fn session_info(State(state): State<AppState>, jar: CookieJar) -> Json<SessionInfo> {
    let session = state.auth.session_from_jar(&jar);
    Json(SessionInfo {
        authenticated: session.is_some(),
        session,
    })
}

/// Fallback for unknown routes.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "not found" })),
    )
}
