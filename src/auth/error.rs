//! Authentication errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email or password missing from the login request.
    #[error("email and password are required")]
    MissingCredentials,

    /// Credentials rejected.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No account for the given email.
    #[error("account not found")]
    AccountNotFound,

    /// Account exists but the password is wrong.
    #[error("incorrect password")]
    IncorrectPassword,

    /// Email is malformed.
    #[error("invalid email address")]
    InvalidEmail,

    /// Provider throttled the account.
    #[error("too many attempts")]
    TooManyAttempts,

    /// Account exists but has not verified its email.
    #[error("email not verified")]
    UnverifiedEmail,

    /// No session on a request that requires one.
    #[error("no valid session")]
    MissingSession,

    /// Invalid session token.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// Session token expired.
    #[error("token expired")]
    TokenExpired,

    /// Identity provider failure.
    #[error("identity provider error: {0}")]
    Provider(String),

    /// Internal error.
    #[error("internal auth error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Message shown to the person logging in.
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::MissingCredentials => "Email and password are required",
            AuthError::AccountNotFound => "No account found with this email",
            AuthError::IncorrectPassword => "Incorrect password",
            AuthError::InvalidEmail => "Invalid email address",
            AuthError::TooManyAttempts => "Too many failed attempts. Please try again later",
            AuthError::UnverifiedEmail => "Please verify your email before logging in",
            AuthError::MissingSession | AuthError::InvalidToken(_) | AuthError::TokenExpired => {
                "Not authenticated"
            }
            AuthError::InvalidCredentials | AuthError::Provider(_) => "Invalid email or password",
            AuthError::Internal(_) => "An error occurred during login",
        }
    }

    /// Stable machine-readable code.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingCredentials => "missing_credentials",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::AccountNotFound => "account_not_found",
            AuthError::IncorrectPassword => "incorrect_password",
            AuthError::InvalidEmail => "invalid_email",
            AuthError::TooManyAttempts => "too_many_attempts",
            AuthError::UnverifiedEmail => "unverified_email",
            AuthError::MissingSession => "missing_session",
            AuthError::InvalidToken(_) => "invalid_token",
            AuthError::TokenExpired => "token_expired",
            AuthError::Provider(_) => "provider_error",
            AuthError::Internal(_) => "internal_error",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials => StatusCode::BAD_REQUEST,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

/// Error response body, shaped like the login response.
#[derive(Debug, Serialize)]
pub struct AuthErrorResponse {
    pub success: bool,
    pub message: String,
    pub error_code: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::Internal(msg) = &self {
            tracing::error!(error_code = self.error_code(), message = %msg, "Auth error");
        }

        let body = Json(AuthErrorResponse {
            success: false,
            message: self.user_message().to_string(),
            error_code: self.error_code().to_string(),
        });

        (self.status_code(), body).into_response()
    }
}
