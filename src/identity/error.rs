//! Identity provider error types.

use thiserror::Error;

use crate::auth::ConfigValidationError;

/// Result type for identity provider operations.
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Errors that can occur while talking to the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Provider rejected the request with an error code such as `EMAIL_NOT_FOUND`.
    #[error("provider error {code} (status {status})")]
    Provider { status: u16, code: String },

    /// Unexpected response without a provider error body.
    #[error("unexpected response (status {status}): {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Service-account key could not be loaded or used.
    #[error("service account key error: {0}")]
    InvalidKey(String),

    /// Signing the service-account assertion failed.
    #[error("failed to sign assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigValidationError),
}

impl IdentityError {
    /// Provider error code, if the provider answered with one.
    pub fn provider_code(&self) -> Option<&str> {
        match self {
            IdentityError::Provider { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// Extract the error code from a provider message.
///
/// Messages look like `INVALID_PASSWORD` or
/// `TOO_MANY_ATTEMPTS_TRY_LATER : Access to this account has been disabled`.
pub(crate) fn parse_error_code(message: &str) -> String {
    message
        .split(|c: char| c == ' ' || c == ':')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}
