//! Session token claims.

use serde::{Deserialize, Serialize};

/// Claims carried by the session cookie token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (email for the env backend, provider user ID for Firebase).
    pub sub: String,

    /// Expiration time (as Unix timestamp).
    pub exp: i64,

    /// Issued at (as Unix timestamp).
    pub iat: i64,

    /// User's email.
    #[serde(default)]
    pub email: Option<String>,

    /// User's display name.
    #[serde(default)]
    pub name: Option<String>,

    /// Credential backend that issued the session.
    #[serde(default)]
    pub provider: Option<String>,
}
