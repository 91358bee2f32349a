//! Authentication module.
//!
//! Provides the access gate with support for:
//! - Signed session cookies (HS256 tokens with expiry)
//! - Credential backends selected by configuration (env pair or Firebase)

mod claims;
mod config;
mod credentials;
mod error;
mod gate;
mod middleware;
mod session;

pub use claims::SessionClaims;
pub use config::{
    AuthConfig, ConfigValidationError, CredentialBackend, DEFAULT_COOKIE_NAME,
    DEFAULT_SESSION_MAX_AGE_SECS, EnvCredentialsConfig, GateConfig, SessionConfig,
    resolve_setting,
};
pub use credentials::{
    CredentialVerifier, Credentials, EnvCredentialVerifier, Subject, hash_password,
};
pub use error::{AuthError, AuthErrorResponse};
pub use gate::{AccessGate, GateDecision};
pub use middleware::{AuthState, CurrentUser, access_gate};
pub use session::{Session, SessionKeys};
