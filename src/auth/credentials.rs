//! Credential verification backends.

use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::{AuthError, ConfigValidationError, EnvCredentialsConfig, resolve_setting};

/// Email and password submitted to the login endpoint.
#[derive(Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Reject requests missing either field.
    pub fn require_present(&self) -> Result<(), AuthError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        Ok(())
    }
}

// Never print the password.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Identity returned by a credential backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    /// Stable identifier (email for env, provider user ID for Firebase).
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
}

/// A backend able to check an email/password pair.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Short name recorded in the session (`env`, `firebase`).
    fn provider(&self) -> &'static str;

    /// Verify credentials and return the authenticated subject.
    async fn verify(&self, credentials: &Credentials) -> Result<Subject, AuthError>;
}

/// Accepts a single configured email/password pair.
pub struct EnvCredentialVerifier {
    email: String,
    password: String,
}

impl EnvCredentialVerifier {
    /// `password` may be a bcrypt hash or a plain value.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }

    /// Build from config, resolving `env:VAR_NAME` values.
    pub fn from_config(config: &EnvCredentialsConfig) -> Result<Self, ConfigValidationError> {
        let email = config
            .email
            .as_deref()
            .ok_or(ConfigValidationError::MissingSetting("auth.env.email"))?;
        let password = config
            .password
            .as_deref()
            .ok_or(ConfigValidationError::MissingSetting("auth.env.password"))?;

        Ok(Self::new(resolve_setting(email)?, resolve_setting(password)?))
    }

    fn password_matches(&self, candidate: &str) -> bool {
        if is_bcrypt_hash(&self.password) {
            return bcrypt::verify(candidate, &self.password).unwrap_or(false);
        }
        Sha256::digest(candidate.as_bytes()) == Sha256::digest(self.password.as_bytes())
    }
}

impl std::fmt::Debug for EnvCredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvCredentialVerifier")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CredentialVerifier for EnvCredentialVerifier {
    fn provider(&self) -> &'static str {
        "env"
    }

    async fn verify(&self, credentials: &Credentials) -> Result<Subject, AuthError> {
        credentials.require_present()?;

        let email = credentials.email.trim();
        // Check the password even on an email mismatch.
        let password_ok = self.password_matches(&credentials.password);
        if email != self.email || !password_ok {
            debug!("Env credential check failed for {}", email);
            return Err(AuthError::InvalidCredentials);
        }

        info!("Env credentials accepted for {}", email);
        Ok(Subject {
            id: self.email.clone(),
            email: self.email.clone(),
            display_name: None,
        })
    }
}

fn is_bcrypt_hash(value: &str) -> bool {
    ["$2a$", "$2b$", "$2y$"]
        .iter()
        .any(|prefix| value.starts_with(prefix))
}

/// Hash a password for use as `auth.env.password`.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    bcrypt::hash(password, cost).map_err(|e| AuthError::Internal(e.to_string()))
}
