//! Application state shared across handlers.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::auth::{
    AccessGate, AuthConfig, AuthState, CredentialBackend, CredentialVerifier,
    EnvCredentialVerifier, GateConfig, SessionConfig, SessionKeys,
};
use crate::identity::FirebaseVerifier;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Session keys and gate rules.
    pub auth: AuthState,
    /// Backend that checks login credentials.
    pub verifier: Arc<dyn CredentialVerifier>,
}

impl AppState {
    pub fn new(auth: AuthState, verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self { auth, verifier }
    }

    /// Validate configuration and build every service the router needs.
    pub fn from_config(
        session: &SessionConfig,
        gate: &GateConfig,
        auth: &AuthConfig,
    ) -> Result<Self> {
        gate.validate().context("invalid [gate] configuration")?;
        let keys = SessionKeys::from_config(session).context("invalid [session] configuration")?;
        auth.validate().context("invalid [auth] configuration")?;

        let verifier: Arc<dyn CredentialVerifier> = match auth.backend {
            CredentialBackend::Env => Arc::new(
                EnvCredentialVerifier::from_config(&auth.env)
                    .context("failed to load env credentials")?,
            ),
            CredentialBackend::Firebase => Arc::new(
                FirebaseVerifier::from_config(&auth.firebase)
                    .context("failed to initialize Firebase backend")?,
            ),
        };

        Ok(Self::new(
            AuthState::new(keys, AccessGate::new(gate)),
            verifier,
        ))
    }
}
