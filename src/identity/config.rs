//! Firebase backend configuration.

use serde::{Deserialize, Serialize};

use crate::auth::{ConfigValidationError, resolve_setting};

/// Default Identity Toolkit endpoint.
pub const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com";
/// Default OAuth token endpoint for service-account assertions.
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
/// Default Firestore endpoint.
pub const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com";

/// Settings for the Firebase credential backend.
///
/// `api_key`, `client_email` and `private_key` support `env:VAR_NAME`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FirebaseConfig {
    /// Web API key. Required when the backend is `firebase`.
    pub api_key: Option<String>,
    pub identity_base_url: String,

    /// Service account for Firestore user sync. All three or none.
    pub project_id: Option<String>,
    pub client_email: Option<String>,
    pub private_key: Option<String>,

    pub token_url: String,
    pub firestore_base_url: String,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            api_key: Some("env:FIREBASE_API_KEY".to_string()),
            identity_base_url: DEFAULT_IDENTITY_BASE_URL.to_string(),
            project_id: None,
            client_email: None,
            private_key: None,
            token_url: DEFAULT_TOKEN_URL.to_string(),
            firestore_base_url: DEFAULT_FIRESTORE_BASE_URL.to_string(),
        }
    }
}

/// Resolved service-account credentials.
#[derive(Clone)]
pub struct ServiceAccount {
    pub project_id: String,
    pub client_email: String,
    /// PEM with real newlines.
    pub private_key: String,
}

impl std::fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .finish_non_exhaustive()
    }
}

impl FirebaseConfig {
    /// Resolve the web API key.
    pub fn resolve_api_key(&self) -> Result<String, ConfigValidationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ConfigValidationError::MissingSetting("auth.firebase.api_key"))?;
        resolve_setting(api_key)
    }

    /// Whether any service-account field is set.
    pub fn admin_enabled(&self) -> bool {
        self.project_id.is_some() || self.client_email.is_some() || self.private_key.is_some()
    }

    /// Resolve the service account, or `None` when Firestore sync is off.
    pub fn service_account(&self) -> Result<Option<ServiceAccount>, ConfigValidationError> {
        if !self.admin_enabled() {
            return Ok(None);
        }

        let project_id = self
            .project_id
            .as_deref()
            .ok_or(ConfigValidationError::MissingSetting("auth.firebase.project_id"))?;
        let client_email = self
            .client_email
            .as_deref()
            .ok_or(ConfigValidationError::MissingSetting("auth.firebase.client_email"))?;
        let private_key = self
            .private_key
            .as_deref()
            .ok_or(ConfigValidationError::MissingSetting("auth.firebase.private_key"))?;

        Ok(Some(ServiceAccount {
            project_id: resolve_setting(project_id)?,
            client_email: resolve_setting(client_email)?,
            // Keys pasted into env files usually carry literal "\n".
            private_key: resolve_setting(private_key)?.replace("\\n", "\n"),
        }))
    }

    /// Validate the settings needed by the Firebase backend.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.resolve_api_key()?;
        self.service_account()?;

        for (key, url) in [
            ("auth.firebase.identity_base_url", &self.identity_base_url),
            ("auth.firebase.token_url", &self.token_url),
            ("auth.firebase.firestore_base_url", &self.firestore_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigValidationError::InvalidSetting {
                    key,
                    reason: format!("'{}' is not an http(s) URL", url),
                });
            }
        }

        Ok(())
    }
}
