//! Authentication configuration.

use serde::{Deserialize, Serialize};

use crate::identity::FirebaseConfig;

/// Default name of the session cookie.
pub const DEFAULT_COOKIE_NAME: &str = "authgate-session";

/// Default session lifetime: one week.
pub const DEFAULT_SESSION_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 7;

/// Secret shipped with the old demo; never accepted.
const INSECURE_DEMO_SECRET: &str = "complex_password_at_least_32_characters_long_for_security";

const MIN_SECRET_LEN: usize = 32;

/// Longest accepted session lifetime: ten years.
pub const MAX_SESSION_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 365 * 10;

/// Resolve a configuration value, expanding `env:VAR_NAME` syntax.
pub fn resolve_setting(value: &str) -> Result<String, ConfigValidationError> {
    match value.strip_prefix("env:") {
        Some(var_name) => match std::env::var(var_name) {
            Ok(resolved) if !resolved.is_empty() => Ok(resolved),
            Ok(_) => Err(ConfigValidationError::EnvVarEmpty(var_name.to_string())),
            Err(_) => Err(ConfigValidationError::EnvVarNotFound(var_name.to_string())),
        },
        None => Ok(value.to_string()),
    }
}

/// Session cookie configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// HMAC secret used to sign session tokens.
    /// Supports `env:VAR_NAME`. REQUIRED.
    pub secret: Option<String>,

    /// Cookie carrying the session token.
    pub cookie_name: String,

    /// Session lifetime in seconds (also the cookie Max-Age).
    pub max_age_secs: i64,

    /// Mark the cookie `Secure` (enable behind HTTPS).
    pub cookie_secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            // No default secret - must be explicitly configured
            secret: None,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            max_age_secs: DEFAULT_SESSION_MAX_AGE_SECS,
            cookie_secure: false,
        }
    }
}

impl SessionConfig {
    /// Resolve the signing secret, expanding `env:VAR_NAME` syntax.
    /// Returns the resolved secret or None if not configured.
    pub fn resolve_secret(&self) -> Result<Option<String>, ConfigValidationError> {
        self.secret.as_deref().map(resolve_setting).transpose()
    }

    /// Validate the configuration and return the resolved secret.
    pub fn validate(&self) -> Result<String, ConfigValidationError> {
        let secret = self
            .resolve_secret()?
            .ok_or(ConfigValidationError::MissingSessionSecret)?;

        if secret == INSECURE_DEMO_SECRET {
            return Err(ConfigValidationError::InsecureSessionSecret);
        }
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigValidationError::SessionSecretTooShort);
        }
        if self.cookie_name.trim().is_empty() {
            return Err(ConfigValidationError::MissingSetting("session.cookie_name"));
        }
        if self.max_age_secs <= 0 {
            return Err(ConfigValidationError::InvalidSetting {
                key: "session.max_age_secs",
                reason: "must be positive".to_string(),
            });
        }
        if self.max_age_secs > MAX_SESSION_MAX_AGE_SECS {
            return Err(ConfigValidationError::InvalidSetting {
                key: "session.max_age_secs",
                reason: format!("must not exceed {} seconds", MAX_SESSION_MAX_AGE_SECS),
            });
        }

        Ok(secret)
    }

    /// Generate a secure random session secret.
    pub fn generate_secret() -> String {
        use rand::Rng;

        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
        const SECRET_LENGTH: usize = 64;

        let mut rng = rand::rng();
        (0..SECRET_LENGTH)
            .map(|_| {
                let idx = rng.random_range(0..CHARSET.len());
                CHARSET[idx] as char
            })
            .collect()
    }
}

/// Path configuration for the access gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Path prefixes that require a valid session.
    pub protected_prefixes: Vec<String>,
    /// Where unauthenticated callers are sent.
    pub login_path: String,
    /// Where authenticated callers visiting the login path are sent.
    pub home_path: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            protected_prefixes: vec!["/dashboard".to_string()],
            login_path: "/login".to_string(),
            home_path: "/dashboard".to_string(),
        }
    }
}

impl GateConfig {
    /// Validate the configured paths.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for path in self
            .protected_prefixes
            .iter()
            .chain([&self.login_path, &self.home_path])
        {
            if !path.starts_with('/') {
                return Err(ConfigValidationError::InvalidPath(path.clone()));
            }
        }

        // A protected login path would redirect to itself forever.
        let gate = super::AccessGate::new(self);
        if gate.is_protected(&self.login_path) {
            return Err(ConfigValidationError::LoginPathProtected(self.login_path.clone()));
        }
        // So would a home path that is the login path.
        if gate.is_login_path(&self.home_path) {
            return Err(ConfigValidationError::HomePathIsLogin(self.home_path.clone()));
        }

        Ok(())
    }
}

/// Which credential backend verifies logins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialBackend {
    /// A single email/password pair from configuration.
    #[default]
    Env,
    /// Firebase identity provider.
    Firebase,
}

impl std::fmt::Display for CredentialBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialBackend::Env => write!(f, "env"),
            CredentialBackend::Firebase => write!(f, "firebase"),
        }
    }
}

/// Credential pair for the env backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvCredentialsConfig {
    /// Accepted email. Supports `env:VAR_NAME`.
    pub email: Option<String>,
    /// Accepted password, plain or bcrypt hash. Supports `env:VAR_NAME`.
    pub password: Option<String>,
}

impl Default for EnvCredentialsConfig {
    fn default() -> Self {
        Self {
            email: Some("env:EMAIL".to_string()),
            password: Some("env:PASSWORD".to_string()),
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Selected credential backend.
    pub backend: CredentialBackend,
    /// Settings for the env backend.
    pub env: EnvCredentialsConfig,
    /// Settings for the Firebase backend.
    pub firebase: FirebaseConfig,
}

impl AuthConfig {
    /// Validate the settings of the selected backend.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        match self.backend {
            CredentialBackend::Env => {
                let email = self
                    .env
                    .email
                    .as_deref()
                    .ok_or(ConfigValidationError::MissingSetting("auth.env.email"))?;
                let password = self
                    .env
                    .password
                    .as_deref()
                    .ok_or(ConfigValidationError::MissingSetting("auth.env.password"))?;
                resolve_setting(email)?;
                resolve_setting(password)?;
                Ok(())
            }
            CredentialBackend::Firebase => self.firebase.validate(),
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// Session secret is required.
    MissingSessionSecret,
    /// Session secret is the old demo value.
    InsecureSessionSecret,
    /// Session secret is too short (minimum 32 characters).
    SessionSecretTooShort,
    /// Environment variable not found (for `env:VAR_NAME` syntax).
    EnvVarNotFound(String),
    /// Environment variable is empty (for `env:VAR_NAME` syntax).
    EnvVarEmpty(String),
    /// A required setting is missing.
    MissingSetting(&'static str),
    /// A setting has an unusable value.
    InvalidSetting { key: &'static str, reason: String },
    /// A gate path does not start with `/`.
    InvalidPath(String),
    /// The login path falls under a protected prefix.
    LoginPathProtected(String),
    /// The home path is the login path.
    HomePathIsLogin(String),
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSessionSecret => {
                write!(
                    f,
                    "Session secret is required. Set AUTHGATE__SESSION__SECRET or session.secret in config."
                )
            }
            Self::InsecureSessionSecret => {
                write!(
                    f,
                    "Session secret cannot be the old demo value. Please configure a secure secret."
                )
            }
            Self::SessionSecretTooShort => {
                write!(
                    f,
                    "Session secret must be at least {} characters long.",
                    MIN_SECRET_LEN
                )
            }
            Self::EnvVarNotFound(var) => {
                write!(
                    f,
                    "Environment variable '{}' not found (referenced via env:{} in config).",
                    var, var
                )
            }
            Self::EnvVarEmpty(var) => {
                write!(
                    f,
                    "Environment variable '{}' is empty (referenced via env:{} in config).",
                    var, var
                )
            }
            Self::MissingSetting(key) => write!(f, "Missing required setting '{}'.", key),
            Self::InvalidSetting { key, reason } => {
                write!(f, "Invalid setting '{}': {}.", key, reason)
            }
            Self::InvalidPath(path) => write!(f, "Gate path '{}' must start with '/'.", path),
            Self::LoginPathProtected(path) => {
                write!(f, "Login path '{}' must not be a protected path.", path)
            }
            Self::HomePathIsLogin(path) => {
                write!(f, "Home path '{}' must not be the login path.", path)
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

#[cfg(test)]
#[allow(clippy::field_reassign_with_default)]
mod tests {
    use super::*;

    const GOOD_SECRET: &str = "a-very-long-and-secure-session-secret-over-32-chars";

    #[test]
    fn test_session_config_default() {
        let config = SessionConfig::default();
        // No default secret for security
        assert!(config.secret.is_none());
        assert_eq!(config.cookie_name, "authgate-session");
        assert_eq!(config.max_age_secs, 604_800);
        assert!(!config.cookie_secure);
    }

    #[test]
    fn test_session_validation_no_secret() {
        let config = SessionConfig::default();
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigValidationError::MissingSessionSecret
        );
    }

    #[test]
    fn test_session_validation_demo_secret() {
        let mut config = SessionConfig::default();
        config.secret = Some(INSECURE_DEMO_SECRET.to_string());
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigValidationError::InsecureSessionSecret
        );
    }

    #[test]
    fn test_session_validation_short_secret() {
        let mut config = SessionConfig::default();
        config.secret = Some("tooshort".to_string());
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigValidationError::SessionSecretTooShort
        );
    }

    #[test]
    fn test_session_validation_non_positive_max_age() {
        let mut config = SessionConfig::default();
        config.secret = Some(GOOD_SECRET.to_string());
        config.max_age_secs = 0;
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigValidationError::InvalidSetting {
                key: "session.max_age_secs",
                ..
            }
        ));
    }

    #[test]
    fn test_session_validation_max_age_upper_bound() {
        let mut config = SessionConfig::default();
        config.secret = Some(GOOD_SECRET.to_string());
        config.max_age_secs = 10_000_000_000_000;
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigValidationError::InvalidSetting {
                key: "session.max_age_secs",
                ..
            }
        ));

        config.max_age_secs = MAX_SESSION_MAX_AGE_SECS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_session_validation_valid() {
        let mut config = SessionConfig::default();
        config.secret = Some(GOOD_SECRET.to_string());
        assert_eq!(config.validate().unwrap(), GOOD_SECRET);
    }

    #[test]
    fn test_generate_secret_passes_validation() {
        let secret = SessionConfig::generate_secret();
        assert_eq!(secret.len(), 64);
        assert!(secret.chars().all(|c| c.is_ascii_alphanumeric()));

        let mut config = SessionConfig::default();
        config.secret = Some(secret);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generate_secret_uniqueness() {
        let a = SessionConfig::generate_secret();
        let b = SessionConfig::generate_secret();
        assert_ne!(a, b);
    }

    #[test]
    fn test_resolve_setting_literal() {
        assert_eq!(resolve_setting("plain-value").unwrap(), "plain-value");
    }

    #[test]
    fn test_resolve_setting_env_var() {
        // SAFETY: This is a test-only environment variable with a unique name
        unsafe {
            std::env::set_var("AUTHGATE_TEST_SECRET_4821", "secret-from-env-var");
        }

        assert_eq!(
            resolve_setting("env:AUTHGATE_TEST_SECRET_4821").unwrap(),
            "secret-from-env-var"
        );

        // SAFETY: Cleaning up test environment variable
        unsafe {
            std::env::remove_var("AUTHGATE_TEST_SECRET_4821");
        }
    }

    #[test]
    fn test_resolve_setting_env_var_not_found() {
        assert_eq!(
            resolve_setting("env:AUTHGATE_NONEXISTENT_9931").unwrap_err(),
            ConfigValidationError::EnvVarNotFound("AUTHGATE_NONEXISTENT_9931".to_string())
        );
    }

    #[test]
    fn test_resolve_setting_env_var_empty() {
        // SAFETY: This is a test-only environment variable with a unique name
        unsafe {
            std::env::set_var("AUTHGATE_TEST_EMPTY_5510", "");
        }

        assert_eq!(
            resolve_setting("env:AUTHGATE_TEST_EMPTY_5510").unwrap_err(),
            ConfigValidationError::EnvVarEmpty("AUTHGATE_TEST_EMPTY_5510".to_string())
        );

        // SAFETY: Cleaning up test environment variable
        unsafe {
            std::env::remove_var("AUTHGATE_TEST_EMPTY_5510");
        }
    }

    #[test]
    fn test_gate_config_default_is_valid() {
        assert!(GateConfig::default().validate().is_ok());
    }

    #[test]
    fn test_gate_config_rejects_relative_paths() {
        let mut config = GateConfig::default();
        config.login_path = "login".to_string();
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigValidationError::InvalidPath("login".to_string())
        );
    }

    #[test]
    fn test_gate_config_rejects_protected_login_path() {
        let mut config = GateConfig::default();
        config.login_path = "/dashboard/login".to_string();
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigValidationError::LoginPathProtected("/dashboard/login".to_string())
        );
    }

    #[test]
    fn test_gate_config_rejects_home_path_on_login_path() {
        let mut config = GateConfig::default();
        config.home_path = "/login".to_string();
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigValidationError::HomePathIsLogin("/login".to_string())
        );

        config.home_path = "/login/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_auth_config_env_backend_literal_values() {
        let mut config = AuthConfig::default();
        config.env.email = Some("demo@example.com".to_string());
        config.env.password = Some("hunter22".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_auth_config_env_backend_missing_password() {
        let mut config = AuthConfig::default();
        config.env.email = Some("demo@example.com".to_string());
        config.env.password = None;
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigValidationError::MissingSetting("auth.env.password")
        );
    }

    #[test]
    fn test_credential_backend_serde() {
        let backend: CredentialBackend = serde_json::from_str("\"firebase\"").unwrap();
        assert_eq!(backend, CredentialBackend::Firebase);
        assert_eq!(CredentialBackend::Env.to_string(), "env");
    }
}
