//! Signed session tokens and the cookie that carries them.

use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use log::debug;
use serde::Serialize;

use super::{AuthError, ConfigValidationError, SessionClaims, SessionConfig, Subject};

/// A verified session.
///
/// Only produced by [`SessionKeys::verify`], so holding one means the token
/// was signed with our secret and had not expired when it was read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub subject: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub provider: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub(crate) fn new(
        subject: impl Into<String>,
        email: Option<String>,
        name: Option<String>,
        provider: Option<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            subject: subject.into(),
            email,
            name,
            provider,
            expires_at,
        }
    }

    /// Email if known, otherwise the subject.
    pub fn email_or_subject(&self) -> &str {
        self.email.as_deref().unwrap_or(&self.subject)
    }

    fn from_claims(claims: SessionClaims) -> Result<Self, AuthError> {
        if claims.sub.trim().is_empty() {
            return Err(AuthError::InvalidToken("empty subject".to_string()));
        }
        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| AuthError::InvalidToken("exp out of range".to_string()))?;

        Ok(Self::new(
            claims.sub,
            claims.email,
            claims.name,
            claims.provider,
            expires_at,
        ))
    }
}

/// Keys and cookie settings for issuing and verifying sessions.
#[derive(Clone)]
pub struct SessionKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    cookie_name: String,
    max_age_secs: i64,
    cookie_secure: bool,
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys")
            .field("cookie_name", &self.cookie_name)
            .field("max_age_secs", &self.max_age_secs)
            .field("cookie_secure", &self.cookie_secure)
            .finish_non_exhaustive()
    }
}

impl SessionKeys {
    /// Create keys from an already resolved secret.
    pub fn new(secret: &str, config: &SessionConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            cookie_name: config.cookie_name.clone(),
            max_age_secs: config.max_age_secs,
            cookie_secure: config.cookie_secure,
        }
    }

    /// Validate the config and create keys from it.
    pub fn from_config(config: &SessionConfig) -> Result<Self, ConfigValidationError> {
        let secret = config.validate()?;
        Ok(Self::new(&secret, config))
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Issue a session token for a verified subject.
    pub fn issue(&self, subject: &Subject, provider: &str) -> Result<String, AuthError> {
        self.issue_at(subject, provider, Utc::now())
    }

    /// Issue a session token as if the current time were `now`.
    pub fn issue_at(
        &self,
        subject: &Subject,
        provider: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let expires_at = Duration::try_seconds(self.max_age_secs)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| AuthError::Internal("session expiry out of range".to_string()))?;

        let claims = SessionClaims {
            sub: subject.id.clone(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            email: Some(subject.email.clone()),
            name: subject.display_name.clone(),
            provider: Some(provider.to_string()),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Verify a token's signature and expiry.
    pub fn verify(&self, token: &str) -> Result<Session, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data =
            decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::InvalidToken(e.to_string()),
                }
            })?;

        Session::from_claims(token_data.claims)
    }

    /// Resolve an optional token into a session. Any failure means no session.
    pub fn resolve(&self, token: Option<&str>) -> Option<Session> {
        let token = token?;
        match self.verify(token) {
            Ok(session) => Some(session),
            Err(e) => {
                debug!("Rejected session token: {}", e);
                None
            }
        }
    }

    /// Cookie carrying a freshly issued token.
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((self.cookie_name.clone(), token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.cookie_secure)
            .max_age(time::Duration::seconds(self.max_age_secs))
            .build()
    }

    /// Cookie that clears the session in the browser.
    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build((self.cookie_name.clone(), String::new()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.cookie_secure)
            .max_age(time::Duration::ZERO)
            .build()
    }
}
