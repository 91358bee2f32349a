//! Firestore user-document sync through a service account.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use log::debug;
use reqwest::{Client, StatusCode, header::CONTENT_TYPE};
use serde_json::json;
use tokio::sync::Mutex;

use super::client::error_for_response;
use super::config::ServiceAccount;
use super::error::{IdentityError, IdentityResult};
use super::types::{AssertionClaims, TokenResponse};

const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Refresh cached tokens this long before they expire.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;
/// Upper bound on how long a fetched token is cached.
const MAX_TOKEN_CACHE_SECS: i64 = 3600;

struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Firestore admin client.
///
/// Exchanges a signed service-account assertion for an access token, caches it
/// until shortly before expiry, and creates user documents.
pub struct FirestoreAdmin {
    client: Client,
    account: ServiceAccount,
    encoding_key: EncodingKey,
    token_url: String,
    firestore_base_url: String,
    token: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for FirestoreAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreAdmin")
            .field("account", &self.account)
            .field("token_url", &self.token_url)
            .field("firestore_base_url", &self.firestore_base_url)
            .finish_non_exhaustive()
    }
}

impl FirestoreAdmin {
    pub fn new(
        client: Client,
        account: ServiceAccount,
        token_url: impl Into<String>,
        firestore_base_url: impl Into<String>,
    ) -> IdentityResult<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(account.private_key.as_bytes())
            .map_err(|e| IdentityError::InvalidKey(e.to_string()))?;

        Ok(Self {
            client,
            account,
            encoding_key,
            token_url: token_url.into(),
            firestore_base_url: firestore_base_url.into().trim_end_matches('/').to_string(),
            token: Mutex::new(None),
        })
    }

    /// Get an access token, reusing the cached one while it is fresh.
    pub async fn access_token(&self) -> IdentityResult<String> {
        let mut cached = self.token.lock().await;
        let now = Utc::now();

        let margin = Duration::seconds(TOKEN_REFRESH_MARGIN_SECS);
        if let Some(token) = cached.as_ref().filter(|t| t.expires_at - margin > now) {
            return Ok(token.access_token.clone());
        }

        let fresh = self.fetch_access_token(now).await?;
        let access_token = fresh.access_token.clone();
        *cached = Some(fresh);
        Ok(access_token)
    }

    async fn fetch_access_token(&self, now: DateTime<Utc>) -> IdentityResult<CachedToken> {
        let claims = AssertionClaims {
            iss: self.account.client_email.clone(),
            scope: DATASTORE_SCOPE.to_string(),
            aud: self.token_url.clone(),
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)?;

        let body = format!(
            "grant_type={}&assertion={}",
            urlencoding::encode(JWT_BEARER_GRANT),
            urlencoding::encode(&assertion)
        );
        let response = self
            .client
            .post(&self.token_url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        let token: TokenResponse = error_for_response(response)
            .await?
            .json()
            .await
            .map_err(|e| IdentityError::ParseError(e.to_string()))?;

        debug!(
            "Obtained Firestore access token for {} (expires in {}s)",
            self.account.client_email, token.expires_in
        );
        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: token_expiry(now, token.expires_in),
        })
    }

    /// Create `users/{uid}` if it does not exist yet.
    ///
    /// Returns `true` when a document was created and `false` when one was
    /// already there. Existing documents are never modified.
    pub async fn ensure_user_document(&self, uid: &str, email: &str) -> IdentityResult<bool> {
        let token = self.access_token().await?;
        let url = format!(
            "{}/v1/projects/{}/databases/(default)/documents/users",
            self.firestore_base_url, self.account.project_id
        );
        let document = json!({
            "fields": {
                "email": { "stringValue": email },
                "createdAt": { "timestampValue": Utc::now().to_rfc3339() },
                "emailVerified": { "booleanValue": true },
            }
        });

        let response = self
            .client
            .post(&url)
            .query(&[("documentId", uid)])
            .bearer_auth(token)
            .json(&document)
            .send()
            .await?;

        if response.status() == StatusCode::CONFLICT {
            return Ok(false);
        }
        error_for_response(response).await?;
        Ok(true)
    }
}

/// Expiry of a fetched token. The remote lifetime is clamped to
/// `0..=MAX_TOKEN_CACHE_SECS`.
fn token_expiry(now: DateTime<Utc>, expires_in: i64) -> DateTime<Utc> {
    now + Duration::seconds(expires_in.clamp(0, MAX_TOKEN_CACHE_SECS))
}
