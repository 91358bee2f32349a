//! Identity Toolkit HTTP client.

use reqwest::Client;

use super::error::{IdentityError, IdentityResult, parse_error_code};
use super::types::*;

/// Client for the Identity Toolkit REST API.
#[derive(Debug, Clone)]
pub struct FirebaseClient {
    /// HTTP client.
    client: Client,
    /// Base URL (e.g. "https://identitytoolkit.googleapis.com").
    base_url: String,
    /// Web API key.
    api_key: String,
}

impl FirebaseClient {
    /// Create a client sharing an existing HTTP client.
    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Verify an email/password pair.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> IdentityResult<SignInResponse> {
        let url = format!("{}/v1/accounts:signInWithPassword", self.base_url);
        let request = SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
            return_secure_token: true,
        };
        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Look up the account behind an ID token.
    pub async fn lookup_account(&self, id_token: &str) -> IdentityResult<AccountInfo> {
        let url = format!("{}/v1/accounts:lookup", self.base_url);
        let request = LookupRequest {
            id_token: id_token.to_string(),
        };
        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(&request)
            .send()
            .await?;

        let lookup: LookupResponse = self.handle_response(response).await?;
        lookup
            .users
            .into_iter()
            .next()
            .ok_or_else(|| IdentityError::ParseError("lookup returned no users".to_string()))
    }

    /// Handle response and parse JSON or error.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> IdentityResult<T> {
        error_for_response(response)
            .await?
            .json()
            .await
            .map_err(|e| IdentityError::ParseError(e.to_string()))
    }
}

/// Turn a non-success response into a provider error.
pub(crate) async fn error_for_response(
    response: reqwest::Response,
) -> IdentityResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) if !envelope.error.message.is_empty() => Err(IdentityError::Provider {
            status: status.as_u16(),
            code: parse_error_code(&envelope.error.message),
        }),
        _ => Err(IdentityError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        }),
    }
}
