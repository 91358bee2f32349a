//! Identity Toolkit and OAuth wire types.

use serde::{Deserialize, Serialize};

/// Request for `accounts:signInWithPassword`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
    pub return_secure_token: bool,
}

/// Response from `accounts:signInWithPassword`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub local_id: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub id_token: String,
}

/// Request for `accounts:lookup`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRequest {
    pub id_token: String,
}

/// Response from `accounts:lookup`.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupResponse {
    #[serde(default)]
    pub users: Vec<AccountInfo>,
}

/// Account record returned by `accounts:lookup`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub local_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Error envelope used by Google APIs.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
}

/// Claims of the service-account assertion exchanged for an access token.
#[derive(Debug, Clone, Serialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// OAuth token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_request_is_camel_case() {
        let req = SignInRequest {
            email: "a@b.c".to_string(),
            password: "pw".to_string(),
            return_secure_token: true,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["returnSecureToken"], true);
    }

    #[test]
    fn test_lookup_response_defaults() {
        let json = r#"{"users":[{"localId":"u1","email":"a@b.c"}]}"#;
        let parsed: LookupResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.users.len(), 1);
        assert!(!parsed.users[0].email_verified);

        let empty: LookupResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.users.is_empty());
    }

    #[test]
    fn test_error_envelope() {
        let json = r#"{"error":{"code":400,"message":"INVALID_PASSWORD","errors":[]}}"#;
        let parsed: ErrorEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.error.code, 400);
        assert_eq!(parsed.error.message, "INVALID_PASSWORD");
    }
}
