//! Test utilities and common setup.
#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, header};
use axum::response::Response;
use std::sync::Arc;
use tower::ServiceExt;

use authgate::api;
use authgate::auth::{
    AccessGate, AuthState, CredentialVerifier, EnvCredentialVerifier, GateConfig, SessionConfig,
    SessionKeys, Subject,
};

pub const TEST_SECRET: &str = "test-secret-for-integration-tests-minimum-32-chars";
pub const TEST_EMAIL: &str = "demo@example.com";
pub const TEST_PASSWORD: &str = "hunter22";

/// Create a test SessionConfig with a secret.
pub fn test_session_config() -> SessionConfig {
    SessionConfig {
        secret: Some(TEST_SECRET.to_string()),
        ..SessionConfig::default()
    }
}

/// Auth state with default gate rules.
pub fn test_auth_state() -> AuthState {
    AuthState::new(
        SessionKeys::from_config(&test_session_config()).unwrap(),
        AccessGate::new(&GateConfig::default()),
    )
}

/// Create a test application using the given credential backend.
pub fn test_app_with_verifier(verifier: Arc<dyn CredentialVerifier>) -> Router {
    let state = api::AppState::new(test_auth_state(), verifier);
    api::create_router(state)
}

/// Create a test application backed by the env credential pair.
pub fn test_app() -> Router {
    test_app_with_verifier(Arc::new(EnvCredentialVerifier::new(
        TEST_EMAIL,
        TEST_PASSWORD,
    )))
}

/// Create a test application and a valid session cookie for it.
pub fn test_app_with_cookie() -> (Router, String) {
    (test_app(), valid_cookie())
}

/// `Cookie` header value carrying a valid session for the test user.
pub fn valid_cookie() -> String {
    let state = test_auth_state();
    let token = state
        .keys()
        .issue(
            &Subject {
                id: TEST_EMAIL.to_string(),
                email: TEST_EMAIL.to_string(),
                display_name: None,
            },
            "env",
        )
        .unwrap();
    format!("{}={}", state.keys().cookie_name(), token)
}

/// Send a GET request, optionally with a cookie.
pub async fn get(app: Router, uri: &str, cookie: Option<&str>) -> Response {
    let mut builder = Request::builder().uri(uri).method(Method::GET);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// POST a JSON body to the login endpoint.
pub async fn post_login(app: Router, body: &str) -> Response {
    app.oneshot(
        Request::builder()
            .uri("/api/login")
            .method(Method::POST)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Read a response body as JSON.
pub async fn json_body(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Read a response body as text.
pub async fn text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

/// The `name=value` part of the response's Set-Cookie header.
pub fn set_cookie_pair(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split(';').next())
        .map(|pair| pair.trim().to_string())
}
