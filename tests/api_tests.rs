//! API integration tests.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{
    TEST_EMAIL, TEST_PASSWORD, get, json_body, post_login, set_cookie_pair, test_app,
    test_app_with_cookie, text_body,
};

/// Test that health endpoint works without authentication.
#[tokio::test]
async fn test_health_endpoint() {
    let response = get(test_app(), "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_dashboard_without_cookie_redirects_to_login() {
    let response = get(test_app(), "/dashboard", None).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/login");
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_nested_dashboard_path_is_protected() {
    let response = get(test_app(), "/dashboard/settings/profile", None).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/login");
}

#[tokio::test]
async fn test_dashboard_with_valid_cookie_renders() {
    let (app, cookie) = test_app_with_cookie();
    let response = get(app, "/dashboard", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let body = text_body(response).await;
    assert!(body.contains(&format!("Logged in as: {}", TEST_EMAIL)));
    assert!(body.contains(r#"action="/api/logout""#));
}

#[tokio::test]
async fn test_login_page_with_valid_cookie_redirects_home() {
    let (app, cookie) = test_app_with_cookie();
    let response = get(app, "/login", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/dashboard");
}

#[tokio::test]
async fn test_login_page_without_cookie_renders() {
    let response = get(test_app(), "/login", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text_body(response).await.contains("login-form"));
}

#[tokio::test]
async fn test_tampered_cookie_treated_as_absent() {
    let (app, cookie) = test_app_with_cookie();
    // Flip a character inside the signature.
    let mut chars: Vec<char> = cookie.chars().collect();
    let idx = chars.len() - 6;
    chars[idx] = if chars[idx] == 'A' { 'B' } else { 'A' };
    let tampered: String = chars.into_iter().collect();

    let response = get(app.clone(), "/dashboard", Some(&tampered)).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/login");

    let response = get(app, "/login", Some(&tampered)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unprotected_paths_pass_through() {
    let (app, cookie) = test_app_with_cookie();

    for cookie in [None, Some(cookie.as_str())] {
        let response = get(app.clone(), "/", cookie).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());

        // Not a segment match for /dashboard.
        let response = get(app.clone(), "/dashboards", cookie).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_login_success_sets_cookie() {
    let body = json!({ "email": TEST_EMAIL, "password": TEST_PASSWORD }).to_string();
    let response = post_login(test_app(), &body).await;

    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(set_cookie.starts_with("authgate-session="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Path=/"));
    assert!(set_cookie.contains("Max-Age=604800"));

    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Login successful");
}

#[tokio::test]
async fn test_login_cookie_opens_dashboard() {
    let app = test_app();
    let body = json!({ "email": TEST_EMAIL, "password": TEST_PASSWORD }).to_string();
    let response = post_login(app.clone(), &body).await;
    let cookie = set_cookie_pair(&response).unwrap();

    let response = get(app, "/dashboard", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_missing_fields() {
    for body in [
        json!({ "email": TEST_EMAIL }),
        json!({ "password": TEST_PASSWORD }),
        json!({ "email": "", "password": TEST_PASSWORD }),
        json!({}),
    ] {
        let response = post_login(test_app(), &body.to_string()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        assert!(response.headers().get(header::SET_COOKIE).is_none());

        let json = json_body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Email and password are required");
    }
}

#[tokio::test]
async fn test_login_wrong_password() {
    let body = json!({ "email": TEST_EMAIL, "password": "wrong" }).to_string();
    let response = post_login(test_app(), &body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let json = json_body(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_login_malformed_body() {
    let response = post_login(test_app(), "{not json").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = json_body(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "An error occurred during login");
}

#[tokio::test]
async fn test_logout_clears_cookie_and_redirects_home() {
    let (app, cookie) = test_app_with_cookie();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/logout")
                .method(Method::POST)
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default();
    assert!(set_cookie.starts_with("authgate-session=;"));
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_session_endpoint_authenticated() {
    let (app, cookie) = test_app_with_cookie();
    let response = get(app, "/api/session", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["authenticated"], true);
    assert_eq!(json["subject"], TEST_EMAIL);
    assert_eq!(json["email"], TEST_EMAIL);
    assert_eq!(json["provider"], "env");
    assert!(json["expires_at"].is_string());
}

#[tokio::test]
async fn test_session_endpoint_anonymous() {
    for cookie in [None, Some("authgate-session=garbage")] {
        let response = get(test_app(), "/api/session", cookie).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json, json!({ "authenticated": false }));
    }
}

#[tokio::test]
async fn test_gate_is_stateless_across_requests() {
    let (app, cookie) = test_app_with_cookie();
    for _ in 0..3 {
        let response = get(app.clone(), "/dashboard", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let response = get(app.clone(), "/dashboard", None).await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    }
}
