//! API tests for registration, login, and password recovery.

mod helpers;

use axum::http::{StatusCode, header};
use serde_json::json;

use helpers::TestApp;

#[tokio::test]
async fn test_register_returns_public_user() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "name": "Ada", "email": "Ada@Example.com", "password": "secret123" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.message(), "User registered Successfully");
    assert_eq!(response.data()["email"], "ada@example.com");
    assert!(response.data().get("passwordHash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = TestApp::new();
    app.register("Ada", "ada@example.com", "secret123").await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "name": "Ada", "email": "ADA@example.com", "password": "secret123" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["error"], "ConflictError");
    assert_eq!(response.message(), "User already exists");
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "name": "Ada", "email": "ada@example.com", "password": "abc" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "ValidationError");
    assert_eq!(response.body["statusCode"], 400);
}

#[tokio::test]
async fn test_login_sets_cookies_and_returns_tokens() {
    let app = TestApp::new();
    let id = app.register("Ada", "ada@example.com", "secret123").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "ada@example.com", "password": "secret123" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["userId"], id.as_str());
    assert_eq!(response.data()["email"], "ada@example.com");
    assert!(response.data()["accessToken"].is_string());
    assert!(response.data()["refreshToken"].is_string());

    let cookies: Vec<_> = response
        .headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    assert!(cookies.iter().any(|c| c.starts_with("accessToken=") && c.contains("HttpOnly")));
    assert!(cookies.iter().any(|c| c.starts_with("refreshToken=")));
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new();
    app.register("Ada", "ada@example.com", "secret123").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "ada@example.com", "password": "wrong-pass" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), "Password is incorrect");
}

#[tokio::test]
async fn test_login_unknown_user() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "ghost@example.com", "password": "secret123" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), "You are not authorized");
}

#[tokio::test]
async fn test_refresh_issues_new_access_token() {
    let app = TestApp::new();
    app.register("Ada", "ada@example.com", "secret123").await;
    let login = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "ada@example.com", "password": "secret123" })),
            None,
        )
        .await;
    let refresh_token = login.data()["refreshToken"].as_str().unwrap().to_string();

    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refreshToken": refresh_token })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let access = response.data()["accessToken"].as_str().unwrap();

    let me = app.request("GET", "/api/users/me", None, Some(access)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.data()["email"], "ada@example.com");
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let app = TestApp::new();
    let access = app.signed_in("ada@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refreshToken": access })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/files", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), "You are not authorized");

    let response = app
        .request("GET", "/api/files", None, Some("not-a-jwt"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_change_password() {
    let app = TestApp::new();
    let token = app.signed_in("ada@example.com").await;

    let wrong = app
        .request(
            "POST",
            "/api/auth/change-password",
            Some(json!({ "currentPassword": "nope123", "newPassword": "fresh456" })),
            Some(&token),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.message(), "Current password is incorrect");

    let ok = app
        .request(
            "POST",
            "/api/auth/change-password",
            Some(json!({ "currentPassword": "secret123", "newPassword": "fresh456" })),
            Some(&token),
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);

    app.login("ada@example.com", "fresh456").await;
}

#[tokio::test]
async fn test_password_recovery_flow() {
    let app = TestApp::new();
    app.register("Ada", "ada@example.com", "secret123").await;

    let sent = app
        .request(
            "POST",
            "/api/auth/forgot-password",
            Some(json!({ "email": "ada@example.com" })),
            None,
        )
        .await;
    assert_eq!(sent.status, StatusCode::OK);
    let otp = app.mailer.otp_for("ada@example.com").expect("no OTP mailed");
    assert_eq!(otp.len(), 6);

    let early = app
        .request(
            "POST",
            "/api/auth/reset-password",
            Some(json!({ "email": "ada@example.com", "newPassword": "fresh456" })),
            None,
        )
        .await;
    assert_eq!(early.status, StatusCode::UNAUTHORIZED);
    assert_eq!(early.message(), "OTP not verified");

    let bad = app
        .request(
            "POST",
            "/api/auth/verify-otp",
            Some(json!({ "email": "ada@example.com", "otp": "not-it" })),
            None,
        )
        .await;
    assert_eq!(bad.status, StatusCode::UNAUTHORIZED);
    assert_eq!(bad.message(), "Invalid OTP");

    let verified = app
        .request(
            "POST",
            "/api/auth/verify-otp",
            Some(json!({ "email": "ada@example.com", "otp": otp })),
            None,
        )
        .await;
    assert_eq!(verified.status, StatusCode::OK);

    let reset = app
        .request(
            "POST",
            "/api/auth/reset-password",
            Some(json!({ "email": "ada@example.com", "newPassword": "fresh456" })),
            None,
        )
        .await;
    assert_eq!(reset.status, StatusCode::OK);

    app.login("ada@example.com", "fresh456").await;
}

#[tokio::test]
async fn test_forgot_password_unknown_email() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/auth/forgot-password",
            Some(json!({ "email": "ghost@example.com" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.message(), "User not found with this email");
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "ok");
    assert_eq!(response.data()["storage"], "memory");
}
