mod common;

use std::sync::Arc;

use auth::ManualClock;
use auth::TokenService;
use auth::TokenSettings;
use chrono::Duration;
use chrono::TimeZone;
use chrono::Utc;
use common::TestApp;
use reqwest::header::WWW_AUTHENTICATE;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_health() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/health")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::spawn().await;

    let response = app.login("admin", "admin").await;

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["token_type"], "bearer");

    let token = body["access_token"].as_str().unwrap();
    assert_eq!(app.token_service.validate(token), Some("admin".to_string()));
}

#[tokio::test]
async fn test_login_invalid_username() {
    let app = TestApp::spawn().await;

    let response = app.login("wronguser", "admin").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[WWW_AUTHENTICATE], "Bearer");

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["detail"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_invalid_password() {
    let app = TestApp::spawn().await;

    let response = app.login("admin", "wrongpass").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["detail"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_demo_fallback_disabled() {
    let app = TestApp::spawn_without_demo().await;

    let response = app.login("admin", "admin").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_accepts_subject_field() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/token")
        .form(&[("subject", "admin"), ("password", "admin")])
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_get_current_subject() {
    let app = TestApp::spawn().await;
    let token = app.access_token("admin", "admin").await;

    let response = app
        .get_authenticated("/auth/me", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "subject": "admin" }));
}

#[tokio::test]
async fn test_get_current_subject_no_token() {
    let app = TestApp::spawn().await;

    // A failed login first must not leave anything behind
    let response = app.login("admin", "wrong").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .get("/auth/me")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[WWW_AUTHENTICATE], "Bearer");

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["detail"], "Could not validate credentials");
}

#[tokio::test]
async fn test_get_current_subject_invalid_token() {
    let app = TestApp::spawn().await;

    let response = app
        .get_authenticated("/auth/me", "invalid_token_here")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[WWW_AUTHENTICATE], "Bearer");
}

#[tokio::test]
async fn test_get_current_subject_foreign_secret() {
    let app = TestApp::spawn().await;
    let foreign = TokenService::new(
        &TokenSettings::new("some-other-secret-key-at-least-32-bytes!"),
        Arc::new(auth::SystemClock),
    )
    .unwrap();
    let token = foreign.issue("admin").unwrap().access_token;

    let response = app
        .get_authenticated("/auth/me", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_current_subject_expired_token() {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
    ));
    let app = TestApp::spawn_with(true, clock.clone()).await;
    let token = app.access_token("admin", "admin").await;

    clock.advance(Duration::minutes(59));
    let response = app
        .get_authenticated("/auth/me", &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    clock.advance(Duration::minutes(1));
    let response = app
        .get_authenticated("/auth/me", &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/register")
        .json(&json!({
            "subject": "alice",
            "email": "a@example.com",
            "password": "longenough"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["subject"], "alice");
    assert_eq!(body["email"], "a@example.com");
    assert!(body["message"].is_string());
    assert!(body.get("password_hash").is_none());
    assert!(body.get("password").is_none());

    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn test_register_then_login() {
    let app = TestApp::spawn().await;

    app.post("/auth/register")
        .json(&json!({
            "subject": "alice",
            "email": "a@example.com",
            "password": "longenough"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    let alice_token = app.access_token("alice", "longenough").await;
    let admin_token = app.access_token("admin", "admin").await;

    assert_ne!(alice_token, admin_token);
    assert_eq!(
        app.token_service.validate(&alice_token),
        Some("alice".to_string())
    );

    let response = app
        .get_authenticated("/auth/me", &alice_token)
        .send()
        .await
        .expect("Failed to execute request");
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["subject"], "alice");

    let response = app.login("alice", "wrong-password").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_duplicate_subject() {
    let app = TestApp::spawn().await;

    let first = app
        .post("/auth/register")
        .json(&json!({
            "subject": "alice",
            "email": "a@example.com",
            "password": "longenough"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(first.status(), StatusCode::CREATED);

    let response = app
        .post("/auth/register")
        .json(&json!({
            "subject": "alice",
            "email": "other@example.com",
            "password": "longenough"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("Subject already registered"));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::spawn().await;

    app.post("/auth/register")
        .json(&json!({
            "subject": "alice",
            "email": "a@example.com",
            "password": "longenough"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    let response = app
        .post("/auth/register")
        .json(&json!({
            "subject": "alice2",
            "email": "a@example.com",
            "password": "longenough"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("Email already registered"));
}

#[tokio::test]
async fn test_register_invalid_input() {
    let app = TestApp::spawn().await;

    let cases = [
        json!({ "subject": "alice", "email": "a@example.com", "password": "short" }),
        json!({ "subject": "   ", "email": "a@example.com", "password": "longenough" }),
        json!({ "subject": "alice", "email": "not-an-email", "password": "longenough" }),
    ];

    for case in cases {
        let response = app
            .post("/auth/register")
            .json(&case)
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "case {case} should be rejected"
        );
    }

    assert!(app.store.is_empty().await);
}
