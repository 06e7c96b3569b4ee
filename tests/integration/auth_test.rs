//! Integration tests for the sign-up/sign-in/session flow.

mod helpers;

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use tana_core::traits::CacheProvider;

#[tokio::test]
async fn test_ping() {
    let app = helpers::TestApp::new();
    let response = app.request("GET", "/api", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"message": "ok"}));
}

#[tokio::test]
async fn test_sign_up_token_resolves_as_bearer() {
    let app = helpers::TestApp::new();
    let token = app.sign_up("a@b.com").await;

    let response = app.request("GET", "/api/session", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["token"], token.as_str());
    assert_eq!(response.body["user"]["email"], "a@b.com");
    assert_eq!(response.body["user"]["phone"], "5123456789");
    assert!(response.body["user"].get("password").is_none());
}

#[tokio::test]
async fn test_sign_up_validation_errors() {
    let app = helpers::TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/sign-up",
            Some(json!({
                "name": "",
                "last_name": "B",
                "email": "nope",
                "password": "short",
                "phone": "4123456789",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let details = &response.body["details"];
    assert_eq!(details["name"], "This field is required!");
    assert_eq!(details["email"], "Invalid email format!");
    assert_eq!(details["password"], "Invalid field!");
    assert_eq!(details["phone"], "Invalid phone number!");
    assert!(details.get("last_name").is_none());
}

#[tokio::test]
async fn test_sign_up_duplicate_email() {
    let app = helpers::TestApp::new();
    app.sign_up("a@b.com").await;

    let response = app
        .request(
            "POST",
            "/api/sign-up",
            Some(json!({
                "name": "C",
                "last_name": "D",
                "email": "a@b.com",
                "password": "Zyxwvu9?",
                "phone": "5987654321",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["details"]["email"], "a@b.com already exists");
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = helpers::TestApp::new();
    let req = Request::builder()
        .method("POST")
        .uri("/api/sign-in")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.send(req).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sign_in_success_and_failure() {
    let app = helpers::TestApp::new();
    app.sign_up("a@b.com").await;

    let ok = app
        .request(
            "POST",
            "/api/sign-in",
            Some(json!({"email": "a@b.com", "password": "Abcdef1!"})),
            None,
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.body["user"]["email"], "a@b.com");

    let bad = app
        .request(
            "POST",
            "/api/sign-in",
            Some(json!({"email": "a@b.com", "password": "Abcdef1?"})),
            None,
        )
        .await;
    assert_eq!(bad.status, StatusCode::UNAUTHORIZED);

    let empty = app
        .request("POST", "/api/sign-in", Some(json!({"email": "a@b.com"})), None)
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_session_without_token() {
    let app = helpers::TestApp::new();
    let response = app.request("GET", "/api/session", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_unknown_token() {
    let app = helpers::TestApp::new();
    let response = app
        .request("GET", "/api/session", None, Some("never-issued"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cookie_takes_priority_over_query_and_header() {
    let app = helpers::TestApp::new();
    let good = app.sign_up("a@b.com").await;

    let req = Request::builder()
        .uri("/api/session?token=bogus-query")
        .header("Cookie", format!("token={good}"))
        .header("Authorization", "Bearer bogus-header")
        .body(Body::empty())
        .unwrap();
    let response = app.send(req).await;
    assert_eq!(response.status, StatusCode::OK);

    let req = Request::builder()
        .uri(format!("/api/session?token={good}"))
        .header("Authorization", "Bearer bogus-header")
        .body(Body::empty())
        .unwrap();
    let response = app.send(req).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_session_request_slides_ttl() {
    let app = helpers::TestApp::new();
    let token = app.sign_up("a@b.com").await;
    let key = format!("session-{token}");

    app.cache
        .expire(&key, Duration::from_secs(60))
        .await
        .unwrap();

    let response = app.request("GET", "/api/session", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);

    let ttl = app.cache.ttl(&key).await.unwrap().unwrap();
    assert!(ttl > Duration::from_secs(24 * 60 * 60 - 5));
}

#[tokio::test]
async fn test_sign_out_revokes_session() {
    let app = helpers::TestApp::new();
    let token = app.sign_up("a@b.com").await;

    let response = app
        .request("POST", "/api/sign-out", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.request("GET", "/api/session", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_deleted_user_loses_session() {
    let app = helpers::TestApp::new();
    let token = app.sign_up("a@b.com").await;

    app.users.soft_delete("a@b.com").await;

    let response = app.request("GET", "/api/session", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health() {
    let app = helpers::TestApp::new();
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["cache"], true);
}
