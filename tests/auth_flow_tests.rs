//! End-to-end authentication flow tests
//!
//! These drive the real router with an in-memory user store, covering the
//! register → login → me lifecycle and the unauthorized paths.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Duration;
use jsonwebtoken::Algorithm;
use tower::util::ServiceExt;

use tickerdesk_server::auth::{CredentialService, PrincipalResolver, TokenCodec};
use tickerdesk_server::market::MarketDataService;
use tickerdesk_server::routes;
use tickerdesk_server::state::AppState;
use tickerdesk_server::store::{InMemoryUserStore, UserStore, UserUpdate};

const TEST_SECRET: &str = "integration-test-secret";

// Minimum bcrypt cost keeps the suite fast.
const TEST_COST: u32 = 4;

fn test_app_with_store() -> (Router, Arc<InMemoryUserStore>) {
    let store = Arc::new(InMemoryUserStore::new());
    let codec = Arc::new(TokenCodec::new(TEST_SECRET, Algorithm::HS256));

    let credential_service = Arc::new(CredentialService::new(
        store.clone(),
        codec.clone(),
        Duration::minutes(30),
        TEST_COST,
    ));
    let principal_resolver = Arc::new(PrincipalResolver::new(codec, store.clone()));
    let market_service = Arc::new(MarketDataService::new("http://127.0.0.1:0".to_string()));

    let state = AppState::new(credential_service, principal_resolver, market_service);

    let app = Router::new()
        .merge(routes::auth_routes())
        .merge(routes::stock_routes())
        .with_state(state);

    (app, store)
}

fn test_app() -> Router {
    test_app_with_store().0
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}

fn register_request(username: &str, email: &str, password: &str) -> Request<Body> {
    let body = serde_json::json!({
        "username": username,
        "email": email,
        "password": password,
    });
    Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn login_request(username: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("username={username}&password={password}")))
        .unwrap()
}

fn me_request(token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri("/api/auth/me")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

/// Change one character of the token's signature, keeping it base64url-shaped.
fn tamper(token: &str) -> String {
    let sig_start = token.rfind('.').unwrap() + 1;
    let mut chars: Vec<char> = token.chars().collect();
    chars[sig_start] = if chars[sig_start] == 'A' { 'B' } else { 'A' };
    chars.into_iter().collect()
}

#[tokio::test]
async fn register_returns_created_user_without_any_hash() {
    let app = test_app();

    let (status, body) = send(
        &app,
        register_request("alice", "alice@example.com", "hunter2pw"),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["active"], true);
    assert!(body.get("id").is_some());
    assert!(body.get("created_at").is_some());

    let keys: Vec<&String> = body.as_object().unwrap().keys().collect();
    assert!(keys.iter().all(|k| !k.contains("password")));
}

#[tokio::test]
async fn duplicate_username_and_email_conflict_per_field() {
    let app = test_app();
    send(
        &app,
        register_request("alice", "alice@example.com", "hunter2pw"),
    )
    .await;

    let (status, body) = send(
        &app,
        register_request("alice", "second@example.com", "hunter2pw"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Username already registered");

    let (status, body) = send(
        &app,
        register_request("bob", "alice@example.com", "hunter2pw"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Email already registered");
}

#[tokio::test]
async fn register_rejects_invalid_input() {
    let app = test_app();

    let (status, _) = send(
        &app,
        register_request("alice", "not-an-address", "hunter2pw"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, register_request("alice", "alice@example.com", "")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_issues_a_bearer_token() {
    let app = test_app();
    send(
        &app,
        register_request("alice", "alice@example.com", "hunter2pw"),
    )
    .await;

    let (status, body) = send(&app, login_request("alice", "hunter2pw")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    assert!(!body["access_token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn wrong_password_and_unknown_user_answer_identically() {
    let app = test_app();
    send(
        &app,
        register_request("alice", "alice@example.com", "hunter2pw"),
    )
    .await;

    let (wrong_status, wrong_body) = send(&app, login_request("alice", "wrongpw")).await;
    let (unknown_status, unknown_body) = send(&app, login_request("mallory", "hunter2pw")).await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn me_requires_a_valid_bearer_token() {
    let app = test_app();
    send(
        &app,
        register_request("alice", "alice@example.com", "hunter2pw"),
    )
    .await;
    let (_, login_body) = send(&app, login_request("alice", "hunter2pw")).await;
    let token = login_body["access_token"].as_str().unwrap().to_string();

    // With the real token
    let (status, body) = send(&app, me_request(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");

    // With one character changed
    let (status, _) = send(&app, me_request(&tamper(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // With no header at all
    let bare = Request::builder()
        .method("GET")
        .uri("/api/auth/me")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, bare).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn deactivated_account_is_locked_out_of_login_and_me() {
    let (app, store) = test_app_with_store();
    send(
        &app,
        register_request("alice", "alice@example.com", "hunter2pw"),
    )
    .await;
    let (_, login_body) = send(&app, login_request("alice", "hunter2pw")).await;
    let token = login_body["access_token"].as_str().unwrap().to_string();

    let alice = store.find_by_username("alice").await.unwrap().unwrap();
    store
        .update(
            alice.id,
            UserUpdate {
                active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // Password still matches, but the account is inactive.
    let (status, _) = send(&app, login_request("alice", "hunter2pw")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // The previously issued token no longer resolves either.
    let (status, _) = send(&app, me_request(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn full_lifecycle_scenario() {
    let app = test_app();

    // register alice
    let (status, _) = send(
        &app,
        register_request("alice", "alice@x.com", "hunter2pw"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // same username, different email
    let (status, _) = send(
        &app,
        register_request("alice", "alice2@x.com", "hunter2pw"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // login
    let (status, body) = send(&app, login_request("alice", "hunter2pw")).await;
    assert_eq!(status, StatusCode::OK);
    let token = body["access_token"].as_str().unwrap().to_string();

    // me with the token
    let (status, body) = send(&app, me_request(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");

    // me with a mutated token
    let (status, _) = send(&app, me_request(&tamper(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // wrong password
    let (status, _) = send(&app, login_request("alice", "wrongpw")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
