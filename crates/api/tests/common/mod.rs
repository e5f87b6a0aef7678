#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use tunely_api::auth::jwt::{issue_token, JwtConfig};
use tunely_api::config::{ServerConfig, StoreBackend};
use tunely_api::router::build_app_router;
use tunely_api::state::AppState;
use tunely_db::{EntityStore, MemoryStore};
use tunely_events::EventBus;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        public_base_url: "https://tunely.test".to_string(),
        store_backend: StoreBackend::Memory,
        jwt: JwtConfig {
            secret: "integration-test-secret-for-hmac-signing".to_string(),
            token_ttl_mins: 15,
        },
    }
}

/// Build the full application router over a fresh in-memory store.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack.
pub fn build_test_app() -> Router {
    build_test_app_with_store(Arc::new(MemoryStore::new()))
}

pub fn build_test_app_with_store(store: Arc<dyn EntityStore>) -> Router {
    let config = test_config();
    let state = AppState::new(store, Arc::new(config.clone()), Arc::new(EventBus::default()));
    build_app_router(state, &config)
}

/// A valid Bearer token for `artist_id`.
pub fn token_for(artist_id: i64) -> String {
    issue_token(artist_id, &test_config().jwt).expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Sign up `artist_id` under `handle` and start a session. Returns the
/// session id.
pub async fn artist_with_session(app: &Router, artist_id: i64, handle: &str) -> i64 {
    let token = token_for(artist_id);
    let response = post_json_auth(
        app.clone(),
        "/api/v1/artists",
        serde_json::json!({ "handle": handle, "display_name": "Test Artist" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), 201, "signup should succeed");

    let response = post_auth(app.clone(), "/api/v1/sessions", &token).await;
    assert_eq!(response.status(), 201, "session start should succeed");
    body_json(response).await["data"]["session"]["id"]
        .as_i64()
        .unwrap()
}

/// Submit a request and return the created item's id.
pub async fn submit(app: &Router, session_id: i64, title: &str, tip: i64) -> i64 {
    let response = post_json(
        app.clone(),
        &format!("/api/v1/sessions/{session_id}/requests"),
        serde_json::json!({ "song_title": title, "tip_amount": tip }),
    )
    .await;
    assert_eq!(response.status(), 201, "request for {title} should be admitted");
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
