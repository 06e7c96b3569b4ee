//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use tana_api::AppState;
use tana_auth::{SessionManager, SessionStore};
use tana_cache::memory::MemoryCacheProvider;
use tana_core::config::AppConfig;
use tana_database::MemoryUserRepository;
use tana_realtime::EventHub;

/// Router wired to in-process cache and user store.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Cache backing sessions, for direct inspection
    pub cache: Arc<MemoryCacheProvider>,
    /// User store, for direct manipulation
    pub users: MemoryUserRepository,
    /// Event hub the router streams from
    pub hub: EventHub,
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        let config = AppConfig::default();
        let cache = Arc::new(MemoryCacheProvider::new(&config.cache.memory));
        let users = MemoryUserRepository::new();
        let hub = EventHub::new(config.events.buffer_size);

        let store = SessionStore::new(
            cache.clone(),
            Arc::new(users.clone()),
            config.session.clone(),
        );
        let state = AppState {
            config: Arc::new(config),
            cache: cache.clone(),
            users: Arc::new(users.clone()),
            sessions: Arc::new(SessionManager::new(store)),
            hub: hub.clone(),
        };

        Self {
            router: tana_api::build_router(state),
            cache,
            users,
            hub,
        }
    }

    /// Register `email` with valid defaults and return the session token.
    pub async fn sign_up(&self, email: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/sign-up",
                Some(json!({
                    "name": "A",
                    "last_name": "B",
                    "email": email,
                    "password": "Abcdef1!",
                    "phone": "5123456789",
                })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.body["token"]
            .as_str()
            .expect("token in sign-up response")
            .to_string()
    }

    /// Send a request with an optional JSON body and bearer token
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();
        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Send a prebuilt request
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
