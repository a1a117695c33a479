//! Common test utilities for bounty-service integration tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use bounty_service::config::{
    BountyConfig, DatabaseConfig, Environment, SecurityConfig, ServerConfig, SwaggerConfig,
};
use bounty_service::services::InMemoryStore;
use bounty_service::{build_router, AppState};
use http_body_util::BodyExt;
use secrecy::Secret;
use serde_json::Value;
use service_core::config::Config as CommonConfig;
use std::sync::{Arc, Once};
use tower::ServiceExt;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,bounty_service=debug,sqlx=warn")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn test_config() -> BountyConfig {
    BountyConfig {
        common: CommonConfig { port: 0 },
        environment: Environment::Dev,
        service_name: "bounty-service-test".to_string(),
        service_version: "test".to_string(),
        log_level: "debug".to_string(),
        otlp_endpoint: None,
        database: DatabaseConfig {
            url: Secret::new("postgres://unused".to_string()),
            max_connections: 2,
            min_connections: 1,
            run_migrations: false,
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:5000".to_string()],
        },
        server: ServerConfig {
            request_timeout_seconds: 5,
        },
        swagger: SwaggerConfig { enabled: false },
    }
}

/// Router over a seeded in-memory store, plus the store for direct inspection.
pub fn spawn_app() -> (Router, Arc<InMemoryStore>) {
    init_tracing();
    let store = Arc::new(InMemoryStore::seeded());
    let state = AppState::new(test_config(), store.clone());
    (build_router(state), store)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(
        app,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> TestResponse {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}
