//! Hunter registration and login over the HTTP router.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use bounty_service::models::{Hunter, NewHunter};
use bounty_service::services::{AuthService, HunterFilter, HunterStore, StoreError};
use bounty_service::{build_router, AppState};
use common::{post_json, spawn_app};
use serde_json::json;

/// Sees no existing hunter, then loses the insert to the unique email index.
struct RacingHunterStore;

#[async_trait]
impl HunterStore for RacingHunterStore {
    async fn find_all(&self) -> Result<Vec<Hunter>, StoreError> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: i32) -> Result<Option<Hunter>, StoreError> {
        Ok(None)
    }

    async fn find_where(&self, _filter: &HunterFilter) -> Result<Vec<Hunter>, StoreError> {
        Ok(Vec::new())
    }

    async fn insert(&self, _hunter: &NewHunter) -> Result<Hunter, StoreError> {
        Err(StoreError::UniqueViolation("idx_hunters_email".to_string()))
    }
}

fn spike() -> serde_json::Value {
    json!({
        "name": "Spike Spiegel",
        "email": "spike@bebop.example",
        "password": "Swordfish-II"
    })
}

#[tokio::test]
async fn register_returns_hunter_without_digest() {
    let (app, _) = spawn_app();

    let response = post_json(&app, "/api/auth/register", spike()).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["message"], "Hunter registered successfully");
    assert_eq!(response.body["hunter"]["email"], "spike@bebop.example");
    assert!(response.body["hunter"]["id"].is_i64());
    assert!(response.body["hunter"].get("passwordHash").is_none());
    assert!(!response.body.to_string().to_lowercase().contains("password"));
}

#[tokio::test]
async fn registering_twice_keeps_one_row() {
    let (app, store) = spawn_app();

    let first = post_json(&app, "/api/auth/register", spike()).await;
    assert_eq!(first.status, StatusCode::OK);

    let mut again = spike();
    again["email"] = json!("SPIKE@bebop.example");
    let second = post_json(&app, "/api/auth/register", again).await;

    assert_eq!(second.status, StatusCode::BAD_REQUEST);
    assert_eq!(second.body["success"], false);
    assert_eq!(
        second.body["message"],
        "Hunter with this email already exists"
    );
    assert_eq!(HunterStore::find_all(store.as_ref()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn login_succeeds_with_matching_credentials() {
    let (app, _) = spawn_app();
    post_json(&app, "/api/auth/register", spike()).await;

    let response = post_json(
        &app,
        "/api/auth/login",
        json!({ "email": "Spike@Bebop.example", "password": "Swordfish-II" }),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["message"], "Login successful");
    assert_eq!(response.body["hunter"]["name"], "Spike Spiegel");
    assert!(!response.body.to_string().to_lowercase().contains("password"));
}

#[tokio::test]
async fn login_failures_are_identical() {
    let (app, _) = spawn_app();
    post_json(&app, "/api/auth/register", spike()).await;

    let wrong_password = post_json(
        &app,
        "/api/auth/login",
        json!({ "email": "spike@bebop.example", "password": "wrong" }),
    )
    .await;
    let unknown_email = post_json(
        &app,
        "/api/auth/login",
        json!({ "email": "faye@bebop.example", "password": "Swordfish-II" }),
    )
    .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_email.body);
    assert_eq!(
        wrong_password.body,
        json!({ "success": false, "message": "Invalid email or password" })
    );
}

#[tokio::test]
async fn invalid_registration_lists_offending_fields() {
    let (app, _) = spawn_app();

    let response = post_json(
        &app,
        "/api/auth/register",
        json!({ "name": "", "email": "not-an-email", "password": "x" }),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["message"], "Validation failed");
    let details = response.body["details"].as_array().unwrap();
    assert_eq!(details.len(), 2);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let (app, _) = spawn_app();

    let response = post_json(&app, "/api/auth/login", json!({ "email": 42 })).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
}

#[tokio::test]
async fn store_outage_is_an_opaque_internal_error() {
    let (app, store) = spawn_app();
    store.set_offline(true);

    let response = post_json(&app, "/api/auth/register", spike()).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.body,
        json!({ "success": false, "message": "Internal server error" })
    );
}

#[tokio::test]
async fn concurrent_registration_loser_gets_duplicate_email() {
    let (_, store) = spawn_app();
    let state = AppState {
        auth_service: AuthService::new(Arc::new(RacingHunterStore)),
        ..AppState::new(common::test_config(), store)
    };
    let app = build_router(state);

    let response = post_json(&app, "/api/auth/register", spike()).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        json!({ "success": false, "message": "Hunter with this email already exists" })
    );
}
