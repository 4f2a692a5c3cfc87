//! Integration tests for the keyboard endpoint server.
//!
//! These tests require the `web` feature to be enabled:
//! ```bash
//! cargo test --features web web_api
//! ```

#![cfg(feature = "web")]

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use foliosearch::config::Config;
use foliosearch::services::MappingStore;
use foliosearch::web::{create_router, AppState};

/// Creates a router over a temp-dir store with a configured default mapping.
fn create_test_router() -> (axum::Router, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let mut config = Config::default();
    config
        .keyboard
        .mapping
        .insert("a".to_string(), "א".to_string());
    config.keyboard.enabled = true;

    let store = MappingStore::new(temp_dir.path().join("keyboard.json"));
    let router = create_router(AppState::new(config, store));

    (router, temp_dir)
}

/// Helper to make a GET request and get the response body as JSON.
async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    (status, json)
}

/// Helper to make a POST request with JSON body.
async fn post_json(app: &axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    (status, json)
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let (app, _temp) = create_test_router();

    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
}

// ============================================================================
// GET /keyboard Tests
// ============================================================================

#[tokio::test]
async fn test_get_keyboard_returns_configured_default() {
    let (app, _temp) = create_test_router();

    let (status, body) = get_json(&app, "/keyboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["enabled"], Value::Bool(true));
    assert_eq!(body["mapping"]["a"], "א");
}

// ============================================================================
// POST /updateKeyboard Tests
// ============================================================================

#[tokio::test]
async fn test_save_then_get_round_trip() {
    let (app, _temp) = create_test_router();

    let (status, body) = post_json(
        &app,
        "/updateKeyboard",
        json!({
            "action": "save",
            "entries": [
                {"from": "b", "to": "בּ"},
                {"from": "s", "to": "ש"}
            ],
            "enabled": true
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "success");

    let (status, body) = get_json(&app, "/keyboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["enabled"], Value::Bool(true));
    assert_eq!(body["mapping"]["b"], "בּ");
    assert_eq!(body["mapping"]["s"], "ש");
    // The saved override replaces the default wholesale.
    assert!(body["mapping"]["a"].is_null());
}

#[tokio::test]
async fn test_save_filters_empty_and_long_entries() {
    let (app, _temp) = create_test_router();

    let (status, _) = post_json(
        &app,
        "/updateKeyboard",
        json!({
            "action": "save",
            "entries": [
                {"from": "b", "to": "בּ"},
                {"from": "", "to": "x"},
                {"from": "c", "to": ""},
                {"from": "sh", "to": "ש"}
            ],
            "enabled": true
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get_json(&app, "/keyboard").await;
    let mapping = body["mapping"].as_object().unwrap();
    assert_eq!(mapping.len(), 1);
    assert_eq!(mapping["b"], "בּ");
}

#[tokio::test]
async fn test_default_action_restores_configured_mapping() {
    let (app, _temp) = create_test_router();

    post_json(
        &app,
        "/updateKeyboard",
        json!({
            "action": "save",
            "entries": [{"from": "b", "to": "בּ"}],
            "enabled": false
        }),
    )
    .await;

    let (status, body) = post_json(&app, "/updateKeyboard", json!({"action": "default"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "success");

    let (_, body) = get_json(&app, "/keyboard").await;
    assert_eq!(body["enabled"], Value::Bool(true));
    assert_eq!(body["mapping"]["a"], "א");
}

#[tokio::test]
async fn test_update_with_unknown_action_is_client_error() {
    let (app, _temp) = create_test_router();

    let (status, _) = post_json(&app, "/updateKeyboard", json!({"action": "explode"})).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_disabled_save_round_trips_enabled_flag() {
    let (app, _temp) = create_test_router();

    post_json(
        &app,
        "/updateKeyboard",
        json!({
            "action": "save",
            "entries": [{"from": "b", "to": "בּ"}],
            "enabled": false
        }),
    )
    .await;

    let (_, body) = get_json(&app, "/keyboard").await;
    assert_eq!(body["enabled"], Value::Bool(false));
}
