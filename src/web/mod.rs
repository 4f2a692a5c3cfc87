//! Keyboard endpoint server.
//!
//! This module provides the JSON endpoints the client's mapping reload and
//! mapping editor talk to, backed by the file-based [`MappingStore`]:
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /keyboard` - Current mapping and enabled flag (saved override, or
//!   the configured default when none is saved)
//! - `POST /updateKeyboard` - Save the submitted mapping or reset to default

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{extract::State, http::StatusCode, routing::get, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::models::{KeyboardUpdate, MappingState};
use crate::services::MappingStore;

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the keyboard endpoints.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration (supplies the default mapping)
    config: Arc<Config>,
    /// Mapping store; file access is serialized behind the mutex
    store: Arc<Mutex<MappingStore>>,
}

impl AppState {
    /// Creates a new application state over a mapping store.
    #[must_use]
    pub fn new(config: Config, store: MappingStore) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(Mutex::new(store)),
        }
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Current health status (e.g., "healthy").
    pub status: String,
    /// Application version.
    pub version: String,
}

/// Update acknowledgement.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateResponse {
    /// Always "success" when the update was applied.
    pub result: String,
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Error message.
    pub error: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// Shorthand for the error half of handler results.
type ErrorResponse = (StatusCode, Json<ApiError>);

fn internal_error(message: &str, err: &anyhow::Error) -> ErrorResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiError::with_details(message, err.to_string())),
    )
}

fn poisoned_lock() -> ErrorResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiError::new("Mapping store lock poisoned")),
    )
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /health - Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /keyboard - Current mapping and enabled flag.
async fn get_keyboard(State(state): State<AppState>) -> Result<Json<MappingState>, ErrorResponse> {
    let store = state.store.lock().map_err(|_| poisoned_lock())?;

    let effective = store
        .effective(&state.config.keyboard)
        .map_err(|e| internal_error("Failed to load keyboard mapping", &e))?;

    Ok(Json(effective))
}

/// POST /updateKeyboard - Save the submitted mapping or reset to default.
async fn update_keyboard(
    State(state): State<AppState>,
    Json(update): Json<KeyboardUpdate>,
) -> Result<Json<UpdateResponse>, ErrorResponse> {
    let store = state.store.lock().map_err(|_| poisoned_lock())?;

    store
        .apply_update(&update)
        .map_err(|e| internal_error("Failed to update keyboard mapping", &e))?;

    Ok(Json(UpdateResponse {
        result: "success".to_string(),
    }))
}

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    // Permissive CORS: the server runs locally next to the client.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/keyboard", get(get_keyboard))
        .route("/updateKeyboard", post(update_keyboard))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the keyboard endpoint server.
///
/// # Errors
///
/// Returns an error if the server fails to bind or serve.
pub async fn run_server(config: Config, store: MappingStore, addr: SocketAddr) -> anyhow::Result<()> {
    let state = AppState::new(config, store);
    let app = create_router(state);

    info!("Starting keyboard endpoint server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
