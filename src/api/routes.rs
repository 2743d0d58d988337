//! API route definitions
//!
//! - /api/v1/analyze - classify a news text and attach an advisory
//! - /health - liveness probe

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{self, AppState};

/// Versioned API routes, nested under `/api/v1`.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/analyze", post(handlers::analyze))
        .with_state(state)
}

/// Health endpoint at root level
pub fn health_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .with_state(state)
}
