//! API route handlers
//!
//! - `POST /api/v1/analyze`: run one text through the pipeline
//! - `GET /health`: liveness plus whether the external advisory is wired in

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::envelope::{ApiErrorResponse, ApiResponse};
use crate::pipeline::Orchestrator;

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self { orchestrator }
    }
}

// ============================================================================
// Analyze
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

/// POST /api/v1/analyze
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(body) => body,
        Err(rejection) => return ApiErrorResponse::rejected_body(rejection.status(), rejection.body_text()),
    };

    match state.orchestrator.assess(&request.text).await {
        Ok(assessment) => ApiResponse::ok(assessment),
        Err(e) => ApiErrorResponse::from_pipeline(&e),
    }
}

// ============================================================================
// Health
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub advisory_enabled: bool,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        advisory_enabled: state.orchestrator.advisory_enabled(),
    })
}
