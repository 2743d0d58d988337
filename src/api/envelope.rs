//! Consistent response envelope for all API endpoints.
//!
//! Every `/api/v1` response is wrapped in either [`ApiResponse`] (success)
//! or [`ApiErrorResponse`] (error), ensuring a uniform JSON shape.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::PipelineError;

/// Metadata included in every response.
#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub timestamp: String,
    pub version: &'static str,
}

impl Default for ResponseMeta {
    fn default() -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Successful response: `{ "data": T, "meta": { ... } }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Response {
        let body = Self {
            data,
            meta: ResponseMeta::default(),
        };
        (StatusCode::OK, axum::Json(body)).into_response()
    }
}

/// Error detail inside [`ApiErrorResponse`].
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// Error response: `{ "error": { "code": "...", "message": "..." }, "meta": { ... } }`
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ErrorDetail,
    pub meta: ResponseMeta,
}

impl ApiErrorResponse {
    fn build(status: StatusCode, code: &str, msg: impl Into<String>) -> Response {
        let body = Self {
            error: ErrorDetail {
                code: code.to_string(),
                message: msg.into(),
            },
            meta: ResponseMeta::default(),
        };
        (status, axum::Json(body)).into_response()
    }

    pub fn bad_request(msg: impl Into<String>) -> Response {
        Self::build(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg)
    }

    /// Request body the extractor refused. Size and media-type failures keep
    /// their status; everything else is a plain 400.
    pub fn rejected_body(status: StatusCode, msg: impl Into<String>) -> Response {
        match status {
            StatusCode::PAYLOAD_TOO_LARGE => Self::build(status, "PAYLOAD_TOO_LARGE", msg),
            StatusCode::UNSUPPORTED_MEDIA_TYPE => Self::build(status, "UNSUPPORTED_MEDIA_TYPE", msg),
            _ => Self::bad_request(msg),
        }
    }

    /// Map a pipeline failure to its status code and user-facing message.
    pub fn from_pipeline(err: &PipelineError) -> Response {
        let status = match err {
            PipelineError::InputRejected(_) | PipelineError::EmptySequence(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            PipelineError::ModelInference(_) => StatusCode::BAD_GATEWAY,
        };
        Self::build(status, err.code(), err.user_message())
    }
}
