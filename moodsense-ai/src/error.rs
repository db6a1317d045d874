//! Error types for moodsense-ai
//!
//! Handler failures render as `{"error": {"code", "message"}}` JSON.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// moodsense-common error
    #[error("Common error: {0}")]
    Common(#[from] moodsense_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Common(ref err) => common_error_parts(err),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

fn common_error_parts(err: &moodsense_common::Error) -> (StatusCode, &'static str, String) {
    use moodsense_common::Error;

    match err {
        Error::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        Error::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "DATABASE_ERROR",
            err.to_string(),
        ),
        Error::Io(_) | Error::Config(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "COMMON_ERROR",
            err.to_string(),
        ),
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
