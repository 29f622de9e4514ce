//! Error types for jly-web

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use jly_player::PlayerError;
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Player session rejected the operation
    #[error("Player error: {0}")]
    Player(#[from] PlayerError),

    /// jly-common error
    #[error("Common error: {0}")]
    Common(#[from] jly_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            ApiError::Player(ref err) => match err {
                PlayerError::NotCreated | PlayerError::NotReady => {
                    (StatusCode::CONFLICT, "PLAYER_NOT_READY", err.to_string())
                }
                PlayerError::Closed => (StatusCode::GONE, "SESSION_CLOSED", err.to_string()),
                PlayerError::Widget(_) => (StatusCode::BAD_GATEWAY, "WIDGET_ERROR", err.to_string()),
            },
            ApiError::Common(ref err) => match err {
                jly_common::Error::NotFound(_) => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                }
                jly_common::Error::InvalidInput(_) => {
                    (StatusCode::BAD_REQUEST, "BAD_REQUEST", err.to_string())
                }
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "COMMON_ERROR", err.to_string()),
            },
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

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
