//! Error types for cpoll-server
//!
//! Every handler returns [`ApiResult`]. Errors render as
//! `{"error": {"code", "message"}}`; validation failures add `fields`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cpoll_common::ValidationErrors;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Field-level validation failure (422)
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Malformed request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Missing or rejected admin credential (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Response store failure (500); detail is logged, not returned
    #[error("Storage error: {0}")]
    Storage(String),

    /// Completion service failure or timeout (502)
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<cpoll_common::Error> for ApiError {
    fn from(err: cpoll_common::Error) -> Self {
        use cpoll_common::Error;

        match err {
            Error::Validation(fields) => ApiError::Validation(fields),
            Error::Auth(msg) => ApiError::Unauthorized(msg),
            Error::Upstream(msg) => ApiError::Upstream(msg),
            Error::Config(msg) => ApiError::Internal(msg),
            other if other.is_storage() => ApiError::Storage(other.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<crate::export::ExportError> for ApiError {
    fn from(err: crate::export::ExportError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, fields) = match self {
            ApiError::Validation(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                "One or more fields are invalid".to_string(),
                Some(fields),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "AUTH_ERROR", msg, None),
            ApiError::Storage(detail) => {
                error!(detail = %detail, "Response store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "Failed to access stored responses".to_string(),
                    None,
                )
            }
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg, None),
            ApiError::Internal(msg) => {
                error!(detail = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = match fields {
            Some(fields) => json!({
                "error": {
                    "code": error_code,
                    "message": message,
                    "fields": fields,
                }
            }),
            None => json!({
                "error": {
                    "code": error_code,
                    "message": message,
                }
            }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
