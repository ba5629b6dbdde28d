//! Mapping from service errors to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::{ErrorCode, FieldErrors, TaskerError};

/// Body of every error response: `{"error": "...", "details": {...}}`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<FieldErrors>,
}

#[derive(Debug, Clone)]
pub struct ApiErrorResponse {
    pub status: StatusCode,
    pub error: ApiError,
}

impl ApiErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            error: ApiError {
                error: message.into(),
                details: None,
            },
        }
    }

    pub fn invalid_json() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid JSON")
    }

    pub fn validation(details: FieldErrors) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: ApiError {
                error: "validation failed".to_string(),
                details: Some(details),
            },
        }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "task not found")
    }

    /// Map a service error. Storage failures are logged with their cause and
    /// reported to the client only as `failure`.
    pub fn from_service(err: TaskerError, failure: &str) -> Self {
        match err.code {
            ErrorCode::ValidationError => Self::validation(err.details),
            ErrorCode::TaskNotFound => Self::not_found(),
            ErrorCode::MalformedInput => Self::invalid_json(),
            ErrorCode::StorageError | ErrorCode::NotInitialized | ErrorCode::ConfigError => {
                tracing::error!(code = err.code.as_str(), error = %err.message, "{failure}");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, failure)
            }
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}
