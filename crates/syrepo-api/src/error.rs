//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps [`ServiceError`] kinds to HTTP status codes and renders a JSON body
//! with a stable error code and a human-readable message. Internal error
//! details are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use syrepo_core::ServiceError;
use thiserror::Error;
use utoipa::ToSchema;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

impl ErrorBody {
    /// Build a body from a machine-readable code and a client-facing message.
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.to_string(),
                message: message.into(),
            },
        }
    }
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "INVALID_REQUEST").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or unsafe request input (400).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => {
                tracing::error!(error = %self, "internal server error");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorBody::new(code, message))).into_response()
    }
}

/// Service errors keep their kind across the transport boundary.
impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidRequest(msg) => Self::InvalidRequest(msg),
            ServiceError::NotFound(msg) => Self::NotFound(msg),
            ServiceError::Internal(msg) => Self::Internal(msg),
        }
    }
}
