//! Axum-specific error types and mappings.
//!
//! This module maps `CoreError` and request rejections onto the response
//! envelope `{code, message}` and an HTTP status.

use aigate_core::CoreError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Envelope code for malformed or invalid requests.
pub const CODE_BAD_REQUEST: i32 = 1;
/// Envelope code for provider and internal failures.
pub const CODE_SERVICE_ERROR: i32 = 2;
/// Envelope code for unknown tasks.
pub const CODE_NOT_FOUND: i32 = 3;

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Bad request (invalid input or unknown function).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The provider call failed.
    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl HttpError {
    /// Envelope code and HTTP status for this error.
    #[must_use]
    pub const fn code_and_status(&self) -> (i32, StatusCode) {
        match self {
            Self::BadRequest(_) => (CODE_BAD_REQUEST, StatusCode::BAD_REQUEST),
            Self::NotFound(_) => (CODE_NOT_FOUND, StatusCode::NOT_FOUND),
            Self::Upstream(_) => (CODE_SERVICE_ERROR, StatusCode::INTERNAL_SERVER_ERROR),
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::BadRequest(msg)
            | Self::NotFound(msg)
            | Self::Upstream(msg) => msg,
        }
    }
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody<'a> {
    code: i32,
    message: &'a str,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (code, status) = self.code_and_status();
        if status.is_server_error() {
            tracing::warn!(code, error = %self, "Request failed");
        }

        let body = ErrorBody {
            code,
            message: self.message(),
        };
        (status, axum::Json(body)).into_response()
    }
}

impl From<CoreError> for HttpError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnsupportedFunction(_) | CoreError::Validation(_) => {
                Self::BadRequest(err.to_string())
            }
            CoreError::Provider(e) => Self::Upstream(e.to_string()),
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}
