//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` to provide consistent error formatting.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
///
/// Each variant maps to one HTTP status via `IntoResponse`.
#[derive(Error, Debug)]
pub enum AppError {
    /// File record or stored content was not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Uploaded file name is empty or escapes the storage directory
    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    /// Request is malformed (missing multipart field, missing id, ...)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request names a login that does not exist
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::FileNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidFileName(_) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!("db error: {e:?}");
        AppError::Internal(anyhow::Error::new(e).context("Database operation failed"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
