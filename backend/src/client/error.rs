//! Client-side error types
//!
//! Errors returned by the REST client. The `Display` text is what a front-end
//! shows to the user.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while calling the file API
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request could not be sent or the response could not be read
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("Server returned {status}: {message}")]
    Status {
        /// HTTP status returned
        status: StatusCode,
        /// Error message from the response body
        message: String,
    },

    /// The response body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// A success response carried no body where one was expected
    #[error("Response has no body")]
    EmptyBody,

    /// An upload could not be prepared (unreadable file, bad content type)
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),
}

impl ClientError {
    /// HTTP status of a `Status` error
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status(),
            _ => None,
        }
    }
}
