//! Error types for Newsroom handlers
//!
//! The display text of every variant is the exact message sent to the client
//! in the `{"error": ...}` body.

use thiserror::Error;

/// Errors that can occur in a handler
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{0}")]
    StorageError(String),

    #[error("Invalid JSON: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{0}")]
    Internal(String),
}

impl HandlerError {
    /// Shorthand for the generic 404 used by every collection.
    pub fn not_found() -> Self {
        HandlerError::NotFound("Not found".to_string())
    }

    /// Convert the error to an HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::BadRequest(_) | HandlerError::SerializationError(_) => 400,
            HandlerError::NotFound(_) => 404,
            HandlerError::MethodNotAllowed => 405,
            HandlerError::StorageError(_) | HandlerError::Internal(_) => 500,
        }
    }

    /// Convert to a Response
    pub fn to_response(&self) -> crate::Response {
        crate::Response::json(
            self.status_code(),
            serde_json::json!({
                "error": self.to_string()
            }),
        )
    }
}

impl From<HandlerError> for crate::Response {
    fn from(err: HandlerError) -> Self {
        err.to_response()
    }
}
