//! Error types for tresor-gx
//!
//! Every error maps to one HTTP status and a `{"error": ...}` body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;
use tresor_common::api::ErrorResponse;

/// Main error type for the gamification service
#[derive(Error, Debug)]
pub enum Error {
    /// Errors raised by shared code (config, settings, schema)
    #[error(transparent)]
    Common(#[from] tresor_common::Error),

    /// Database connection or query errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid request parameter or body
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or failed request authentication
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Other errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using tresor-gx Error
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::Common(tresor_common::Error::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            Error::Common(tresor_common::Error::NotFound(_)) => StatusCode::NOT_FOUND,
            Error::Common(_) | Error::Database(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            Error::InvalidInput("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            Error::Common(tresor_common::Error::InvalidInput("x".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::Database(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
