//! Authentication middleware for signed POST endpoints
//!
//! Bodies carry `timestamp` and `hash`; see `tresor_common::api::auth` for
//! the hash rules. GET endpoints are public and never pass through here.

use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::warn;
use tresor_common::api::auth::{validate_body, ApiAuthError};
use tresor_common::api::ErrorResponse;

use crate::AppState;

/// Largest accepted request body
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Reject requests whose body is not correctly signed
///
/// A shared secret of 0 lets everything through.
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    if state.shared_secret == 0 {
        return Ok(next.run(request).await);
    }

    let (parts, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| AuthError::ParseError(format!("Failed to read body: {}", e)))?;

    let json_value: Value = serde_json::from_slice(&body_bytes)
        .map_err(|e| AuthError::ParseError(format!("Invalid JSON: {}", e)))?;

    validate_body(&json_value, state.shared_secret).map_err(|e| match e {
        ApiAuthError::MissingFields(msg) => AuthError::MissingFields(msg),
        ApiAuthError::InvalidTimestamp { reason, .. } => AuthError::InvalidTimestamp(reason),
        ApiAuthError::InvalidHash {
            provided,
            calculated,
        } => {
            warn!(
                "Hash validation failed on {}: provided={}, calculated={}",
                parts.uri.path(),
                provided,
                calculated
            );
            AuthError::InvalidHash
        }
        other => AuthError::Other(other.to_string()),
    })?;

    let request = Request::from_parts(parts, Body::from(body_bytes));
    Ok(next.run(request).await)
}

#[derive(Debug)]
pub enum AuthError {
    InvalidTimestamp(String),
    InvalidHash,
    MissingFields(String),
    ParseError(String),
    Other(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::InvalidTimestamp(reason) => {
                (StatusCode::UNAUTHORIZED, format!("Invalid timestamp: {}", reason))
            }
            AuthError::InvalidHash => (StatusCode::UNAUTHORIZED, "Invalid hash".to_string()),
            AuthError::MissingFields(msg) => {
                (StatusCode::UNAUTHORIZED, format!("Missing auth fields: {}", msg))
            }
            AuthError::ParseError(msg) => (StatusCode::BAD_REQUEST, msg),
            AuthError::Other(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Authentication error: {}", msg),
            ),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
