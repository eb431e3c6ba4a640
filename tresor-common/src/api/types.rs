//! Shared API request/response types

use serde::{Deserialize, Serialize};

/// Authentication fields carried by every signed request body
///
/// Request types embed this with `#[serde(flatten)]`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthFields {
    /// Unix epoch time in milliseconds
    pub timestamp: i64,

    /// SHA-256 hash (64 hex chars)
    pub hash: String,
}

/// Error body returned by every endpoint
///
/// # Examples
///
/// ```
/// use tresor_common::api::types::ErrorResponse;
///
/// let body = serde_json::to_string(&ErrorResponse::new("Invalid hash")).unwrap();
/// assert_eq!(body, r#"{"error":"Invalid hash"}"#);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}
