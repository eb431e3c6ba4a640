//! Shared HTTP API functionality
//!
//! Pure functions, database helpers and shared types only. Each binary wraps
//! them with its own framework-specific middleware.

pub mod auth;
pub mod types;

pub use auth::{calculate_hash, sign_body, validate_body, validate_hash, validate_timestamp, ApiAuthError};
#[cfg(feature = "sqlx")]
pub use auth::{initialize_shared_secret, load_shared_secret};
pub use types::{AuthFields, ErrorResponse, HealthResponse};
