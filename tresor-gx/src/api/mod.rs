//! HTTP API handlers for tresor-gx

pub mod achievements;
pub mod auth;
pub mod health;
pub mod leaderboard;
pub mod points;
pub mod profiles;
pub mod users;

use axum::http::{header, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{Error, Result};

pub use auth::auth_middleware;
pub use health::health_routes;

/// `?lang=` query parameter (French when absent or unknown)
#[derive(Debug, Default, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

pub type CsvResponse = ([(header::HeaderName, HeaderValue); 2], String);

/// CSV download with an attachment filename
pub fn csv_response(filename: &'static str, body: String) -> CsvResponse {
    let disposition = format!("attachment; filename=\"{}\"", filename);
    (
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/csv; charset=utf-8"),
            ),
            (
                header::CONTENT_DISPOSITION,
                HeaderValue::from_str(&disposition)
                    .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
            ),
        ],
        body,
    )
}

/// Deserialize a JSON body, reporting shape errors as 400
pub(crate) fn parse_body<T: DeserializeOwned>(body: serde_json::Value) -> Result<T> {
    serde_json::from_value(body).map_err(|e| Error::InvalidInput(format!("Invalid request body: {}", e)))
}
