//! Profile upsert endpoint

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use tresor_common::db::Profile;

use crate::api::parse_body;
use crate::db::profiles::upsert_profile;
use crate::error::{Error, Result};
use crate::ledger::validate_user_id;
use crate::AppState;

/// Longest accepted username
pub const MAX_USERNAME_LEN: usize = 64;

#[derive(Debug, Deserialize)]
pub struct ProfileBody {
    pub user_id: String,
    pub username: String,
}

/// POST /api/profiles
pub async fn upsert(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Profile>> {
    let body: ProfileBody = parse_body(body)?;
    validate_user_id(&body.user_id)?;

    let username = body.username.trim();
    if username.is_empty() {
        return Err(Error::InvalidInput("username must not be empty".to_string()));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(Error::InvalidInput(format!(
            "username longer than {} characters",
            MAX_USERNAME_LEN
        )));
    }

    let now = tresor_common::time::now_db_string();
    let mut conn = state.db.acquire().await?;
    let profile = upsert_profile(&mut *conn, &body.user_id, username, &now).await?;
    Ok(Json(profile))
}
