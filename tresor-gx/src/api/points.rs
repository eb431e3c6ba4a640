//! Points award endpoint

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use tresor_common::db::ActivityType;

use crate::api::parse_body;
use crate::error::{Error, Result};
use crate::ledger::{award_points, AwardOutcome, AwardRequest};
use crate::AppState;

/// Body of POST /api/points/award
///
/// `timestamp` and `hash` are checked by the auth middleware and ignored here.
#[derive(Debug, Deserialize)]
pub struct AwardBody {
    pub user_id: String,
    pub activity_type: String,
    #[serde(default)]
    pub points: Option<i64>,
    #[serde(default)]
    pub entity_id: Option<String>,
    #[serde(default)]
    pub details: Option<Value>,
}

/// POST /api/points/award
pub async fn award(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<AwardOutcome>> {
    let body: AwardBody = parse_body(body)?;
    let activity_type: ActivityType = body.activity_type.parse().map_err(|_| {
        Error::InvalidInput(format!("Unknown activity type '{}'", body.activity_type))
    })?;

    let outcome = award_points(
        &state.db,
        AwardRequest {
            user_id: body.user_id,
            activity_type,
            points: body.points,
            entity_id: body.entity_id,
            details: body.details,
        },
    )
    .await?;

    Ok(Json(outcome))
}
