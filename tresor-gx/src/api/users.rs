//! Per-user read endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tresor_common::csv::to_csv;
use tresor_common::db::Language;

use crate::api::{csv_response, CsvResponse, LangQuery};
use crate::error::Result;
use crate::ledger::validate_user_id;
use crate::summary::{self, ActivityPage, LevelView, UserSummary};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

/// GET /api/users/:user_id/summary
pub async fn get_summary(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<LangQuery>,
) -> Result<Json<UserSummary>> {
    validate_user_id(&user_id)?;
    let lang = Language::parse_or_default(query.lang.as_deref());
    Ok(Json(summary::get_user_summary(&state.db, &user_id, lang).await?))
}

/// GET /api/users/:user_id/level
pub async fn get_level(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<LevelView>> {
    validate_user_id(&user_id)?;
    Ok(Json(summary::get_level(&state.db, &user_id).await?))
}

/// GET /api/users/:user_id/activities?page=N
pub async fn get_activities(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ActivityPage>> {
    validate_user_id(&user_id)?;
    Ok(Json(
        summary::get_activity_page(&state.db, &user_id, query.page).await?,
    ))
}

/// GET /api/users/:user_id/activities.csv
pub async fn export_activities(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<CsvResponse> {
    validate_user_id(&user_id)?;
    let rows = summary::get_activity_report(&state.db, &user_id).await?;
    Ok(csv_response("activities.csv", to_csv(&rows)))
}
