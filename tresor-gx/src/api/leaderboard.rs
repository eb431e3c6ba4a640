//! Leaderboard endpoints (JSON and CSV)

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tresor_common::csv::to_csv;
use tresor_common::db::PointsCategory;

use crate::api::{csv_response, CsvResponse};
use crate::db::leaderboard::{get_leaderboard, LeaderboardEntry};
use crate::error::{Error, Result};
use crate::AppState;

/// Upper bound on rows per leaderboard request
pub const MAX_LEADERBOARD_LIMIT: i64 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    /// Points category; empty or `total` ranks by total points
    pub category: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    /// `total` or the category name
    pub category: String,
    pub entries: Vec<LeaderboardEntry>,
}

fn parse_category(raw: Option<&str>) -> Result<Option<PointsCategory>> {
    match raw.map(str::trim) {
        None | Some("") | Some("total") => Ok(None),
        Some(name) => name
            .parse::<PointsCategory>()
            .map(Some)
            .map_err(|_| Error::InvalidInput(format!("Unknown category '{}'", name))),
    }
}

async fn load(state: &AppState, query: &LeaderboardQuery) -> Result<(Option<PointsCategory>, Vec<LeaderboardEntry>)> {
    let category = parse_category(query.category.as_deref())?;
    let limit = query
        .limit
        .unwrap_or(state.leaderboard_default_limit)
        .clamp(1, MAX_LEADERBOARD_LIMIT);

    let mut conn = state.db.acquire().await?;
    let entries = get_leaderboard(&mut *conn, category, limit).await?;
    Ok((category, entries))
}

/// GET /api/leaderboard?category=&limit=
pub async fn get_leaderboard_json(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>> {
    let (category, entries) = load(&state, &query).await?;
    Ok(Json(LeaderboardResponse {
        category: category.map_or("total", |c| c.as_str()).to_string(),
        entries,
    }))
}

/// GET /api/leaderboard.csv?category=&limit=
pub async fn export_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<CsvResponse> {
    let (_, entries) = load(&state, &query).await?;
    Ok(csv_response("leaderboard.csv", to_csv(&entries)))
}
