//! Achievement catalog and re-check endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use tresor_common::db::Language;

use crate::api::LangQuery;
use crate::error::Result;
use crate::ledger::recheck_achievements;
use crate::summary::{get_catalog, AchievementView};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub user_id: String,
    /// Achievements granted by this check only
    pub unlocked: Vec<AchievementView>,
}

/// GET /api/achievements?lang=
pub async fn list_achievements(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
) -> Result<Json<Vec<AchievementView>>> {
    let lang = Language::parse_or_default(query.lang.as_deref());
    Ok(Json(get_catalog(&state.db, lang).await?))
}

/// POST /api/users/:user_id/achievements/check?lang=
pub async fn check(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<LangQuery>,
) -> Result<Json<CheckResponse>> {
    let lang = Language::parse_or_default(query.lang.as_deref());
    let granted = recheck_achievements(&state.db, &user_id).await?;
    let unlocked = granted
        .iter()
        .map(|a| AchievementView::localized(a, lang, None))
        .collect();

    Ok(Json(CheckResponse { user_id, unlocked }))
}
