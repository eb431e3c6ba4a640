//! Read models: user summary, activity history, catalog
//!
//! Users without any row get the initial state rather than a 404, the same
//! way a fresh profile page shows level 1 and zero points.

use serde::Serialize;
use sqlx::SqlitePool;
use tresor_common::csv::CsvRecord;
use tresor_common::db::{Achievement, Language, UserActivity, UserBadge, UserPoints};

use crate::achievements::{load_stats, UserStats};
use crate::db;
use crate::error::Result;
use crate::levels::LevelState;
use crate::pagination::{calculate_pagination, ACTIVITY_PAGE_SIZE};

/// Level state as shown to users
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LevelView {
    pub level: i64,
    pub current_xp: i64,
    pub next_level_xp: i64,
    pub total_xp: i64,
    /// Progress through the current level, 0..=99
    pub progress_percent: i64,
}

impl LevelView {
    fn new(state: LevelState, total_xp: i64) -> Self {
        Self {
            level: state.level,
            current_xp: state.xp,
            next_level_xp: state.next_level_xp,
            total_xp,
            progress_percent: state.xp * 100 / state.next_level_xp.max(1),
        }
    }
}

/// Catalog entry in one language
#[derive(Debug, Clone, Serialize)]
pub struct AchievementView {
    pub id: String,
    pub achievement_type: String,
    pub tier: i64,
    pub requirement: i64,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earned_at: Option<String>,
}

impl AchievementView {
    pub fn localized(achievement: &Achievement, lang: Language, earned_at: Option<String>) -> Self {
        Self {
            id: achievement.id.clone(),
            achievement_type: achievement.achievement_type.clone(),
            tier: achievement.tier,
            requirement: achievement.requirement,
            name: achievement.name(lang).to_string(),
            description: achievement.description(lang).to_string(),
            earned_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub user_id: String,
    pub username: Option<String>,
    pub points: UserPoints,
    pub level: LevelView,
    pub stats: UserStats,
    pub achievements: Vec<AchievementView>,
    pub badges: Vec<UserBadge>,
}

/// Activity as returned by the API, with details parsed back to JSON
#[derive(Debug, Clone, Serialize)]
pub struct ActivityView {
    pub id: String,
    pub activity_type: String,
    pub category: Option<String>,
    pub points_earned: i64,
    pub entity_id: Option<String>,
    pub details: Option<serde_json::Value>,
    pub created_at: String,
}

impl From<UserActivity> for ActivityView {
    fn from(row: UserActivity) -> Self {
        // Keep unparseable legacy text visible as a JSON string
        let details = row.details.map(|text| {
            serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
        });
        Self {
            id: row.guid,
            activity_type: row.activity_type,
            category: row.category,
            points_earned: row.points_earned,
            entity_id: row.entity_id,
            details,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityPage {
    pub user_id: String,
    pub total_activities: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub activities: Vec<ActivityView>,
}

/// Activity log row laid out for CSV export
#[derive(Debug, Clone)]
pub struct ActivityReportRow(pub UserActivity);

impl CsvRecord for ActivityReportRow {
    fn headers() -> &'static [&'static str] {
        &["created_at", "activity_type", "points_earned", "entity_id", "details"]
    }

    fn fields(&self) -> Vec<String> {
        let row = &self.0;
        vec![
            row.created_at.clone(),
            row.activity_type.clone(),
            row.points_earned.to_string(),
            row.entity_id.clone().unwrap_or_default(),
            row.details.clone().unwrap_or_default(),
        ]
    }
}

pub async fn get_level(pool: &SqlitePool, user_id: &str) -> Result<LevelView> {
    let mut conn = pool.acquire().await?;
    let view = match db::levels::get_level(&mut *conn, user_id).await? {
        Some(row) => LevelView::new(LevelState::from(&row), row.total_xp),
        None => LevelView::new(LevelState::initial(), 0),
    };
    Ok(view)
}

pub async fn get_user_summary(pool: &SqlitePool, user_id: &str, lang: Language) -> Result<UserSummary> {
    let level = get_level(pool, user_id).await?;

    let mut conn = pool.acquire().await?;
    let username = db::profiles::get_username(&mut *conn, user_id).await?;
    let points = db::points::get_points(&mut *conn, user_id)
        .await?
        .unwrap_or_else(|| UserPoints::empty(user_id));
    let achievements = db::achievements::list_earned(&mut *conn, user_id)
        .await?
        .into_iter()
        .map(|earned| AchievementView::localized(&earned.achievement, lang, Some(earned.earned_at)))
        .collect();
    let badges = db::badges::list_badges(&mut *conn, user_id).await?;
    let stats = load_stats(&mut *conn, user_id).await?;

    Ok(UserSummary {
        user_id: user_id.to_string(),
        username,
        points,
        level,
        stats,
        achievements,
        badges,
    })
}

pub async fn get_activity_page(pool: &SqlitePool, user_id: &str, page: i64) -> Result<ActivityPage> {
    let mut conn = pool.acquire().await?;
    let total = db::activities::count_activities(&mut *conn, user_id).await?;
    let pagination = calculate_pagination(total, page, ACTIVITY_PAGE_SIZE);

    let activities = db::activities::list_activities(
        &mut *conn,
        user_id,
        pagination.page_size,
        pagination.offset,
    )
    .await?
    .into_iter()
    .map(ActivityView::from)
    .collect();

    Ok(ActivityPage {
        user_id: user_id.to_string(),
        total_activities: total,
        page: pagination.page,
        page_size: pagination.page_size,
        total_pages: pagination.total_pages,
        activities,
    })
}

/// Full activity history for export, newest first
pub async fn get_activity_report(pool: &SqlitePool, user_id: &str) -> Result<Vec<ActivityReportRow>> {
    let mut conn = pool.acquire().await?;
    let rows = db::activities::list_activities(&mut *conn, user_id, -1, 0).await?;
    Ok(rows.into_iter().map(ActivityReportRow).collect())
}

pub async fn get_catalog(pool: &SqlitePool, lang: Language) -> Result<Vec<AchievementView>> {
    let mut conn = pool.acquire().await?;
    let catalog = db::achievements::list_catalog(&mut *conn).await?;
    Ok(catalog
        .iter()
        .map(|a| AchievementView::localized(a, lang, None))
        .collect())
}
