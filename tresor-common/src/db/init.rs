//! Database initialization
//!
//! Creates the database on first run, then brings any existing database
//! up to date: tables (idempotent), migrations, catalog seed, default settings.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Default number of rows returned by leaderboard queries
pub const DEFAULT_LEADERBOARD_LIMIT: i64 = 10;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL lets leaderboard reads proceed while an award transaction writes
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    init_schema(&pool).await?;

    Ok(pool)
}

/// Create tables, run migrations, seed the catalog and default settings
///
/// Safe to call on every startup.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(pool)
        .await?;

    create_schema_version_table(pool).await?;
    create_settings_table(pool).await?;
    create_profiles_table(pool).await?;
    create_user_points_table(pool).await?;
    create_user_levels_table(pool).await?;
    create_achievements_table(pool).await?;
    create_user_achievements_table(pool).await?;
    create_user_badges_table(pool).await?;
    create_user_activities_table(pool).await?;

    crate::db::migrations::run_migrations(pool).await?;
    crate::db::catalog::seed_achievement_catalog(pool).await?;
    init_default_settings(pool).await?;

    Ok(())
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the settings table
///
/// Stores runtime configuration key-value pairs.
pub async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_profiles_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS profiles (
            user_id TEXT PRIMARY KEY,
            username TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_user_points_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_points (
            user_id TEXT PRIMARY KEY,
            total_points INTEGER NOT NULL DEFAULT 0,
            contribution_points INTEGER NOT NULL DEFAULT 0,
            exploration_points INTEGER NOT NULL DEFAULT 0,
            validation_points INTEGER NOT NULL DEFAULT 0,
            community_points INTEGER NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_user_levels_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_levels (
            user_id TEXT PRIMARY KEY,
            level INTEGER NOT NULL DEFAULT 1 CHECK (level >= 1),
            current_xp INTEGER NOT NULL DEFAULT 0 CHECK (current_xp >= 0),
            next_level_xp INTEGER NOT NULL DEFAULT 100 CHECK (next_level_xp > 0),
            total_xp INTEGER NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_achievements_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS achievements (
            id TEXT PRIMARY KEY,
            achievement_type TEXT NOT NULL,
            tier INTEGER NOT NULL,
            requirement INTEGER NOT NULL,
            name_fr TEXT NOT NULL,
            name_en TEXT NOT NULL,
            description_fr TEXT NOT NULL,
            description_en TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_user_achievements_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_achievements (
            guid TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            achievement_id TEXT NOT NULL REFERENCES achievements(id),
            earned_at TEXT NOT NULL,
            UNIQUE (user_id, achievement_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_user_badges_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_badges (
            guid TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            badge_type TEXT NOT NULL,
            badge_name TEXT NOT NULL,
            awarded_at TEXT NOT NULL,
            UNIQUE (user_id, badge_name)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_user_activities_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_activities (
            guid TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            activity_type TEXT NOT NULL,
            category TEXT,
            points_earned INTEGER NOT NULL DEFAULT 0,
            entity_id TEXT,
            details TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_user_activities_user ON user_activities(user_id, created_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Initialize default settings
///
/// Missing or NULL values are reset to their defaults. The API shared
/// secret is generated separately, on first load.
async fn init_default_settings(pool: &SqlitePool) -> Result<()> {
    ensure_setting(
        pool,
        "leaderboard_default_limit",
        &DEFAULT_LEADERBOARD_LIMIT.to_string(),
    )
    .await?;

    Ok(())
}

async fn ensure_setting(pool: &SqlitePool, key: &str, default_value: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        INSERT INTO settings (key, value) VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value WHERE settings.value IS NULL
        "#,
    )
    .bind(key)
    .bind(default_value)
    .execute(pool)
    .await?;

    if result.rows_affected() > 0 {
        info!("Setting '{}' initialized to default: {}", key, default_value);
    }
    Ok(())
}
