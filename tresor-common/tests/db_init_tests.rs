//! Database initialization: creation, reopen, schema, catalog and settings

use std::collections::HashSet;
use tresor_common::db::catalog::ACHIEVEMENT_CATALOG;
use tresor_common::db::init::{init_database, DEFAULT_LEADERBOARD_LIMIT};
use tresor_common::db::migrations::{get_schema_version, CURRENT_SCHEMA_VERSION};

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("sub").join("tresor.db");

    let pool = init_database(&db_path).await;

    assert!(pool.is_ok(), "Database initialization failed: {:?}", pool.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("tresor.db");

    let pool1 = init_database(&db_path).await.unwrap();
    pool1.close().await;

    let pool2 = init_database(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());
}

#[tokio::test]
async fn test_all_tables_created() {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("tresor.db")).await.unwrap();

    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    let tables: HashSet<String> = tables.into_iter().collect();

    for expected in [
        "schema_version",
        "settings",
        "profiles",
        "user_points",
        "user_levels",
        "achievements",
        "user_achievements",
        "user_badges",
        "user_activities",
    ] {
        assert!(tables.contains(expected), "missing table {}", expected);
    }

    assert_eq!(get_schema_version(&pool).await.unwrap(), CURRENT_SCHEMA_VERSION);
}

#[tokio::test]
async fn test_catalog_seeded_once() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("tresor.db");

    let pool = init_database(&db_path).await.unwrap();
    pool.close().await;
    let pool = init_database(&db_path).await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM achievements")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count as usize, ACHIEVEMENT_CATALOG.len());
}

#[tokio::test]
async fn test_default_settings_initialized() {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("tresor.db")).await.unwrap();

    let limit: Option<String> =
        sqlx::query_scalar("SELECT value FROM settings WHERE key = 'leaderboard_default_limit'")
            .fetch_optional(&pool)
            .await
            .unwrap();
    assert_eq!(limit, Some(DEFAULT_LEADERBOARD_LIMIT.to_string()));
}

#[tokio::test]
async fn test_null_setting_reset_to_default() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("tresor.db");

    let pool = init_database(&db_path).await.unwrap();
    sqlx::query("UPDATE settings SET value = NULL WHERE key = 'leaderboard_default_limit'")
        .execute(&pool)
        .await
        .unwrap();
    pool.close().await;

    let pool = init_database(&db_path).await.unwrap();
    let limit: Option<String> =
        sqlx::query_scalar("SELECT value FROM settings WHERE key = 'leaderboard_default_limit'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(limit, Some(DEFAULT_LEADERBOARD_LIMIT.to_string()));
}

#[tokio::test]
async fn test_badge_uniqueness_enforced_by_schema() {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("tresor.db")).await.unwrap();

    sqlx::query("INSERT INTO user_badges VALUES ('b1', 'u1', 'level', 'Niveau 5', '2024-01-01T00:00:00.000Z')")
        .execute(&pool)
        .await
        .unwrap();
    let duplicate = sqlx::query("INSERT INTO user_badges VALUES ('b2', 'u1', 'level', 'Niveau 5', '2024-01-01T00:00:00.000Z')")
        .execute(&pool)
        .await;
    assert!(duplicate.is_err());
}
