//! Integration tests for the points ledger
//!
//! Each test runs against a fresh database file in a temporary directory.

use serde_json::json;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tresor_common::db::{init_database, ActivityType};
use tresor_gx::db;
use tresor_gx::ledger::{award_points, recheck_achievements, AwardRequest, MAX_AWARD_POINTS};
use tresor_gx::Error;

async fn setup_db() -> (TempDir, SqlitePool) {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("tresor.db")).await.unwrap();
    (dir, pool)
}

fn request(user_id: &str, activity_type: ActivityType, points: Option<i64>) -> AwardRequest {
    AwardRequest {
        user_id: user_id.to_string(),
        activity_type,
        points,
        entity_id: None,
        details: None,
    }
}

async fn activity_types(pool: &SqlitePool, user_id: &str) -> Vec<String> {
    sqlx::query_scalar(
        "SELECT activity_type FROM user_activities WHERE user_id = ? ORDER BY rowid",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .unwrap()
}

#[tokio::test]
async fn test_default_points_credited_to_category() {
    let (_dir, pool) = setup_db().await;

    let outcome = award_points(&pool, request("u1", ActivityType::ClueSolved, None))
        .await
        .unwrap();

    assert_eq!(outcome.points_awarded, 30);
    assert_eq!(outcome.points.total_points, 30);
    assert_eq!(outcome.points.exploration_points, 30);
    assert_eq!(outcome.points.contribution_points, 0);
    assert_eq!(outcome.level.current.level, 1);
    assert_eq!(outcome.level.current.xp, 30);
    assert_eq!(outcome.total_xp, 30);
    assert!(outcome.badges_awarded.is_empty());

    assert_eq!(activity_types(&pool, "u1").await, vec!["clue_solved"]);
}

#[tokio::test]
async fn test_zero_points_logged_without_level_change() {
    let (_dir, pool) = setup_db().await;

    let outcome = award_points(&pool, request("u1", ActivityType::CommentPosted, Some(0)))
        .await
        .unwrap();

    assert_eq!(outcome.points_awarded, 0);
    assert!(!outcome.level.leveled_up());
    assert_eq!(activity_types(&pool, "u1").await, vec!["comment_posted"]);
}

#[tokio::test]
async fn test_multi_level_award_writes_one_level_up_entry() {
    let (_dir, pool) = setup_db().await;

    let outcome = award_points(
        &pool,
        AwardRequest {
            entity_id: Some("symbol-42".to_string()),
            details: Some(json!({"source": "import"})),
            ..request("u1", ActivityType::SymbolCreated, Some(370))
        },
    )
    .await
    .unwrap();

    assert_eq!(outcome.level.previous.level, 1);
    assert_eq!(outcome.level.current.level, 4);
    assert_eq!(outcome.level.current.xp, 6);
    assert_eq!(outcome.level.current.next_level_xp, 173);

    assert_eq!(
        activity_types(&pool, "u1").await,
        vec!["symbol_created", "level_up"]
    );

    let details: String = sqlx::query_scalar(
        "SELECT details FROM user_activities WHERE user_id = 'u1' AND activity_type = 'level_up'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    let details: serde_json::Value = serde_json::from_str(&details).unwrap();
    assert_eq!(details, json!({"from_level": 1, "to_level": 4}));

    let mut conn = pool.acquire().await.unwrap();
    let stored = db::levels::get_level(&mut *conn, "u1").await.unwrap().unwrap();
    assert_eq!(stored.level, 4);
    assert_eq!(stored.current_xp, 6);
    assert_eq!(stored.total_xp, 370);
}

#[tokio::test]
async fn test_every_crossed_milestone_gets_a_badge_once() {
    let (_dir, pool) = setup_db().await;

    let outcome = award_points(&pool, request("u1", ActivityType::ContributionApproved, Some(5000)))
        .await
        .unwrap();

    assert_eq!(outcome.level.current.level, 14);
    assert_eq!(outcome.badges_awarded, vec!["Niveau 5", "Niveau 10"]);

    let unlocked: Vec<&str> = outcome
        .achievements_unlocked
        .iter()
        .map(|a| a.id.as_str())
        .collect();
    for id in ["contributions_1", "points_1", "points_2", "level_1", "level_2"] {
        assert!(unlocked.contains(&id), "{} not unlocked: {:?}", id, unlocked);
    }
    assert!(!unlocked.contains(&"level_3"));

    // Further awards never repeat badges or achievements
    let again = award_points(&pool, request("u1", ActivityType::ContributionApproved, Some(10)))
        .await
        .unwrap();
    assert!(again.badges_awarded.is_empty());
    assert!(!again
        .achievements_unlocked
        .iter()
        .any(|a| unlocked.contains(&a.id.as_str())));

    let mut conn = pool.acquire().await.unwrap();
    let badges = db::badges::list_badges(&mut *conn, "u1").await.unwrap();
    assert_eq!(badges.len(), 2);
    assert!(badges.iter().all(|b| b.badge_type == "level_milestone"));
}

#[tokio::test]
async fn test_negative_points_rejected_without_side_effects() {
    let (_dir, pool) = setup_db().await;

    let err = award_points(&pool, request("u1", ActivityType::ClueSolved, Some(-5)))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    let mut conn = pool.acquire().await.unwrap();
    assert!(db::points::get_points(&mut *conn, "u1").await.unwrap().is_none());
    assert_eq!(db::activities::count_activities(&mut *conn, "u1").await.unwrap(), 0);
}

#[tokio::test]
async fn test_award_above_cap_rejected() {
    let (_dir, pool) = setup_db().await;

    award_points(&pool, request("u1", ActivityType::ClueSolved, Some(MAX_AWARD_POINTS)))
        .await
        .unwrap();

    let err = award_points(
        &pool,
        request("u1", ActivityType::ClueSolved, Some(MAX_AWARD_POINTS + 1)),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    let mut conn = pool.acquire().await.unwrap();
    let totals = db::points::get_points(&mut *conn, "u1").await.unwrap().unwrap();
    assert_eq!(totals.total_points, MAX_AWARD_POINTS);
}

#[tokio::test]
async fn test_award_that_would_overflow_totals_rejected() {
    let (_dir, pool) = setup_db().await;

    award_points(&pool, request("u1", ActivityType::ClueSolved, Some(30)))
        .await
        .unwrap();
    sqlx::query("UPDATE user_points SET total_points = ? WHERE user_id = ?")
        .bind(i64::MAX - 10)
        .bind("u1")
        .execute(&pool)
        .await
        .unwrap();

    let err = award_points(&pool, request("u1", ActivityType::ClueSolved, Some(30)))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    // Totals still decode as integers and nothing else was written
    let mut conn = pool.acquire().await.unwrap();
    let totals = db::points::get_points(&mut *conn, "u1").await.unwrap().unwrap();
    assert_eq!(totals.total_points, i64::MAX - 10);
    assert_eq!(totals.exploration_points, 30);
    assert_eq!(db::activities::count_activities(&mut *conn, "u1").await.unwrap(), 1);

    let column_type: String =
        sqlx::query_scalar("SELECT typeof(total_points) FROM user_points WHERE user_id = ?")
            .bind("u1")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
    assert_eq!(column_type, "integer");
}

#[tokio::test]
async fn test_level_up_cannot_be_awarded() {
    let (_dir, pool) = setup_db().await;

    let err = award_points(&pool, request("u1", ActivityType::LevelUp, Some(10)))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[tokio::test]
async fn test_blank_user_id_rejected() {
    let (_dir, pool) = setup_db().await;

    let err = award_points(&pool, request("  ", ActivityType::ClueSolved, None))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[tokio::test]
async fn test_failed_award_leaves_no_partial_credit() {
    let (_dir, pool) = setup_db().await;

    // Badge writes fail, after points and activity rows were written in the transaction
    sqlx::query("DROP TABLE user_badges")
        .execute(&pool)
        .await
        .unwrap();

    let result = award_points(&pool, request("u1", ActivityType::TheoryValidated, Some(1000))).await;
    assert!(matches!(result, Err(Error::Database(_))));

    let mut conn = pool.acquire().await.unwrap();
    assert!(db::points::get_points(&mut *conn, "u1").await.unwrap().is_none());
    assert!(db::levels::get_level(&mut *conn, "u1").await.unwrap().is_none());
    assert_eq!(db::activities::count_activities(&mut *conn, "u1").await.unwrap(), 0);
}

#[tokio::test]
async fn test_totals_match_activity_log() {
    let (_dir, pool) = setup_db().await;

    let awards = [
        (ActivityType::ClueSolved, 30),
        (ActivityType::ValidationVote, 5),
        (ActivityType::CommentPosted, 3),
        (ActivityType::ContributionSubmitted, 10),
        (ActivityType::SymbolExplored, 2),
    ];
    for _ in 0..4 {
        for (kind, _) in awards {
            award_points(&pool, request("u1", kind, None)).await.unwrap();
        }
    }

    let logged: i64 = sqlx::query_scalar(
        "SELECT SUM(points_earned) FROM user_activities WHERE user_id = 'u1'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();

    let mut conn = pool.acquire().await.unwrap();
    let points = db::points::get_points(&mut *conn, "u1").await.unwrap().unwrap();
    let expected: i64 = awards.iter().map(|(_, p)| p * 4).sum();
    assert_eq!(points.total_points, expected);
    assert_eq!(logged, expected);
    assert_eq!(
        points.total_points,
        points.contribution_points
            + points.exploration_points
            + points.validation_points
            + points.community_points
    );
    assert_eq!(points.exploration_points, 4 * 32);
}

#[tokio::test]
async fn test_recheck_is_idempotent() {
    let (_dir, pool) = setup_db().await;

    let outcome = award_points(&pool, request("u1", ActivityType::ContributionSubmitted, None))
        .await
        .unwrap();
    assert!(outcome
        .achievements_unlocked
        .iter()
        .any(|a| a.id == "contributions_1"));

    assert!(recheck_achievements(&pool, "u1").await.unwrap().is_empty());
    assert!(recheck_achievements(&pool, "u1").await.unwrap().is_empty());

    // Lost grants are restored by a recheck
    sqlx::query("DELETE FROM user_achievements WHERE user_id = 'u1'")
        .execute(&pool)
        .await
        .unwrap();
    let restored = recheck_achievements(&pool, "u1").await.unwrap();
    assert_eq!(restored.len(), 1);
    assert_eq!(restored[0].id, "contributions_1");
}
