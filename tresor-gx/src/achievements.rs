//! Achievement checker
//!
//! Compares a user's aggregate stats against every catalog threshold and
//! grants what is newly met. Granting is an atomic insert against the
//! uniqueness constraint, so running the checker twice never duplicates.

use serde::Serialize;
use sqlx::SqliteConnection;
use std::collections::HashSet;
use tracing::{debug, warn};
use tresor_common::db::{Achievement, AchievementType, PointsCategory};

use crate::db;
use crate::error::Result;
use crate::levels::LevelState;

/// Aggregate counters achievements are measured against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub contributions: i64,
    pub explorations: i64,
    pub validations: i64,
    pub community: i64,
    pub total_points: i64,
    pub level: i64,
    /// Shown on the profile; no catalog type measures it
    pub badges: i64,
}

impl UserStats {
    pub fn value_for(&self, kind: AchievementType) -> i64 {
        match kind {
            AchievementType::Contributions => self.contributions,
            AchievementType::Explorations => self.explorations,
            AchievementType::Validations => self.validations,
            AchievementType::Community => self.community,
            AchievementType::Points => self.total_points,
            AchievementType::Level => self.level,
        }
    }
}

/// Catalog entries whose requirement is met and that are not yet earned
pub fn newly_met<'a>(
    stats: &UserStats,
    catalog: &'a [Achievement],
    earned: &HashSet<String>,
) -> Vec<&'a Achievement> {
    catalog
        .iter()
        .filter(|a| !earned.contains(&a.id))
        .filter(|a| match a.achievement_type.parse::<AchievementType>() {
            Ok(kind) => stats.value_for(kind) >= a.requirement,
            Err(_) => {
                warn!(
                    "Achievement '{}' has unknown type '{}'",
                    a.id, a.achievement_type
                );
                false
            }
        })
        .collect()
}

/// Current aggregate stats of a user
pub async fn load_stats(conn: &mut SqliteConnection, user_id: &str) -> Result<UserStats> {
    let counts = db::activities::category_counts(conn, user_id).await?;
    let count = |c: PointsCategory| counts.get(&c).copied().unwrap_or(0);

    let total_points = db::points::get_points(conn, user_id)
        .await?
        .map_or(0, |p| p.total_points);
    let level = db::levels::get_level(conn, user_id)
        .await?
        .map_or(LevelState::initial().level, |l| l.level);
    let badges = db::badges::count_badges(conn, user_id).await?;

    Ok(UserStats {
        contributions: count(PointsCategory::Contribution),
        explorations: count(PointsCategory::Exploration),
        validations: count(PointsCategory::Validation),
        community: count(PointsCategory::Community),
        total_points,
        level,
        badges,
    })
}

/// Grant every achievement the user now qualifies for
///
/// Returns only the achievements granted by this call.
pub async fn check_achievements(
    conn: &mut SqliteConnection,
    user_id: &str,
    now: &str,
) -> Result<Vec<Achievement>> {
    let stats = load_stats(conn, user_id).await?;
    let catalog = db::achievements::list_catalog(conn).await?;
    let earned = db::achievements::earned_ids(conn, user_id).await?;

    let mut granted = Vec::new();
    for achievement in newly_met(&stats, &catalog, &earned) {
        if db::achievements::grant_achievement(conn, user_id, &achievement.id, now).await? {
            debug!("Granted achievement '{}' to {}", achievement.id, user_id);
            granted.push(achievement.clone());
        }
    }

    Ok(granted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, kind: &str, requirement: i64) -> Achievement {
        Achievement {
            id: id.to_string(),
            achievement_type: kind.to_string(),
            tier: 1,
            requirement,
            name_fr: id.to_string(),
            name_en: id.to_string(),
            description_fr: String::new(),
            description_en: String::new(),
        }
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let catalog = vec![entry("c1", "contributions", 1), entry("c2", "contributions", 10)];
        let stats = UserStats {
            contributions: 10,
            ..UserStats::default()
        };

        let met: Vec<_> = newly_met(&stats, &catalog, &HashSet::new())
            .into_iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(met, vec!["c1", "c2"]);
    }

    #[test]
    fn test_earned_entries_skipped() {
        let catalog = vec![entry("p1", "points", 100)];
        let stats = UserStats {
            total_points: 500,
            ..UserStats::default()
        };
        let earned: HashSet<String> = ["p1".to_string()].into_iter().collect();

        assert!(newly_met(&stats, &catalog, &earned).is_empty());
    }

    #[test]
    fn test_unknown_type_never_met() {
        let catalog = vec![entry("x1", "streaks", 0)];
        assert!(newly_met(&UserStats::default(), &catalog, &HashSet::new()).is_empty());
    }

    #[test]
    fn test_level_stat_used_for_level_achievements() {
        let catalog = vec![entry("l1", "level", 5)];
        let below = UserStats {
            level: 4,
            ..UserStats::default()
        };
        let at = UserStats {
            level: 5,
            ..UserStats::default()
        };
        assert!(newly_met(&below, &catalog, &HashSet::new()).is_empty());
        assert_eq!(newly_met(&at, &catalog, &HashSet::new()).len(), 1);
    }
}
