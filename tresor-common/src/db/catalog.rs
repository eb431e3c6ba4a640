//! Static achievement catalog
//!
//! Seeded into the `achievements` table on every startup with
//! `INSERT OR IGNORE`, so edits to existing entries need a migration.

use crate::db::models::AchievementType;
use crate::Result;
use sqlx::SqlitePool;
use tracing::info;

/// Catalog entry as compiled into the binary
#[derive(Debug, Clone, Copy)]
pub struct AchievementSeed {
    pub id: &'static str,
    pub achievement_type: AchievementType,
    pub tier: i64,
    pub requirement: i64,
    pub name_fr: &'static str,
    pub name_en: &'static str,
    pub description_fr: &'static str,
    pub description_en: &'static str,
}

pub const ACHIEVEMENT_CATALOG: &[AchievementSeed] = &[
    // Contributions
    AchievementSeed {
        id: "contributions_1",
        achievement_type: AchievementType::Contributions,
        tier: 1,
        requirement: 1,
        name_fr: "Premier pas",
        name_en: "First step",
        description_fr: "Proposer votre première contribution",
        description_en: "Submit your first contribution",
    },
    AchievementSeed {
        id: "contributions_2",
        achievement_type: AchievementType::Contributions,
        tier: 2,
        requirement: 10,
        name_fr: "Contributeur",
        name_en: "Contributor",
        description_fr: "Réaliser 10 contributions",
        description_en: "Make 10 contributions",
    },
    AchievementSeed {
        id: "contributions_3",
        achievement_type: AchievementType::Contributions,
        tier: 3,
        requirement: 50,
        name_fr: "Pilier du patrimoine",
        name_en: "Heritage pillar",
        description_fr: "Réaliser 50 contributions",
        description_en: "Make 50 contributions",
    },
    // Explorations
    AchievementSeed {
        id: "explorations_1",
        achievement_type: AchievementType::Explorations,
        tier: 1,
        requirement: 5,
        name_fr: "Curieux",
        name_en: "Curious",
        description_fr: "Explorer 5 symboles ou indices",
        description_en: "Explore 5 symbols or clues",
    },
    AchievementSeed {
        id: "explorations_2",
        achievement_type: AchievementType::Explorations,
        tier: 2,
        requirement: 50,
        name_fr: "Explorateur",
        name_en: "Explorer",
        description_fr: "Explorer 50 symboles ou indices",
        description_en: "Explore 50 symbols or clues",
    },
    AchievementSeed {
        id: "explorations_3",
        achievement_type: AchievementType::Explorations,
        tier: 3,
        requirement: 250,
        name_fr: "Grand voyageur",
        name_en: "Great traveller",
        description_fr: "Explorer 250 symboles ou indices",
        description_en: "Explore 250 symbols or clues",
    },
    // Validations
    AchievementSeed {
        id: "validations_1",
        achievement_type: AchievementType::Validations,
        tier: 1,
        requirement: 5,
        name_fr: "Vigilant",
        name_en: "Watchful",
        description_fr: "Participer à 5 validations",
        description_en: "Take part in 5 validations",
    },
    AchievementSeed {
        id: "validations_2",
        achievement_type: AchievementType::Validations,
        tier: 2,
        requirement: 50,
        name_fr: "Gardien",
        name_en: "Guardian",
        description_fr: "Participer à 50 validations",
        description_en: "Take part in 50 validations",
    },
    AchievementSeed {
        id: "validations_3",
        achievement_type: AchievementType::Validations,
        tier: 3,
        requirement: 200,
        name_fr: "Sage",
        name_en: "Sage",
        description_fr: "Participer à 200 validations",
        description_en: "Take part in 200 validations",
    },
    // Community
    AchievementSeed {
        id: "community_1",
        achievement_type: AchievementType::Community,
        tier: 1,
        requirement: 5,
        name_fr: "Sociable",
        name_en: "Sociable",
        description_fr: "Échanger 5 fois avec la communauté",
        description_en: "Interact 5 times with the community",
    },
    AchievementSeed {
        id: "community_2",
        achievement_type: AchievementType::Community,
        tier: 2,
        requirement: 50,
        name_fr: "Animateur",
        name_en: "Facilitator",
        description_fr: "Échanger 50 fois avec la communauté",
        description_en: "Interact 50 times with the community",
    },
    AchievementSeed {
        id: "community_3",
        achievement_type: AchievementType::Community,
        tier: 3,
        requirement: 200,
        name_fr: "Âme de la communauté",
        name_en: "Heart of the community",
        description_fr: "Échanger 200 fois avec la communauté",
        description_en: "Interact 200 times with the community",
    },
    // Points
    AchievementSeed {
        id: "points_1",
        achievement_type: AchievementType::Points,
        tier: 1,
        requirement: 100,
        name_fr: "Collectionneur",
        name_en: "Collector",
        description_fr: "Cumuler 100 points",
        description_en: "Earn 100 points",
    },
    AchievementSeed {
        id: "points_2",
        achievement_type: AchievementType::Points,
        tier: 2,
        requirement: 1000,
        name_fr: "Trésorier",
        name_en: "Treasurer",
        description_fr: "Cumuler 1 000 points",
        description_en: "Earn 1,000 points",
    },
    AchievementSeed {
        id: "points_3",
        achievement_type: AchievementType::Points,
        tier: 3,
        requirement: 10000,
        name_fr: "Chasseur de trésors",
        name_en: "Treasure hunter",
        description_fr: "Cumuler 10 000 points",
        description_en: "Earn 10,000 points",
    },
    // Level
    AchievementSeed {
        id: "level_1",
        achievement_type: AchievementType::Level,
        tier: 1,
        requirement: 5,
        name_fr: "Apprenti chercheur",
        name_en: "Apprentice researcher",
        description_fr: "Atteindre le niveau 5",
        description_en: "Reach level 5",
    },
    AchievementSeed {
        id: "level_2",
        achievement_type: AchievementType::Level,
        tier: 2,
        requirement: 10,
        name_fr: "Chercheur confirmé",
        name_en: "Seasoned researcher",
        description_fr: "Atteindre le niveau 10",
        description_en: "Reach level 10",
    },
    AchievementSeed {
        id: "level_3",
        achievement_type: AchievementType::Level,
        tier: 3,
        requirement: 25,
        name_fr: "Maître des énigmes",
        name_en: "Master of riddles",
        description_fr: "Atteindre le niveau 25",
        description_en: "Reach level 25",
    },
];

/// Insert catalog entries missing from the `achievements` table
pub async fn seed_achievement_catalog(pool: &SqlitePool) -> Result<()> {
    let mut inserted = 0u64;
    for seed in ACHIEVEMENT_CATALOG {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO achievements
                (id, achievement_type, tier, requirement, name_fr, name_en, description_fr, description_en)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(seed.id)
        .bind(seed.achievement_type.as_str())
        .bind(seed.tier)
        .bind(seed.requirement)
        .bind(seed.name_fr)
        .bind(seed.name_en)
        .bind(seed.description_fr)
        .bind(seed.description_en)
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
    }

    if inserted > 0 {
        info!("Seeded {} achievement catalog entries", inserted);
    }
    Ok(())
}
