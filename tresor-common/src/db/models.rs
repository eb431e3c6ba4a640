//! Database models and gamification vocabulary

use crate::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Category a point award is booked under in `user_points`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointsCategory {
    Contribution,
    Exploration,
    Validation,
    Community,
}

impl PointsCategory {
    pub const ALL: [PointsCategory; 4] = [
        PointsCategory::Contribution,
        PointsCategory::Exploration,
        PointsCategory::Validation,
        PointsCategory::Community,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contribution => "contribution",
            Self::Exploration => "exploration",
            Self::Validation => "validation",
            Self::Community => "community",
        }
    }

    /// Column of `user_points` holding this category's running total
    pub fn points_column(&self) -> &'static str {
        match self {
            Self::Contribution => "contribution_points",
            Self::Exploration => "exploration_points",
            Self::Validation => "validation_points",
            Self::Community => "community_points",
        }
    }
}

impl FromStr for PointsCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown points category: {}", s)))
    }
}

/// Kind of event recorded in the activity log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    ContributionSubmitted,
    ContributionApproved,
    SymbolCreated,
    SymbolExplored,
    QuestJoined,
    ClueSolved,
    EvidenceSubmitted,
    ValidationVote,
    TheoryValidated,
    CommentPosted,
    CommunityHelp,
    /// Written by the level calculator only
    LevelUp,
}

impl ActivityType {
    pub const ALL: [ActivityType; 12] = [
        ActivityType::ContributionSubmitted,
        ActivityType::ContributionApproved,
        ActivityType::SymbolCreated,
        ActivityType::SymbolExplored,
        ActivityType::QuestJoined,
        ActivityType::ClueSolved,
        ActivityType::EvidenceSubmitted,
        ActivityType::ValidationVote,
        ActivityType::TheoryValidated,
        ActivityType::CommentPosted,
        ActivityType::CommunityHelp,
        ActivityType::LevelUp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ContributionSubmitted => "contribution_submitted",
            Self::ContributionApproved => "contribution_approved",
            Self::SymbolCreated => "symbol_created",
            Self::SymbolExplored => "symbol_explored",
            Self::QuestJoined => "quest_joined",
            Self::ClueSolved => "clue_solved",
            Self::EvidenceSubmitted => "evidence_submitted",
            Self::ValidationVote => "validation_vote",
            Self::TheoryValidated => "theory_validated",
            Self::CommentPosted => "comment_posted",
            Self::CommunityHelp => "community_help",
            Self::LevelUp => "level_up",
        }
    }

    /// Category credited by this activity; `None` for non-awarding activities
    pub fn category(&self) -> Option<PointsCategory> {
        match self {
            Self::ContributionSubmitted | Self::ContributionApproved | Self::SymbolCreated => {
                Some(PointsCategory::Contribution)
            }
            Self::SymbolExplored
            | Self::QuestJoined
            | Self::ClueSolved
            | Self::EvidenceSubmitted => Some(PointsCategory::Exploration),
            Self::ValidationVote | Self::TheoryValidated => Some(PointsCategory::Validation),
            Self::CommentPosted | Self::CommunityHelp => Some(PointsCategory::Community),
            Self::LevelUp => None,
        }
    }

    /// Points granted when the caller does not specify an amount
    pub fn default_points(&self) -> i64 {
        match self {
            Self::ContributionSubmitted => 10,
            Self::ContributionApproved => 50,
            Self::SymbolCreated => 25,
            Self::SymbolExplored => 2,
            Self::QuestJoined => 5,
            Self::ClueSolved => 30,
            Self::EvidenceSubmitted => 15,
            Self::ValidationVote => 5,
            Self::TheoryValidated => 40,
            Self::CommentPosted => 3,
            Self::CommunityHelp => 10,
            Self::LevelUp => 0,
        }
    }
}

impl FromStr for ActivityType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown activity type: {}", s)))
    }
}

/// Aggregate statistic an achievement threshold is measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementType {
    Contributions,
    Explorations,
    Validations,
    Community,
    Points,
    Level,
}

impl AchievementType {
    pub const ALL: [AchievementType; 6] = [
        AchievementType::Contributions,
        AchievementType::Explorations,
        AchievementType::Validations,
        AchievementType::Community,
        AchievementType::Points,
        AchievementType::Level,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contributions => "contributions",
            Self::Explorations => "explorations",
            Self::Validations => "validations",
            Self::Community => "community",
            Self::Points => "points",
            Self::Level => "level",
        }
    }
}

impl FromStr for AchievementType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown achievement type: {}", s)))
    }
}

/// Display language for catalog texts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    En,
}

impl Language {
    /// Parse a language tag, falling back to French
    ///
    /// Accepts region-qualified tags (`en-GB`, `fr_CA`).
    pub fn parse_or_default(tag: Option<&str>) -> Self {
        match tag.map(|t| t.trim().to_ascii_lowercase()) {
            Some(t) if t == "en" || t.starts_with("en-") || t.starts_with("en_") => Language::En,
            _ => Language::Fr,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Profile {
    pub user_id: String,
    pub username: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Per-user running point totals
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct UserPoints {
    pub user_id: String,
    pub total_points: i64,
    pub contribution_points: i64,
    pub exploration_points: i64,
    pub validation_points: i64,
    pub community_points: i64,
}

impl UserPoints {
    /// Zeroed totals for a user with no award yet
    pub fn empty(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            total_points: 0,
            contribution_points: 0,
            exploration_points: 0,
            validation_points: 0,
            community_points: 0,
        }
    }

    pub fn category_points(&self, category: PointsCategory) -> i64 {
        match category {
            PointsCategory::Contribution => self.contribution_points,
            PointsCategory::Exploration => self.exploration_points,
            PointsCategory::Validation => self.validation_points,
            PointsCategory::Community => self.community_points,
        }
    }
}

/// Per-user level state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct UserLevel {
    pub user_id: String,
    pub level: i64,
    pub current_xp: i64,
    pub next_level_xp: i64,
    pub total_xp: i64,
}

/// Static catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Achievement {
    pub id: String,
    pub achievement_type: String,
    pub tier: i64,
    pub requirement: i64,
    pub name_fr: String,
    pub name_en: String,
    pub description_fr: String,
    pub description_en: String,
}

impl Achievement {
    pub fn name(&self, lang: Language) -> &str {
        match lang {
            Language::Fr => &self.name_fr,
            Language::En => &self.name_en,
        }
    }

    pub fn description(&self, lang: Language) -> &str {
        match lang {
            Language::Fr => &self.description_fr,
            Language::En => &self.description_en,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct UserBadge {
    pub guid: String,
    pub user_id: String,
    pub badge_type: String,
    pub badge_name: String,
    pub awarded_at: String,
}

/// One row of the append-only activity log
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct UserActivity {
    pub guid: String,
    pub user_id: String,
    pub activity_type: String,
    pub category: Option<String>,
    pub points_earned: i64,
    pub entity_id: Option<String>,
    /// Free-form JSON text
    pub details: Option<String>,
    pub created_at: String,
}
