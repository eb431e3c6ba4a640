//! Level calculator
//!
//! Level 1 needs 100 XP; each following level needs 20% more than the one
//! before, rounded to the nearest integer. Carry-over XP counts toward the
//! next level.

use serde::Serialize;

/// XP needed to leave level 1
pub const BASE_LEVEL_XP: i64 = 100;

/// Growth factor between consecutive level thresholds
pub const LEVEL_GROWTH: f64 = 1.2;

/// Levels that earn a milestone badge
pub const MILESTONE_LEVELS: [i64; 5] = [5, 10, 25, 50, 100];

/// XP needed to go from `level` to `level + 1`
///
/// # Examples
///
/// ```
/// use tresor_gx::levels::xp_for_next_level;
///
/// assert_eq!(xp_for_next_level(1), 100);
/// assert_eq!(xp_for_next_level(2), 120);
/// assert_eq!(xp_for_next_level(4), 173); // 172.8 rounded
/// ```
pub fn xp_for_next_level(level: i64) -> i64 {
    let exponent = (level.max(1) - 1).min(i32::MAX as i64) as i32;
    // Saturates at i64::MAX for absurd levels
    (BASE_LEVEL_XP as f64 * LEVEL_GROWTH.powi(exponent)).round() as i64
}

/// Badge name granted on reaching a milestone level
pub fn milestone_badge_name(level: i64) -> String {
    format!("Niveau {}", level)
}

/// Position of a user on the level ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelState {
    pub level: i64,
    /// XP accumulated inside the current level
    pub xp: i64,
    /// XP needed to leave the current level
    pub next_level_xp: i64,
}

impl Default for LevelState {
    fn default() -> Self {
        Self::initial()
    }
}

impl LevelState {
    /// State of a user who never earned XP
    pub fn initial() -> Self {
        Self {
            level: 1,
            xp: 0,
            next_level_xp: BASE_LEVEL_XP,
        }
    }

    /// Add earned XP, levelling up as many times as it allows
    ///
    /// Negative input is treated as zero. The result always satisfies
    /// `0 <= xp < next_level_xp`.
    pub fn apply_xp(self, earned: i64) -> LevelProgress {
        let mut current = self;
        current.xp = current.xp.max(0).saturating_add(earned.max(0));
        if current.next_level_xp <= 0 {
            current.next_level_xp = xp_for_next_level(current.level);
        }

        while current.xp >= current.next_level_xp {
            current.xp -= current.next_level_xp;
            current.level += 1;
            current.next_level_xp = xp_for_next_level(current.level);
        }

        LevelProgress {
            previous: self,
            current,
        }
    }
}

/// Outcome of applying XP to a level state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelProgress {
    pub previous: LevelState,
    pub current: LevelState,
}

impl LevelProgress {
    pub fn levels_gained(&self) -> i64 {
        self.current.level - self.previous.level
    }

    pub fn leveled_up(&self) -> bool {
        self.levels_gained() > 0
    }

    /// Milestone levels crossed by this progress, in ascending order
    ///
    /// Every milestone in `(previous.level, current.level]` counts, so a
    /// single large award does not skip the badges of intermediate levels.
    pub fn milestones_reached(&self) -> Vec<i64> {
        MILESTONE_LEVELS
            .iter()
            .copied()
            .filter(|m| *m > self.previous.level && *m <= self.current.level)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_xp_leaves_state_unchanged() {
        let state = LevelState {
            level: 3,
            xp: 17,
            next_level_xp: 144,
        };
        let progress = state.apply_xp(0);
        assert_eq!(progress.current, state);
        assert!(!progress.leveled_up());
    }

    #[test]
    fn test_exact_threshold_levels_up_to_zero() {
        let progress = LevelState::initial().apply_xp(100);
        assert_eq!(
            progress.current,
            LevelState {
                level: 2,
                xp: 0,
                next_level_xp: 120,
            }
        );
        assert_eq!(progress.levels_gained(), 1);
    }

    #[test]
    fn test_just_below_threshold() {
        let progress = LevelState::initial().apply_xp(99);
        assert_eq!(progress.current.level, 1);
        assert_eq!(progress.current.xp, 99);
    }

    #[test]
    fn test_multiple_levels_in_one_award() {
        // 100 + 120 + 144 = 364 reaches level 4 with 6 XP left
        let progress = LevelState::initial().apply_xp(370);
        assert_eq!(progress.current.level, 4);
        assert_eq!(progress.current.xp, 6);
        assert_eq!(progress.current.next_level_xp, 173);
        assert_eq!(progress.levels_gained(), 3);
    }

    #[test]
    fn test_invariant_holds_for_many_inputs() {
        let mut state = LevelState::initial();
        for earned in [0, 1, 7, 99, 100, 101, 250, 1_000, 12_345, 99_999] {
            state = state.apply_xp(earned).current;
            assert!(state.xp >= 0);
            assert!(state.xp < state.next_level_xp);
            assert_eq!(state.next_level_xp, xp_for_next_level(state.level));
        }
    }

    #[test]
    fn test_negative_xp_ignored() {
        let progress = LevelState::initial().apply_xp(-50);
        assert_eq!(progress.current, LevelState::initial());
    }

    #[test]
    fn test_inconsistent_stored_state_is_normalized() {
        // xp above threshold, as left by an external writer
        let state = LevelState {
            level: 1,
            xp: 250,
            next_level_xp: 100,
        };
        let progress = state.apply_xp(0);
        assert_eq!(progress.current.level, 3);
        assert_eq!(progress.current.xp, 30);
    }

    #[test]
    fn test_milestones_crossed_are_all_reported() {
        let state = LevelState {
            level: 4,
            xp: 0,
            next_level_xp: xp_for_next_level(4),
        };
        // Enough to pass level 10
        let progress = state.apply_xp(5_000);
        assert!(progress.current.level > 10);
        assert_eq!(progress.milestones_reached(), vec![5, 10]);
    }

    #[test]
    fn test_no_milestone_when_staying_on_one() {
        let state = LevelState {
            level: 5,
            xp: 0,
            next_level_xp: xp_for_next_level(5),
        };
        let progress = state.apply_xp(10);
        assert!(progress.milestones_reached().is_empty());
    }

    #[test]
    fn test_threshold_growth() {
        assert_eq!(xp_for_next_level(3), 144);
        assert_eq!(xp_for_next_level(0), 100);
        for level in 1..60 {
            assert!(xp_for_next_level(level + 1) >= xp_for_next_level(level));
        }
    }
}
