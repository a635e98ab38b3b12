//! Scoring, level and gravity speed
//!
//! Classic rules: a line clear is worth a fixed amount times the level, the
//! level rises every 1000 points and each level shortens the fall interval.

use std::time::Duration;

/// Points for clearing 0..=4 lines at level 1
const LINE_CLEAR_POINTS: [u64; 5] = [0, 100, 300, 500, 800];

/// Points needed per level
const POINTS_PER_LEVEL: u64 = 1000;

/// Fall interval at level 1, the per-level reduction and the floor, in ms
const BASE_FALL_MS: u64 = 500;
const FALL_STEP_MS: u64 = 50;
const MIN_FALL_MS: u64 = 50;

/// Points awarded for a line clear of `lines` rows at `level`
pub fn line_clear_points(lines: usize, level: u32) -> u64 {
    LINE_CLEAR_POINTS.get(lines).copied().unwrap_or(0) * u64::from(level)
}

/// Score tracking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Current level, starts at 1
    pub level: u32,
    /// Total lines cleared
    pub lines: u32,
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

impl Score {
    pub fn new() -> Self {
        Self {
            points: 0,
            level: 1,
            lines: 0,
        }
    }

    /// Add score for a lock that cleared `lines` rows, then recompute the level.
    /// Returns the points awarded for the clear.
    pub fn add_clear(&mut self, lines: usize) -> u64 {
        let awarded = line_clear_points(lines, self.level);
        self.points += awarded;
        self.lines += lines as u32;
        self.update_level();
        awarded
    }

    /// Add score for a player soft drop (1 point)
    pub fn add_soft_drop(&mut self) {
        self.points += 1;
    }

    /// Add score for a player hard drop (2 points, independent of distance)
    pub fn add_hard_drop(&mut self) {
        self.points += 2;
    }

    /// Recompute the level from the current points
    pub fn update_level(&mut self) {
        let level = self.points / POINTS_PER_LEVEL + 1;
        self.level = u32::try_from(level).unwrap_or(u32::MAX);
    }

    /// Time between automatic drops at the current level
    pub fn fall_interval(&self) -> Duration {
        let reduction = u64::from(self.level.saturating_sub(1)).saturating_mul(FALL_STEP_MS);
        Duration::from_millis(BASE_FALL_MS.saturating_sub(reduction).max(MIN_FALL_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_points(points: u64) -> Score {
        let mut score = Score {
            points,
            ..Score::new()
        };
        score.update_level();
        score
    }

    #[test]
    fn test_single_clear() {
        let mut score = Score::new();
        assert_eq!(score.add_clear(1), 100);
        assert_eq!(score.points, 100);
        assert_eq!(score.lines, 1);
    }

    #[test]
    fn test_double_at_level_one() {
        let mut score = Score::new();
        score.add_clear(2);
        assert_eq!(score.points, 300);
    }

    #[test]
    fn test_tetris_at_level_three() {
        let mut score = at_points(2000);
        assert_eq!(score.level, 3);
        assert_eq!(score.add_clear(4), 2400);
        assert_eq!(score.points, 4400);
    }

    #[test]
    fn test_no_clear_awards_nothing() {
        let mut score = at_points(500);
        assert_eq!(score.add_clear(0), 0);
        assert_eq!(score.points, 500);
        assert_eq!(score.lines, 0);
    }

    #[test]
    fn test_level_thresholds() {
        let score = at_points(999);
        assert_eq!(score.level, 1);
        assert_eq!(score.fall_interval(), Duration::from_millis(500));

        let score = at_points(1000);
        assert_eq!(score.level, 2);
        assert_eq!(score.fall_interval(), Duration::from_millis(450));

        let score = at_points(12000);
        assert_eq!(score.level, 13);
        assert_eq!(score.fall_interval(), Duration::from_millis(50));
    }

    #[test]
    fn test_fall_interval_never_increases() {
        let mut last = Duration::MAX;
        for level in 1..40 {
            let score = Score {
                level,
                ..Score::new()
            };
            assert!(score.fall_interval() <= last);
            last = score.fall_interval();
        }
        assert_eq!(last, Duration::from_millis(50));
    }

    #[test]
    fn test_drop_bonuses_do_not_touch_level() {
        let mut score = at_points(999);
        score.add_soft_drop();
        score.add_hard_drop();
        assert_eq!(score.points, 1002);
        assert_eq!(score.level, 1);
        score.add_clear(0);
        assert_eq!(score.level, 2);
    }
}
