//! Scoring module - line clear points, levels, and fall speed
//!
//! Classic arcade rules: clearing 1-4 rows at once awards
//! `SCORING_TABLE[n - 1] * (level + 1)` using the level *before* the clear.
//! Every `rows_per_level` cleared rows advance the level by one, and each
//! level-up raises the speed by a fixed increment until the cap would be
//! exceeded.

use crate::types::{MAX_CLEARED_ROWS, SCORING_TABLE};

/// Points for clearing `cleared` rows at `level`.
///
/// `cleared` outside `1..=4` scores nothing.
pub fn score_delta(level: u32, cleared: usize) -> u32 {
    debug_assert!(cleared <= MAX_CLEARED_ROWS);
    if cleared == 0 || cleared > MAX_CLEARED_ROWS {
        return 0;
    }
    SCORING_TABLE[cleared - 1].saturating_mul(level.saturating_add(1))
}

/// Ticks between forced downward moves at `speed`
#[inline]
pub fn forced_move_interval(fps: u32, speed: u32) -> u32 {
    fps.saturating_sub(speed)
}

/// Level/speed tuning, copied out of the session configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelRules {
    pub rows_per_level: u32,
    pub speed_increment: u32,
    pub max_speed: u32,
}

/// What one completed clear changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearOutcome {
    pub score_delta: u32,
    /// Number of level-ups caused by this clear (usually 0 or 1)
    pub levels_gained: u32,
}

/// Score, cleared rows, level, and speed of one session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progression {
    pub level: u32,
    pub speed: u32,
    pub rows_cleared: u32,
    pub score: u32,
}

impl Progression {
    pub fn new(start_speed: u32) -> Self {
        Self {
            level: 0,
            speed: start_speed,
            rows_cleared: 0,
            score: 0,
        }
    }

    /// Apply a clear of `cleared` rows.
    ///
    /// Points use the level in effect before the clear; the level then
    /// catches up with `rows_cleared / rows_per_level`.
    pub fn record_clear(&mut self, cleared: usize, rules: &LevelRules) -> ClearOutcome {
        let delta = score_delta(self.level, cleared);
        self.score = self.score.saturating_add(delta);
        self.rows_cleared = self.rows_cleared.saturating_add(cleared as u32);

        let mut levels_gained = 0;
        let rows_per_level = rules.rows_per_level.max(1);
        while self.rows_cleared >= (self.level + 1).saturating_mul(rows_per_level) {
            self.level += 1;
            levels_gained += 1;
            if self.speed + rules.speed_increment <= rules.max_speed {
                self.speed += rules.speed_increment;
            }
        }

        ClearOutcome {
            score_delta: delta,
            levels_gained,
        }
    }
}
