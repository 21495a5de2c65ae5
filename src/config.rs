//! Tunable quiz parameters.
//!
//! Defaults match the shipped game. A JSON object under [`CONFIG_KEY`] in the
//! key-value store overrides individual fields; missing fields keep their
//! defaults.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::quiz::state::Level;
use crate::store::{read_json, KeyValueStore};

pub const CONFIG_KEY: &str = "math_quiz_config";

const MAX_LEVELS_PER_GROUP: Level = 1000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Length of one round's countdown.
    pub round_seconds: u32,
    /// Fixed game ticks per real-time second.
    pub ticks_per_second: u32,
    /// Levels shown in the level grid.
    pub level_count: Level,
    /// Levels per grid page.
    pub levels_per_group: Level,
    pub match_history_limit: usize,
    pub recent_games_limit: usize,
    pub leaderboard_limit: usize,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            round_seconds: 30,
            ticks_per_second: 10,
            level_count: 1000,
            levels_per_group: 100,
            match_history_limit: 50,
            recent_games_limit: 10,
            leaderboard_limit: 100,
        }
    }
}

impl QuizConfig {
    /// Read overrides from the store, falling back to defaults.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match read_json::<QuizConfig>(store, CONFIG_KEY) {
            Ok(Some(cfg)) => cfg.sanitized(),
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("{e}; using default quiz settings");
                Self::default()
            }
        }
    }

    /// Replace zero values that would stall the timer or empty the grid.
    pub fn sanitized(mut self) -> Self {
        self.round_seconds = self.round_seconds.max(1);
        self.ticks_per_second = self.ticks_per_second.max(1);
        self.level_count = self.level_count.max(1);
        // a page's level buttons must fit the click-action range
        self.levels_per_group = self
            .levels_per_group
            .clamp(1, self.level_count.min(MAX_LEVELS_PER_GROUP));
        self.match_history_limit = self.match_history_limit.max(1);
        self.recent_games_limit = self.recent_games_limit.max(1);
        self.leaderboard_limit = self.leaderboard_limit.max(1);
        self
    }

    pub fn group_count(&self) -> u32 {
        self.level_count.div_ceil(self.levels_per_group)
    }

    /// Zero-based page that contains `level`.
    pub fn group_of(&self, level: Level) -> u32 {
        let level = level.clamp(1, self.level_count);
        (level - 1) / self.levels_per_group
    }

    pub fn group_levels(&self, group: u32) -> RangeInclusive<Level> {
        let group = group.min(self.group_count() - 1);
        let first = group * self.levels_per_group + 1;
        let last = (first + self.levels_per_group - 1).min(self.level_count);
        first..=last
    }
}
