//! Unlock frontier and level-button classification.

use crate::error::{QuizError, Result};

use super::state::{Level, LevelState, ProgressState};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressTracker {
    state: ProgressState,
}

impl ProgressTracker {
    /// Wrap persisted progress, repairing values below 1.
    pub fn new(state: ProgressState) -> Self {
        let max_unlocked_level = state.max_unlocked_level.max(1);
        let current_level = state.current_level.clamp(1, max_unlocked_level);
        Self {
            state: ProgressState {
                current_level,
                max_unlocked_level,
            },
        }
    }

    pub fn state(&self) -> ProgressState {
        self.state
    }

    pub fn current_level(&self) -> Level {
        self.state.current_level
    }

    pub fn max_unlocked_level(&self) -> Level {
        self.state.max_unlocked_level
    }

    pub fn is_unlocked(&self, level: Level) -> bool {
        level >= 1 && level <= self.state.max_unlocked_level
    }

    /// `Err(LevelLocked)` naming the nearest playable level when `level` is locked.
    pub fn check_playable(&self, level: Level) -> Result<()> {
        if self.is_unlocked(level) {
            Ok(())
        } else {
            Err(QuizError::LevelLocked {
                requested: level,
                playable: self.nearest_playable(level),
            })
        }
    }

    /// Closest unlocked level to `level`.
    pub fn nearest_playable(&self, level: Level) -> Level {
        level.clamp(1, self.state.max_unlocked_level)
    }

    /// Mark `level` as the one being played. Ignored for locked levels.
    pub fn set_current(&mut self, level: Level) {
        if self.is_unlocked(level) {
            self.state.current_level = level;
        }
    }

    /// Record a completion. Returns `true` when the frontier moved, in which
    /// case the caller must persist.
    pub fn complete_level(&mut self, level: Level) -> bool {
        if level >= self.state.max_unlocked_level {
            self.state.max_unlocked_level = level.saturating_add(1);
            true
        } else {
            false
        }
    }

    pub fn classify(&self, level: Level) -> LevelState {
        if level > self.state.max_unlocked_level {
            LevelState::Locked
        } else if level < self.state.current_level {
            LevelState::Completed
        } else if level == self.state.current_level {
            LevelState::Current
        } else {
            LevelState::Open
        }
    }
}
