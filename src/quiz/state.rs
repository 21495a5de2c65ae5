//! Math quiz data model: questions, progress, round results and engine phases.

use serde::{Deserialize, Serialize};

use super::timer::RoundTimer;

/// Level number, 1-based. Difficulty is a function of this alone.
pub type Level = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "×",
        }
    }

    /// Result of `a <op> b`. Subtraction saturates at zero; the generator
    /// orders operands so that never triggers.
    pub fn apply(&self, a: u64, b: u64) -> u64 {
        match self {
            Operator::Add => a + b,
            Operator::Subtract => a.saturating_sub(b),
            Operator::Multiply => a * b,
        }
    }
}

/// One generated problem with four answer options.
#[derive(Clone, Debug, PartialEq)]
pub struct Question {
    pub level: Level,
    pub operator: Operator,
    pub operands: (u64, u64),
    pub answer: u64,
    /// `"12 + 7 = ?"`
    pub prompt: String,
    pub options: [String; 4],
    pub correct_index: usize,
}

impl Question {
    pub fn correct_text(&self) -> &str {
        &self.options[self.correct_index]
    }

    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index
    }
}

/// Persisted unlock frontier plus the level last played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    pub current_level: Level,
    pub max_unlocked_level: Level,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            current_level: 1,
            max_unlocked_level: 1,
        }
    }
}

/// Outcome of one round, handed to the result sink exactly once.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub level: Level,
    pub won: bool,
    /// Correct answers so far this session (including this round if won).
    pub score: u32,
    pub time_left_seconds: u32,
    pub winnings: u64,
    pub timestamp_ms: f64,
}

/// How a level button should be drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelState {
    /// Above the unlock frontier; not selectable.
    Locked,
    /// Below the level last played.
    Completed,
    /// The level last played.
    Current,
    /// Unlocked, not yet reached.
    Open,
}

/// A round in progress. Owns the only live countdown.
#[derive(Clone, Debug)]
pub struct Round {
    pub question: Question,
    pub timer: RoundTimer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Wrong { chosen: usize },
    TimedOut,
}

/// A finished round waiting for the player to pick what comes next.
#[derive(Clone, Debug)]
pub struct Resolution {
    pub question: Question,
    pub outcome: Outcome,
    pub result: RoundResult,
}

#[derive(Clone, Debug)]
pub enum Phase {
    LevelSelect,
    InRound(Round),
    Resolved(Resolution),
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::LevelSelect => "level-select",
            Phase::InRound(_) => "in-round",
            Phase::Resolved(_) => "resolved",
        }
    }
}

/// Informational overlay on top of the level grid.
#[derive(Clone, Debug, PartialEq)]
pub enum Popup {
    /// A locked level was requested; `playable` is the nearest level that can be started.
    UnlockRequired { requested: Level, playable: Level },
    /// The countdown ran out.
    TimeUp { level: Level, correct_answer: String },
}
