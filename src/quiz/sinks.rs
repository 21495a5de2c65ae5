//! Collaborator traits the engine talks to.
//!
//! The engine never draws or persists statistics itself. It emits
//! [`DisplayEvent`]s to a [`DisplaySink`] and hands each finished round to a
//! [`ResultSink`].

use super::state::{Level, RoundResult};

#[derive(Clone, Debug, PartialEq)]
pub enum DisplayEvent {
    QuestionShown {
        level: Level,
        prompt: String,
        options: [String; 4],
    },
    /// Whole seconds left in the running round.
    TimeLeft(u32),
    RoundResolved(RoundResult),
    UnlockRequired { requested: Level, playable: Level },
    LevelsChanged {
        current_level: Level,
        max_unlocked_level: Level,
    },
}

pub trait DisplaySink {
    fn show(&mut self, event: DisplayEvent);
}

/// Receives every resolved round exactly once.
pub trait ResultSink {
    fn record_result(&mut self, result: &RoundResult);
}
