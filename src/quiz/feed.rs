//! The on-screen message log, fed by the engine's display events.

use std::cell::RefCell;
use std::rc::Rc;

use super::scoring::format_winnings;
use super::sinks::{DisplayEvent, DisplaySink};
use super::state::Level;

const MAX_ENTRIES: usize = 30;

#[derive(Clone, Debug, PartialEq)]
pub struct FeedEntry {
    pub text: String,
    pub is_important: bool,
}

#[derive(Default)]
pub struct ScreenFeed {
    pub entries: Vec<FeedEntry>,
    pub time_left: u32,
    pub current_level: Level,
    pub max_unlocked_level: Level,
}

impl ScreenFeed {
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::default()))
    }

    fn add(&mut self, text: String, is_important: bool) {
        self.entries.push(FeedEntry { text, is_important });
        if self.entries.len() > MAX_ENTRIES {
            let excess = self.entries.len() - MAX_ENTRIES;
            self.entries.drain(..excess);
        }
    }

    fn apply(&mut self, event: DisplayEvent) {
        match event {
            DisplayEvent::QuestionShown { level, prompt, .. } => {
                self.add(format!("Level {level}: {prompt}"), false);
            }
            DisplayEvent::TimeLeft(seconds) => self.time_left = seconds,
            DisplayEvent::RoundResolved(result) => {
                if result.won {
                    self.add(
                        format!(
                            "Level {} cleared! {} won",
                            result.level,
                            format_winnings(result.winnings)
                        ),
                        true,
                    );
                } else {
                    self.add(format!("Level {} failed", result.level), false);
                }
            }
            DisplayEvent::UnlockRequired {
                requested,
                playable,
            } => {
                self.add(
                    format!("Level {requested} is locked. Level {playable} is open."),
                    false,
                );
            }
            DisplayEvent::LevelsChanged {
                current_level,
                max_unlocked_level,
            } => {
                if self.max_unlocked_level != 0 && max_unlocked_level > self.max_unlocked_level {
                    self.add(format!("Level {max_unlocked_level} unlocked!"), true);
                }
                self.current_level = current_level;
                self.max_unlocked_level = max_unlocked_level;
            }
        }
    }
}

impl DisplaySink for Rc<RefCell<ScreenFeed>> {
    fn show(&mut self, event: DisplayEvent) {
        self.borrow_mut().apply(event);
    }
}
