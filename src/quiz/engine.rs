//! Quiz state machine.
//!
//! ```text
//! LevelSelect ──start_level──▶ InRound ──answer──▶ Resolved ──continue/next/retry──▶ …
//!      ▲                          │
//!      └──────── timeout / leave ─┘
//! ```
//!
//! All collaborators are injected. The engine owns the only round timer, and
//! it lives inside `Phase::InRound`, so every transition out of a round drops
//! it. Answers and ticks that arrive in any other phase are ignored.

use std::rc::Rc;

use rand::rngs::StdRng;

use crate::config::QuizConfig;
use crate::error::{QuizError, Result};
use crate::store::KeyValueStore;
use crate::time::now_ms;

use super::progress::ProgressTracker;
use super::question;
use super::save;
use super::scoring::compute_winnings;
use super::sinks::{DisplayEvent, DisplaySink, ResultSink};
use super::state::{
    Level, LevelState, Outcome, Phase, Popup, Resolution, Round, RoundResult,
};
use super::timer::RoundTimer;

pub struct QuizEngine {
    config: QuizConfig,
    store: Rc<dyn KeyValueStore>,
    results: Box<dyn ResultSink>,
    display: Box<dyn DisplaySink>,
    rng: StdRng,
    progress: ProgressTracker,
    phase: Phase,
    popup: Option<Popup>,
    /// Correct answers since the engine was created.
    session_score: u32,
}

impl QuizEngine {
    pub fn new(
        config: QuizConfig,
        store: Rc<dyn KeyValueStore>,
        results: Box<dyn ResultSink>,
        display: Box<dyn DisplaySink>,
        rng: StdRng,
    ) -> Self {
        let progress = ProgressTracker::new(save::load_progress(store.as_ref()));
        log::info!(
            "progress loaded: level {} of {} unlocked",
            progress.max_unlocked_level(),
            config.level_count
        );
        let mut engine = Self {
            config,
            store,
            results,
            display,
            rng,
            progress,
            phase: Phase::LevelSelect,
            popup: None,
            session_score: 0,
        };
        engine.announce_levels();
        engine
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn store(&self) -> Rc<dyn KeyValueStore> {
        Rc::clone(&self.store)
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    pub fn session_score(&self) -> u32 {
        self.session_score
    }

    pub fn level_state(&self, level: Level) -> LevelState {
        self.progress.classify(level)
    }

    /// Begin a round at `level`, replacing any round in progress.
    ///
    /// A locked level does not start anything: the `UnlockRequired` popup is
    /// raised and `Err(LevelLocked)` names the level that can be played.
    pub fn start_level(&mut self, level: Level) -> Result<()> {
        if let Err(err) = self.progress.check_playable(level) {
            if let QuizError::LevelLocked {
                requested,
                playable,
            } = err
            {
                self.popup = Some(Popup::UnlockRequired {
                    requested,
                    playable,
                });
                self.display.show(DisplayEvent::UnlockRequired {
                    requested,
                    playable,
                });
            }
            log::info!("{err}");
            return Err(err);
        }

        self.popup = None;
        self.progress.set_current(level);
        let question = question::generate(level, &mut self.rng);
        self.display.show(DisplayEvent::QuestionShown {
            level,
            prompt: question.prompt.clone(),
            options: question.options.clone(),
        });
        self.display
            .show(DisplayEvent::TimeLeft(self.config.round_seconds));
        self.phase = Phase::InRound(Round {
            question,
            timer: RoundTimer::start(self.config.round_seconds, self.config.ticks_per_second),
        });
        Ok(())
    }

    /// Answer the running question. `None` when no round is running or the
    /// index is not one of the four options.
    pub fn answer(&mut self, index: usize) -> Option<&Resolution> {
        let Phase::InRound(round) = &self.phase else {
            return None;
        };
        if index >= round.question.options.len() {
            return None;
        }
        let outcome = if round.question.is_correct(index) {
            Outcome::Correct
        } else {
            Outcome::Wrong { chosen: index }
        };
        self.resolve(outcome);
        match &self.phase {
            Phase::Resolved(resolution) => Some(resolution),
            _ => None,
        }
    }

    /// Advance the round timer by `delta_ticks` fixed ticks.
    pub fn tick(&mut self, delta_ticks: u32) {
        let Phase::InRound(round) = &mut self.phase else {
            return;
        };
        let step = round.timer.advance(delta_ticks);
        if step.seconds_elapsed > 0 {
            self.display
                .show(DisplayEvent::TimeLeft(round.timer.remaining_seconds()));
        }
        if step.expired {
            self.resolve(Outcome::TimedOut);
        }
    }

    /// Abandon the running round without recording a result.
    pub fn leave_round(&mut self) -> bool {
        if let Phase::InRound(round) = &self.phase {
            log::info!("left level {} mid-round", round.question.level);
            self.phase = Phase::LevelSelect;
            self.announce_levels();
            true
        } else {
            false
        }
    }

    /// From a resolved round back to the level grid.
    pub fn continue_to_levels(&mut self) -> bool {
        if matches!(self.phase, Phase::Resolved(_)) {
            self.phase = Phase::LevelSelect;
            self.announce_levels();
            true
        } else {
            false
        }
    }

    /// After a win, start the following level if there is one.
    pub fn next_level(&mut self) -> bool {
        let next = match &self.phase {
            Phase::Resolved(r) if r.result.won && r.result.level < self.config.level_count => {
                r.result.level + 1
            }
            _ => return false,
        };
        self.start_level(next).is_ok()
    }

    /// After a loss, replay the same level.
    pub fn retry(&mut self) -> bool {
        let level = match &self.phase {
            Phase::Resolved(r) if !r.result.won => r.result.level,
            _ => return false,
        };
        self.start_level(level).is_ok()
    }

    /// Play the level offered by the `UnlockRequired` popup.
    pub fn accept_redirect(&mut self) -> bool {
        let Some(Popup::UnlockRequired { playable, .. }) = self.popup.clone() else {
            return false;
        };
        self.start_level(playable).is_ok()
    }

    pub fn dismiss_popup(&mut self) -> bool {
        self.popup.take().is_some()
    }

    fn resolve(&mut self, outcome: Outcome) {
        let phase = std::mem::replace(&mut self.phase, Phase::LevelSelect);
        let round = match phase {
            Phase::InRound(round) => round,
            other => {
                self.phase = other;
                return;
            }
        };
        let question = round.question;
        let level = question.level;
        let timestamp_ms = now_ms();

        let result = if outcome == Outcome::Correct {
            self.session_score += 1;
            let time_left = round.timer.remaining_seconds();
            RoundResult {
                level,
                won: true,
                score: self.session_score,
                time_left_seconds: time_left,
                winnings: compute_winnings(level, self.session_score, time_left),
                timestamp_ms,
            }
        } else {
            RoundResult {
                level,
                won: false,
                score: 0,
                time_left_seconds: 0,
                winnings: 0,
                timestamp_ms,
            }
        };

        if result.won {
            self.complete(level);
        }
        self.results.record_result(&result);
        self.display
            .show(DisplayEvent::RoundResolved(result.clone()));

        match outcome {
            Outcome::TimedOut => {
                log::info!("time up on level {level}");
                self.popup = Some(Popup::TimeUp {
                    level,
                    correct_answer: question.correct_text().to_string(),
                });
                self.announce_levels();
            }
            Outcome::Correct | Outcome::Wrong { .. } => {
                self.phase = Phase::Resolved(Resolution {
                    question,
                    outcome,
                    result,
                });
            }
        }
    }

    fn complete(&mut self, level: Level) {
        if self.progress.complete_level(level) {
            log::info!(
                "level {level} complete; level {} unlocked",
                self.progress.max_unlocked_level()
            );
        }
        if let Err(e) = save::save_progress(self.store.as_ref(), &self.progress.state()) {
            log::warn!("progress not saved: {e}");
        }
        self.announce_levels();
    }

    fn announce_levels(&mut self) {
        self.display.show(DisplayEvent::LevelsChanged {
            current_level: self.progress.current_level(),
            max_unlocked_level: self.progress.max_unlocked_level(),
        });
    }
}
