//! Math quiz: pick a level, answer one arithmetic question against the clock,
//! unlock the next level.

pub mod accounts;
pub mod actions;
pub mod distractor;
pub mod engine;
pub mod feed;
pub mod form;
pub mod leaderboard;
pub mod progress;
pub mod question;
pub mod render;
pub mod save;
pub mod scoring;
pub mod sinks;
pub mod state;
pub mod stats;
pub mod timer;

use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::config::QuizConfig;
use crate::input::{ClickState, InputEvent};
use crate::store::KeyValueStore;
use crate::time::now_ms;

use accounts::Accounts;
use actions::*;
use engine::QuizEngine;
use feed::ScreenFeed;
use form::{AccountForm, FormMode};
use leaderboard::Period;
use state::{Level, Phase, Popup};
use stats::StatsRecorder;

/// Full-screen panels drawn instead of the current phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Overlay {
    Profile,
    Leaderboard,
    /// Sign-in / sign-up form over the profile.
    Account,
}

/// Group tabs shown at once in the level grid header.
pub const GROUP_TAB_WINDOW: u32 = 5;

pub struct QuizGame {
    pub engine: QuizEngine,
    pub feed: Rc<RefCell<ScreenFeed>>,
    pub accounts: Accounts,
    /// Zero-based level-grid page.
    pub page: u32,
    pub overlay: Option<Overlay>,
    pub form: AccountForm,
    pub period: Period,
}

impl QuizGame {
    pub fn new(config: QuizConfig, store: Rc<dyn KeyValueStore>, rng: StdRng) -> Self {
        let feed = ScreenFeed::shared();
        let recorder = StatsRecorder::new(Rc::clone(&store), &config);
        let accounts = Accounts::new(Rc::clone(&store));
        let engine = QuizEngine::new(
            config,
            store,
            Box::new(recorder),
            Box::new(Rc::clone(&feed)),
            rng,
        );
        let page = engine
            .config()
            .group_of(engine.progress().current_level());
        Self {
            engine,
            feed,
            accounts,
            page,
            overlay: None,
            form: AccountForm::new(FormMode::SignIn),
            period: Period::Daily,
        }
    }

    pub fn page_levels(&self) -> std::ops::RangeInclusive<Level> {
        self.engine.config().group_levels(self.page)
    }

    /// First group tab shown, keeping the current page inside the window.
    pub fn tab_window_start(&self) -> u32 {
        let groups = self.engine.config().group_count();
        let half = GROUP_TAB_WINDOW / 2;
        self.page
            .saturating_sub(half)
            .min(groups.saturating_sub(GROUP_TAB_WINDOW))
    }

    fn turn_page(&mut self, forward: bool) -> bool {
        let last = self.engine.config().group_count() - 1;
        let page = if forward {
            (self.page + 1).min(last)
        } else {
            self.page.saturating_sub(1)
        };
        let moved = page != self.page;
        self.page = page;
        moved
    }

    fn start(&mut self, level: Level) -> bool {
        self.engine.start_level(level).is_ok() || self.engine.popup().is_some()
    }

    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        let before = self.engine.phase().name();
        let consumed = match self.overlay {
            Some(Overlay::Account) => self.handle_form(event),
            Some(overlay) => self.handle_overlay(overlay, &event.command()),
            None if self.engine.popup().is_some() => self.handle_popup(&event.command()),
            None => match event.command() {
                InputEvent::Key(c) => self.handle_key(c),
                InputEvent::Click(id) => self.handle_click(id),
                InputEvent::Back => self.handle_key('q'),
                _ => false,
            },
        };
        self.follow_phase(before);
        consumed
    }

    pub fn tick(&mut self, delta_ticks: u32) {
        let before = self.engine.phase().name();
        self.engine.tick(delta_ticks);
        self.follow_phase(before);
    }

    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(self, f, area, click_state);
    }

    /// Returning to the grid shows the page of the level last played.
    fn follow_phase(&mut self, before: &'static str) {
        let now = self.engine.phase();
        if matches!(now, Phase::LevelSelect) && before != now.name() {
            self.page = self
                .engine
                .config()
                .group_of(self.engine.progress().current_level());
        }
    }

    fn handle_overlay(&mut self, overlay: Overlay, event: &InputEvent) -> bool {
        let period = match (overlay, event) {
            (_, InputEvent::Back)
            | (_, InputEvent::Key('c'))
            | (_, InputEvent::Click(CLOSE_OVERLAY)) => {
                self.overlay = None;
                return true;
            }
            (Overlay::Profile, InputEvent::Key('o')) | (Overlay::Profile, InputEvent::Click(SIGN_OUT)) => {
                let signed_in = self.accounts.current_user().is_some();
                self.accounts.log_out();
                return signed_in;
            }
            (Overlay::Profile, InputEvent::Key('i')) | (Overlay::Profile, InputEvent::Click(SIGN_IN)) => {
                return self.open_form(FormMode::SignIn);
            }
            (Overlay::Profile, InputEvent::Key('u')) | (Overlay::Profile, InputEvent::Click(SIGN_UP)) => {
                return self.open_form(FormMode::SignUp);
            }
            (Overlay::Leaderboard, InputEvent::Key('d')) => Period::Daily,
            (Overlay::Leaderboard, InputEvent::Key('w')) => Period::Weekly,
            (Overlay::Leaderboard, InputEvent::Key('a')) => Period::AllTime,
            (Overlay::Leaderboard, InputEvent::Click(id))
                if (PERIOD_TAB_BASE..PERIOD_TAB_BASE + 3).contains(id) =>
            {
                Period::ALL[(id - PERIOD_TAB_BASE) as usize]
            }
            _ => return false,
        };
        self.period = period;
        true
    }

    fn open_form(&mut self, mode: FormMode) -> bool {
        if self.accounts.current_user().is_some() {
            return false;
        }
        self.form = AccountForm::new(mode);
        self.overlay = Some(Overlay::Account);
        true
    }

    /// Characters type into the focused field, so the form reads raw events.
    fn handle_form(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Back | InputEvent::Click(CLOSE_OVERLAY) => {
                self.overlay = Some(Overlay::Profile);
                true
            }
            InputEvent::Key(c) => self.form.type_char(*c),
            InputEvent::Erase => self.form.erase(),
            InputEvent::NextField => {
                self.form.focus_next();
                true
            }
            InputEvent::Submit if !self.form.on_last_field() => {
                self.form.focus_next();
                true
            }
            InputEvent::Submit | InputEvent::Click(FORM_SUBMIT) => {
                if let Some(user) = self.form.submit(&self.accounts, now_ms()) {
                    log::info!("{} is playing", user.name);
                    self.overlay = Some(Overlay::Profile);
                }
                true
            }
            InputEvent::Click(FORM_SWITCH) => {
                self.form.switch_mode();
                true
            }
            InputEvent::Click(id) if (FORM_FIELD_BASE..FORM_FIELD_BASE + 4).contains(id) => {
                self.form.focus_field((id - FORM_FIELD_BASE) as usize)
            }
            InputEvent::Click(_) => false,
        }
    }

    fn handle_popup(&mut self, event: &InputEvent) -> bool {
        let redirect = matches!(self.engine.popup(), Some(Popup::UnlockRequired { .. }));
        match event {
            InputEvent::Key('p') | InputEvent::Click(POPUP_PLAY) if redirect => {
                self.engine.accept_redirect()
            }
            InputEvent::Key('c') | InputEvent::Back | InputEvent::Click(POPUP_CLOSE) => {
                self.engine.dismiss_popup()
            }
            _ => false,
        }
    }

    fn handle_key(&mut self, key: char) -> bool {
        match self.engine.phase() {
            Phase::LevelSelect => match key {
                's' => {
                    let level = self.engine.progress().current_level();
                    self.start(level)
                }
                '<' | ',' => self.turn_page(false),
                '>' | '.' => self.turn_page(true),
                'p' => {
                    self.overlay = Some(Overlay::Profile);
                    true
                }
                't' => {
                    self.overlay = Some(Overlay::Leaderboard);
                    true
                }
                _ => false,
            },
            Phase::InRound(_) => match key {
                '1'..='4' => self.engine.answer((key as u8 - b'1') as usize).is_some(),
                'q' => self.engine.leave_round(),
                _ => false,
            },
            Phase::Resolved(_) => match key {
                'n' => self.engine.next_level(),
                'r' => self.engine.retry(),
                'b' | 'q' => self.engine.continue_to_levels(),
                _ => false,
            },
        }
    }

    fn handle_click(&mut self, action_id: u16) -> bool {
        match self.engine.phase() {
            Phase::LevelSelect => match action_id {
                PREV_GROUP => self.turn_page(false),
                NEXT_GROUP => self.turn_page(true),
                PLAY_CURRENT => self.handle_key('s'),
                OPEN_PROFILE => self.handle_key('p'),
                OPEN_LEADERBOARD => self.handle_key('t'),
                id if (GROUP_TAB_BASE..GROUP_TAB_BASE + GROUP_TAB_WINDOW as u16).contains(&id) => {
                    let group = self.tab_window_start() + (id - GROUP_TAB_BASE) as u32;
                    if group < self.engine.config().group_count() {
                        self.page = group;
                    }
                    true
                }
                id => {
                    let first = *self.page_levels().start();
                    match level_from_action(id, first) {
                        Some(level) if level <= *self.page_levels().end() => self.start(level),
                        _ => false,
                    }
                }
            },
            Phase::InRound(_) => match action_id {
                id if (ANSWER_BASE..ANSWER_BASE + 4).contains(&id) => self
                    .engine
                    .answer((id - ANSWER_BASE) as usize)
                    .is_some(),
                LEAVE_ROUND => self.engine.leave_round(),
                _ => false,
            },
            Phase::Resolved(_) => match action_id {
                NEXT_LEVEL => self.engine.next_level(),
                RETRY => self.engine.retry(),
                BACK_TO_LEVELS => self.engine.continue_to_levels(),
                _ => false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::state::ProgressState;
    use crate::store::MemoryStore;
    use rand::SeedableRng;

    fn game_at(max: Level) -> QuizGame {
        let store: Rc<dyn KeyValueStore> = Rc::new(MemoryStore::new());
        save::save_progress(
            store.as_ref(),
            &ProgressState {
                current_level: max,
                max_unlocked_level: max,
            },
        )
        .unwrap();
        QuizGame::new(QuizConfig::default(), store, StdRng::seed_from_u64(9))
    }

    fn correct_key(game: &QuizGame) -> char {
        match game.engine.phase() {
            Phase::InRound(round) => (b'1' + round.question.correct_index as u8) as char,
            other => panic!("expected a round, got {}", other.name()),
        }
    }

    #[test]
    fn opens_on_page_of_current_level() {
        let game = game_at(250);
        assert_eq!(game.page, 2);
        assert_eq!(game.page_levels(), 201..=300);
    }

    #[test]
    fn play_and_win_with_keys() {
        let mut game = game_at(1);
        assert!(game.handle_input(&InputEvent::Key('s')));
        let key = correct_key(&game);
        assert!(game.handle_input(&InputEvent::Key(key)));
        assert!(matches!(game.engine.phase(), Phase::Resolved(_)));
        assert!(game.handle_input(&InputEvent::Key('n')));
        match game.engine.phase() {
            Phase::InRound(round) => assert_eq!(round.question.level, 2),
            other => panic!("expected a round, got {}", other.name()),
        }
    }

    #[test]
    fn level_click_maps_through_page() {
        let mut game = game_at(150);
        assert_eq!(game.page, 1);
        assert!(game.handle_input(&InputEvent::Click(LEVEL_BASE + 4)));
        match game.engine.phase() {
            Phase::InRound(round) => assert_eq!(round.question.level, 105),
            other => panic!("expected a round, got {}", other.name()),
        }
    }

    #[test]
    fn locked_click_opens_popup_then_redirects() {
        let mut game = game_at(3);
        assert!(game.handle_input(&InputEvent::Click(LEVEL_BASE + 9)));
        assert!(matches!(
            game.engine.popup(),
            Some(Popup::UnlockRequired {
                requested: 10,
                playable: 3
            })
        ));
        // grid clicks are blocked while the popup is up
        assert!(!game.handle_input(&InputEvent::Click(LEVEL_BASE)));
        assert!(game.handle_input(&InputEvent::Click(POPUP_PLAY)));
        match game.engine.phase() {
            Phase::InRound(round) => assert_eq!(round.question.level, 3),
            other => panic!("expected a round, got {}", other.name()),
        }
    }

    #[test]
    fn timeout_popup_closes() {
        let mut game = game_at(1);
        game.handle_input(&InputEvent::Key('s'));
        game.tick(300);
        assert!(matches!(game.engine.popup(), Some(Popup::TimeUp { .. })));
        assert!(!game.handle_input(&InputEvent::Key('p')));
        assert!(game.handle_input(&InputEvent::Back));
        assert!(game.engine.popup().is_none());
    }

    #[test]
    fn paging_is_clamped() {
        let mut game = game_at(1);
        assert!(!game.handle_input(&InputEvent::Key('<')));
        for _ in 0..20 {
            game.handle_input(&InputEvent::Key('>'));
        }
        assert_eq!(game.page, 9);
        assert_eq!(game.page_levels(), 901..=1000);
    }

    #[test]
    fn group_tabs_follow_window() {
        let mut game = game_at(1);
        game.page = 8;
        // window of five ending at the last group
        assert_eq!(game.tab_window_start(), 5);
        assert!(game.handle_input(&InputEvent::Click(GROUP_TAB_BASE)));
        assert_eq!(game.page, 5);
    }

    #[test]
    fn leaving_returns_to_page_of_level() {
        let mut game = game_at(120);
        game.handle_input(&InputEvent::Key('s'));
        game.page = 0;
        assert!(game.handle_input(&InputEvent::Back));
        assert!(matches!(game.engine.phase(), Phase::LevelSelect));
        assert_eq!(game.page, 1);
    }

    #[test]
    fn leaderboard_overlay_periods() {
        let mut game = game_at(1);
        assert!(game.handle_input(&InputEvent::Click(OPEN_LEADERBOARD)));
        assert_eq!(game.overlay, Some(Overlay::Leaderboard));
        assert!(game.handle_input(&InputEvent::Key('w')));
        assert_eq!(game.period, Period::Weekly);
        assert!(game.handle_input(&InputEvent::Click(PERIOD_TAB_BASE + 2)));
        assert_eq!(game.period, Period::AllTime);
        assert!(game.handle_input(&InputEvent::Click(CLOSE_OVERLAY)));
        assert_eq!(game.overlay, None);
    }

    #[test]
    fn profile_overlay_swallows_round_keys() {
        let mut game = game_at(1);
        game.handle_input(&InputEvent::Key('p'));
        assert!(!game.handle_input(&InputEvent::Key('s')));
        assert!(matches!(game.engine.phase(), Phase::LevelSelect));
    }

    #[test]
    fn sign_out_from_profile() {
        let mut game = game_at(1);
        game.accounts
            .sign_up("Asha Rao", "asha@example.com", "pw", "pw", 0.0)
            .unwrap();
        game.handle_input(&InputEvent::Key('p'));
        assert!(game.handle_input(&InputEvent::Click(SIGN_OUT)));
        assert!(game.accounts.current_user().is_none());
        assert!(!game.handle_input(&InputEvent::Key('o')));
    }

    fn type_text(game: &mut QuizGame, text: &str) {
        for c in text.chars() {
            game.handle_input(&InputEvent::Key(c));
        }
    }

    #[test]
    fn sign_up_from_profile_with_keyboard() {
        let mut game = game_at(1);
        game.handle_input(&InputEvent::Key('p'));
        assert!(game.handle_input(&InputEvent::Key('U')));
        assert_eq!(game.overlay, Some(Overlay::Account));
        assert_eq!(game.form.mode, FormMode::SignUp);
        for field in ["Asha Rao", "asha@example.com", "Secret", "Secret"] {
            type_text(&mut game, field);
            game.handle_input(&InputEvent::Submit);
        }
        assert_eq!(game.overlay, Some(Overlay::Profile));
        assert_eq!(
            game.accounts.current_user().map(|u| u.name),
            Some("Asha Rao".to_string())
        );
        // already signed in: no second form
        assert!(!game.handle_input(&InputEvent::Key('i')));
    }

    #[test]
    fn signed_in_win_lands_in_player_stats() {
        let mut game = game_at(1);
        game.accounts
            .sign_up("Asha", "asha@example.com", "pw", "pw", 0.0)
            .unwrap();
        game.accounts.log_out();

        game.handle_input(&InputEvent::Click(OPEN_PROFILE));
        assert!(game.handle_input(&InputEvent::Click(SIGN_IN)));
        assert!(game.handle_input(&InputEvent::Click(FORM_FIELD_BASE)));
        type_text(&mut game, "asha@example.com");
        assert!(game.handle_input(&InputEvent::Click(FORM_FIELD_BASE + 1)));
        type_text(&mut game, "pw");
        assert!(game.handle_input(&InputEvent::Click(FORM_SUBMIT)));
        assert_eq!(game.overlay, Some(Overlay::Profile));
        game.handle_input(&InputEvent::Back);
        assert_eq!(game.overlay, None);

        game.handle_input(&InputEvent::Key('s'));
        let key = correct_key(&game);
        game.handle_input(&InputEvent::Key(key));

        let user = game.accounts.current_user().unwrap();
        assert_eq!(user.stats.total_games, 1);
        assert_eq!(user.stats.games_won, 1);
        assert_eq!(game.accounts.players_by_activity()[0].stats.total_games, 1);
    }

    #[test]
    fn rejected_sign_in_keeps_form_open() {
        let mut game = game_at(1);
        game.handle_input(&InputEvent::Key('p'));
        game.handle_input(&InputEvent::Key('i'));
        type_text(&mut game, "nobody@example.com");
        game.handle_input(&InputEvent::NextField);
        type_text(&mut game, "pw");
        assert!(game.handle_input(&InputEvent::Submit));
        assert_eq!(game.overlay, Some(Overlay::Account));
        assert_eq!(game.form.error.as_deref(), Some("Invalid email or password"));

        assert!(game.handle_input(&InputEvent::Erase));
        assert_eq!(game.form.shown_value(1), "*");
        assert!(game.handle_input(&InputEvent::Click(FORM_SWITCH)));
        assert_eq!(game.form.mode, FormMode::SignUp);
        assert!(game.handle_input(&InputEvent::Back));
        assert_eq!(game.overlay, Some(Overlay::Profile));
    }

    #[test]
    fn backspace_leaves_round_outside_forms() {
        let mut game = game_at(1);
        game.handle_input(&InputEvent::Key('S'));
        assert!(matches!(game.engine.phase(), Phase::InRound(_)));
        assert!(game.handle_input(&InputEvent::Erase));
        assert!(matches!(game.engine.phase(), Phase::LevelSelect));
    }

    #[test]
    fn wins_reach_feed() {
        let mut game = game_at(1);
        game.handle_input(&InputEvent::Key('s'));
        let key = correct_key(&game);
        game.handle_input(&InputEvent::Key(key));
        let feed = game.feed.borrow();
        assert!(feed.entries.iter().any(|e| e.text.starts_with("Level 1 cleared!")));
        assert_eq!(feed.max_unlocked_level, 2);
    }
}
