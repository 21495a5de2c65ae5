//! Player statistics, match history and the per-device summary.
//!
//! [`StatsRecorder`] is the production [`ResultSink`]: every resolved round
//! lands in the device summary, the signed-in player's stats (if any) and, for
//! won rounds, the local leaderboard.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::config::QuizConfig;
use crate::error::QuizError;
use crate::store::{read_json_or_discard, write_json, KeyValueStore};

use super::leaderboard::{Leaderboard, LeaderboardEntry, GUEST_NAME};
use super::accounts::Accounts;
use super::save::GAME_STATS_KEY;
use super::sinks::ResultSink;
use super::state::{Level, RoundResult};

/// One line of match history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub level: Level,
    pub won: bool,
    pub score: u32,
    pub winnings: u64,
    pub time_left_seconds: u32,
    pub timestamp_ms: f64,
}

impl From<&RoundResult> for MatchRecord {
    fn from(r: &RoundResult) -> Self {
        Self {
            level: r.level,
            won: r.won,
            score: r.score,
            winnings: r.winnings,
            time_left_seconds: r.time_left_seconds,
            timestamp_ms: r.timestamp_ms,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserStats {
    pub total_games: u32,
    pub games_won: u32,
    pub total_score: u64,
    pub highest_level: Level,
    pub total_winnings: u64,
    pub current_streak: u32,
    pub best_streak: u32,
    /// Newest first.
    pub match_history: Vec<MatchRecord>,
}

impl UserStats {
    pub fn record(&mut self, result: &RoundResult, history_limit: usize) {
        self.total_games += 1;
        self.total_score += result.score as u64;
        self.total_winnings += result.winnings;
        if result.won {
            self.games_won += 1;
            self.highest_level = self.highest_level.max(result.level);
            self.current_streak += 1;
            self.best_streak = self.best_streak.max(self.current_streak);
        } else {
            self.current_streak = 0;
        }
        self.match_history.insert(0, MatchRecord::from(result));
        self.match_history.truncate(history_limit);
    }

    /// Profile progress bar: one percent per game played, capped at 100.
    pub fn progress_rate(&self) -> u32 {
        self.total_games.min(100)
    }

    pub fn win_rate(&self) -> u32 {
        if self.total_games == 0 {
            0
        } else {
            self.games_won * 100 / self.total_games
        }
    }
}

/// Device-wide totals, independent of who is signed in.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameStatsSummary {
    pub games_played: u32,
    pub correct_answers: u32,
    pub total_winnings: u64,
    pub recent_games: Vec<MatchRecord>,
}

impl GameStatsSummary {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        read_json_or_discard(store, GAME_STATS_KEY).unwrap_or_default()
    }

    pub fn record(&mut self, result: &RoundResult, recent_limit: usize) {
        self.games_played += 1;
        self.correct_answers += result.score;
        self.total_winnings += result.winnings;
        self.recent_games.insert(0, MatchRecord::from(result));
        self.recent_games.truncate(recent_limit);
    }
}

pub struct StatsRecorder {
    store: Rc<dyn KeyValueStore>,
    history_limit: usize,
    recent_limit: usize,
    leaderboard_limit: usize,
}

impl StatsRecorder {
    pub fn new(store: Rc<dyn KeyValueStore>, config: &QuizConfig) -> Self {
        Self {
            store,
            history_limit: config.match_history_limit,
            recent_limit: config.recent_games_limit,
            leaderboard_limit: config.leaderboard_limit,
        }
    }

    fn record_summary(&self, result: &RoundResult) {
        let store = self.store.as_ref();
        let mut summary = GameStatsSummary::load(store);
        summary.record(result, self.recent_limit);
        if let Err(e) = write_json(store, GAME_STATS_KEY, &summary) {
            log::warn!("could not save game summary: {e}");
        }
    }

    fn record_leaderboard(&self, result: &RoundResult, user_id: &str, name: &str) {
        let store = self.store.as_ref();
        let mut board = Leaderboard::load(store, self.leaderboard_limit);
        board.add_entry(
            LeaderboardEntry {
                user_id: user_id.to_string(),
                name: name.to_string(),
                level: result.level,
                score: result.score,
                winnings: result.winnings,
                timestamp_ms: result.timestamp_ms,
            },
            result.timestamp_ms,
        );
        if let Err(e) = board.save(store) {
            log::warn!("could not save leaderboard: {e}");
        }
    }
}

impl ResultSink for StatsRecorder {
    fn record_result(&mut self, result: &RoundResult) {
        self.record_summary(result);

        let accounts = Accounts::new(Rc::clone(&self.store));
        let history_limit = self.history_limit;
        let player = match accounts.update_current(|user| user.stats.record(result, history_limit)) {
            Ok(user) => Some(user),
            Err(QuizError::NotLoggedIn) => None,
            Err(e) => {
                log::warn!("could not save player stats: {e}");
                accounts.current_user()
            }
        };

        if result.won {
            match &player {
                Some(user) => self.record_leaderboard(result, &user.email, &user.name),
                None => self.record_leaderboard(result, "", GUEST_NAME),
            }
        }
    }
}
