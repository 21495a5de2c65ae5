//! Local mirror of the leaderboard.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::{read_json_or_discard, write_json, KeyValueStore};
use crate::time::MS_PER_DAY;

use super::save::LEADERBOARD_KEY;
use super::state::Level;

/// Name shown for rounds won while nobody is signed in.
pub const GUEST_NAME: &str = "Anonymous";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// Account email; empty for guests.
    pub user_id: String,
    pub name: String,
    pub level: Level,
    pub score: u32,
    pub winnings: u64,
    pub timestamp_ms: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Period {
    Daily,
    Weekly,
    AllTime,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::Daily, Period::Weekly, Period::AllTime];

    pub fn label(&self) -> &'static str {
        match self {
            Period::Daily => "Daily",
            Period::Weekly => "Weekly",
            Period::AllTime => "All time",
        }
    }

    /// Whether an entry made at `t` counts for this period as of `now`.
    pub fn contains(&self, t: f64, now: f64) -> bool {
        match self {
            Period::Daily => (t / MS_PER_DAY).floor() == (now / MS_PER_DAY).floor(),
            Period::Weekly => ((now - t).abs() / MS_PER_DAY).ceil() <= 7.0,
            Period::AllTime => true,
        }
    }
}

/// Score descending, then winnings descending, then earliest first.
fn rank(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.score
        .cmp(&a.score)
        .then(b.winnings.cmp(&a.winnings))
        .then(a.timestamp_ms.total_cmp(&b.timestamp_ms))
}

#[derive(Clone, Debug)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
    limit: usize,
}

impl Leaderboard {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit: limit.max(1),
        }
    }

    pub fn load(store: &dyn KeyValueStore, limit: usize) -> Self {
        let mut board = Self::new(limit);
        board.entries = read_json_or_discard(store, LEADERBOARD_KEY).unwrap_or_default();
        board.entries.sort_by(rank);
        board
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        write_json(store, LEADERBOARD_KEY, &self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Insert an entry, then drop entries that are outside the weekly window
    /// and no longer among the best `limit` of all time.
    pub fn add_entry(&mut self, entry: LeaderboardEntry, now: f64) {
        self.entries.push(entry);
        self.entries.sort_by(rank);
        let limit = self.limit;
        let mut position = 0;
        self.entries.retain(|e| {
            let keep = position < limit || Period::Weekly.contains(e.timestamp_ms, now);
            position += 1;
            keep
        });
    }

    /// Best entries for `period`, at most `limit`.
    pub fn ranked(&self, period: Period, now: f64) -> Vec<&LeaderboardEntry> {
        self.entries
            .iter()
            .filter(|e| period.contains(e.timestamp_ms, now))
            .take(self.limit)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const NOW: f64 = 20_000.0 * MS_PER_DAY + 3_600_000.0;

    fn entry(name: &str, score: u32, winnings: u64, ts: f64) -> LeaderboardEntry {
        LeaderboardEntry {
            user_id: String::new(),
            name: name.into(),
            level: 1,
            score,
            winnings,
            timestamp_ms: ts,
        }
    }

    fn names(entries: &[&LeaderboardEntry]) -> Vec<String> {
        entries.iter().map(|e| e.name.clone()).collect()
    }

    #[test]
    fn ranked_by_score_then_winnings() {
        let mut board = Leaderboard::new(100);
        board.add_entry(entry("a", 2, 100, NOW), NOW);
        board.add_entry(entry("b", 3, 50, NOW), NOW);
        board.add_entry(entry("c", 2, 300, NOW), NOW);
        assert_eq!(names(&board.ranked(Period::AllTime, NOW)), ["b", "c", "a"]);
    }

    #[test]
    fn daily_is_same_utc_day() {
        let start_of_day = (NOW / MS_PER_DAY).floor() * MS_PER_DAY;
        assert!(Period::Daily.contains(start_of_day, NOW));
        assert!(!Period::Daily.contains(start_of_day - 1.0, NOW));
    }

    #[test]
    fn weekly_window_is_seven_days() {
        assert!(Period::Weekly.contains(NOW - 7.0 * MS_PER_DAY, NOW));
        assert!(!Period::Weekly.contains(NOW - 7.5 * MS_PER_DAY, NOW));
        assert!(Period::AllTime.contains(0.0, NOW));
    }

    #[test]
    fn periods_filter_entries() {
        let mut board = Leaderboard::new(100);
        board.add_entry(entry("today", 1, 10, NOW), NOW);
        board.add_entry(entry("three-days", 5, 10, NOW - 3.0 * MS_PER_DAY), NOW);
        board.add_entry(entry("old", 9, 10, NOW - 30.0 * MS_PER_DAY), NOW);

        assert_eq!(names(&board.ranked(Period::Daily, NOW)), ["today"]);
        assert_eq!(
            names(&board.ranked(Period::Weekly, NOW)),
            ["three-days", "today"]
        );
        assert_eq!(board.ranked(Period::AllTime, NOW).len(), 3);
    }

    #[test]
    fn old_entries_beyond_limit_are_pruned() {
        let mut board = Leaderboard::new(2);
        let old = NOW - 30.0 * MS_PER_DAY;
        board.add_entry(entry("old-high", 9, 0, old), NOW);
        board.add_entry(entry("old-mid", 5, 0, old), NOW);
        board.add_entry(entry("old-low", 1, 0, old), NOW);
        assert_eq!(board.len(), 2);

        // recent entries survive even when outranked
        board.add_entry(entry("new-low", 0, 0, NOW), NOW);
        assert_eq!(board.len(), 3);
        assert_eq!(names(&board.ranked(Period::Daily, NOW)), ["new-low"]);
        assert_eq!(board.ranked(Period::AllTime, NOW).len(), 2);
    }

    #[test]
    fn persists_through_store() {
        let store = MemoryStore::new();
        let mut board = Leaderboard::new(100);
        board.add_entry(entry("a", 1, 1, NOW), NOW);
        board.save(&store).unwrap();

        let loaded = Leaderboard::load(&store, 100);
        assert_eq!(loaded.len(), 1);
    }
}
