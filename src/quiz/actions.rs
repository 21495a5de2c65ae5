//! Semantic action IDs for quiz click targets.

use super::state::Level;

// ── Level grid ───────────────────────────────────────────────
pub const PREV_GROUP: u16 = 1;
pub const NEXT_GROUP: u16 = 2;
pub const OPEN_PROFILE: u16 = 3;
pub const OPEN_LEADERBOARD: u16 = 4;
pub const PLAY_CURRENT: u16 = 5;
pub const GROUP_TAB_BASE: u16 = 100; // +slot in the visible tab window
pub const LEVEL_BASE: u16 = 1_000; // +level offset within the visible page

// ── Round ────────────────────────────────────────────────────
pub const ANSWER_BASE: u16 = 20; // +option index 0..3
pub const LEAVE_ROUND: u16 = 30;

// ── Resolution ───────────────────────────────────────────────
pub const NEXT_LEVEL: u16 = 40;
pub const RETRY: u16 = 41;
pub const BACK_TO_LEVELS: u16 = 42;

// ── Popups ───────────────────────────────────────────────────
pub const POPUP_PLAY: u16 = 50;
pub const POPUP_CLOSE: u16 = 51;

// ── Overlays ─────────────────────────────────────────────────
pub const CLOSE_OVERLAY: u16 = 60;
pub const SIGN_OUT: u16 = 61;
pub const SIGN_IN: u16 = 62;
pub const SIGN_UP: u16 = 63;
pub const FORM_SUBMIT: u16 = 64;
pub const FORM_SWITCH: u16 = 65;
pub const FORM_FIELD_BASE: u16 = 66; // +field index 0..3
pub const PERIOD_TAB_BASE: u16 = 70; // +period index 0..2

/// Action for the level button at `level`, given the first level on the page.
pub fn level_action(level: Level, first_on_page: Level) -> u16 {
    LEVEL_BASE + (level - first_on_page) as u16
}

/// Inverse of [`level_action`].
pub fn level_from_action(action_id: u16, first_on_page: Level) -> Option<Level> {
    action_id
        .checked_sub(LEVEL_BASE)
        .map(|offset| first_on_page + offset as Level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_actions_roundtrip_on_a_page() {
        assert_eq!(level_action(101, 101), LEVEL_BASE);
        assert_eq!(level_action(200, 101), LEVEL_BASE + 99);
        assert_eq!(level_from_action(LEVEL_BASE + 99, 101), Some(200));
        assert_eq!(level_from_action(NEXT_LEVEL, 101), None);
    }

    #[test]
    fn ranges_do_not_overlap() {
        assert!(ANSWER_BASE + 3 < LEAVE_ROUND);
        assert!(PERIOD_TAB_BASE + 2 < GROUP_TAB_BASE);
        assert!(SIGN_OUT < SIGN_IN);
        assert!(FORM_FIELD_BASE + 3 < PERIOD_TAB_BASE);
        assert!(GROUP_TAB_BASE + 100 <= LEVEL_BASE);
        // a full 1000-level page still fits in u16
        assert!(LEVEL_BASE.checked_add(999).is_some());
    }
}
