//! Winnings formula and currency display.
//!
//! `base = level × 10`, then ×1.5 above level 50 and a further ×2 above level
//! 100 (the two bonuses stack, so level 101+ earns ×3). Each correct answer in
//! the session adds 5 and each second left on the clock adds 2.

use super::state::Level;

pub const BASE_PER_LEVEL: f64 = 10.0;
pub const SCORE_BONUS: f64 = 5.0;
pub const TIME_BONUS: f64 = 2.0;

/// Level above which the first multiplier applies.
pub const VETERAN_LEVEL: Level = 50;
pub const VETERAN_MULTIPLIER: f64 = 1.5;
/// Level above which the second multiplier applies.
pub const MASTER_LEVEL: Level = 100;
pub const MASTER_MULTIPLIER: f64 = 2.0;

pub const CURRENCY: &str = "₹";

pub fn compute_winnings(level: Level, session_score: u32, time_left_seconds: u32) -> u64 {
    let mut base = level as f64 * BASE_PER_LEVEL;
    if level > VETERAN_LEVEL {
        base *= VETERAN_MULTIPLIER;
    }
    if level > MASTER_LEVEL {
        base *= MASTER_MULTIPLIER;
    }
    let score_bonus = session_score as f64 * SCORE_BONUS;
    let time_bonus = time_left_seconds as f64 * TIME_BONUS;
    (base + score_bonus + time_bonus).round() as u64
}

/// `1234567` → `"₹1,234,567"`.
pub fn format_winnings(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{CURRENCY}{grouped}")
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_more_time_never_pays_less(level in 1u32..2_000, score in 0u32..500, t in 0u32..30) {
            prop_assert!(compute_winnings(level, score, t + 1) > compute_winnings(level, score, t));
        }

        #[test]
        fn prop_higher_level_never_pays_less(level in 1u32..2_000, score in 0u32..500, t in 0u32..=30) {
            prop_assert!(compute_winnings(level + 1, score, t) > compute_winnings(level, score, t));
        }

        #[test]
        fn prop_format_strips_back_to_number(amount in 0u64..10_000_000_000) {
            let s = format_winnings(amount);
            let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
            prop_assert_eq!(digits, amount.to_string());
        }
    }
}
