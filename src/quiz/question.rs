//! Procedural question generation: pure functions over a caller-supplied rng.
//!
//! Difficulty scales with the level:
//!
//! | Levels | Operators |
//! |---|---|
//! | 1-20 | `+` `-` |
//! | 21-50 | `+` `-` `×` |
//! | 51+ | `+` `-` `×` `×` (multiplication twice as likely) |
//!
//! Operands are drawn from `[max(1, 2L), min(10L, 10000)]`; multiplication
//! keeps the first factor at most 20 and the second in `1..=12`.

use rand::seq::SliceRandom;
use rand::Rng;

use super::distractor;
use super::state::{Level, Operator, Question};

/// Upper cap for addition/subtraction operands.
pub const OPERAND_CAP: u64 = 10_000;
/// Upper cap for the first multiplication factor.
pub const FACTOR_CAP: u64 = 20;
/// Largest second multiplication factor.
pub const MULTIPLIER_MAX: u64 = 12;

const EARLY: &[Operator] = &[Operator::Add, Operator::Subtract];
const MIDDLE: &[Operator] = &[Operator::Add, Operator::Subtract, Operator::Multiply];
const LATE: &[Operator] = &[
    Operator::Add,
    Operator::Subtract,
    Operator::Multiply,
    Operator::Multiply,
];

/// Operators a level may draw from, with repetition as weighting.
pub fn operators_for(level: Level) -> &'static [Operator] {
    match level {
        0..=20 => EARLY,
        21..=50 => MIDDLE,
        _ => LATE,
    }
}

/// `(min, max)` operand bounds for a level, before any clamping.
pub fn operand_bounds(level: Level) -> (u64, u64) {
    let level = level as u64;
    let max = (level * 10).min(OPERAND_CAP);
    let min = (level * 2).max(1);
    (min, max)
}

/// Uniform draw from `[low, high]`; a collapsed range (`low > high`) is
/// clamped down to `high`.
fn sample<R: Rng + ?Sized>(rng: &mut R, low: u64, high: u64) -> u64 {
    let low = low.min(high);
    rng.gen_range(low..=high)
}

/// Build a question for `level`. Level 0 is treated as level 1.
pub fn generate<R: Rng + ?Sized>(level: Level, rng: &mut R) -> Question {
    let level = level.max(1);
    let (min, max) = operand_bounds(level);
    let operator = *operators_for(level)
        .choose(rng)
        .unwrap_or(&Operator::Add);

    let (mut a, mut b) = match operator {
        Operator::Multiply => (
            sample(rng, min, max.min(FACTOR_CAP)),
            sample(rng, 1, MULTIPLIER_MAX),
        ),
        Operator::Add | Operator::Subtract => (sample(rng, min, max), sample(rng, min, max)),
    };
    if operator == Operator::Subtract && a < b {
        std::mem::swap(&mut a, &mut b);
    }

    let answer = operator.apply(a, b);
    let prompt = format!("{} {} {} = ?", a, operator.symbol(), b);

    let [w1, w2, w3] = distractor::synthesize(answer, operator, rng);
    let mut options = [answer.to_string(), w1, w2, w3];
    options.shuffle(rng);
    let correct_text = answer.to_string();
    let correct_index = options
        .iter()
        .position(|o| *o == correct_text)
        .unwrap_or(0);

    log::debug!("level {level}: {prompt} (answer {answer})");

    Question {
        level,
        operator,
        operands: (a, b),
        answer,
        prompt,
        options,
        correct_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn operator_tiers() {
        assert_eq!(operators_for(1), EARLY);
        assert_eq!(operators_for(20), EARLY);
        assert_eq!(operators_for(21), MIDDLE);
        assert_eq!(operators_for(50), MIDDLE);
        assert_eq!(operators_for(51), LATE);
        assert_eq!(operators_for(1000), LATE);
    }

    #[test]
    fn late_tier_weights_multiplication_double() {
        let muls = LATE.iter().filter(|o| **o == Operator::Multiply).count();
        assert_eq!(muls, 2);
        assert_eq!(LATE.len(), 4);
    }

    #[test]
    fn bounds_scale_with_level() {
        assert_eq!(operand_bounds(1), (2, 10));
        assert_eq!(operand_bounds(10), (20, 100));
        assert_eq!(operand_bounds(1000), (2000, 10_000));
        // collapsed range at extreme levels
        assert_eq!(operand_bounds(6000), (12_000, 10_000));
    }

    #[test]
    fn sample_clamps_collapsed_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            assert_eq!(sample(&mut rng, 50, 20), 20);
        }
    }

    #[test]
    fn level_one_uses_small_numbers() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..100 {
            let q = generate(1, &mut rng);
            assert!(matches!(q.operator, Operator::Add | Operator::Subtract));
            let (a, b) = q.operands;
            assert!((2..=10).contains(&a) && (2..=10).contains(&b), "{}", q.prompt);
        }
    }

    #[test]
    fn prompt_format() {
        let mut rng = StdRng::seed_from_u64(4);
        let q = generate(30, &mut rng);
        let (a, b) = q.operands;
        assert_eq!(q.prompt, format!("{} {} {} = ?", a, q.operator.symbol(), b));
    }

    #[test]
    fn level_zero_behaves_like_level_one() {
        let mut rng = StdRng::seed_from_u64(8);
        let q = generate(0, &mut rng);
        assert_eq!(q.level, 1);
    }

    #[test]
    fn extreme_level_does_not_panic() {
        let mut rng = StdRng::seed_from_u64(8);
        for level in [5_000, 5_001, 100_000, u32::MAX] {
            let q = generate(level, &mut rng);
            assert_eq!(q.options[q.correct_index], q.answer.to_string());
        }
    }

    #[test]
    fn multiplication_appears_after_level_twenty() {
        let mut rng = StdRng::seed_from_u64(12);
        let any_mul = (0..200).any(|_| generate(60, &mut rng).operator == Operator::Multiply);
        assert!(any_mul);
    }
}
