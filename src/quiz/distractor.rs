//! Wrong-answer synthesis.
//!
//! Distractors imitate the mistakes a player actually makes: small slips for
//! addition and subtraction, off-by-a-few and "added ten" errors for
//! multiplication. Every distractor is non-negative and textually distinct
//! from the correct answer and from the other distractors.

use rand::Rng;

use super::state::Operator;

/// Attempts per slot before falling back to a deterministic pick.
pub const MAX_ATTEMPTS_PER_SLOT: u32 = 64;

/// Three distinct wrong answers for `correct`.
pub fn synthesize<R: Rng + ?Sized>(correct: u64, operator: Operator, rng: &mut R) -> [String; 3] {
    let mut taken: Vec<String> = vec![correct.to_string()];

    for _ in 0..3 {
        let pick = (0..MAX_ATTEMPTS_PER_SLOT)
            .map(|_| candidate(correct, operator, rng).to_string())
            .find(|text| !taken.contains(text))
            .unwrap_or_else(|| {
                log::debug!("distractor retries exhausted for {correct}; using fallback");
                fallback(correct, &taken)
            });
        taken.push(pick);
    }

    [taken[1].clone(), taken[2].clone(), taken[3].clone()]
}

/// One raw candidate; may collide with answers already taken.
fn candidate<R: Rng + ?Sized>(correct: u64, operator: Operator, rng: &mut R) -> u64 {
    let correct = correct as i64;
    let wrong = match operator {
        Operator::Multiply => match rng.gen_range(0..4) {
            0 => correct + rng.gen_range(1..=5),
            1 => correct - rng.gen_range(1..=5),
            2 => correct + 10,
            _ => correct * 3 / 2,
        },
        Operator::Add | Operator::Subtract => {
            let range = (correct / 5).max(5);
            let offset = rng.gen_range(0..range);
            if rng.gen_bool(0.5) {
                correct + offset
            } else {
                correct - offset
            }
        }
    };
    wrong.unsigned_abs()
}

/// First of `correct + 1, correct + 2, ...` not already taken.
fn fallback(correct: u64, taken: &[String]) -> String {
    (1..)
        .map(|step| (correct + step).to_string())
        .find(|text| !taken.contains(text))
        .unwrap_or_default()
}
