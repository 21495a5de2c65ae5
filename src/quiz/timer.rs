//! Per-round countdown driven by fixed game ticks.
//!
//! The timer has no callback of its own: the engine stores it inside
//! `Phase::InRound`, so leaving that phase for any reason drops it.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundTimer {
    remaining_seconds: u32,
    total_seconds: u32,
    ticks_per_second: u32,
    /// Ticks accumulated toward the next whole second.
    sub_ticks: u32,
}

/// What a call to [`RoundTimer::advance`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerStep {
    /// Whole seconds that elapsed during this advance.
    pub seconds_elapsed: u32,
    /// The countdown reached zero during this advance.
    pub expired: bool,
}

impl RoundTimer {
    pub fn start(seconds: u32, ticks_per_second: u32) -> Self {
        Self {
            remaining_seconds: seconds,
            total_seconds: seconds,
            ticks_per_second: ticks_per_second.max(1),
            sub_ticks: 0,
        }
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_seconds == 0
    }

    /// Share of the round still left, in `0.0..=1.0`.
    pub fn fraction_left(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        let per_second = self.ticks_per_second as f64;
        let ticks_total = self.total_seconds as f64 * per_second;
        let ticks_left = self.remaining_seconds as f64 * per_second - self.sub_ticks as f64;
        (ticks_left / ticks_total).clamp(0.0, 1.0)
    }

    pub fn advance(&mut self, delta_ticks: u32) -> TimerStep {
        if self.is_expired() {
            return TimerStep {
                seconds_elapsed: 0,
                expired: false,
            };
        }

        self.sub_ticks = self.sub_ticks.saturating_add(delta_ticks);
        let whole = (self.sub_ticks / self.ticks_per_second).min(self.remaining_seconds);
        self.sub_ticks -= whole * self.ticks_per_second;
        self.remaining_seconds -= whole;
        if self.remaining_seconds == 0 {
            self.sub_ticks = 0;
        }

        TimerStep {
            seconds_elapsed: whole,
            expired: whole > 0 && self.remaining_seconds == 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_once_per_second() {
        let mut t = RoundTimer::start(30, 10);
        let step = t.advance(9);
        assert_eq!(step.seconds_elapsed, 0);
        assert_eq!(t.remaining_seconds(), 30);
        let step = t.advance(1);
        assert_eq!(step.seconds_elapsed, 1);
        assert_eq!(t.remaining_seconds(), 29);
    }

    #[test]
    fn expires_exactly_once() {
        let mut t = RoundTimer::start(3, 10);
        assert!(!t.advance(29).expired);
        let step = t.advance(1);
        assert!(step.expired);
        assert!(t.is_expired());
        // further ticks neither re-expire nor underflow
        let step = t.advance(100);
        assert!(!step.expired);
        assert_eq!(step.seconds_elapsed, 0);
        assert_eq!(t.remaining_seconds(), 0);
    }

    #[test]
    fn large_delta_stops_at_zero() {
        let mut t = RoundTimer::start(2, 10);
        let step = t.advance(1000);
        assert_eq!(step.seconds_elapsed, 2);
        assert!(step.expired);
    }

    #[test]
    fn fraction_left_shrinks() {
        let mut t = RoundTimer::start(10, 10);
        assert!((t.fraction_left() - 1.0).abs() < 1e-9);
        t.advance(50);
        assert!((t.fraction_left() - 0.5).abs() < 1e-9);
        t.advance(5);
        assert!((t.fraction_left() - 0.45).abs() < 1e-9);
        t.advance(45);
        assert_eq!(t.fraction_left(), 0.0);
    }

    #[test]
    fn huge_rounds_do_not_overflow() {
        let mut t = RoundTimer::start(500_000_000, 1_000);
        assert!((t.fraction_left() - 1.0).abs() < 1e-9);
        t.advance(u32::MAX);
        t.advance(u32::MAX);
        assert!(t.fraction_left() < 1.0);
        assert!(!t.is_expired());
    }

    #[test]
    fn zero_tick_rate_is_treated_as_one() {
        let mut t = RoundTimer::start(2, 0);
        assert_eq!(t.advance(1).seconds_elapsed, 1);
    }
}
