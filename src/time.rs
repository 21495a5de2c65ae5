//! Fixed-step clock and wall-clock timestamps.
//!
//! The browser calls the draw closure at display rate with a variable delta.
//! [`TickClock`] folds those deltas into whole ticks so the round countdown
//! advances in deterministic steps that tests can drive directly.
//!
//! Frame gaps are not capped: a hidden tab gets no frames, and the first frame
//! after it returns must charge the whole absence to the running round.

/// Milliseconds in a day, for leaderboard windows.
pub const MS_PER_DAY: f64 = 86_400_000.0;

pub struct TickClock {
    ms_per_tick: f64,
    /// Milliseconds received but not yet converted to ticks.
    pending_ms: f64,
    pub total_ticks: u64,
    last_frame_ms: Option<f64>,
}

impl TickClock {
    pub fn new(ticks_per_second: u32) -> Self {
        Self {
            ms_per_tick: 1000.0 / ticks_per_second.max(1) as f64,
            pending_ms: 0.0,
            total_ticks: 0,
            last_frame_ms: None,
        }
    }

    /// Feed a frame timestamp (`performance.now()`); returns the ticks to run this frame.
    pub fn advance_to(&mut self, now_ms: f64) -> u32 {
        let gap = self
            .last_frame_ms
            .map(|prev| (now_ms - prev).max(0.0))
            .unwrap_or(0.0);
        self.last_frame_ms = Some(now_ms);

        self.pending_ms += gap;
        let ticks = (self.pending_ms / self.ms_per_tick) as u32;
        self.pending_ms -= ticks as f64 * self.ms_per_tick;
        self.total_ticks += ticks as u64;
        ticks
    }
}

/// Milliseconds since the Unix epoch.
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Milliseconds since the Unix epoch.
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}
