use std::time::{Duration, Instant};

/// Longest frame delta handed to animation; longer stalls (window drags,
/// breakpoints) are clamped so clips do not jump.
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

/// Frame clock driving animation `dt` and the blend cooldown.
pub struct Timer {
    start_time: Instant,
    last_update: Instant,
    /// Time since last tick, clamped to [`MAX_FRAME_DELTA`]
    pub delta: Duration,
    /// Total elapsed time since creation
    pub elapsed: Duration,
    /// Total number of ticks
    pub frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    #[must_use]
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_update: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Samples the wall clock. Called once per rendered frame.
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.delta = (now - self.last_update).min(MAX_FRAME_DELTA);
        self.elapsed = now - self.start_time;
        self.last_update = now;
        self.frame_count += 1;
    }

    #[must_use]
    pub fn dt_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}
