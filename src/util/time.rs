//! Time utilities for the frame loop

use std::time::Duration;

use tokio::time::Instant;

/// Target frame rate of the frame clock
pub const FRAME_TPS: u32 = 60;

/// Milliseconds elapsed between `origin` and `at` (zero if `at` is earlier)
pub fn millis_between(origin: Instant, at: Instant) -> f64 {
    at.saturating_duration_since(origin).as_secs_f64() * 1000.0
}

/// Period of one tick at the given frame rate
pub fn frame_period(frames_per_second: u32) -> Duration {
    Duration::from_micros(1_000_000 / frames_per_second.max(1) as u64)
}

/// A simple timer for measuring durations
#[derive(Debug, Clone)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_micros(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }

    pub fn reset(&mut self) {
        self.start = Instant::now();
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
