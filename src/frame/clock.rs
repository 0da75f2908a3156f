//! Fixed-rate frame clock

use std::time::Duration;

use tokio::time::{interval, Instant, Interval, MissedTickBehavior};

use crate::util::time::{frame_period, millis_between};

/// One tick of the frame clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockTick {
    /// Tick sequence number, starting at 0
    pub index: u64,
    /// Milliseconds since the clock was created
    pub time: f64,
    /// Seconds since the previous tick (0 on the first tick)
    pub delta: f64,
    /// Instant the tick was observed; the frame boundary
    pub at: Instant,
}

/// Periodic tick source stamping each tick with time and delta.
///
/// Late ticks are delayed rather than skipped, and `delta` is measured from
/// the real tick instants, so a timer firing early or late shows up as a
/// variable delta instead of a lost tick.
pub struct FrameClock {
    interval: Interval,
    origin: Instant,
    previous: Option<f64>,
    next_index: u64,
}

impl FrameClock {
    /// Clock ticking at `frames_per_second`; the first tick is immediate
    pub fn new(frames_per_second: u32) -> Self {
        Self::with_period(frame_period(frames_per_second))
    }

    pub fn with_period(period: Duration) -> Self {
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            interval,
            origin: Instant::now(),
            previous: None,
            next_index: 0,
        }
    }

    /// Wait for the next tick
    pub async fn tick(&mut self) -> ClockTick {
        let scheduled = self.interval.tick().await;
        let at = scheduled.max(Instant::now());
        let time = millis_between(self.origin, at);
        let delta = match self.previous {
            Some(previous) => (time - previous) / 1000.0,
            None => 0.0,
        };
        self.previous = Some(time);

        let index = self.next_index;
        self.next_index += 1;

        ClockTick {
            index,
            time,
            delta,
            at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_tick_has_zero_delta() {
        let mut clock = FrameClock::new(60);
        let tick = clock.tick().await;
        assert_eq!(tick.index, 0);
        assert_eq!(tick.delta, 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_are_paced_and_ordered() {
        let mut clock = FrameClock::with_period(Duration::from_millis(20));
        let mut last = clock.tick().await;
        for expected in 1..10 {
            let tick = clock.tick().await;
            assert_eq!(tick.index, expected);
            assert!(tick.time > last.time);
            assert!((tick.delta - 0.020).abs() < 1e-9);
            assert!((tick.delta - (tick.time - last.time) / 1000.0).abs() < 1e-12);
            last = tick;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn late_tick_reports_real_delta_without_skipping() {
        let mut clock = FrameClock::with_period(Duration::from_millis(20));
        let first = clock.tick().await;

        // Simulate a slow frame: the loop comes back 50ms later
        tokio::time::advance(Duration::from_millis(50)).await;
        let late = clock.tick().await;
        assert_eq!(late.index, 1);
        assert!((late.delta - 0.050).abs() < 1e-9);
        // The boundary is when the tick was observed, not when it was due
        assert_eq!(late.at - first.at, Duration::from_millis(50));

        let next = clock.tick().await;
        assert_eq!(next.index, 2);
        assert!((next.delta - 0.020).abs() < 1e-9);
    }
}
