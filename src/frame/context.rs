//! Per-tick frame context and the clock-driven sampler that builds it

use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::Instant;
use tracing::debug;

use crate::input::HeldKeys;

use super::clock::FrameClock;

/// Everything the state machine needs to know about one tick
#[derive(Debug, Clone, PartialEq)]
pub struct FrameContext {
    /// Tick sequence number
    pub tick: u64,
    /// Milliseconds since the frame clock started
    pub time: f64,
    /// Seconds since the previous tick
    pub delta: f64,
    /// Held direction keys at the moment of the tick
    pub held_keys: HeldKeys,
    /// A resize happened since the previous tick
    pub needs_resize: bool,
    /// Instant of the tick; projectiles spawned after it belong to the next frame
    pub boundary: Instant,
}

/// Edge-triggered "the host surface changed size" flag.
///
/// Starts raised so the first tick lays the viewport out. Reading it through
/// [`ResizeSignal::take`] lowers it again.
#[derive(Clone)]
pub struct ResizeSignal {
    pending: Arc<watch::Sender<bool>>,
}

impl ResizeSignal {
    pub fn new() -> Self {
        let (pending, _) = watch::channel(true);
        Self {
            pending: Arc::new(pending),
        }
    }

    /// Raise the flag (host window resized)
    #[cfg(test)]
    pub fn request(&self) {
        self.pending.send_replace(true);
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        *self.pending.borrow()
    }

    /// Read and lower the flag; true at most once per raise
    pub fn take(&self) -> bool {
        self.pending.send_if_modified(std::mem::take)
    }
}

impl Default for ResizeSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Joins the secondary signals onto the frame clock.
///
/// Each clock tick samples the latest held keys and the resize flag, so
/// changes between ticks are coalesced into the next context and a change
/// never produces an extra one.
pub struct FrameSampler {
    clock: FrameClock,
    held_keys: watch::Receiver<HeldKeys>,
    resize: ResizeSignal,
}

impl FrameSampler {
    pub fn new(clock: FrameClock, held_keys: watch::Receiver<HeldKeys>, resize: ResizeSignal) -> Self {
        Self {
            clock,
            held_keys,
            resize,
        }
    }

    /// Wait for the next clock tick and build its context
    pub async fn next_frame(&mut self) -> FrameContext {
        let tick = self.clock.tick().await;
        let held_keys = self.held_keys.borrow_and_update().clone();
        let needs_resize = self.resize.take();

        if needs_resize {
            debug!(tick = tick.index, "Resize sampled");
        }

        FrameContext {
            tick: tick.index,
            time: tick.time,
            delta: tick.delta,
            held_keys,
            needs_resize,
            boundary: tick.at,
        }
    }
}
