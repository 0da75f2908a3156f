//! Frame timing and per-tick context sampling

pub mod clock;
pub mod context;

pub use clock::FrameClock;
pub use context::{FrameContext, FrameSampler, ResizeSignal};
