//! Keyboard input: raw event filtering, held-key tracking, synthetic keyboard

pub mod autopilot;
pub mod keys;
pub mod tracker;

pub use autopilot::Autopilot;
pub use keys::RawKeyEvent;
pub use tracker::{spawn_input_tracker, HeldKeys};
