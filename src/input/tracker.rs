//! Held-key tracking
//!
//! The tracker folds key-down/key-up events into an ordered, duplicate-free
//! sequence of currently held direction keys and publishes it through a
//! `watch` channel, so the frame loop can always sample the latest value
//! without waiting for a change.

use futures::{Stream, StreamExt};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use super::keys::{KeyEvent, KeyName, RawKeyEvent};

/// Held direction keys in press order; the last key decides the direction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeldKeys(Vec<KeyName>);

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sequence from keys in press order, dropping repeats
    #[cfg(test)]
    pub fn from_keys(keys: impl IntoIterator<Item = KeyName>) -> Self {
        let mut held = Self::new();
        for key in keys {
            held.press(key);
        }
        held
    }

    /// Record a key press, returns true if the sequence changed.
    ///
    /// A key that is already held keeps its original position.
    pub fn press(&mut self, key: KeyName) -> bool {
        if self.0.contains(&key) {
            return false;
        }
        self.0.push(key);
        true
    }

    /// Record a key release, returns true if the sequence changed
    pub fn release(&mut self, key: KeyName) -> bool {
        let before = self.0.len();
        self.0.retain(|held| *held != key);
        self.0.len() != before
    }

    pub fn apply(&mut self, event: KeyEvent) -> bool {
        match event {
            KeyEvent::Down(key) => self.press(key),
            KeyEvent::Up(key) => self.release(key),
        }
    }

    /// Most recently pressed key still held
    pub fn last(&self) -> Option<KeyName> {
        self.0.last().copied()
    }

    /// Movement direction for this sequence: -1, 0 or +1
    pub fn direction(&self) -> f32 {
        self.last().map(KeyName::direction).unwrap_or(0.0)
    }

    pub fn as_slice(&self) -> &[KeyName] {
        &self.0
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Always-current held-key signal
pub struct InputTracker {
    held: watch::Sender<HeldKeys>,
}

impl InputTracker {
    /// Create a tracker whose signal starts as an empty sequence
    pub fn new() -> Self {
        let (held, _) = watch::channel(HeldKeys::new());
        Self { held }
    }

    /// Receiver side of the held-key signal
    pub fn subscribe(&self) -> watch::Receiver<HeldKeys> {
        self.held.subscribe()
    }

    #[cfg(test)]
    pub fn current(&self) -> HeldKeys {
        self.held.borrow().clone()
    }

    /// Fold one filtered key event into the held sequence
    pub fn apply(&self, event: KeyEvent) {
        let changed = self.held.send_if_modified(|held| held.apply(event));
        if changed {
            trace!(?event, held = ?self.held.borrow().as_slice(), "Held keys changed");
        }
    }

    /// Filter a raw host event and apply it if it is a direction key
    pub fn apply_raw(&self, raw: &RawKeyEvent) {
        if let Some(event) = KeyEvent::from_raw(raw) {
            self.apply(event);
        }
    }
}

impl Default for InputTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn a task folding a stream of raw host key events into a held-key signal.
///
/// The returned receiver keeps the last value after the stream ends.
pub fn spawn_input_tracker<S>(events: S) -> (watch::Receiver<HeldKeys>, JoinHandle<()>)
where
    S: Stream<Item = RawKeyEvent> + Send + 'static,
{
    let tracker = InputTracker::new();
    let held_rx = tracker.subscribe();

    let handle = tokio::spawn(async move {
        futures::pin_mut!(events);
        while let Some(raw) = events.next().await {
            tracker.apply_raw(&raw);
        }
        debug!("Key event stream closed");
    });

    (held_rx, handle)
}
