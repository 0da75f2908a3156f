//! Seeded synthetic keyboard for headless runs

use std::time::Duration;

use futures::channel::mpsc::UnboundedSender;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::keys::{KeyName, RawKeyEvent};

/// Key that is not a direction key, sent now and then to exercise filtering
const NOISE_KEY: &str = "Space";

/// Shortest and longest pause between two synthetic key events (ms)
const MIN_PAUSE_MS: u64 = 120;
const MAX_PAUSE_MS: u64 = 600;

/// Drives the player like a person tapping the arrow keys
pub struct Autopilot {
    rng: ChaCha8Rng,
    held: [bool; 2],
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            held: [false, false],
        }
    }

    /// Pick the next raw key event and the pause before sending it
    pub fn next_event(&mut self) -> (Duration, RawKeyEvent) {
        let pause = Duration::from_millis(self.rng.gen_range(MIN_PAUSE_MS..=MAX_PAUSE_MS));

        if self.rng.gen_bool(0.1) {
            return (pause, RawKeyEvent::down(NOISE_KEY));
        }

        let key = if self.rng.gen_bool(0.5) {
            KeyName::Left
        } else {
            KeyName::Right
        };
        let slot = &mut self.held[key as usize];
        *slot = !*slot;

        let event = if *slot {
            RawKeyEvent::down(key.host_key())
        } else {
            RawKeyEvent::up(key.host_key())
        };
        (pause, event)
    }

    /// Feed synthetic events into `events` until the receiving side goes away
    pub fn spawn(mut self, events: UnboundedSender<RawKeyEvent>) -> JoinHandle<()> {
        info!("Autopilot keyboard engaged");
        tokio::spawn(async move {
            loop {
                let (pause, event) = self.next_event();
                tokio::time::sleep(pause).await;
                if events.unbounded_send(event).is_err() {
                    debug!("Key event receiver dropped, autopilot stopping");
                    break;
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::keys::KeyEvent;
    use futures::StreamExt;

    #[test]
    fn same_seed_same_keystrokes() {
        let mut a = Autopilot::new(7);
        let mut b = Autopilot::new(7);
        for _ in 0..50 {
            assert_eq!(a.next_event(), b.next_event());
        }
    }

    #[test]
    fn releases_only_follow_presses() {
        let mut pilot = Autopilot::new(42);
        let mut down = [false, false];
        for _ in 0..500 {
            let (pause, raw) = pilot.next_event();
            assert!(pause >= Duration::from_millis(MIN_PAUSE_MS));
            match KeyEvent::from_raw(&raw) {
                Some(KeyEvent::Down(k)) => {
                    assert!(!down[k as usize]);
                    down[k as usize] = true;
                }
                Some(KeyEvent::Up(k)) => {
                    assert!(down[k as usize]);
                    down[k as usize] = false;
                }
                None => assert_eq!(raw.key, NOISE_KEY),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn spawned_autopilot_stops_when_receiver_dropped() {
        let (tx, mut rx) = futures::channel::mpsc::unbounded();
        let handle = Autopilot::new(1).spawn(tx);

        assert!(rx.next().await.is_some());
        drop(rx);
        handle.await.expect("autopilot task panicked");
    }
}
