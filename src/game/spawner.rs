//! Timed projectile spawning, batched per frame
//!
//! A spawner runs its own interval task that drops new projectiles into a
//! pending buffer. The frame loop seals that buffer once per tick into the
//! frame's new-projectile batch, which is the only way projectiles enter the
//! ship's live set.

use std::sync::Arc;
use std::time::Duration;

use glam::Vec3;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::trace;

use super::projectile::Projectile;

/// Firing cadence and projectile speed of a ship
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weapon {
    /// Time between shots; zero holds fire
    pub interval: Duration,
    /// Signed per-tick projectile step
    pub speed: f32,
}

/// Shared emission side of a spawner, cloned into the timer task
#[derive(Clone)]
struct Emitter {
    speed: f32,
    mount: watch::Receiver<Vec3>,
    pending: Arc<Mutex<Vec<Projectile>>>,
}

impl Emitter {
    /// Stamped under the lock, so `pending` stays ordered by spawn instant
    fn emit(&self) {
        let position = *self.mount.borrow();
        let mut pending = self.pending.lock();
        let projectile = Projectile::new(position, self.speed, Instant::now());
        trace!(projectile_id = %projectile.id, "Projectile spawned");
        pending.push(projectile);
    }
}

/// Per-ship projectile source and live projectile set
pub struct ProjectileSpawner {
    mount: watch::Sender<Vec3>,
    emitter: Emitter,
    batch: Vec<Projectile>,
    live: Vec<Projectile>,
    timer: Option<JoinHandle<()>>,
}

impl ProjectileSpawner {
    /// Create a spawner mounted at `mount`.
    ///
    /// With a non-zero interval a timer task is spawned on the current tokio
    /// runtime; its first shot comes one interval after creation.
    pub fn new(weapon: Weapon, mount: Vec3) -> Self {
        let (mount_tx, mount_rx) = watch::channel(mount);
        let emitter = Emitter {
            speed: weapon.speed,
            mount: mount_rx,
            pending: Arc::new(Mutex::new(Vec::new())),
        };

        let timer = (!weapon.interval.is_zero()).then(|| {
            let emitter = emitter.clone();
            let first_shot = Instant::now() + weapon.interval;
            tokio::spawn(async move {
                let mut ticker = interval_at(first_shot, weapon.interval);
                loop {
                    ticker.tick().await;
                    emitter.emit();
                }
            })
        });

        Self {
            mount: mount_tx,
            emitter,
            batch: Vec::new(),
            live: Vec::new(),
            timer,
        }
    }

    /// Move the spawn point (the owning ship's world position)
    pub fn set_mount(&self, position: Vec3) {
        self.mount.send_replace(position);
    }

    /// Emit one projectile right now, outside the timer cadence
    #[cfg(test)]
    pub fn fire(&self) {
        self.emitter.emit();
    }

    /// Close the frame that ended at `boundary`: everything emitted since
    /// the previous seal, up to and including `boundary`, becomes this
    /// frame's batch. Later emissions stay pending for the next frame.
    pub fn seal_frame(&mut self, boundary: Instant) -> &[Projectile] {
        let mut pending = self.emitter.pending.lock();
        let split = pending.partition_point(|p| p.spawned_at <= boundary);
        let later = pending.split_off(split);
        self.batch = std::mem::replace(&mut *pending, later);
        drop(pending);
        &self.batch
    }

    /// Projectiles that entered during the current frame
    pub fn new_projectiles(&self) -> &[Projectile] {
        &self.batch
    }

    pub fn live(&self) -> &[Projectile] {
        &self.live
    }

    /// Emitted but not yet sealed into a frame
    #[cfg(test)]
    pub fn pending_len(&self) -> usize {
        self.emitter.pending.lock().len()
    }

    pub(crate) fn take_live(&mut self) -> Vec<Projectile> {
        std::mem::take(&mut self.live)
    }

    pub(crate) fn set_live(&mut self, live: Vec<Projectile>) {
        self.live = live;
    }
}

impl Drop for ProjectileSpawner {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weapon(interval_ms: u64) -> Weapon {
        Weapon {
            interval: Duration::from_millis(interval_ms),
            speed: 0.5,
        }
    }

    async fn advance(ms: u64) {
        tokio::time::advance(Duration::from_millis(ms)).await;
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn batches_hold_exactly_what_spawned_since_last_boundary() {
        let origin = Instant::now();
        let mut spawner = ProjectileSpawner::new(weapon(100), Vec3::ZERO);

        advance(100).await;
        advance(100).await;
        advance(50).await;
        let boundary_1 = Instant::now();
        let first: Vec<_> = spawner.seal_frame(boundary_1).to_vec();
        assert_eq!(first.len(), 2);
        assert!(first.iter().all(|p| p.spawned_at > origin && p.spawned_at <= boundary_1));
        assert!(first[0].spawned_at < first[1].spawned_at);

        advance(100).await;
        let boundary_2 = Instant::now();
        let second: Vec<_> = spawner.seal_frame(boundary_2).to_vec();
        assert_eq!(second.len(), 1);
        assert!(second[0].spawned_at > boundary_1 && second[0].spawned_at <= boundary_2);
        assert!(first.iter().all(|p| p.id != second[0].id));

        assert!(spawner.seal_frame(Instant::now()).is_empty());
        assert!(spawner.new_projectiles().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn batch_is_stable_until_next_seal() {
        let mut spawner = ProjectileSpawner::new(weapon(100), Vec3::ZERO);
        advance(100).await;
        spawner.seal_frame(Instant::now());

        advance(100).await;
        assert_eq!(spawner.new_projectiles().len(), 1);
        assert_eq!(spawner.pending_len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn spawns_after_the_boundary_wait_for_the_next_frame() {
        let mut spawner = ProjectileSpawner::new(weapon(0), Vec3::ZERO);
        spawner.fire();
        let boundary = Instant::now();

        advance(5).await;
        spawner.fire();

        assert_eq!(spawner.seal_frame(boundary).len(), 1);
        assert_eq!(spawner.pending_len(), 1);

        let next = spawner.seal_frame(Instant::now());
        assert_eq!(next.len(), 1);
        assert!(next[0].spawned_at > boundary);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn parallel_timer_cannot_leak_into_a_sealed_frame() {
        let mut spawner = ProjectileSpawner::new(weapon(5), Vec3::ZERO);
        tokio::time::sleep(Duration::from_millis(20)).await;

        let boundary = Instant::now();
        // Synchronous frame work; the timer keeps firing on the other worker
        std::thread::sleep(Duration::from_millis(30));

        let batch = spawner.seal_frame(boundary).to_vec();
        assert!(!batch.is_empty());
        assert!(batch.iter().all(|p| p.spawned_at <= boundary));
        assert!(spawner.pending_len() > 0);

        let next_boundary = Instant::now();
        let next = spawner.seal_frame(next_boundary);
        assert!(!next.is_empty());
        assert!(next
            .iter()
            .all(|p| p.spawned_at > boundary && p.spawned_at <= next_boundary));
    }

    #[tokio::test(start_paused = true)]
    async fn projectiles_spawn_at_current_mount() {
        let mut spawner = ProjectileSpawner::new(weapon(100), Vec3::ZERO);
        spawner.set_mount(Vec3::new(3.0, 0.0, -8.0));

        advance(100).await;
        let batch = spawner.seal_frame(Instant::now());
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].position, Vec3::new(3.0, 0.0, -8.0));
        assert_eq!(batch[0].speed, 0.5);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_holds_fire() {
        let mut spawner = ProjectileSpawner::new(weapon(0), Vec3::ZERO);
        advance(1_000).await;
        assert!(spawner.seal_frame(Instant::now()).is_empty());

        spawner.fire();
        spawner.fire();
        assert_eq!(spawner.seal_frame(Instant::now()).len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_spawner_stops_its_timer() {
        let spawner = ProjectileSpawner::new(weapon(100), Vec3::ZERO);
        let pending = spawner.emitter.pending.clone();
        drop(spawner);

        advance(500).await;
        assert!(pending.lock().is_empty());
    }
}
