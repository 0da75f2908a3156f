//! Frame views handed to the renderer, and frame timing stats

use serde::Serialize;

use crate::frame::FrameContext;

use super::ship::Ship;
use super::state::{CombatEvent, CombatPhase, GameState};

/// Renderable summary of one ship
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipView {
    pub name: String,
    pub health: u32,
    pub max_health: u32,
    pub tint: f32,
    pub position: [f32; 3],
    /// Projectiles this ship has in flight
    pub projectiles: usize,
}

impl ShipView {
    fn of(ship: &Ship) -> Self {
        Self {
            name: ship.name.clone(),
            health: ship.health,
            max_health: ship.max_health,
            tint: ship.tint,
            position: ship.position.to_array(),
            projectiles: ship.spawner.live().len(),
        }
    }
}

/// Playback state of the boss animation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimationView {
    pub clip: String,
    /// Seconds into the clip
    pub time: f32,
}

/// What the renderer needs to know about a finished tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameView {
    pub tick: u64,
    pub time: f64,
    pub phase: CombatPhase,
    pub player: ShipView,
    pub boss_id: Option<u32>,
    pub boss: Option<ShipView>,
    pub boss_animation: Option<AnimationView>,
    pub events: Vec<CombatEvent>,
}

impl FrameView {
    pub fn capture(state: &GameState, ctx: &FrameContext, events: &[CombatEvent]) -> Self {
        Self {
            tick: ctx.tick,
            time: ctx.time,
            phase: state.phase,
            player: ShipView::of(&state.player.ship),
            boss_id: state.boss_id(),
            boss: state.boss.as_ref().map(|boss| ShipView::of(&boss.ship)),
            boss_animation: state.boss.as_ref().map(|boss| AnimationView {
                clip: boss.mixer.clip().name.clone(),
                time: boss.mixer.time(),
            }),
            events: events.to_vec(),
        }
    }

    /// Boss spawns and defeats are worth reporting out of cadence
    pub fn is_notable(&self) -> bool {
        self.events.iter().any(|event| {
            matches!(
                event,
                CombatEvent::BossSpawned { .. } | CombatEvent::BossDefeated { .. }
            )
        })
    }
}

/// Decides which frames get reported
pub struct SnapshotCadence {
    /// Ticks since the last reported frame
    ticks_since_snapshot: u32,
    /// Report interval in ticks, 0 never reports
    snapshot_interval: u32,
}

impl SnapshotCadence {
    pub fn new(snapshot_interval: u32) -> Self {
        Self {
            ticks_since_snapshot: 0,
            snapshot_interval,
        }
    }

    /// Count one tick, true when this tick should be reported
    pub fn should_send(&mut self) -> bool {
        if self.snapshot_interval == 0 {
            return false;
        }
        self.ticks_since_snapshot += 1;
        if self.ticks_since_snapshot >= self.snapshot_interval {
            self.ticks_since_snapshot = 0;
            true
        } else {
            false
        }
    }

    /// Report the next tick regardless of the interval
    pub fn force_next(&mut self) {
        self.ticks_since_snapshot = self.snapshot_interval;
    }
}

/// Tick processing time statistics
#[derive(Debug, Default, Clone)]
pub struct FrameStats {
    pub total_ticks: u64,
    pub avg_tick_micros: f64,
    pub max_tick_micros: u64,
}

impl FrameStats {
    pub fn record(&mut self, tick_micros: u64) {
        self.total_ticks += 1;
        self.max_tick_micros = self.max_tick_micros.max(tick_micros);

        // Running average
        let n = self.total_ticks as f64;
        self.avg_tick_micros = self.avg_tick_micros * ((n - 1.0) / n) + (tick_micros as f64 / n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cadence_reports_every_nth_tick() {
        let mut cadence = SnapshotCadence::new(3);
        let sent: Vec<bool> = (0..6).map(|_| cadence.should_send()).collect();
        assert_eq!(sent, vec![false, false, true, false, false, true]);
    }

    #[test]
    fn forced_tick_is_reported_then_cadence_resumes() {
        let mut cadence = SnapshotCadence::new(3);
        cadence.should_send();
        cadence.force_next();
        assert!(cadence.should_send());
        assert!(!cadence.should_send());
    }

    #[test]
    fn zero_interval_never_reports() {
        let mut cadence = SnapshotCadence::new(0);
        cadence.force_next();
        assert!((0..10).all(|_| !cadence.should_send()));
    }

    #[test]
    fn stats_track_average_and_peak() {
        let mut stats = FrameStats::default();
        for micros in [100, 200, 300] {
            stats.record(micros);
        }
        assert_eq!(stats.total_ticks, 3);
        assert_eq!(stats.max_tick_micros, 300);
        assert!((stats.avg_tick_micros - 200.0).abs() < 1e-9);
    }
}
