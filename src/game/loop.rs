//! The tick-driven game loop

use tracing::info;

use crate::frame::FrameSampler;
use crate::render::{Renderer, ShipAsset};
use crate::util::time::Timer;

use super::snapshot::FrameStats;
use super::state::{CombatEvent, CombatStateMachine, GameState};

/// What a finished run looked like
#[derive(Debug, Clone)]
pub struct LoopSummary {
    pub ticks: u64,
    pub bosses_defeated: u32,
    pub player_health: u32,
    pub stats: FrameStats,
}

/// Owns the world and advances it once per frame clock tick
pub struct GameLoop<R: Renderer> {
    frames: FrameSampler,
    machine: CombatStateMachine,
    state: GameState,
    renderer: R,
    scene: R::Scene,
    max_ticks: Option<u64>,
}

impl<R> GameLoop<R>
where
    R: Renderer,
    R::Scene: Default,
{
    /// Build the loop and spawn the player into a fresh scene
    pub fn new(
        frames: FrameSampler,
        machine: CombatStateMachine,
        player_asset: &ShipAsset,
        renderer: R,
        max_ticks: Option<u64>,
    ) -> Self {
        let mut scene = R::Scene::default();
        let player = machine.spawn_player(player_asset, &mut scene);
        Self {
            frames,
            machine,
            state: GameState::new(player),
            renderer,
            scene,
            max_ticks,
        }
    }

    /// Run until `max_ticks` is reached, or forever without a limit
    pub async fn run(self) -> LoopSummary {
        let GameLoop {
            mut frames,
            machine,
            mut state,
            mut renderer,
            mut scene,
            max_ticks,
        } = self;

        info!(max_ticks = ?max_ticks, "Game loop started");

        let mut stats = FrameStats::default();
        let mut bosses_defeated = 0;
        let mut ticks = 0;
        let mut timer = Timer::new();

        loop {
            let ctx = frames.next_frame().await;

            timer.reset();
            let (next, events) = machine.step(state, &ctx, &mut renderer, &mut scene);
            state = next;
            stats.record(timer.elapsed_micros());

            bosses_defeated += events
                .iter()
                .filter(|event| matches!(event, CombatEvent::BossDefeated { .. }))
                .count() as u32;
            ticks += 1;

            if max_ticks.is_some_and(|max| ticks >= max) {
                break;
            }
        }

        let summary = LoopSummary {
            ticks,
            bosses_defeated,
            player_health: state.player.ship.health,
            stats,
        };
        info!(
            ticks = summary.ticks,
            bosses_defeated = summary.bosses_defeated,
            player_health = summary.player_health,
            avg_tick_micros = summary.stats.avg_tick_micros,
            max_tick_micros = summary.stats.max_tick_micros,
            "Game loop finished"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use glam::Vec3;

    use super::*;
    use crate::frame::{FrameClock, ResizeSignal};
    use crate::game::geometry::Viewport;
    use crate::game::rules::GameRules;
    use crate::input::tracker::InputTracker;
    use crate::render::assets::{AnimationClip, MeshAsset};
    use crate::render::HeadlessRenderer;

    fn asset(name: &str, z: f32) -> ShipAsset {
        ShipAsset {
            mesh: MeshAsset {
                name: name.into(),
                position: Vec3::new(0.0, 0.0, z),
                half_extents: Vec3::new(3.0, 1.0, 1.0),
            },
            clip: AnimationClip {
                name: "idle".into(),
                duration: 1.0,
            },
        }
    }

    fn game_loop(tracker: &InputTracker, rules: GameRules, max_ticks: u64) -> GameLoop<HeadlessRenderer> {
        let frames = FrameSampler::new(
            FrameClock::with_period(Duration::from_millis(16)),
            tracker.subscribe(),
            ResizeSignal::new(),
        );
        let machine = CombatStateMachine::new(rules, vec![asset("boss", 8.0)]).unwrap();
        GameLoop::new(
            frames,
            machine,
            &asset("player", -8.0),
            HeadlessRenderer::new(Viewport::new(1280, 720), 10),
            Some(max_ticks),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn loop_stops_after_max_ticks() {
        let tracker = InputTracker::new();
        let summary = game_loop(&tracker, GameRules::default(), 120).run().await;

        assert_eq!(summary.ticks, 120);
        assert_eq!(summary.stats.total_ticks, 120);
        assert_eq!(summary.bosses_defeated, 0);
        assert!(summary.player_health > 0);
    }

    #[tokio::test(start_paused = true)]
    async fn timed_fire_wears_the_boss_down() {
        let tracker = InputTracker::new();
        let rules = GameRules {
            boss_fire_interval: Duration::ZERO,
            boss_max_health: 5,
            ..GameRules::default()
        };
        // About three seconds of play: shots every 100ms reach the boss
        // in roughly half a second
        let summary = game_loop(&tracker, rules, 180).run().await;

        assert!(summary.bosses_defeated >= 1);
        assert_eq!(summary.player_health, 10);
    }
}
