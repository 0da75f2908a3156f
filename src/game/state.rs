//! Game state and the per-tick combat state machine

use serde::Serialize;
use tracing::{debug, info, trace};

use crate::frame::FrameContext;
use crate::render::{AnimationMixer, AssetError, NodeKind, Renderer, Scene, ShipAsset};

use super::collision::resolve_projectiles;
use super::geometry::{Camera, Frustum};
use super::rules::GameRules;
use super::ship::{Boss, Player, Ship};
use super::snapshot::FrameView;

/// Boss lifecycle as seen at the end of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatPhase {
    /// No boss has been spawned yet
    NoBoss,
    BossAlive,
    /// Boss health hit zero; it is replaced at the start of the next tick
    BossDefeated,
}

/// Side of the fight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Combatant {
    Player,
    Boss,
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CombatEvent {
    Resized {
        width: u32,
        height: u32,
    },
    BossSpawned {
        boss_id: u32,
        asset: String,
    },
    Hit {
        target: Combatant,
        remaining_health: u32,
    },
    BossDefeated {
        boss_id: u32,
    },
    PlayerHealthReset {
        health: u32,
    },
}

/// Everything the simulation owns between ticks
pub struct GameState {
    pub player: Player,
    pub boss: Option<Boss>,
    pub camera: Camera,
    pub frustum: Frustum,
    pub phase: CombatPhase,
}

impl GameState {
    pub fn new(player: Player) -> Self {
        let camera = Camera::default();
        let frustum = camera.frustum();
        Self {
            player,
            boss: None,
            camera,
            frustum,
            phase: CombatPhase::NoBoss,
        }
    }

    pub fn boss_id(&self) -> Option<u32> {
        self.boss.as_ref().map(|boss| boss.id)
    }
}

/// Turns a game state and a frame context into the next game state
pub struct CombatStateMachine {
    rules: GameRules,
    boss_assets: Vec<ShipAsset>,
}

impl CombatStateMachine {
    pub fn new(rules: GameRules, boss_assets: Vec<ShipAsset>) -> Result<Self, AssetError> {
        if boss_assets.is_empty() {
            return Err(AssetError::NoBossAssets);
        }
        Ok(Self { rules, boss_assets })
    }

    /// Create the player ship and register it with the scene
    pub fn spawn_player<S: Scene + ?Sized>(&self, asset: &ShipAsset, scene: &mut S) -> Player {
        let ship = Ship::new(self.rules.player_max_health, asset, self.rules.player_weapon());
        scene.add(ship.scene_node(NodeKind::Player));
        info!(asset = %ship.name, health = ship.health, "Player spawned");
        Player::new(ship, self.rules.player_speed)
    }

    fn spawn_boss<S: Scene + ?Sized>(&self, id: u32, scene: &mut S) -> Boss {
        let asset = &self.boss_assets[id as usize % self.boss_assets.len()];
        let ship = Ship::new(self.rules.boss_max_health, asset, self.rules.boss_weapon());
        scene.add(ship.scene_node(NodeKind::Boss));
        info!(boss_id = id, asset = %ship.name, health = ship.health, "Boss spawned");
        Boss::new(id, ship, AnimationMixer::new(asset.clip.clone()))
    }

    /// Run one tick.
    ///
    /// Steps run in a fixed order: resize, boss lifecycle, animation,
    /// bounding boxes, player motion, projectile resolution (player fire
    /// first, then boss fire), the player health reset and finally drawing.
    pub fn step<R: Renderer>(
        &self,
        mut state: GameState,
        ctx: &FrameContext,
        renderer: &mut R,
        scene: &mut R::Scene,
    ) -> (GameState, Vec<CombatEvent>) {
        let mut events = Vec::new();

        if ctx.needs_resize {
            let viewport = renderer.surface_size();
            renderer.set_size(viewport);
            state.camera.set_aspect(viewport.aspect());
            state.frustum = state.camera.frustum();
            info!(width = viewport.width, height = viewport.height, "Viewport resized");
            events.push(CombatEvent::Resized {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let mut boss = match state.boss.take() {
            Some(boss) if !boss.ship.is_defeated() => boss,
            previous => {
                let id = previous.as_ref().map_or(0, |boss| boss.id + 1);
                if let Some(defeated) = previous {
                    defeated.despawn(scene);
                }
                let boss = self.spawn_boss(id, scene);
                events.push(CombatEvent::BossSpawned {
                    boss_id: id,
                    asset: boss.ship.name.clone(),
                });
                boss
            }
        };

        boss.mixer.update(ctx.delta);

        boss.ship.sync_bounds();
        state.player.ship.sync_bounds();

        state.player.move_by(ctx.held_keys.direction());

        for projectile in state.player.ship.spawner.seal_frame(ctx.boundary) {
            scene.add(projectile.scene_node());
        }
        for projectile in boss.ship.spawner.seal_frame(ctx.boundary) {
            scene.add(projectile.scene_node());
        }

        let player_fire = resolve_projectiles(
            &mut state.player.ship.spawner,
            &mut boss.ship,
            &state.frustum,
            scene,
        );
        events.extend(player_fire.hits.iter().map(|&remaining_health| CombatEvent::Hit {
            target: Combatant::Boss,
            remaining_health,
        }));

        let boss_fire = resolve_projectiles(
            &mut boss.ship.spawner,
            &mut state.player.ship,
            &state.frustum,
            scene,
        );
        events.extend(boss_fire.hits.iter().map(|&remaining_health| CombatEvent::Hit {
            target: Combatant::Player,
            remaining_health,
        }));

        for (side, resolution) in [(Combatant::Player, &player_fire), (Combatant::Boss, &boss_fire)] {
            trace!(
                tick = ctx.tick,
                ?side,
                entered = resolution.entered,
                advanced = resolution.advanced,
                culled = resolution.culled,
                hits = resolution.hits.len(),
                "Projectiles resolved"
            );
        }

        state.phase = if boss.ship.is_defeated() {
            if !player_fire.hits.is_empty() {
                info!(boss_id = boss.id, "Boss defeated");
                events.push(CombatEvent::BossDefeated { boss_id: boss.id });
            }
            CombatPhase::BossDefeated
        } else {
            CombatPhase::BossAlive
        };

        if Some(state.player.ship.health) == self.rules.health_reset_trigger {
            state.player.ship.set_health(self.rules.health_reset_value);
            debug!(health = state.player.ship.health, "Player health reset");
            events.push(CombatEvent::PlayerHealthReset {
                health: state.player.ship.health,
            });
        }

        state.boss = Some(boss);

        let view = FrameView::capture(&state, ctx, &events);
        renderer.render(scene, &state.camera, &view);

        (state, events)
    }
}
