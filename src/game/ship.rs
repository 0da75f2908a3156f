//! Ships: the player and the recurring boss

use glam::Vec3;
use tracing::debug;
use uuid::Uuid;

use crate::render::{AnimationMixer, NodeId, NodeKind, Scene, SceneNode, ShipAsset};

use super::geometry::Aabb;
use super::spawner::{ProjectileSpawner, Weapon};

/// State shared by the player and the boss
pub struct Ship {
    pub node: NodeId,
    pub name: String,
    pub max_health: u32,
    pub health: u32,
    pub position: Vec3,
    pub half_extents: Vec3,
    /// Recomputed from the transform once per tick
    pub bounding_box: Aabb,
    /// Damage intensity in `[0, 1]`, 0 at full health
    pub tint: f32,
    pub spawner: ProjectileSpawner,
}

impl Ship {
    pub fn new(max_health: u32, asset: &ShipAsset, weapon: Weapon) -> Self {
        let position = asset.mesh.position;
        let half_extents = asset.mesh.half_extents;
        Self {
            node: Uuid::new_v4(),
            name: asset.mesh.name.clone(),
            max_health,
            health: max_health,
            position,
            half_extents,
            bounding_box: Aabb::from_center_half_extents(position, half_extents),
            tint: 0.0,
            spawner: ProjectileSpawner::new(weapon, position),
        }
    }

    pub fn scene_node(&self, kind: NodeKind) -> SceneNode {
        SceneNode {
            id: self.node,
            kind,
            bounds: self.bounding_box,
        }
    }

    /// Take one unit of damage; health stops at zero
    pub fn damaged(&mut self) -> u32 {
        self.health = self.health.saturating_sub(1);
        self.refresh_tint();
        self.health
    }

    pub fn set_health(&mut self, health: u32) {
        self.health = health;
        self.refresh_tint();
    }

    fn refresh_tint(&mut self) {
        let missing = self.max_health.saturating_sub(self.health);
        self.tint = missing as f32 / self.max_health.max(1) as f32;
    }

    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }

    /// Recompute the bounding box from the current position
    pub fn sync_bounds(&mut self) {
        self.bounding_box = Aabb::from_center_half_extents(self.position, self.half_extents);
        self.spawner.set_mount(self.position);
    }
}

/// The player's ship, steered left and right
pub struct Player {
    pub ship: Ship,
    /// Horizontal step per tick
    pub speed: f32,
}

impl Player {
    pub fn new(ship: Ship, speed: f32) -> Self {
        Self { ship, speed }
    }

    /// Move by `direction * speed` along X; no world bounds are enforced
    pub fn move_by(&mut self, direction: f32) {
        if direction == 0.0 {
            return;
        }
        self.ship.position.x += direction * self.speed;
        self.ship.spawner.set_mount(self.ship.position);
    }
}

/// The current boss; replaced by a fresh one once its health reaches zero
pub struct Boss {
    pub id: u32,
    pub ship: Ship,
    pub mixer: AnimationMixer,
}

impl Boss {
    pub fn new(id: u32, ship: Ship, mixer: AnimationMixer) -> Self {
        Self { id, ship, mixer }
    }

    /// Remove the boss and its projectiles still in flight from the scene
    pub fn despawn<S: Scene + ?Sized>(self, scene: &mut S) {
        scene.remove(self.ship.node);
        for projectile in self.ship.spawner.live() {
            scene.remove(projectile.id);
        }
        debug!(boss_id = self.id, "Boss despawned");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;
    use crate::render::assets::{AnimationClip, MeshAsset};
    use crate::render::headless::SceneGraph;

    fn asset() -> ShipAsset {
        ShipAsset {
            mesh: MeshAsset {
                name: "test".into(),
                position: Vec3::new(0.0, 0.0, 8.0),
                half_extents: Vec3::new(3.0, 1.0, 1.0),
            },
            clip: AnimationClip {
                name: "idle".into(),
                duration: 1.0,
            },
        }
    }

    fn held_fire() -> Weapon {
        Weapon {
            interval: Duration::ZERO,
            speed: -0.5,
        }
    }

    #[tokio::test]
    async fn damage_counts_down_and_stops_at_zero() {
        let mut ship = Ship::new(2, &asset(), held_fire());
        assert_eq!(ship.damaged(), 1);
        assert_eq!(ship.tint, 0.5);
        assert_eq!(ship.damaged(), 0);
        assert!(ship.is_defeated());
        assert_eq!(ship.damaged(), 0);
        assert_eq!(ship.tint, 1.0);
    }

    #[tokio::test]
    async fn bounds_follow_position_after_sync() {
        let mut player = Player::new(Ship::new(10, &asset(), held_fire()), 0.3);
        player.move_by(1.0);
        assert_eq!(player.ship.bounding_box.center(), Vec3::new(0.0, 0.0, 8.0));

        player.ship.sync_bounds();
        assert!((player.ship.bounding_box.center().x - 0.3).abs() < 1e-6);
    }

    #[tokio::test]
    async fn despawn_clears_boss_nodes() {
        let mut scene = SceneGraph::default();
        let mut boss = Boss::new(
            0,
            Ship::new(100, &asset(), held_fire()),
            AnimationMixer::new(asset().clip),
        );
        scene.add(boss.ship.scene_node(NodeKind::Boss));

        boss.ship.spawner.fire();
        let batch = boss.ship.spawner.seal_frame(Instant::now()).to_vec();
        for projectile in &batch {
            scene.add(projectile.scene_node());
        }
        boss.ship.spawner.set_live(batch);
        assert_eq!(scene.len(), 2);

        boss.despawn(&mut scene);
        assert!(scene.is_empty());
    }
}
