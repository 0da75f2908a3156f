//! Projectiles fired by ships

use glam::Vec3;
use tokio::time::Instant;
use uuid::Uuid;

use crate::render::{NodeKind, SceneNode};

use super::geometry::Aabb;

/// Projectiles are cubes of this half size
pub const PROJECTILE_HALF_EXTENT: f32 = 0.25;

/// A projectile in flight, owned by the spawner of the ship that fired it
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    /// Also the projectile's scene node id
    pub id: Uuid,
    pub position: Vec3,
    /// Step along +Z per tick; negative travels towards the player
    pub speed: f32,
    pub spawned_at: Instant,
}

impl Projectile {
    pub fn new(position: Vec3, speed: f32, spawned_at: Instant) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            speed,
            spawned_at,
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, Vec3::splat(PROJECTILE_HALF_EXTENT))
    }

    pub fn scene_node(&self) -> SceneNode {
        SceneNode {
            id: self.id,
            kind: NodeKind::Projectile,
            bounds: self.bounding_box(),
        }
    }

    /// Move one tick's worth along the firing axis
    pub fn advance(&mut self) {
        self.position.z += self.speed;
    }
}
