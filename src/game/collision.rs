//! Projectile resolution: culling, hits and movement

use tracing::debug;

use crate::render::Scene;

use super::geometry::Frustum;
use super::projectile::Projectile;
use super::ship::Ship;
use super::spawner::ProjectileSpawner;

/// Outcome of resolving one ship's projectiles against its target
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Target health after each hit, in hit order
    pub hits: Vec<u32>,
    /// Projectiles removed for leaving the view
    pub culled: usize,
    /// Projectiles moved forward and kept
    pub advanced: usize,
    /// Projectiles that entered the live set this tick
    pub entered: usize,
}

/// Fate of a single projectile this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Culled,
    Hit,
    Advanced,
}

/// Decide what happens to one projectile, moving it if it survives
pub fn resolve_one(projectile: &mut Projectile, target: &Ship, frustum: &Frustum) -> Outcome {
    let bounds = projectile.bounding_box();
    if !frustum.intersects_aabb(&bounds) {
        Outcome::Culled
    } else if bounds.intersects(&target.bounding_box) {
        Outcome::Hit
    } else {
        projectile.advance();
        Outcome::Advanced
    }
}

/// Resolve every projectile `firing` has in flight against `target`.
///
/// The new live set starts with this frame's batch, untouched; each
/// previously live projectile, in order, is then culled, spent on a hit
/// (one damage, one removal) or advanced. Removed projectiles are taken out
/// of the scene.
pub fn resolve_projectiles<S: Scene + ?Sized>(
    firing: &mut ProjectileSpawner,
    target: &mut Ship,
    frustum: &Frustum,
    scene: &mut S,
) -> Resolution {
    let previous = firing.take_live();
    let mut live = firing.new_projectiles().to_vec();
    let mut resolution = Resolution {
        entered: live.len(),
        ..Resolution::default()
    };

    for mut projectile in previous {
        match resolve_one(&mut projectile, target, frustum) {
            Outcome::Culled => {
                scene.remove(projectile.id);
                resolution.culled += 1;
            }
            Outcome::Hit => {
                scene.remove(projectile.id);
                let remaining = target.damaged();
                debug!(target = %target.name, remaining, "Projectile hit");
                resolution.hits.push(remaining);
            }
            Outcome::Advanced => {
                live.push(projectile);
                resolution.advanced += 1;
            }
        }
    }

    firing.set_live(live);
    resolution
}
