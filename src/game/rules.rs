//! Gameplay tuning

use std::time::Duration;

use super::spawner::Weapon;

pub const PLAYER_MAX_HEALTH: u32 = 10;
pub const BOSS_MAX_HEALTH: u32 = 100;
pub const PLAYER_SPEED: f32 = 0.3;
pub const PROJECTILE_SPEED: f32 = 0.5;
pub const FIRE_INTERVAL_MS: u64 = 100;

/// Player health that snaps back to [`HEALTH_RESET_VALUE`]
pub const HEALTH_RESET_TRIGGER: u32 = 2;
pub const HEALTH_RESET_VALUE: u32 = 10;

/// Tunable numbers for one game
#[derive(Debug, Clone, PartialEq)]
pub struct GameRules {
    pub player_max_health: u32,
    pub boss_max_health: u32,
    /// Player step per tick
    pub player_speed: f32,
    /// Projectile step per tick; the boss fires with the opposite sign
    pub projectile_speed: f32,
    pub player_fire_interval: Duration,
    pub boss_fire_interval: Duration,
    /// Player health that triggers the reset, `None` disables it
    pub health_reset_trigger: Option<u32>,
    pub health_reset_value: u32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            player_max_health: PLAYER_MAX_HEALTH,
            boss_max_health: BOSS_MAX_HEALTH,
            player_speed: PLAYER_SPEED,
            projectile_speed: PROJECTILE_SPEED,
            player_fire_interval: Duration::from_millis(FIRE_INTERVAL_MS),
            boss_fire_interval: Duration::from_millis(FIRE_INTERVAL_MS),
            health_reset_trigger: Some(HEALTH_RESET_TRIGGER),
            health_reset_value: HEALTH_RESET_VALUE,
        }
    }
}

impl GameRules {
    pub fn player_weapon(&self) -> Weapon {
        Weapon {
            interval: self.player_fire_interval,
            speed: self.projectile_speed,
        }
    }

    /// Boss projectiles travel against the player's
    pub fn boss_weapon(&self) -> Weapon {
        Weapon {
            interval: self.boss_fire_interval,
            speed: -self.projectile_speed,
        }
    }
}
