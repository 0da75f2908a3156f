//! Configuration module - environment variable parsing

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::game::geometry::Viewport;
use crate::game::rules::{self, GameRules};
use crate::util::time::{frame_period, FRAME_TPS};

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Frame clock target rate
    pub frame_rate_hz: u32,
    /// Initial surface size of the headless renderer
    pub viewport: Viewport,

    /// Player asset descriptor path
    pub player_asset: String,
    /// Boss asset descriptor paths, cycled per respawn
    pub boss_assets: Vec<String>,

    pub player_fire_interval: Duration,
    pub boss_fire_interval: Duration,
    pub projectile_speed: f32,
    pub player_speed: f32,
    pub player_max_health: u32,
    pub boss_max_health: u32,

    /// Log a frame view every N ticks, 0 disables frame logging
    pub snapshot_every_ticks: u32,
    /// Stop after this many ticks, `None` runs until shutdown
    pub max_ticks: Option<u64>,
    /// Seed for the synthetic keyboard, `None` disables it
    pub autopilot_seed: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let boss_assets: Vec<String> = lookup("BOSS_ASSETS")
            .unwrap_or_else(|| "assets/boss.json".to_string())
            .split(',')
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .map(String::from)
            .collect();
        if boss_assets.is_empty() {
            return Err(ConfigError::Missing("BOSS_ASSETS"));
        }

        let max_ticks: u64 = parse_or(&lookup, "MAX_TICKS", 0)?;
        let autopilot_seed = match lookup("AUTOPILOT_SEED") {
            Some(value) => Some(parse_value("AUTOPILOT_SEED", &value)?),
            None => None,
        };

        Ok(Self {
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            // The frame clock needs a period of at least one microsecond
            frame_rate_hz: parse_checked(&lookup, "FRAME_RATE_HZ", FRAME_TPS, |hz| {
                *hz > 0 && !frame_period(*hz).is_zero()
            })?,
            viewport: Viewport::new(
                parse_checked(&lookup, "VIEWPORT_WIDTH", 1280, |w| *w > 0)?,
                parse_checked(&lookup, "VIEWPORT_HEIGHT", 720, |h| *h > 0)?,
            ),

            player_asset: lookup("PLAYER_ASSET")
                .unwrap_or_else(|| "assets/player.json".to_string()),
            boss_assets,

            player_fire_interval: Duration::from_millis(parse_or(
                &lookup,
                "PLAYER_FIRE_INTERVAL_MS",
                rules::FIRE_INTERVAL_MS,
            )?),
            boss_fire_interval: Duration::from_millis(parse_or(
                &lookup,
                "BOSS_FIRE_INTERVAL_MS",
                rules::FIRE_INTERVAL_MS,
            )?),
            projectile_speed: parse_checked(
                &lookup,
                "PROJECTILE_SPEED",
                rules::PROJECTILE_SPEED,
                |speed: &f32| speed.is_finite(),
            )?,
            player_speed: parse_checked(&lookup, "PLAYER_SPEED", rules::PLAYER_SPEED, |speed: &f32| {
                speed.is_finite()
            })?,
            // A ship spawned with no health is never hittable
            player_max_health: parse_checked(
                &lookup,
                "PLAYER_MAX_HEALTH",
                rules::PLAYER_MAX_HEALTH,
                |health| *health > 0,
            )?,
            boss_max_health: parse_checked(
                &lookup,
                "BOSS_MAX_HEALTH",
                rules::BOSS_MAX_HEALTH,
                |health| *health > 0,
            )?,

            snapshot_every_ticks: parse_or(&lookup, "SNAPSHOT_EVERY_TICKS", 30)?,
            max_ticks: (max_ticks > 0).then_some(max_ticks),
            autopilot_seed,
        })
    }

    /// Gameplay values as game rules
    pub fn rules(&self) -> GameRules {
        GameRules {
            player_max_health: self.player_max_health,
            boss_max_health: self.boss_max_health,
            player_speed: self.player_speed,
            projectile_speed: self.projectile_speed,
            player_fire_interval: self.player_fire_interval,
            boss_fire_interval: self.boss_fire_interval,
            ..GameRules::default()
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => parse_value(key, &value),
        None => Ok(default),
    }
}

/// Like [`parse_or`], rejecting parsed values that fail `accept`
fn parse_checked<F, T>(
    lookup: &F,
    key: &'static str,
    default: T,
    accept: impl Fn(&T) -> bool,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => {
            let parsed = parse_value(key, &value)?;
            if accept(&parsed) {
                Ok(parsed)
            } else {
                Err(ConfigError::Invalid { key, value })
            }
        }
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_the_game_rules() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.frame_rate_hz, 60);
        assert_eq!(config.viewport, Viewport::new(1280, 720));
        assert_eq!(config.boss_assets, vec!["assets/boss.json".to_string()]);
        assert_eq!(config.max_ticks, None);
        assert_eq!(config.autopilot_seed, None);
        assert_eq!(config.rules(), GameRules::default());
    }

    #[test]
    fn boss_assets_are_split_on_commas() {
        let config = config_from(&[("BOSS_ASSETS", "a.json, b.json,,c.json")]).unwrap();
        assert_eq!(config.boss_assets, vec!["a.json", "b.json", "c.json"]);
    }

    #[test]
    fn empty_boss_list_is_missing() {
        let err = config_from(&[("BOSS_ASSETS", " , ")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("BOSS_ASSETS")));
    }

    #[test]
    fn overrides_flow_into_rules() {
        let config = config_from(&[
            ("BOSS_FIRE_INTERVAL_MS", "0"),
            ("BOSS_MAX_HEALTH", "5"),
            ("MAX_TICKS", "600"),
            ("AUTOPILOT_SEED", "42"),
        ])
        .unwrap();
        let game_rules = config.rules();
        assert_eq!(game_rules.boss_fire_interval, Duration::ZERO);
        assert_eq!(game_rules.boss_max_health, 5);
        assert_eq!(game_rules.health_reset_trigger, Some(rules::HEALTH_RESET_TRIGGER));
        assert_eq!(config.max_ticks, Some(600));
        assert_eq!(config.autopilot_seed, Some(42));
    }

    #[test]
    fn malformed_value_names_the_key() {
        let err = config_from(&[("PLAYER_SPEED", "fast")]).unwrap_err();
        match err {
            ConfigError::Invalid { key, value } => {
                assert_eq!(key, "PLAYER_SPEED");
                assert_eq!(value, "fast");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    fn rejected_key(pairs: &[(&str, &str)]) -> &'static str {
        match config_from(pairs) {
            Err(ConfigError::Invalid { key, .. }) => key,
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("accepted {pairs:?}"),
        }
    }

    #[test]
    fn frame_rate_must_give_a_nonzero_period() {
        assert_eq!(rejected_key(&[("FRAME_RATE_HZ", "0")]), "FRAME_RATE_HZ");
        assert_eq!(rejected_key(&[("FRAME_RATE_HZ", "2000000")]), "FRAME_RATE_HZ");

        let fastest = config_from(&[("FRAME_RATE_HZ", "1000000")]).unwrap();
        assert_eq!(frame_period(fastest.frame_rate_hz), Duration::from_micros(1));
    }

    #[test]
    fn speeds_must_be_finite() {
        assert_eq!(rejected_key(&[("PROJECTILE_SPEED", "NaN")]), "PROJECTILE_SPEED");
        assert_eq!(rejected_key(&[("PROJECTILE_SPEED", "inf")]), "PROJECTILE_SPEED");
        assert_eq!(rejected_key(&[("PLAYER_SPEED", "-inf")]), "PLAYER_SPEED");
        assert_eq!(rejected_key(&[("PLAYER_SPEED", "NaN")]), "PLAYER_SPEED");

        let config = config_from(&[("PROJECTILE_SPEED", "0.5")]).unwrap();
        assert_eq!(config.projectile_speed, 0.5);
    }

    #[test]
    fn ships_must_spawn_with_health() {
        assert_eq!(rejected_key(&[("BOSS_MAX_HEALTH", "0")]), "BOSS_MAX_HEALTH");
        assert_eq!(rejected_key(&[("PLAYER_MAX_HEALTH", "0")]), "PLAYER_MAX_HEALTH");
    }

    #[test]
    fn empty_viewport_is_rejected() {
        assert_eq!(rejected_key(&[("VIEWPORT_HEIGHT", "0")]), "VIEWPORT_HEIGHT");
    }

    #[test]
    fn rejected_value_is_reported_verbatim() {
        let err = config_from(&[("BOSS_MAX_HEALTH", " 0")]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for BOSS_MAX_HEALTH: \" 0\"");
    }
}
