use serde::Deserialize;
use std::path::Path;

use crate::error::ConfigError;
use crate::items::LootTable;

pub const GAME_WIDTH: f32 = 800.0;
pub const GAME_HEIGHT: f32 = 600.0;
pub const HUD_HEIGHT: f32 = 60.0;
pub const SCREEN_WIDTH: f32 = GAME_WIDTH;
pub const SCREEN_HEIGHT: f32 = GAME_HEIGHT + HUD_HEIGHT;

pub const TILE_SIZE: f32 = 50.0;
pub const WALL_THICKNESS: f32 = 40.0;
pub const EXIT_SIZE: f32 = 100.0;
pub const CAVE_EXIT_SIZE: f32 = 50.0;
pub const TICKS_PER_SECOND: u32 = 60;

const CONFIG_SEED_ENV: &str = "TRIQUEST_SEED";

fn default_world_size() -> i32 {
    3
}

fn default_max_health() -> u32 {
    6
}

fn default_invincibility() -> u32 {
    90
}

fn default_respawn_delay() -> u32 {
    180
}

fn default_drop_lifetime() -> u32 {
    240
}

fn default_stairs_delay() -> u32 {
    90
}

fn default_shop_price() -> u32 {
    50
}

fn default_sound_dir() -> String {
    "assets/sound".to_string()
}

fn default_volume() -> f32 {
    0.6
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub sound_dir: String,
    pub start_muted: bool,
    pub music_volume: f32,
    pub effects_volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sound_dir: default_sound_dir(),
            start_muted: false,
            music_volume: default_volume(),
            effects_volume: default_volume(),
        }
    }
}

/// Runtime tunables. Geometry stays in the constants above.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub seed: Option<u64>,
    pub world_width: i32,
    pub world_height: i32,
    pub player_max_health: u32,
    pub invincibility_ticks: u32,
    pub respawn_delay: u32,
    pub drop_lifetime: u32,
    pub stairs_reveal_delay: u32,
    pub shop_price: u32,
    pub loot: LootTable,
    pub audio: AudioConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            world_width: default_world_size(),
            world_height: default_world_size(),
            player_max_health: default_max_health(),
            invincibility_ticks: default_invincibility(),
            respawn_delay: default_respawn_delay(),
            drop_lifetime: default_drop_lifetime(),
            stairs_reveal_delay: default_stairs_delay(),
            shop_price: default_shop_price(),
            loot: LootTable::default(),
            audio: AudioConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Self = if is_json(path) {
            serde_json::from_str(&raw)?
        } else {
            serde_yaml::from_str(&raw)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads `path` when it exists, otherwise falls back to defaults. The
    /// seed env var wins over whatever the file says.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::load(path).unwrap_or_else(|err| {
                log::warn!("ignoring config '{}': {err}", path.display());
                Self::default()
            })
        } else {
            log::info!("no config at '{}', using defaults", path.display());
            Self::default()
        };

        if let Ok(raw) = std::env::var(CONFIG_SEED_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(seed) => config.seed = Some(seed),
                Err(err) => log::warn!("{CONFIG_SEED_ENV}='{raw}' is not a seed: {err}"),
            }
        }
        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world_width < 3 || self.world_height < 3 {
            return Err(ConfigError::Invalid(format!(
                "world must be at least 3x3, got {}x{}",
                self.world_width, self.world_height
            )));
        }
        if self.player_max_health == 0 || self.player_max_health % 2 != 0 {
            return Err(ConfigError::Invalid(format!(
                "player_max_health must be a positive even number, got {}",
                self.player_max_health
            )));
        }
        if self.loot.total() > 100 {
            return Err(ConfigError::Invalid(format!(
                "loot partition covers {}% of the roll",
                self.loot.total()
            )));
        }
        Ok(())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.respawn_delay, 180);
        assert_eq!(config.loot.total(), 60);
    }

    #[test]
    fn yaml_fills_missing_fields() {
        let config: GameConfig = serde_yaml::from_str("seed: 9\nshop_price: 20\n").unwrap();
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.shop_price, 20);
        assert_eq!(config.world_width, 3);
        assert_eq!(config.audio.sound_dir, "assets/sound");
    }

    #[test]
    fn json_config_parses() {
        let config: GameConfig =
            serde_json::from_str(r#"{"respawn_delay": 30, "loot": {"health": 50}}"#).unwrap();
        assert_eq!(config.respawn_delay, 30);
        assert_eq!(config.loot.health, 50);
        assert_eq!(config.loot.low_rupee, 30);
    }

    #[test]
    fn rejects_small_world_and_odd_health() {
        let mut config = GameConfig::default();
        config.world_width = 2;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = GameConfig::default();
        config.player_max_health = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_overfull_loot_table() {
        let mut config = GameConfig::default();
        config.loot.health = 80;
        assert!(config.validate().is_err());
    }

    #[test]
    fn json_detection_uses_extension() {
        assert!(is_json(Path::new("config.JSON")));
        assert!(!is_json(Path::new("config.yaml")));
        assert!(!is_json(Path::new("config")));
    }
}
