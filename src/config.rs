/// Game configuration.
///
/// Every value has a default, so the game runs without any config file.
/// When `chicken_shooter.toml` exists in the working directory, any section
/// it contains overrides the matching defaults.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "chicken_shooter.toml";

/// Largest accepted playfield width or height, in logical units.  Keeps
/// the terminal cell grid well inside `u16`.
pub const MAX_PLAYFIELD_EXTENT: f32 = 100_000.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Size of the playfield in logical units.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Playfield {
            width: 1200.0,
            height: 800.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub frame_rate: u32,
    pub fire_cooldown_ms: u64,
    pub enemy_spawn_interval_ms: u64,
    pub obstacle_spawn_interval_ms: u64,
}

impl Timing {
    pub fn frame(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.frame_rate.max(1)))
    }

    pub fn fire_cooldown(&self) -> Duration {
        Duration::from_millis(self.fire_cooldown_ms)
    }

    pub fn enemy_spawn_interval(&self) -> Duration {
        Duration::from_millis(self.enemy_spawn_interval_ms)
    }

    pub fn obstacle_spawn_interval(&self) -> Duration {
        Duration::from_millis(self.obstacle_spawn_interval_ms)
    }
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            frame_rate: 60,
            fire_cooldown_ms: 250,
            enemy_spawn_interval_ms: 1000,
            obstacle_spawn_interval_ms: 2000,
        }
    }
}

/// The boss is dormant unless enabled here.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BossConfig {
    pub enabled: bool,
    /// Score at which the boss appears (once per session).
    pub score_threshold: u32,
    /// The boss spawns an escort with probability `1 / spawn_one_in` per frame.
    pub spawn_one_in: u32,
}

impl Default for BossConfig {
    fn default() -> Self {
        BossConfig {
            enabled: false,
            score_threshold: 200,
            spawn_one_in: 50,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory holding `<sprite>.txt` overrides.  Built-in art when unset.
    pub dir: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub file: PathBuf,
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            file: PathBuf::from("chicken_shooter.log"),
            level: "info".to_string(),
        }
    }
}

impl LogConfig {
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.level).map_err(|_| ConfigError::Invalid {
            field: "logging.level",
            reason: format!("unknown log level `{}`", self.level),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub playfield: Playfield,
    pub timing: Timing,
    pub boss: BossConfig,
    pub assets: AssetConfig,
    pub logging: LogConfig,
}

impl GameConfig {
    /// Read `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<GameConfig, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => GameConfig::from_toml_str(&text),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(GameConfig::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<GameConfig, ConfigError> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let extent = |field: &'static str, value: f32| {
            if value.is_finite() && value > 0.0 && value <= MAX_PLAYFIELD_EXTENT {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!(
                        "must be in (0, {}], got {}",
                        MAX_PLAYFIELD_EXTENT, value
                    ),
                })
            }
        };
        extent("playfield.width", self.playfield.width)?;
        extent("playfield.height", self.playfield.height)?;

        if self.timing.frame_rate == 0 {
            return Err(ConfigError::Invalid {
                field: "timing.frame_rate",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.boss.spawn_one_in == 0 {
            return Err(ConfigError::Invalid {
                field: "boss.spawn_one_in",
                reason: "must be at least 1".to_string(),
            });
        }
        self.logging.level_filter()?;
        Ok(())
    }
}
