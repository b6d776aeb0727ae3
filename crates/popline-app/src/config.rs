//! Host configuration, read from a TOML file.
//!
//! Every key is optional. A minimal file might be:
//!
//! ```toml
//! seed = 7
//! difficulty = "Hard"
//!
//! [[towers]]
//! kind = "DartMonkey"
//! x = 100.0
//! y = 200.0
//! upgrades = ["Path2", "Path2"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use popline_core::enums::{Difficulty, GameSpeed, TowerKind, UpgradePath};
use popline_sim::SimConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A tower the session places before the first wave, with the upgrades
/// to buy for it in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerPlacement {
    pub kind: TowerKind,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub upgrades: Vec<UpgradePath>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub seed: u64,
    pub difficulty: Difficulty,
    /// Run at the fast game speed.
    pub fast: bool,
    /// Drive the session from the 30 Hz loop thread instead of ticking
    /// as fast as possible.
    pub realtime: bool,
    /// Stop after this many ticks even if the game is not over.
    pub max_ticks: u64,
    /// Start the next wave as soon as the field is clear.
    pub auto_start_waves: bool,
    pub towers: Vec<TowerPlacement>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            difficulty: Difficulty::default(),
            fast: false,
            realtime: false,
            max_ticks: 50_000,
            auto_start_waves: true,
            towers: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn speed(&self) -> GameSpeed {
        if self.fast {
            GameSpeed::Fast
        } else {
            GameSpeed::Normal
        }
    }

    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            seed: self.seed,
            speed: self.speed(),
            difficulty: self.difficulty,
            ..Default::default()
        }
    }
}
