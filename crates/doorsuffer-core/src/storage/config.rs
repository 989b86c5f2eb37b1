//! TOML-based engine configuration.
//!
//! Stores the engine tunables:
//! - Completed-goal threshold that unlocks the Pomodoro feature
//! - Advisory sweep interval for host timers
//! - Whether a fresh profile is seeded with starter goals
//!
//! Configuration is stored at `~/.config/doorsuffer/config.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Engine configuration.
///
/// Serialized to/from TOML at `~/.config/doorsuffer/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Completed goals required before the Pomodoro feature unlocks.
    #[serde(default = "default_pomodoro_unlock_threshold")]
    pub pomodoro_unlock_threshold: u32,
    /// How often a host should invoke the overdue sweep, in seconds.
    /// Advisory: the engine itself is caller-driven.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    /// Seed starter goals when no goals snapshot exists yet.
    #[serde(default = "default_true")]
    pub seed_default_goals: bool,
}

fn default_pomodoro_unlock_threshold() -> u32 {
    5
}
fn default_sweep_interval_secs() -> u64 {
    60
}
fn default_true() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pomodoro_unlock_threshold: default_pomodoro_unlock_threshold(),
            sweep_interval_secs: default_sweep_interval_secs(),
            seed_default_goals: default_true(),
        }
    }
}

impl EngineConfig {
    fn config_path() -> Result<PathBuf, ConfigError> {
        let dir = super::data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/doorsuffer"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, falling back to defaults when the file is absent.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Write the configuration to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path()?;
        let raw = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(&path, raw).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }
}
