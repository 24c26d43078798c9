//! Session configuration, loadable from TOML.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::state::HUMAN_PLAYER_ID;
use crate::types::PlayerId;

pub const DEFAULT_MAZE_WIDTH: usize = 60;
pub const DEFAULT_MAZE_HEIGHT: usize = 60;
pub const DEFAULT_AGENT_TICK_MS: u64 = 500;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub width: usize,
    pub height: usize,
    pub agent_tick_ms: u64,
    /// Fixed session seed; a runtime seed is drawn when absent.
    pub seed: Option<u64>,
    /// Roster id driven by local key input.
    pub local_player: String,
    /// Whether this peer runs the autonomous racer.
    pub agent_enabled: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_MAZE_WIDTH,
            height: DEFAULT_MAZE_HEIGHT,
            agent_tick_ms: DEFAULT_AGENT_TICK_MS,
            seed: None,
            local_player: HUMAN_PLAYER_ID.to_string(),
            agent_enabled: true,
        }
    }
}

impl SessionConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "maze dimensions must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.agent_tick_ms == 0 {
            return Err(ConfigError::Invalid("agent_tick_ms must be positive".to_string()));
        }
        if self.local_player.is_empty() {
            return Err(ConfigError::Invalid("local_player must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn agent_tick(&self) -> Duration {
        Duration::from_millis(self.agent_tick_ms)
    }

    pub fn local_player_id(&self) -> PlayerId {
        PlayerId::new(self.local_player.clone())
    }
}
