//! Tunable constants for planning and execution, loadable from TOML.
//! Defaults reproduce the arena's stock timings and geometry.

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub geometry: Geometry,
    pub planner: PlannerConfig,
    pub executor: ExecutorConfig,
}

impl AgentConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Geometry { block_size, player_size } = self.geometry;
        if block_size <= 0 {
            return Err(ConfigError::Invalid(format!(
                "block_size must be positive, got {block_size}"
            )));
        }
        if player_size <= 0 || player_size >= block_size {
            return Err(ConfigError::Invalid(format!(
                "player_size must be in 1..{block_size}, got {player_size}"
            )));
        }
        let planner = &self.planner;
        for (name, value) in [
            ("escape_candidates", planner.escape_candidates),
            ("enclosure_min_cells", planner.enclosure_min_cells),
            ("gate_limit_all", planner.gate_limit_all),
            ("gate_limit_humans", planner.gate_limit_humans),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be at least 1")));
            }
        }
        let executor = &self.executor;
        for (name, value) in [
            ("poll_interval_ms", executor.poll_interval_ms),
            ("pause_poll_ms", executor.pause_poll_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be at least 1")));
            }
        }
        Ok(())
    }
}

/// Pixel geometry shared with the physics tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    /// Pixels per grid cell edge.
    pub block_size: i32,
    /// Edge of an agent's square footprint in pixels.
    pub player_size: i32,
}

impl Default for Geometry {
    fn default() -> Self {
        Self { block_size: 64, player_size: 32 }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Safe cells collected by the danger-avoidance search before ranking.
    pub escape_candidates: usize,
    /// Reachable safe cells below which a position counts as an enclosure.
    pub enclosure_min_cells: usize,
    /// Escape must be shorter than this to bomb when any opponent is in range.
    pub gate_limit_all: usize,
    /// Escape must be shorter than this to bomb when a human is in range.
    pub gate_limit_humans: usize,
    pub default_fuse_ms: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            escape_candidates: 4,
            enclosure_min_cells: 5,
            gate_limit_all: 4,
            gate_limit_humans: 5,
            default_fuse_ms: 2000,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    pub poll_interval_ms: u64,
    pub pause_poll_ms: u64,
    /// Polls allowed for one move before it is declared stuck.
    pub stuck_poll_cap: u32,
    pub startup_delay_ms: u64,
    /// Upper bound on a single `Wait` action.
    pub standoff_ms: u64,
    pub decision_interval_ms: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 10,
            pause_poll_ms: 50,
            stuck_poll_cap: 75,
            startup_delay_ms: 500,
            standoff_ms: 2500,
            decision_interval_ms: 50,
        }
    }
}

impl ExecutorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn pause_poll(&self) -> Duration {
        Duration::from_millis(self.pause_poll_ms)
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    pub fn standoff(&self) -> Duration {
        Duration::from_millis(self.standoff_ms)
    }

    pub fn decision_interval(&self) -> Duration {
        Duration::from_millis(self.decision_interval_ms)
    }
}
