pub mod agent;
pub mod body;
pub mod config;
pub mod executor;
pub mod policy;
pub mod search;
pub mod state;
pub mod threat;
pub mod types;

#[cfg(test)]
mod test_support;

pub use agent::{AgentHandle, spawn_agent};
pub use body::{AgentBody, LiveAgent};
pub use config::{AgentConfig, ConfigError, ExecutorConfig, Geometry, PlannerConfig};
pub use executor::{MovementExecutor, PauseSignal, PlanReport};
pub use policy::{AgentContext, AgentPolicy, Cycle};
pub use search::{RouteFinder, reverse_moves};
pub use state::{Arena, Bomb, Grid, GridParseError, Player, SharedArena};
pub use threat::{HypotheticalBomb, ThreatOracle};
pub use types::*;
