//! Scenario loading and a reference blast model for exercising the planner outside a game.

pub mod oracle;
pub mod scenario;

pub use oracle::CrossBlastOracle;
pub use scenario::{Scenario, ScenarioError};
