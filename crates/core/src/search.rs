//! Route planning over a single arena snapshot.
//! This module exists to answer "how do I get there" questions for one agent.
//! It does not own execution, blast physics or any mutable game state.

mod astar;
mod bfs;
mod escape;
mod node;
mod synthesis;
mod targets;

use std::collections::BTreeSet;

use tracing::trace;

use crate::config::PlannerConfig;
use crate::state::{Arena, Player};
use crate::threat::ThreatOracle;
use crate::types::{Plan, PlayerId, Pos};

pub use synthesis::reverse_moves;

/// Planner bound to one agent and one immutable snapshot. Every query is
/// deterministic for identical inputs.
pub struct RouteFinder<'a> {
    arena: &'a Arena,
    agent: PlayerId,
    oracle: &'a dyn ThreatOracle,
    config: &'a PlannerConfig,
}

impl<'a> RouteFinder<'a> {
    pub fn new(
        arena: &'a Arena,
        agent: PlayerId,
        oracle: &'a dyn ThreatOracle,
        config: &'a PlannerConfig,
    ) -> Self {
        Self { arena, agent, oracle, config }
    }

    pub fn agent_cell(&self) -> Option<Pos> {
        self.agent().map(|player| player.cell)
    }

    /// Shortest route through directly passable cells. Bombs are not obstacles here,
    /// and an endpoint off the grid means no route.
    pub fn find_route(&self, start: Option<Pos>, goal: Option<Pos>) -> Option<Plan> {
        let (start, goal) = self.endpoints(start, goal)?;
        let grid = &self.arena.grid;
        astar::astar(start, goal, |pos| grid.is_directly_passable(pos))
    }

    /// Whether fewer than `enclosure_min_cells` walkable, non-danger cells are
    /// reachable from `position`.
    pub fn is_enclosure(&self, danger: &BTreeSet<Pos>, position: Pos) -> bool {
        let cap = self.config.enclosure_min_cells;
        let reachable = bfs::reachable_safe_count(&self.arena.grid, danger, position, cap);
        trace!(?position, reachable, cap, "enclosure check");
        reachable < cap
    }

    /// Both endpoints, if present and on the grid.
    fn endpoints(&self, start: Option<Pos>, goal: Option<Pos>) -> Option<(Pos, Pos)> {
        let (start, goal) = (start?, goal?);
        let grid = &self.arena.grid;
        (grid.in_bounds(start) && grid.in_bounds(goal)).then_some((start, goal))
    }

    fn agent(&self) -> Option<&'a Player> {
        self.arena.player(self.agent)
    }

    fn bomb_cells(&self) -> BTreeSet<Pos> {
        self.arena.bomb_cells().into_iter().collect()
    }
}
