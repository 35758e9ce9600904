//! Danger avoidance and the bomb-placement gate.

use std::collections::BTreeSet;

use tracing::debug;

use super::RouteFinder;
use super::bfs;
use crate::threat::HypotheticalBomb;
use crate::types::{EnemyScope, Plan, Pos};

impl RouteFinder<'_> {
    /// Route from the agent's cell to safety. See [`RouteFinder::escape_from`].
    pub fn escape_from_explosion(&self, danger: &BTreeSet<Pos>) -> Option<Plan> {
        self.escape_from(danger, self.agent_cell()?)
    }

    /// Collects up to `escape_candidates` cells outside `danger` in breadth-first
    /// order and heads for the one farthest from the nearest live human. Cells
    /// holding a bomb are never entered. An empty plan means `start` is already safe.
    pub fn escape_from(&self, danger: &BTreeSet<Pos>, start: Pos) -> Option<Plan> {
        if !self.arena.grid.in_bounds(start) {
            return None;
        }
        let limit = self.config.escape_candidates;
        let (arena, found) =
            bfs::safe_cells(&self.arena.grid, &self.bomb_cells(), start, danger, limit);

        let mut best = None;
        for candidate in found {
            let distance = self.distance_to_nearest_human(arena.get(candidate).pos);
            if best.is_none_or(|(_, best_distance)| distance > best_distance) {
                best = Some((candidate, distance));
            }
        }

        let Some((target, distance)) = best else {
            debug!(?start, danger = danger.len(), "no safe cell reachable");
            return None;
        };
        let plan = arena.moves_to(target);
        debug!(?start, target = ?arena.get(target).pos, distance, len = plan.len(), "escape");
        Some(plan)
    }

    /// Escape route from a bomb dropped on the agent's cell, returned only when an
    /// opponent in `scope` is in range and the escape is short enough for that scope.
    pub fn can_put_bomb_and_escape(&self, scope: EnemyScope) -> Option<Plan> {
        let agent = self.agent()?;
        if !self.oracle.is_enemy_within_bomb_range(self.agent, scope) {
            return None;
        }

        let bomb = HypotheticalBomb {
            owner: Some(self.agent),
            cell: agent.cell,
            fuse_ms: self.config.default_fuse_ms,
            radius: agent.bomb_range,
        };
        let mut danger = self.oracle.tiles_affected_by_bombs();
        danger.extend(self.oracle.bomb_coverage(&bomb, &self.arena.grid));

        let plan = self.escape_from(&danger, agent.cell)?;
        let limit = match scope {
            EnemyScope::AllOpponents => self.config.gate_limit_all,
            EnemyScope::HumansOnly => self.config.gate_limit_humans,
        };
        if plan.len() >= limit {
            debug!(?scope, len = plan.len(), limit, "escape too long to place a bomb");
            return None;
        }
        Some(plan)
    }

    fn distance_to_nearest_human(&self, pos: Pos) -> u32 {
        self.arena
            .players
            .values()
            .filter(|player| player.alive && !player.is_autonomous())
            .map(|player| player.cell.manhattan(pos))
            .min()
            .unwrap_or(u32::MAX)
    }
}
