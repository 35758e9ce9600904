//! Enemy approach through soft blocks: bomb, hide, wait, return, advance.

use tracing::{debug, trace};

use super::RouteFinder;
use super::{astar, bfs};
use crate::threat::HypotheticalBomb;
use crate::types::{Action, CellKind, Plan, Pos};

impl RouteFinder<'_> {
    /// Route to `goal` that treats soft blocks as removable. Each soft block on the
    /// nominal route is preceded by a bomb placement, an escape on the simulated
    /// grid, a wait and the escape replayed backwards. If some bomb has no escape
    /// the plan ends right after that placement.
    pub fn plan_to_enemy(&self, start: Option<Pos>, goal: Option<Pos>) -> Option<Plan> {
        let (start, goal) = self.endpoints(start, goal)?;
        let radius = self.agent()?.bomb_range;
        let grid = &self.arena.grid;
        let nominal = astar::astar(start, goal, |pos| grid.is_passable_through_soft(pos))?;
        trace!(?start, ?goal, len = nominal.len(), "nominal route through soft blocks");

        let bombs = self.bomb_cells();
        let mut simulated = grid.clone();
        let mut cursor = start;
        let mut plan = Vec::with_capacity(nominal.len());

        for step in nominal {
            let next = cursor.step(step);
            if simulated.classify(next) == CellKind::Soft {
                plan.push(Action::PlaceBomb);
                let bomb = HypotheticalBomb {
                    owner: Some(self.agent),
                    cell: cursor,
                    fuse_ms: self.config.default_fuse_ms,
                    radius,
                };
                let coverage = self.oracle.bomb_coverage(&bomb, &simulated);
                let Some(escape) = bfs::first_safe_route(&simulated, &bombs, cursor, &coverage)
                else {
                    debug!(?cursor, blocked = ?next, "no cover from planned bomb, truncating");
                    return Some(plan);
                };
                plan.extend_from_slice(&escape);
                plan.push(Action::Wait);
                plan.extend(reverse_moves(&escape));
            }
            plan.push(step);
            cursor = next;
            simulated.set(cursor, CellKind::Blank);
        }

        Some(plan)
    }
}

/// The moves that retrace `moves` back to where they started. Non-directional
/// actions are dropped.
pub fn reverse_moves(moves: &[Action]) -> Plan {
    moves.iter().rev().filter_map(|action| action.inverse()).collect()
}
