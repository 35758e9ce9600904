//! Enemy selection and power-up pickup with de-confliction between agents.

use std::ops::ControlFlow;

use tracing::{debug, trace};

use super::RouteFinder;
use super::bfs;
use crate::state::Player;
use crate::types::{EnemyScope, Plan, PlayerId, Pos};

impl<'a> RouteFinder<'a> {
    /// Cell of the live opponent in `scope` closest to the agent by Manhattan
    /// distance. Ties go to the earliest registered player.
    pub fn nearest_enemy(&self, scope: EnemyScope) -> Option<Pos> {
        let origin = self.agent_cell()?;
        self.enemies(scope).map(|(_, enemy)| enemy.cell).min_by_key(|cell| origin.manhattan(*cell))
    }

    /// Route to the nearest enemy, falling back to any enemy in `scope` that is
    /// reachable when the nearest one is not.
    pub fn route_to_any_enemy(&self, scope: EnemyScope) -> Option<Plan> {
        let start = self.agent_cell()?;
        if let Some(plan) = self.find_route(Some(start), self.nearest_enemy(scope)) {
            return Some(plan);
        }
        self.enemies(scope).find_map(|(_, enemy)| self.find_route(Some(start), Some(enemy.cell)))
    }

    /// Breadth-first route to the closest bonus cell this agent has a claim on. A
    /// claim holds when no other live autonomous agent is strictly closer.
    pub fn route_to_upgrade(&self) -> Option<Plan> {
        let start = self.agent_cell()?;
        let grid = &self.arena.grid;
        let bombs = self.bomb_cells();

        let mut target = None;
        let arena = bfs::breadth_first(
            start,
            |pos| bfs::open_cell(grid, &bombs, pos),
            |node, node_ref| {
                if grid.classify(node.pos).is_bonus() && self.claims_pickup(start, node.pos) {
                    target = Some(node_ref);
                    return ControlFlow::Break(());
                }
                ControlFlow::Continue(())
            },
        );

        let plan = arena.moves_to(target?);
        trace!(?start, len = plan.len(), "route to upgrade");
        Some(plan)
    }

    fn claims_pickup(&self, start: Pos, bonus: Pos) -> bool {
        let own = start.manhattan(bonus);
        let rival = self
            .arena
            .players
            .iter()
            .filter(|(id, player)| *id != self.agent && player.alive && player.is_autonomous())
            .find(|(_, player)| player.cell.manhattan(bonus) < own);
        if let Some((_, rival)) = rival {
            debug!(?bonus, own, rival = %rival.name, "bonus left to a closer agent");
            return false;
        }
        true
    }

    fn enemies(&self, scope: EnemyScope) -> impl Iterator<Item = (PlayerId, &'a Player)> + '_ {
        self.arena.players.iter().filter(move |(id, player)| {
            *id != self.agent
                && player.alive
                && (scope == EnemyScope::AllOpponents || !player.is_autonomous())
        })
    }
}
