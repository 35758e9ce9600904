//! Reference blast model: straight-line crosses that stop at solid terrain.
//! Games supply their own oracle; this one backs the CLI, the fuzzer and tests.

use std::collections::BTreeSet;

use bomber_ai::{
    Action, Arena, CellKind, Controller, EnemyScope, Grid, HypotheticalBomb, PlayerId, Pos,
    ThreatOracle,
};

/// Cells covered by a blast of `radius` from `origin`. Each arm stops before solid
/// or hole cells and stops after the first soft block it covers.
pub fn cross_blast(origin: Pos, radius: u32, grid: &Grid) -> BTreeSet<Pos> {
    let mut covered = BTreeSet::from([origin]);
    for action in Action::DIRECTIONS {
        let mut pos = origin;
        for _ in 0..radius {
            pos = pos.step(action);
            match grid.classify(pos) {
                CellKind::Solid | CellKind::Hole => break,
                CellKind::Soft => {
                    covered.insert(pos);
                    break;
                }
                _ => {
                    covered.insert(pos);
                }
            }
        }
    }
    covered
}

#[derive(Clone, Debug)]
struct LiveBomb {
    cell: Pos,
    radius: u32,
    fuse_ms: u32,
}

#[derive(Clone, Debug)]
struct Combatant {
    id: PlayerId,
    cell: Pos,
    alive: bool,
    controller: Controller,
    bomb_range: u32,
}

/// Oracle over a frozen copy of an arena.
#[derive(Clone, Debug)]
pub struct CrossBlastOracle {
    grid: Grid,
    bombs: Vec<LiveBomb>,
    players: Vec<Combatant>,
    /// Bombs with at most this much fuse left make their coverage imminent.
    imminent_fuse_ms: u32,
}

impl CrossBlastOracle {
    pub fn new(arena: &Arena) -> Self {
        let bombs = arena
            .bombs
            .iter()
            .map(|bomb| LiveBomb {
                cell: bomb.cell(&arena.geometry),
                radius: bomb.radius,
                fuse_ms: bomb.fuse_ms,
            })
            .collect();
        let players = arena
            .players
            .iter()
            .map(|(id, player)| Combatant {
                id,
                cell: player.cell,
                alive: player.alive,
                controller: player.controller,
                bomb_range: player.bomb_range,
            })
            .collect();
        Self { grid: arena.grid.clone(), bombs, players, imminent_fuse_ms: 500 }
    }

    pub fn with_imminent_fuse(mut self, fuse_ms: u32) -> Self {
        self.imminent_fuse_ms = fuse_ms;
        self
    }
}

impl ThreatOracle for CrossBlastOracle {
    fn is_imminent_bomb_at(&self, cell: Pos) -> bool {
        self.bombs
            .iter()
            .filter(|bomb| bomb.fuse_ms <= self.imminent_fuse_ms)
            .any(|bomb| cross_blast(bomb.cell, bomb.radius, &self.grid).contains(&cell))
    }

    fn bomb_coverage(&self, bomb: &HypotheticalBomb, grid: &Grid) -> BTreeSet<Pos> {
        cross_blast(bomb.cell, bomb.radius, grid)
    }

    fn is_enemy_within_bomb_range(&self, agent: PlayerId, scope: EnemyScope) -> bool {
        let Some(me) = self.players.iter().find(|player| player.id == agent) else {
            return false;
        };
        let reach = cross_blast(me.cell, me.bomb_range, &self.grid);
        self.players.iter().any(|other| {
            other.id != agent
                && other.alive
                && (scope == EnemyScope::AllOpponents || other.controller == Controller::Human)
                && reach.contains(&other.cell)
        })
    }

    fn tiles_affected_by_bombs(&self) -> BTreeSet<Pos> {
        let is_blast = |pos: &Pos| self.grid.classify(*pos) == CellKind::Blast;
        let mut affected: BTreeSet<Pos> = self.grid.positions().filter(is_blast).collect();
        for bomb in &self.bombs {
            affected.extend(cross_blast(bomb.cell, bomb.radius, &self.grid));
        }
        affected
    }
}
