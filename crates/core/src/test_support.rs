use std::collections::BTreeSet;
use std::sync::Mutex;

use crate::config::{Geometry, PlannerConfig};
use crate::state::{Arena, Bomb, Grid, Player, centred_pixel};
use crate::threat::{HypotheticalBomb, ThreatOracle};
use crate::types::*;

pub(crate) fn arena_from_rows(rows: &[&str]) -> Arena {
    Arena::new(Grid::parse(rows).expect("fixture grid should parse"), Geometry::default())
}

pub(crate) fn add_agent(arena: &mut Arena, name: &str, cell: Pos) -> PlayerId {
    let geometry = arena.geometry;
    arena.add_player(Player::at(name, Controller::Autonomous, cell, &geometry))
}

pub(crate) fn add_human(arena: &mut Arena, name: &str, cell: Pos) -> PlayerId {
    let geometry = arena.geometry;
    arena.add_player(Player::at(name, Controller::Human, cell, &geometry))
}

pub(crate) fn add_bomb(arena: &mut Arena, cell: Pos, radius: u32) {
    let pixel = centred_pixel(cell, &arena.geometry);
    arena.bombs.push(Bomb { owner: None, pixel, fuse_ms: 60_000, radius });
}

/// 13x13 arena with solid pillars on every odd/odd cell, two agents and three
/// long-fused bombs along the diagonal.
pub(crate) struct Checkerboard {
    pub(crate) arena: Arena,
    pub(crate) agent: PlayerId,
    pub(crate) rival: PlayerId,
}

pub(crate) fn checkerboard() -> Checkerboard {
    let mut grid = Grid::new(13, 13, CellKind::Blank);
    for pos in grid.positions().collect::<Vec<_>>() {
        if pos.x % 2 == 1 && pos.y % 2 == 1 {
            grid.set(pos, CellKind::Solid);
        }
    }
    let mut arena = Arena::new(grid, Geometry::default());
    let agent = add_agent(&mut arena, "agent", Pos::new(2, 3));
    let rival = add_agent(&mut arena, "rival", Pos::new(6, 5));
    for cell in [Pos::new(0, 0), Pos::new(2, 2), Pos::new(4, 4)] {
        add_bomb(&mut arena, cell, 5);
    }
    Checkerboard { arena, agent, rival }
}

/// Straight-line blast: stops at solid or hole cells, covers the first soft
/// block it meets and stops there.
pub(crate) fn cross_coverage(cell: Pos, radius: u32, grid: &Grid) -> BTreeSet<Pos> {
    let mut covered = BTreeSet::from([cell]);
    for action in Action::DIRECTIONS {
        let mut pos = cell;
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

/// Oracle with canned answers for the live-state queries and a real cross blast
/// for hypothetical bombs.
#[derive(Debug, Default)]
pub(crate) struct ScriptedOracle {
    pub(crate) enemy_in_range: bool,
    pub(crate) affected: BTreeSet<Pos>,
    pub(crate) imminent: Mutex<BTreeSet<Pos>>,
}

impl ScriptedOracle {
    pub(crate) fn with_enemy_in_range() -> Self {
        Self { enemy_in_range: true, ..Self::default() }
    }

    pub(crate) fn mark_imminent(&self, cell: Pos) {
        self.imminent.lock().expect("oracle lock").insert(cell);
    }
}

impl ThreatOracle for ScriptedOracle {
    fn is_imminent_bomb_at(&self, cell: Pos) -> bool {
        self.imminent.lock().expect("oracle lock").contains(&cell)
    }

    fn bomb_coverage(&self, bomb: &HypotheticalBomb, grid: &Grid) -> BTreeSet<Pos> {
        cross_coverage(bomb.cell, bomb.radius, grid)
    }

    fn is_enemy_within_bomb_range(&self, _agent: PlayerId, _scope: EnemyScope) -> bool {
        self.enemy_in_range
    }

    fn tiles_affected_by_bombs(&self) -> BTreeSet<Pos> {
        self.affected.clone()
    }
}

pub(crate) fn planner() -> PlannerConfig {
    PlannerConfig::default()
}

pub(crate) fn walk(start: Pos, plan: &[Action]) -> Pos {
    plan.iter().fold(start, |pos, action| pos.step(*action))
}
