//! Hazard queries the planner consumes but does not compute.
//! Implementations own blast propagation and fuse timing; this crate only asks questions.

use std::collections::BTreeSet;

use crate::state::Grid;
use crate::types::{EnemyScope, PlayerId, Pos};

/// A bomb that does not exist yet, used to ask "what would this cover".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HypotheticalBomb {
    pub owner: Option<PlayerId>,
    pub cell: Pos,
    pub fuse_ms: u32,
    pub radius: u32,
}

pub trait ThreatOracle: Send + Sync {
    /// Whether `cell` is about to be covered by a blast.
    fn is_imminent_bomb_at(&self, cell: Pos) -> bool;

    /// Cells a blast from `bomb` would cover on `grid`.
    fn bomb_coverage(&self, bomb: &HypotheticalBomb, grid: &Grid) -> BTreeSet<Pos>;

    fn is_enemy_within_bomb_range(&self, agent: PlayerId, scope: EnemyScope) -> bool;

    /// Cells covered by live bombs or blasts right now.
    fn tiles_affected_by_bombs(&self) -> BTreeSet<Pos>;
}
