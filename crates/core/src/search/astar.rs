//! Best-first routing over a uniform-cost grid with a Manhattan heuristic.

use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;

use super::node::{NodeArena, NodeRef, SearchNode};
use crate::types::{Action, Plan, Pos};

/// Open-set entry. Ordering is by `f`, then discovery order, which keeps
/// tie-breaking stable for identical inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    f: u32,
    seq: u64,
    node: NodeRef,
}

/// Shortest route from `start` to `goal` through cells accepted by `passable`.
///
/// The start cell itself is never checked. A coordinate already in the open set
/// is replaced only by a strictly cheaper rediscovery; closed coordinates are never
/// reopened.
pub(super) fn astar<Passable>(start: Pos, goal: Pos, passable: Passable) -> Option<Plan>
where
    Passable: Fn(Pos) -> bool,
{
    let mut arena = NodeArena::default();
    let mut open = BTreeSet::new();
    let mut open_index: BTreeMap<Pos, OpenNode> = BTreeMap::new();
    let mut closed = BTreeSet::new();
    let mut seq = 0u64;

    let root = arena.push(SearchNode { pos: start, g: 0, h: start.manhattan(goal), parent: None });
    let entry = OpenNode { f: arena.get(root).f(), seq, node: root };
    open.insert(entry);
    open_index.insert(start, entry);

    while let Some(current) = open.pop_first() {
        let node = *arena.get(current.node);
        open_index.remove(&node.pos);

        if node.pos == goal {
            trace!(?start, ?goal, cost = node.g, discovered = arena.len(), "route found");
            return Some(arena.moves_to(current.node));
        }
        closed.insert(node.pos);

        for action in Action::DIRECTIONS {
            let next = node.pos.step(action);
            if !passable(next) || closed.contains(&next) {
                continue;
            }
            let g = node.g + 1;
            if let Some(existing) = open_index.get(&next).copied() {
                if g >= arena.get(existing.node).g {
                    continue;
                }
                open.remove(&existing);
            }
            seq += 1;
            let h = next.manhattan(goal);
            let child = arena.push(SearchNode { pos: next, g, h, parent: Some(current.node) });
            let entry = OpenNode { f: g + h, seq, node: child };
            open.insert(entry);
            open_index.insert(next, entry);
        }
    }

    trace!(?start, ?goal, discovered = arena.len(), "open set exhausted");
    None
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use proptest::prelude::*;

    use super::*;
    use crate::state::Grid;
    use crate::types::CellKind;

    fn walk(start: Pos, plan: &[Action]) -> Pos {
        plan.iter().fold(start, |pos, action| pos.step(*action))
    }

    #[test]
    fn start_equal_to_goal_yields_empty_route() {
        let grid = Grid::new(3, 3, CellKind::Blank);
        let plan = astar(Pos::new(1, 1), Pos::new(1, 1), |p| grid.is_directly_passable(p));
        assert_eq!(plan, Some(vec![]));
    }

    #[test]
    fn routes_around_a_wall_with_a_gap() {
        let grid = Grid::parse(&[
            ".....", //
            "###.#", //
            ".....",
        ])
        .expect("grid");
        let start = Pos::new(0, 0);
        let goal = Pos::new(0, 2);
        let plan = astar(start, goal, |p| grid.is_directly_passable(p)).expect("gap is reachable");

        assert_eq!(plan.len(), 3 + 2 + 3);
        assert_eq!(walk(start, &plan), goal);
    }

    #[test]
    fn sealed_wall_has_no_route() {
        let grid = Grid::parse(&[
            "...", //
            "###", //
            "...",
        ])
        .expect("grid");
        assert!(astar(Pos::new(0, 0), Pos::new(2, 2), |p| grid.is_directly_passable(p)).is_none());
    }

    fn bfs_distance(grid: &Grid, start: Pos, goal: Pos) -> Option<u32> {
        let mut seen = BTreeMap::from([(start, 0u32)]);
        let mut queue = VecDeque::from([start]);
        while let Some(pos) = queue.pop_front() {
            let dist = seen[&pos];
            if pos == goal {
                return Some(dist);
            }
            for action in Action::DIRECTIONS {
                let next = pos.step(action);
                if grid.is_directly_passable(next) && !seen.contains_key(&next) {
                    seen.insert(next, dist + 1);
                    queue.push_back(next);
                }
            }
        }
        None
    }

    #[test]
    fn detour_through_pocket_matches_breadth_first_distance() {
        let grid = Grid::parse(&[
            "......", //
            ".####.", //
            ".#..#.", //
            ".#..#.", //
            ".#.##.", //
            "......",
        ])
        .expect("grid");
        let start = Pos::new(2, 2);
        let goal = Pos::new(5, 0);
        let plan = astar(start, goal, |p| grid.is_directly_passable(p)).expect("reachable");
        assert_eq!(Some(plan.len() as u32), bfs_distance(&grid, start, goal));
        assert_eq!(walk(start, &plan), goal);
    }

    proptest! {
        #[test]
        fn open_grid_route_length_is_manhattan(
            sx in 0i32..9, sy in 0i32..9, gx in 0i32..9, gy in 0i32..9,
        ) {
            let grid = Grid::new(9, 9, CellKind::Blank);
            let start = Pos::new(sx, sy);
            let goal = Pos::new(gx, gy);
            let plan = astar(start, goal, |p| grid.is_directly_passable(p));
            let plan = plan.expect("open grid is fully connected");
            prop_assert_eq!(plan.len() as u32, start.manhattan(goal));
            prop_assert_eq!(walk(start, &plan), goal);
        }

        #[test]
        fn route_cost_matches_breadth_first_distance(
            walls in proptest::collection::vec(any::<bool>(), 49),
            gx in 0i32..7, gy in 0i32..7,
        ) {
            let mut grid = Grid::new(7, 7, CellKind::Blank);
            for (idx, wall) in walls.iter().enumerate() {
                if *wall && idx % 3 == 0 {
                    grid.set(Pos::new((idx % 7) as i32, (idx / 7) as i32), CellKind::Solid);
                }
            }
            let start = Pos::new(0, 0);
            let goal = Pos::new(gx, gy);
            grid.set(goal, CellKind::Blank);
            let plan = astar(start, goal, |p| grid.is_directly_passable(p));
            prop_assert_eq!(plan.map(|p| p.len() as u32), bfs_distance(&grid, start, goal));
        }
    }
}
