//! Breadth-first exploration primitives shared by the escape, pickup and enclosure searches.

use std::collections::{BTreeSet, VecDeque};
use std::ops::ControlFlow;

use super::node::{NodeArena, NodeRef, SearchNode};
use crate::state::Grid;
use crate::types::{Action, Plan, Pos};

/// FIFO exploration from `start`. Every dequeued node is handed to `visit`, the start
/// included; exploration ends when `visit` breaks or the frontier empties. Only cells
/// accepted by `can_enter` are enqueued, each at most once.
pub(super) fn breadth_first<CanEnter, Visit>(
    start: Pos,
    can_enter: CanEnter,
    mut visit: Visit,
) -> NodeArena
where
    CanEnter: Fn(Pos) -> bool,
    Visit: FnMut(&SearchNode, NodeRef) -> ControlFlow<()>,
{
    let mut arena = NodeArena::default();
    let mut seen = BTreeSet::from([start]);
    let mut queue = VecDeque::new();
    queue.push_back(arena.push(SearchNode { pos: start, g: 0, h: 0, parent: None }));

    while let Some(current) = queue.pop_front() {
        let node = *arena.get(current);
        if visit(&node, current).is_break() {
            break;
        }
        for action in Action::DIRECTIONS {
            let next = node.pos.step(action);
            if !can_enter(next) || !seen.insert(next) {
                continue;
            }
            let child = SearchNode { pos: next, g: node.g + 1, h: 0, parent: Some(current) };
            queue.push_back(arena.push(child));
        }
    }

    arena
}

/// Walkable for breadth-first movement: directly passable and not holding a bomb.
pub(super) fn open_cell(grid: &Grid, bomb_cells: &BTreeSet<Pos>, pos: Pos) -> bool {
    grid.is_directly_passable(pos) && !bomb_cells.contains(&pos)
}

/// Up to `limit` cells outside `danger`, in discovery order, with the arena that
/// reaches them.
pub(super) fn safe_cells(
    grid: &Grid,
    bomb_cells: &BTreeSet<Pos>,
    start: Pos,
    danger: &BTreeSet<Pos>,
    limit: usize,
) -> (NodeArena, Vec<NodeRef>) {
    let mut found = Vec::new();
    let arena = breadth_first(
        start,
        |pos| open_cell(grid, bomb_cells, pos),
        |node, node_ref| {
            if !danger.contains(&node.pos) {
                found.push(node_ref);
                if found.len() >= limit {
                    return ControlFlow::Break(());
                }
            }
            ControlFlow::Continue(())
        },
    );
    (arena, found)
}

/// Route to the first cell outside `danger`.
pub(super) fn first_safe_route(
    grid: &Grid,
    bomb_cells: &BTreeSet<Pos>,
    start: Pos,
    danger: &BTreeSet<Pos>,
) -> Option<Plan> {
    let (arena, found) = safe_cells(grid, bomb_cells, start, danger, 1);
    found.first().map(|node| arena.moves_to(*node))
}

/// Number of distinct walkable, non-danger cells reachable from `start`, counting
/// no further than `cap`.
pub(super) fn reachable_safe_count(
    grid: &Grid,
    danger: &BTreeSet<Pos>,
    start: Pos,
    cap: usize,
) -> usize {
    let is_safe = |pos: Pos| grid.is_directly_passable(pos) && !danger.contains(&pos);
    if !is_safe(start) {
        return 0;
    }
    let mut count = 0;
    breadth_first(start, is_safe, |_, _| {
        count += 1;
        if count >= cap { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
    });
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellKind;

    #[test]
    fn bombs_block_expansion_but_not_the_start_cell() {
        let grid = Grid::parse(&["....."]).expect("grid");
        let bombs = BTreeSet::from([Pos::new(0, 0), Pos::new(2, 0)]);
        let danger = BTreeSet::from([Pos::new(0, 0), Pos::new(1, 0)]);

        let route = first_safe_route(&grid, &bombs, Pos::new(0, 0), &danger);
        assert!(route.is_none(), "bomb at x=2 walls off every safe cell");

        let open = BTreeSet::new();
        let route = first_safe_route(&grid, &open, Pos::new(0, 0), &danger);
        assert_eq!(route, Some(vec![Action::Right, Action::Right]));
    }

    #[test]
    fn safe_cells_stop_at_the_limit_in_discovery_order() {
        let grid = Grid::new(5, 5, CellKind::Blank);
        let danger = BTreeSet::from([Pos::new(2, 2)]);
        let (arena, found) = safe_cells(&grid, &BTreeSet::new(), Pos::new(2, 2), &danger, 3);

        assert_eq!(found.len(), 3);
        let distances: Vec<u32> = found.iter().map(|node| arena.get(*node).g).collect();
        assert_eq!(distances, vec![1, 1, 1]);
    }

    #[test]
    fn reachable_count_is_capped() {
        let grid = Grid::new(5, 5, CellKind::Blank);
        assert_eq!(reachable_safe_count(&grid, &BTreeSet::new(), Pos::new(2, 2), 5), 5);
        assert_eq!(reachable_safe_count(&grid, &BTreeSet::new(), Pos::new(2, 2), 100), 25);

        let danger = BTreeSet::from([Pos::new(2, 2)]);
        assert_eq!(reachable_safe_count(&grid, &danger, Pos::new(2, 2), 5), 0);
    }
}
