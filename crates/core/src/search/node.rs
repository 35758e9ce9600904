//! Per-call node arena with parent links for path backtracking.

use crate::types::{Action, Plan, Pos};

/// One discovered cell. Identity for open/closed membership is `pos` alone;
/// `g`, `h` and `parent` only describe the best route found so far.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct SearchNode {
    pub(super) pos: Pos,
    pub(super) g: u32,
    pub(super) h: u32,
    pub(super) parent: Option<NodeRef>,
}

impl SearchNode {
    pub(super) fn f(&self) -> u32 {
        self.g + self.h
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(super) struct NodeRef(usize);

#[derive(Debug, Default)]
pub(super) struct NodeArena {
    nodes: Vec<SearchNode>,
}

impl NodeArena {
    pub(super) fn push(&mut self, node: SearchNode) -> NodeRef {
        self.nodes.push(node);
        NodeRef(self.nodes.len() - 1)
    }

    pub(super) fn get(&self, node: NodeRef) -> &SearchNode {
        &self.nodes[node.0]
    }

    pub(super) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Walks parent links back to the root and returns the moves in travel order.
    pub(super) fn moves_to(&self, node: NodeRef) -> Plan {
        let mut moves = Vec::new();
        let mut current = self.get(node);
        while let Some(parent) = current.parent {
            let parent_node = self.get(parent);
            if let Some(action) = Action::between(parent_node.pos, current.pos) {
                moves.push(action);
            }
            current = parent_node;
        }
        moves.reverse();
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backtracking_reverses_parent_chain_into_travel_order() {
        let mut arena = NodeArena::default();
        let root = arena.push(SearchNode { pos: Pos::new(0, 0), g: 0, h: 0, parent: None });
        let right = arena.push(SearchNode { pos: Pos::new(1, 0), g: 1, h: 0, parent: Some(root) });
        let down = arena.push(SearchNode { pos: Pos::new(1, 1), g: 2, h: 0, parent: Some(right) });

        assert_eq!(arena.moves_to(down), vec![Action::Right, Action::Down]);
        assert!(arena.moves_to(root).is_empty());
        assert_eq!(arena.len(), 3);
    }
}
