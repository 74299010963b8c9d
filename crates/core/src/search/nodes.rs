//! Per-cell knowledge accumulated during a search. This module exists
//! to give both engines one flat table for costs, predecessors and
//! danger marks. It does not own the grid or any frontier structure.

use crate::types::Pos;

use super::euclid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum CellStatus {
    /// Never seen; the engine knows nothing about this cell.
    Unvisited,
    /// Seen (or stepped onto) and still a candidate for expansion.
    Open,
    /// Expanded; its cost from the leg origin is final.
    Closed,
    /// Known deadly. Blocked cells stay blocked across leg resets.
    Blocked,
}

#[derive(Clone, Copy, Debug)]
pub(super) struct CellNode {
    pub status: CellStatus,
    /// Steps from the current leg origin, unknown until first reached.
    pub cost: Option<u32>,
    pub heuristic: u32,
    /// Whether the walk that reached this cell had picked up the cloak.
    pub immune: bool,
    pub prev: Option<Pos>,
}

const UNKNOWN: CellNode = CellNode {
    status: CellStatus::Unvisited,
    cost: None,
    heuristic: 0,
    immune: false,
    prev: None,
};

pub(super) struct NodeTable {
    size: usize,
    nodes: Vec<CellNode>,
}

impl NodeTable {
    pub fn new(size: usize) -> Self {
        Self { size, nodes: vec![UNKNOWN; size * size] }
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.y >= 0 && pos.x >= 0 && (pos.y as usize) < self.size && (pos.x as usize) < self.size
    }

    pub fn node(&self, pos: Pos) -> CellNode {
        self.nodes[self.index(pos)]
    }

    pub fn node_mut(&mut self, pos: Pos) -> &mut CellNode {
        let idx = self.index(pos);
        &mut self.nodes[idx]
    }

    /// Marks a cell deadly, discarding whatever walk had reached it.
    pub fn block(&mut self, pos: Pos) {
        let node = self.node_mut(pos);
        node.status = CellStatus::Blocked;
        node.cost = None;
        node.prev = None;
        node.immune = false;
    }

    /// Walks predecessor links back from `goal` to the leg origin and
    /// returns the chain in walking order, origin first.
    pub fn reconstruct(&self, goal: Pos) -> Vec<Pos> {
        let mut chain = vec![goal];
        let mut cursor = goal;
        while let Some(prev) = self.node(cursor).prev {
            chain.push(prev);
            cursor = prev;
        }
        chain.reverse();
        chain
    }

    /// Clears costs and predecessors for the next leg while keeping
    /// every danger mark, and re-aims all heuristics at `target`.
    pub fn reset_for_target(&mut self, target: Pos) {
        for idx in 0..self.nodes.len() {
            let pos = self.pos_of(idx);
            let node = &mut self.nodes[idx];
            if node.status == CellStatus::Blocked {
                continue;
            }
            node.status = CellStatus::Unvisited;
            node.cost = None;
            node.prev = None;
            node.immune = false;
            node.heuristic = euclid(pos, target);
        }
    }

    /// Re-aims heuristics at `target` without touching anything else.
    /// Used when the relic first comes into view mid-search.
    pub fn refresh_heuristics(&mut self, target: Pos) {
        for idx in 0..self.nodes.len() {
            let pos = self.pos_of(idx);
            self.nodes[idx].heuristic = euclid(pos, target);
        }
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.nodes.len()).map(|idx| self.pos_of(idx))
    }

    fn index(&self, pos: Pos) -> usize {
        debug_assert!(pos.y >= 0 && pos.x >= 0);
        (pos.y as usize) * self.size + (pos.x as usize)
    }

    fn pos_of(&self, idx: usize) -> Pos {
        Pos { y: (idx / self.size) as i32, x: (idx % self.size) as i32 }
    }
}
