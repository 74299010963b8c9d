//! Perception and movement neighborhoods. This module exists to pin
//! the scan order of both rings, which the engines rely on for
//! deterministic tie-breaking. It does not own any search state.

use crate::types::{Pos, VisionPattern};

/// One-step moves and ring-1 perception, clockwise from straight up
/// (positive y). Also the priority order of the blind-step advisor.
pub(crate) const RING1: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Ring-2 perception: the twelve cells at Chebyshev distance two that
/// are within Euclidean distance two. The agent sees these without
/// seeing the ring-1 cells in between.
pub(crate) const RING2: [(i32, i32); 12] = [
    (-1, 2),
    (0, 2),
    (1, 2),
    (2, 1),
    (2, 0),
    (2, -1),
    (1, -2),
    (0, -2),
    (-1, -2),
    (-2, -1),
    (-2, 0),
    (-2, 1),
];

impl VisionPattern {
    pub(crate) fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Self::Ring1 => &RING1,
            Self::Ring2 => &RING2,
        }
    }
}

/// Cells revealed from `pos`, clipped to the grid and in ring order.
pub(crate) fn visible_from(pos: Pos, pattern: VisionPattern, size: usize) -> Vec<Pos> {
    clip(pos, pattern.offsets(), size)
}

/// Cells reachable in one move from `pos`. Movement is ring-1 under
/// both perception patterns.
pub(crate) fn step_neighbors(pos: Pos, size: usize) -> Vec<Pos> {
    clip(pos, &RING1, size)
}

fn clip(pos: Pos, offsets: &[(i32, i32)], size: usize) -> Vec<Pos> {
    let limit = size as i32;
    offsets
        .iter()
        .map(|&(dy, dx)| Pos { y: pos.y + dy, x: pos.x + dx })
        .filter(|p| p.y >= 0 && p.x >= 0 && p.y < limit && p.x < limit)
        .collect()
}
