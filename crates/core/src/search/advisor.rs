//! Blind-step advisor shared by both engines. When a cell has no
//! useful known neighbor, the agent still has to move somewhere; this
//! module picks the one-step direction that leans away from known
//! danger. It does not reveal anything or touch costs itself.

use crate::types::Pos;

use super::nodes::{CellStatus, NodeTable};
use super::visibility::RING1;

/// Picks a one-step destination from `from`, or `None` when every
/// direction is off-grid or the chosen cell is not worth entering.
///
/// Each in-bounds direction scores how many known-deadly cells in the
/// two-cell band around `from` lie within one step of its destination;
/// the first direction in ring order with the lowest score wins. The
/// move is rejected when the destination is itself deadly, or already
/// carries a cost no worse than stepping there now would assign.
pub(super) fn blind_step(table: &NodeTable, from: Pos) -> Option<Pos> {
    let mut danger = [u32::MAX; 8];
    let mut dests = [from; 8];
    for (dir, &(dy, dx)) in RING1.iter().enumerate() {
        let dest = Pos { y: from.y + dy, x: from.x + dx };
        if table.in_bounds(dest) {
            danger[dir] = 0;
            dests[dir] = dest;
        }
    }

    for cell in band(from) {
        if !table.in_bounds(cell) || table.node(cell).status != CellStatus::Blocked {
            continue;
        }
        for dir in 0..8 {
            if danger[dir] != u32::MAX && chebyshev(dests[dir], cell) <= 1 {
                danger[dir] += 1;
            }
        }
    }

    let (dir, &best) = danger
        .iter()
        .enumerate()
        .min_by_key(|&(_, score)| score)?;
    if best == u32::MAX {
        return None;
    }
    let dest = dests[dir];
    let node = table.node(dest);
    if node.status == CellStatus::Blocked {
        return None;
    }
    let stepped = table.node(from).cost.unwrap_or(0) + 1;
    if node.cost.is_some_and(|g| g <= stepped) {
        return None;
    }
    Some(dest)
}

/// The two-cell band scanned for danger: the rows two above and below
/// across three columns, and the columns two left and right across
/// three rows.
fn band(from: Pos) -> impl Iterator<Item = Pos> {
    let rows = [-2, 2]
        .into_iter()
        .flat_map(move |dy| (-1..=1).map(move |dx| Pos { y: from.y + dy, x: from.x + dx }));
    let cols = [-2, 2]
        .into_iter()
        .flat_map(move |dx| (-1..=1).map(move |dy| Pos { y: from.y + dy, x: from.x + dx }));
    rows.chain(cols)
}

fn chebyshev(a: Pos, b: Pos) -> i32 {
    (a.y - b.y).abs().max((a.x - b.x).abs())
}

#[cfg(test)]
mod tests {
    #![allow(unused_imports)]
    use super::*;

    #[test]
    fn prefers_the_first_direction_when_nothing_is_known() {
        let mut table = NodeTable::new(9);
        let from = Pos { y: 4, x: 4 };
        table.node_mut(from).cost = Some(0);
        // no danger anywhere: ring order decides, straight up wins
        assert_eq!(blind_step(&table, from), Some(Pos { y: 5, x: 4 }));
    }

    #[test]
    fn steers_away_from_blocked_cells_in_the_band() {
        let mut table = NodeTable::new(9);
        let from = Pos { y: 4, x: 4 };
        table.node_mut(from).cost = Some(0);
        // deadly cells two rows up push the choice off the upward arc
        table.block(Pos { y: 6, x: 3 });
        table.block(Pos { y: 6, x: 4 });
        table.block(Pos { y: 6, x: 5 });
        let dest = blind_step(&table, from).expect("some direction is safe");
        assert_ne!(dest, Pos { y: 5, x: 4 });
        assert!(dest.y <= 4);
    }

    #[test]
    fn rejects_destinations_that_would_not_improve() {
        let mut table = NodeTable::new(9);
        let from = Pos { y: 4, x: 4 };
        table.node_mut(from).cost = Some(3);
        let up = Pos { y: 5, x: 4 };
        table.node_mut(up).cost = Some(2);
        assert_eq!(blind_step(&table, from), None);
    }

    #[test]
    fn rejects_a_blocked_destination() {
        // on a 3x3 grid the danger band around the center is entirely
        // off-grid, so the preferred upward cell is chosen and then
        // rejected for being deadly rather than redirected
        let mut table = NodeTable::new(3);
        let from = Pos { y: 1, x: 1 };
        table.node_mut(from).cost = Some(0);
        table.block(Pos { y: 2, x: 1 });
        assert_eq!(blind_step(&table, from), None);
    }
}
