//! Entry point for the two pathfinding engines. Both work online:
//! the grid is only learned through the agent's perception ring, and
//! each call runs against a private copy of the search bookkeeping.

mod advisor;
mod astar;
mod backtrack;
mod nodes;
pub(crate) mod visibility;

#[cfg(test)]
pub(crate) mod test_support;
#[cfg(test)]
mod tests;

use crate::grid::Grid;
use crate::types::{Algorithm, Pos, SearchOutcome, SearchStats};

/// Runs the chosen engine and returns the route with its counters.
/// A grid flagged unwinnable short-circuits to no-path without
/// expanding a single node.
pub fn find_minimal_path(algorithm: Algorithm, grid: &Grid) -> SearchOutcome {
    if grid.is_unwinnable() {
        return SearchOutcome { route: None, stats: SearchStats::default() };
    }
    match algorithm {
        Algorithm::AStar => astar::run(grid),
        Algorithm::Backtracking => backtrack::run(grid),
    }
}

/// Straight-line distance floored to whole steps. Never overestimates
/// the diagonal step count, so the best-first engine stays admissible.
pub(crate) fn euclid(a: Pos, b: Pos) -> u32 {
    let dy = f64::from(a.y - b.y);
    let dx = f64::from(a.x - b.x);
    (dy * dy + dx * dx).sqrt() as u32
}

#[cfg(test)]
mod euclid_tests {
    #![allow(unused_imports)]
    use super::*;

    #[test]
    fn euclid_floors_to_whole_steps() {
        let origin = Pos { y: 0, x: 0 };
        assert_eq!(euclid(origin, origin), 0);
        assert_eq!(euclid(origin, Pos { y: 3, x: 4 }), 5);
        assert_eq!(euclid(origin, Pos { y: 1, x: 1 }), 1);
        assert_eq!(euclid(origin, Pos { y: 2, x: 2 }), 2);
        assert_eq!(euclid(Pos { y: 5, x: 1 }, Pos { y: 0, x: 0 }), 5);
    }
}
