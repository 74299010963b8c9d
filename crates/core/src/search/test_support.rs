//! Shared layouts and assertions for the engine tests.

use crate::grid::Grid;
use crate::scenario::{Scenario, SentrySpec};
use crate::types::{EntityKind, Pos, Route, VisionPattern};

/// The hand-checked reference layout: two radius-one sentries, the
/// relic across the grid and the exit back near the start column.
pub(crate) fn scenario_a(vision: VisionPattern) -> Scenario {
    Scenario {
        size: 9,
        vision,
        start: Pos { y: 0, x: 0 },
        sentries: vec![
            SentrySpec { pos: Pos { y: 2, x: 4 }, radius: 1 },
            SentrySpec { pos: Pos { y: 7, x: 2 }, radius: 1 },
        ],
        relic: Pos { y: 4, x: 7 },
        cloak: Pos { y: 8, x: 0 },
        exit: Pos { y: 4, x: 1 },
    }
}

/// No hostiles at all: relic in the center, exit in the far corner,
/// so the optimal route is eight diagonal steps.
pub(crate) fn open_field(vision: VisionPattern) -> Scenario {
    Scenario {
        size: 9,
        vision,
        start: Pos { y: 0, x: 0 },
        sentries: vec![],
        relic: Pos { y: 4, x: 4 },
        cloak: Pos { y: 0, x: 8 },
        exit: Pos { y: 8, x: 8 },
    }
}

/// Five sentries whose zones cover every cell adjacent to the relic
/// while the relic itself and one far-perception vantage stay clear.
/// The relic can be spotted from outside but only entered cloaked.
pub(crate) fn cloak_gauntlet(vision: VisionPattern) -> Scenario {
    Scenario {
        size: 9,
        vision,
        start: Pos { y: 8, x: 8 },
        sentries: vec![
            SentrySpec { pos: Pos { y: 2, x: 3 }, radius: 1 },
            SentrySpec { pos: Pos { y: 2, x: 5 }, radius: 1 },
            SentrySpec { pos: Pos { y: 4, x: 2 }, radius: 1 },
            SentrySpec { pos: Pos { y: 4, x: 6 }, radius: 1 },
            SentrySpec { pos: Pos { y: 6, x: 3 }, radius: 1 },
        ],
        relic: Pos { y: 4, x: 4 },
        cloak: Pos { y: 8, x: 0 },
        exit: Pos { y: 0, x: 0 },
    }
}

/// Checks everything a route must satisfy regardless of engine:
/// endpoints, single-step moves, the relic before the exit, no sentry
/// cell ever, and watch cells only after the cloak was picked up.
pub(crate) fn assert_route_lawful(grid: &Grid, route: &Route) {
    let points = &route.waypoints;
    assert!(!points.is_empty(), "route has no waypoints");
    assert_eq!(points[0], grid.start(), "route must begin at the start cell");
    assert_eq!(*points.last().unwrap(), grid.exit(), "route must end at the exit");

    for pair in points.windows(2) {
        let dy = (pair[1].y - pair[0].y).abs();
        let dx = (pair[1].x - pair[0].x).abs();
        assert_eq!(dy.max(dx), 1, "non-adjacent waypoints {:?} -> {:?}", pair[0], pair[1]);
    }

    let relic_at = points
        .iter()
        .position(|&pos| grid.kind_at(pos) == Some(EntityKind::Relic))
        .expect("route must pass the relic");
    assert!(relic_at < points.len() - 1, "relic must come before the exit");

    let cloak_at = points
        .iter()
        .position(|&pos| grid.kind_at(pos) == Some(EntityKind::Cloak));
    for (idx, &pos) in points.iter().enumerate() {
        match grid.kind_at(pos) {
            Some(EntityKind::Sentry) => panic!("route enters a sentry cell at {pos:?}"),
            Some(EntityKind::Watch) => {
                let covered = cloak_at.is_some_and(|c| c < idx);
                assert!(covered, "watch cell {pos:?} entered without the cloak");
            }
            _ => {}
        }
    }
}
