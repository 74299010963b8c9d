//! Text rendering of a grid, highest row first so the origin sits in
//! the lower left corner. A route overlays `$` marks on empty cells
//! and leaves entity symbols visible.

use stealth_core::{Grid, Pos, Route};

pub fn render(grid: &Grid, route: Option<&Route>) -> String {
    let size = grid.size() as i32;
    let mut out = String::with_capacity((grid.size() * 3 + 1) * grid.size());
    for y in (0..size).rev() {
        for x in 0..size {
            let pos = Pos { y, x };
            let symbol = match grid.at(pos) {
                Some(entity) => entity.symbol(),
                None if on_route(route, pos) => '$',
                None => '.',
            };
            out.push(' ');
            out.push(symbol);
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

fn on_route(route: Option<&Route>, pos: Pos) -> bool {
    route.is_some_and(|r| r.waypoints.contains(&pos))
}
