//! Exhaustive engine. This module exists to enumerate cloak usage as
//! explicit leg plans (no cloak, cloak before the relic, cloak after)
//! and keep the cheapest, running each leg as a depth-first sweep that
//! only ever improves cell costs. It does not own the frontier policy
//! of the best-first engine.

use crate::grid::Grid;
use crate::types::{EntityKind, Pos, Route, SearchOutcome, SearchStats};

use super::advisor::blind_step;
use super::nodes::{CellStatus, NodeTable};
use super::visibility::{step_neighbors, visible_from};

#[derive(Clone, Copy, PartialEq, Eq)]
enum LegGoal {
    Relic,
    Exit,
}

/// Positions learned while sweeping. They are facts about the grid,
/// so they carry over from one leg to the next.
#[derive(Default)]
struct Discoveries {
    relic: Option<Pos>,
    cloak: Option<Pos>,
}

struct Candidate {
    cost: u32,
    relic_chain: Vec<Pos>,
    exit_chain: Vec<Pos>,
}

pub(super) fn run(grid: &Grid) -> SearchOutcome {
    BacktrackingSearch {
        grid,
        found: Discoveries::default(),
        stats: SearchStats::default(),
    }
    .run()
}

struct BacktrackingSearch<'g> {
    grid: &'g Grid,
    found: Discoveries,
    stats: SearchStats,
}

impl BacktrackingSearch<'_> {
    fn run(mut self) -> SearchOutcome {
        let start = self.grid.start();

        let mut to_relic = NodeTable::new(self.grid.size());
        seed(&mut to_relic, start);
        self.run_leg(&mut to_relic, start, false, LegGoal::Relic);

        let Some(relic) = self.found.relic else {
            return SearchOutcome { route: None, stats: self.stats };
        };

        let candidate = if let Some(chain) = reached_chain(&to_relic, relic) {
            if chain_passes_cloak(self.grid, &chain) {
                self.exit_with_cloak_in_hand(&to_relic, relic, chain)
            } else {
                self.best_of_three_plans(&to_relic, relic, chain)
            }
        } else {
            // the relic is visible but walled off by watch cells;
            // only a cloaked approach can work
            self.cloak_first_plan(&to_relic, relic)
        };

        let route = candidate.map(|c| {
            let mut waypoints = c.relic_chain;
            waypoints.extend(c.exit_chain.into_iter().skip(1));
            Route { waypoints }
        });
        SearchOutcome { route, stats: self.stats }
    }

    /// The uncloaked walk to the relic happened to pick up the cloak,
    /// so the exit leg is immune either way. A plain leg is still
    /// tried first: when it matches the cloaked leg's cost the route
    /// that stays off watch cells wins.
    fn exit_with_cloak_in_hand(
        &mut self,
        to_relic: &NodeTable,
        relic: Pos,
        chain: Vec<Pos>,
    ) -> Option<Candidate> {
        let prefix_cost = (chain.len() - 1) as u32;

        let mut plain = self.fresh_leg_table(to_relic, relic);
        self.run_leg(&mut plain, relic, false, LegGoal::Exit);
        let mut cloaked = self.fresh_leg_table(to_relic, relic);
        self.run_leg(&mut cloaked, relic, true, LegGoal::Exit);

        let exit = self.grid.exit();
        let plain_cost = plain.node(exit).cost;
        let cloaked_cost = cloaked.node(exit).cost;
        let (table, cost) = match (plain_cost, cloaked_cost) {
            (Some(p), Some(c)) if p <= c => (&plain, p),
            (_, Some(c)) => (&cloaked, c),
            (Some(p), None) => (&plain, p),
            (None, None) => return None,
        };
        Some(Candidate {
            cost: prefix_cost + cost,
            relic_chain: chain,
            exit_chain: table.reconstruct(exit),
        })
    }

    /// Cloak untouched so far: weigh skipping it entirely, grabbing it
    /// before the relic, and grabbing it between relic and exit. Ties
    /// go to the earliest plan in that order, so the cloak is only
    /// spent when it genuinely shortens the route.
    fn best_of_three_plans(
        &mut self,
        to_relic: &NodeTable,
        relic: Pos,
        chain: Vec<Pos>,
    ) -> Option<Candidate> {
        let exit = self.grid.exit();
        let prefix_cost = (chain.len() - 1) as u32;

        let mut to_exit = self.fresh_leg_table(to_relic, relic);
        self.run_leg(&mut to_exit, relic, false, LegGoal::Exit);

        let no_cloak = to_exit.node(exit).cost.map(|g| Candidate {
            cost: prefix_cost + g,
            relic_chain: chain.clone(),
            exit_chain: to_exit.reconstruct(exit),
        });

        let cloak_before_relic = self.cloak_first_plan(to_relic, relic);

        let cloak_before_exit = self.found.cloak.and_then(|cloak| {
            let detour = reached_chain(&to_exit, cloak)?;
            let mut table = NodeTable::new(self.grid.size());
            carry_knowledge(&to_exit, &mut table);
            copy_chain(&to_exit, &mut table, &detour);
            self.run_leg(&mut table, cloak, true, LegGoal::Exit);
            table.node(exit).cost.map(|g| Candidate {
                cost: prefix_cost + g,
                relic_chain: chain.clone(),
                exit_chain: table.reconstruct(exit),
            })
        });

        [no_cloak, cloak_before_relic, cloak_before_exit]
            .into_iter()
            .flatten()
            .reduce(|best, next| if next.cost < best.cost { next } else { best })
    }

    /// Walk to the cloak uncloaked, then cloaked to the relic, then a
    /// cloaked exit leg.
    fn cloak_first_plan(&mut self, to_relic: &NodeTable, relic: Pos) -> Option<Candidate> {
        let cloak = self.found.cloak?;
        let approach = reached_chain(to_relic, cloak)?;

        let mut via_cloak = NodeTable::new(self.grid.size());
        carry_knowledge(to_relic, &mut via_cloak);
        copy_chain(to_relic, &mut via_cloak, &approach);
        self.run_leg(&mut via_cloak, cloak, true, LegGoal::Relic);
        let relic_cost = via_cloak.node(relic).cost?;
        let relic_chain = via_cloak.reconstruct(relic);

        let mut to_exit = self.fresh_leg_table(&via_cloak, relic);
        self.run_leg(&mut to_exit, relic, true, LegGoal::Exit);
        let exit = self.grid.exit();
        let exit_cost = to_exit.node(exit).cost?;
        Some(Candidate {
            cost: relic_cost + exit_cost,
            relic_chain,
            exit_chain: to_exit.reconstruct(exit),
        })
    }

    /// One depth-first sweep toward `goal`. The stack carries the
    /// branch's cloak state; a cell is revisited only when some branch
    /// improves its cost, so every cost is final when the stack runs
    /// dry and the sweep always terminates.
    fn run_leg(&mut self, table: &mut NodeTable, origin: Pos, cloaked: bool, goal: LegGoal) {
        let mut stack = vec![(origin, cloaked)];
        while let Some((pos, immune)) = stack.pop() {
            let node = table.node(pos);
            if node.status == CellStatus::Blocked || node.cost.is_none() {
                continue;
            }
            self.stats.expanded += 1;

            match self.grid.kind_at(pos) {
                Some(EntityKind::Sentry) => {
                    table.block(pos);
                    continue;
                }
                Some(EntityKind::Watch) if !immune => {
                    table.block(pos);
                    continue;
                }
                Some(EntityKind::Relic) => self.found.relic = Some(pos),
                Some(EntityKind::Cloak) => self.found.cloak = Some(pos),
                _ => {}
            }

            self.reveal_from(table, pos, immune);
            self.advance(table, &mut stack, pos, immune, goal);
        }
    }

    fn reveal_from(&mut self, table: &mut NodeTable, pos: Pos, immune: bool) {
        for seen in visible_from(pos, self.grid.vision(), self.grid.size()) {
            if table.node(seen).status != CellStatus::Unvisited {
                continue;
            }
            self.stats.revealed += 1;
            match self.grid.kind_at(seen) {
                Some(EntityKind::Sentry) => table.block(seen),
                Some(EntityKind::Watch) if !immune => table.block(seen),
                kind => {
                    table.node_mut(seen).status = CellStatus::Open;
                    match kind {
                        Some(EntityKind::Relic) => self.found.relic = Some(seen),
                        Some(EntityKind::Cloak) => self.found.cloak = Some(seen),
                        _ => {}
                    }
                }
            }
        }
    }

    /// Pushes every improvable neighbor. Neighbors are pushed in
    /// reverse ring order so the branch popped first is the one the
    /// ring order prefers. A branch ends quietly on the goal cell;
    /// with no improvable neighbor at all, the blind advisor gets one
    /// probe.
    fn advance(
        &mut self,
        table: &mut NodeTable,
        stack: &mut Vec<(Pos, bool)>,
        pos: Pos,
        immune: bool,
        goal: LegGoal,
    ) {
        let Some(gc) = table.node(pos).cost else { return };
        let mut advanced = false;
        for nb in step_neighbors(pos, self.grid.size()).into_iter().rev() {
            let kind = self.grid.kind_at(nb);
            if kind == Some(EntityKind::Sentry) {
                continue;
            }
            let watch = kind == Some(EntityKind::Watch);
            let node = table.node(nb);
            let improves = match node.status {
                CellStatus::Blocked => immune && watch,
                CellStatus::Unvisited => false,
                CellStatus::Open | CellStatus::Closed => {
                    (immune || !watch) && node.cost.is_none_or(|g| g > gc + 1)
                }
            };
            if !improves {
                continue;
            }
            let node = table.node_mut(nb);
            node.status = CellStatus::Open;
            node.cost = Some(gc + 1);
            node.prev = Some(pos);
            advanced = true;

            let at_goal = match goal {
                LegGoal::Relic => kind == Some(EntityKind::Relic),
                LegGoal::Exit => kind == Some(EntityKind::Exit),
            };
            if !at_goal {
                stack.push((nb, immune || kind == Some(EntityKind::Cloak)));
            }
        }
        if !advanced
            && let Some(dest) = blind_step(table, pos)
        {
            let node = table.node_mut(dest);
            node.status = CellStatus::Open;
            node.cost = Some(gc + 1);
            node.prev = Some(pos);
            stack.push((dest, immune));
            self.stats.blind_moves += 1;
        }
    }

    /// A fresh table for the next leg: danger marks carry over, costs
    /// start again from the leg origin.
    fn fresh_leg_table(&self, previous: &NodeTable, origin: Pos) -> NodeTable {
        let mut table = NodeTable::new(self.grid.size());
        carry_knowledge(previous, &mut table);
        seed(&mut table, origin);
        table
    }
}

fn seed(table: &mut NodeTable, origin: Pos) {
    let node = table.node_mut(origin);
    node.status = CellStatus::Open;
    node.cost = Some(0);
}

/// The walked chain to `target`, or `None` when the sweep never
/// assigned it a cost.
fn reached_chain(table: &NodeTable, target: Pos) -> Option<Vec<Pos>> {
    table.node(target).cost?;
    Some(table.reconstruct(target))
}

fn chain_passes_cloak(grid: &Grid, chain: &[Pos]) -> bool {
    chain
        .iter()
        .any(|&pos| grid.kind_at(pos) == Some(EntityKind::Cloak))
}

/// Carries the map learned so far into a new leg table: deadly cells
/// stay deadly, seen cells stay steppable, costs start over. Without
/// this a cloaked leg under far perception could not enter cells it
/// already walked, because ring-two vision never shows adjacent ones.
fn carry_knowledge(src: &NodeTable, dst: &mut NodeTable) {
    for pos in src.positions().collect::<Vec<_>>() {
        match src.node(pos).status {
            CellStatus::Blocked => dst.block(pos),
            CellStatus::Open | CellStatus::Closed => {
                dst.node_mut(pos).status = CellStatus::Open;
            }
            CellStatus::Unvisited => {}
        }
    }
}

/// Transplants an already-walked chain so the next leg starts from
/// its tip with the accumulated cost and predecessors intact.
fn copy_chain(src: &NodeTable, dst: &mut NodeTable, chain: &[Pos]) {
    for &pos in chain {
        let node = src.node(pos);
        let target = dst.node_mut(pos);
        target.status = CellStatus::Open;
        target.cost = node.cost;
        target.prev = node.prev;
    }
}

#[cfg(test)]
mod tests {
    #![allow(unused_imports)]
    use super::*;
    use crate::search::test_support::{
        assert_route_lawful, cloak_gauntlet, open_field, scenario_a,
    };
    use crate::types::VisionPattern;

    #[test]
    fn open_field_route_is_optimal() {
        let grid = open_field(VisionPattern::Ring1).build().expect("valid");
        let outcome = run(&grid);
        let route = outcome.route.expect("open field is always winnable");
        assert_eq!(route.step_count(), 8);
        assert_route_lawful(&grid, &route);
    }

    #[test]
    fn reference_layout_is_solved_under_both_perceptions() {
        for vision in [VisionPattern::Ring1, VisionPattern::Ring2] {
            let grid = scenario_a(vision).build().expect("valid");
            let outcome = run(&grid);
            let route = outcome.route.expect("layout is winnable");
            assert_route_lawful(&grid, &route);
        }
    }

    #[test]
    fn cloak_is_taken_when_watch_lines_seal_the_relic() {
        // the relic can only be spotted across its watch ring, so this
        // layout needs the far perception pattern
        let grid = cloak_gauntlet(VisionPattern::Ring2).build().expect("valid");
        let outcome = run(&grid);
        let route = outcome.route.expect("gauntlet is winnable with the cloak");
        assert_route_lawful(&grid, &route);
        let takes_cloak = route
            .waypoints
            .iter()
            .any(|&pos| grid.kind_at(pos) == Some(EntityKind::Cloak));
        assert!(takes_cloak);
    }

    #[test]
    fn chain_copy_preserves_costs_and_links() {
        let mut src = NodeTable::new(5);
        seed(&mut src, Pos { y: 0, x: 0 });
        {
            let node = src.node_mut(Pos { y: 1, x: 1 });
            node.status = CellStatus::Open;
            node.cost = Some(1);
            node.prev = Some(Pos { y: 0, x: 0 });
        }
        src.block(Pos { y: 4, x: 4 });

        let mut dst = NodeTable::new(5);
        carry_knowledge(&src, &mut dst);
        copy_chain(&src, &mut dst, &[Pos { y: 0, x: 0 }, Pos { y: 1, x: 1 }]);

        assert_eq!(dst.node(Pos { y: 4, x: 4 }).status, CellStatus::Blocked);
        assert_eq!(dst.node(Pos { y: 1, x: 1 }).cost, Some(1));
        let chain = dst.reconstruct(Pos { y: 1, x: 1 });
        assert_eq!(chain, vec![Pos { y: 0, x: 0 }, Pos { y: 1, x: 1 }]);
    }
}
