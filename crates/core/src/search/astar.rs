//! Online best-first engine. This module exists to run the two-leg
//! search (relic, then exit) over a partially observed grid, keeping
//! an ordered frontier mirrored by a per-cell entry map. It does not
//! own the blind-step policy or the node table internals.

use std::collections::{BTreeMap, BTreeSet};

use crate::grid::Grid;
use crate::types::{EntityKind, Pos, Route, SearchOutcome, SearchStats};

use super::advisor::blind_step;
use super::euclid;
use super::nodes::{CellStatus, NodeTable};
use super::visibility::{step_neighbors, visible_from};

/// Frontier entry. Ordering is total: estimated total cost first,
/// then heuristic, then position, so ties resolve the same way on
/// every run. Cells whose cost is still unknown sort last.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    f: u32,
    h: u32,
    y: i32,
    x: i32,
}

impl OpenNode {
    fn pos(self) -> Pos {
        Pos { y: self.y, x: self.x }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Stage {
    SeekRelic,
    SeekExit,
}

pub(super) fn run(grid: &Grid) -> SearchOutcome {
    AStarSearch::new(grid).run()
}

struct AStarSearch<'g> {
    grid: &'g Grid,
    table: NodeTable,
    open: BTreeSet<OpenNode>,
    entries: BTreeMap<Pos, OpenNode>,
    stage: Stage,
    relic_hint: Option<Pos>,
    prefix: Vec<Pos>,
    stats: SearchStats,
}

impl<'g> AStarSearch<'g> {
    fn new(grid: &'g Grid) -> Self {
        Self {
            grid,
            table: NodeTable::new(grid.size()),
            open: BTreeSet::new(),
            entries: BTreeMap::new(),
            stage: Stage::SeekRelic,
            relic_hint: None,
            prefix: Vec::new(),
            stats: SearchStats::default(),
        }
    }

    fn run(mut self) -> SearchOutcome {
        let start = self.grid.start();
        {
            let node = self.table.node_mut(start);
            node.status = CellStatus::Open;
            node.cost = Some(0);
        }
        self.enqueue(start);

        while let Some(entry) = self.open.pop_first() {
            let pos = entry.pos();
            self.entries.remove(&pos);
            let cur = self.table.node(pos);
            if cur.cost.is_none() {
                // the cheapest frontier cell is unreachable: the known
                // region is exhausted and nothing blind remains
                break;
            }
            self.stats.expanded += 1;

            match self.grid.kind_at(pos) {
                Some(EntityKind::Sentry) => {
                    self.table.block(pos);
                    continue;
                }
                Some(EntityKind::Watch) if !cur.immune => {
                    self.table.block(pos);
                    continue;
                }
                Some(EntityKind::Relic) if self.stage == Stage::SeekRelic => {
                    self.begin_exit_leg(pos);
                }
                Some(EntityKind::Exit) if self.stage == Stage::SeekExit => {
                    let mut waypoints = self.prefix;
                    waypoints.extend(self.table.reconstruct(pos));
                    return SearchOutcome {
                        route: Some(Route { waypoints }),
                        stats: self.stats,
                    };
                }
                Some(EntityKind::Cloak) => {
                    self.table.node_mut(pos).immune = true;
                }
                _ => {}
            }

            self.table.node_mut(pos).status = CellStatus::Closed;
            self.reveal_from(pos);
            self.step_from(pos);
            self.blind_fallback(pos);
        }

        SearchOutcome { route: None, stats: self.stats }
    }

    /// The relic has been reached: remember the walk up to it, clear
    /// all leg state except danger marks, and restart from the relic
    /// with the exit as the heuristic target.
    fn begin_exit_leg(&mut self, relic: Pos) {
        let immune = self.table.node(relic).immune;
        let chain = self.table.reconstruct(relic);
        self.prefix = chain[..chain.len() - 1].to_vec();

        self.table.reset_for_target(self.grid.exit());
        let node = self.table.node_mut(relic);
        node.status = CellStatus::Open;
        node.cost = Some(0);
        node.prev = None;
        node.immune = immune;
        node.heuristic = euclid(relic, self.grid.exit());

        self.open.clear();
        self.entries.clear();
        self.stage = Stage::SeekExit;
        self.relic_hint = Some(relic);
    }

    /// Folds every cell visible from `pos` into the table: deadly
    /// cells become blocked, new cells join the frontier, and known
    /// open cells get a chance to relax through a closed neighbor.
    fn reveal_from(&mut self, pos: Pos) {
        let immune = self.table.node(pos).immune;
        for seen in visible_from(pos, self.grid.vision(), self.grid.size()) {
            match self.table.node(seen).status {
                CellStatus::Blocked | CellStatus::Closed => continue,
                CellStatus::Open => self.relax_via_closed(seen),
                CellStatus::Unvisited => {
                    self.stats.revealed += 1;
                    let kind = self.grid.kind_at(seen);
                    let deadly = matches!(kind, Some(EntityKind::Sentry))
                        || (matches!(kind, Some(EntityKind::Watch)) && !immune);
                    if deadly {
                        self.table.block(seen);
                        continue;
                    }
                    let h = self.heuristic_for(seen);
                    let node = self.table.node_mut(seen);
                    node.status = CellStatus::Open;
                    node.heuristic = h;
                    self.enqueue(seen);
                    self.relax_via_closed(seen);
                    if self.stage == Stage::SeekRelic
                        && self.relic_hint.is_none()
                        && kind == Some(EntityKind::Relic)
                    {
                        self.set_relic_hint(seen);
                    }
                }
            }
        }
    }

    /// Connects a just-seen cell to the cheapest already-expanded
    /// neighbor, if any. Under far perception a cell can come into
    /// view two steps out, before any closed cell borders it.
    fn relax_via_closed(&mut self, seen: Pos) {
        let watch = self.grid.kind_at(seen) == Some(EntityKind::Watch);
        let mut best: Option<(u32, Pos, bool)> = None;
        for nb in step_neighbors(seen, self.grid.size()) {
            let node = self.table.node(nb);
            if node.status != CellStatus::Closed {
                continue;
            }
            let Some(g) = node.cost else { continue };
            if watch && !node.immune {
                continue;
            }
            if best.is_none_or(|(bg, _, _)| g < bg) {
                best = Some((g, nb, node.immune));
            }
        }
        let Some((g, via, immune)) = best else { return };
        let current = self.table.node(seen).cost;
        if current.is_some_and(|c| c <= g + 1) {
            return;
        }
        let node = self.table.node_mut(seen);
        node.cost = Some(g + 1);
        node.prev = Some(via);
        node.immune = immune;
        self.enqueue(seen);
    }

    /// Relaxes the one-step neighbors of an expanded cell. A cloaked
    /// walk may also re-open watch cells that were blocked while the
    /// agent was still exposed.
    fn step_from(&mut self, pos: Pos) {
        let cur = self.table.node(pos);
        let Some(gc) = cur.cost else { return };
        for nb in step_neighbors(pos, self.grid.size()) {
            let kind = self.grid.kind_at(nb);
            let node = self.table.node(nb);
            match node.status {
                CellStatus::Open => {
                    if kind == Some(EntityKind::Watch) && !cur.immune {
                        continue;
                    }
                    if node.cost.is_none_or(|g| gc + 1 < g) {
                        let node = self.table.node_mut(nb);
                        node.cost = Some(gc + 1);
                        node.prev = Some(pos);
                        node.immune = cur.immune;
                        self.enqueue(nb);
                    }
                }
                CellStatus::Blocked => {
                    if cur.immune && kind == Some(EntityKind::Watch) {
                        let h = self.heuristic_for(nb);
                        let node = self.table.node_mut(nb);
                        node.status = CellStatus::Open;
                        node.cost = Some(gc + 1);
                        node.prev = Some(pos);
                        node.immune = true;
                        node.heuristic = h;
                        self.enqueue(nb);
                    }
                }
                CellStatus::Unvisited | CellStatus::Closed => {}
            }
        }
    }

    /// When every frontier cell still has unknown cost, the agent
    /// cannot reach any of them through known ground and must probe:
    /// take the advisor's one-step move and price it like a real step.
    fn blind_fallback(&mut self, pos: Pos) {
        if self.open.first().is_some_and(|entry| entry.f < u32::MAX) {
            return;
        }
        let Some(dest) = blind_step(&self.table, pos) else { return };
        let cur = self.table.node(pos);
        let Some(cost) = cur.cost else { return };
        let immune = cur.immune;
        let h = self.heuristic_for(dest);
        let node = self.table.node_mut(dest);
        node.status = CellStatus::Open;
        node.cost = Some(cost + 1);
        node.prev = Some(pos);
        node.immune = immune;
        node.heuristic = h;
        self.enqueue(dest);
        self.stats.blind_moves += 1;
    }

    /// Until the relic is spotted the first leg is effectively a
    /// uniform-cost flood; once spotted, everything re-aims at it.
    fn heuristic_for(&self, pos: Pos) -> u32 {
        match self.stage {
            Stage::SeekRelic => self.relic_hint.map_or(0, |relic| euclid(pos, relic)),
            Stage::SeekExit => euclid(pos, self.grid.exit()),
        }
    }

    fn set_relic_hint(&mut self, relic: Pos) {
        self.relic_hint = Some(relic);
        self.table.refresh_heuristics(relic);
        let old = std::mem::take(&mut self.entries);
        self.open.clear();
        for pos in old.into_keys() {
            self.enqueue(pos);
        }
    }

    /// Inserts or reprices a frontier entry, keeping the set and the
    /// per-cell map in step.
    fn enqueue(&mut self, pos: Pos) {
        let node = self.table.node(pos);
        let (f, h) = match node.cost {
            Some(g) => (g.saturating_add(node.heuristic), node.heuristic),
            None => (u32::MAX, u32::MAX),
        };
        let entry = OpenNode { f, h, y: pos.y, x: pos.x };
        if let Some(old) = self.entries.insert(pos, entry) {
            self.open.remove(&old);
        }
        self.open.insert(entry);
    }
}
