//! Fixed-size square board holding at most one entity per cell.
//! This module exists to keep placement and occupancy rules in one place.
//! It does not own scenario validation or any search bookkeeping.

use slotmap::{SlotMap, new_key_type};

use crate::types::{ConfigError, EntityKind, Pos, VisionPattern};

new_key_type! {
    pub struct EntityId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Pos,
}

impl Entity {
    pub fn symbol(&self) -> char {
        self.kind.symbol()
    }
}

/// The board is never mutated after `Scenario::build` returns it;
/// engines track their own knowledge in private node tables.
#[derive(Clone)]
pub struct Grid {
    size: usize,
    vision: VisionPattern,
    start: Pos,
    exit: Pos,
    cells: Vec<Option<EntityId>>,
    entities: SlotMap<EntityId, Entity>,
    unwinnable: bool,
}

impl Grid {
    pub(crate) fn new(size: usize, vision: VisionPattern) -> Self {
        Self {
            size,
            vision,
            start: Pos { y: 0, x: 0 },
            exit: Pos { y: 0, x: 0 },
            cells: vec![None; size * size],
            entities: SlotMap::with_key(),
            unwinnable: false,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn vision(&self) -> VisionPattern {
        self.vision
    }

    /// Starting cell of the mobile agent.
    pub fn start(&self) -> Pos {
        self.start
    }

    /// The exit position is part of the search input: engines know it
    /// up front, unlike the relic and the cloak.
    pub fn exit(&self) -> Pos {
        self.exit
    }

    /// True when the start cell lies inside a detection zone. Every
    /// search on such a grid reports no-path without expanding a node.
    pub fn is_unwinnable(&self) -> bool {
        self.unwinnable
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.size && (pos.y as usize) < self.size
    }

    pub fn at(&self, pos: Pos) -> Option<&Entity> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.cells[self.index(pos)].map(|id| &self.entities[id])
    }

    pub fn kind_at(&self, pos: Pos) -> Option<EntityKind> {
        self.at(pos).map(|entity| entity.kind)
    }

    pub(crate) fn place(&mut self, kind: EntityKind, pos: Pos) -> Result<EntityId, ConfigError> {
        if !self.in_bounds(pos) {
            return Err(ConfigError::OutOfBounds { pos, size: self.size });
        }
        let idx = self.index(pos);
        if self.cells[idx].is_some() {
            return Err(ConfigError::CellOccupied { pos });
        }
        let id = self.entities.insert_with_key(|id| Entity { id, kind, pos });
        self.cells[idx] = Some(id);
        Ok(id)
    }

    pub(crate) fn set_start(&mut self, pos: Pos) {
        self.start = pos;
    }

    pub(crate) fn set_exit(&mut self, pos: Pos) {
        self.exit = pos;
    }

    pub(crate) fn mark_unwinnable(&mut self) {
        self.unwinnable = true;
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.size + (pos.x as usize)
    }
}
