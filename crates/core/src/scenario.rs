//! Declarative scenario description and its validation into a `Grid`.
//! This module exists to keep every placement rule in one pass, so a
//! grid that reaches an engine is already known to be well formed.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::Xxh3;

use crate::grid::Grid;
use crate::types::{ConfigError, EntityKind, Pos, VisionPattern};

pub const MIN_GRID_SIZE: usize = 3;

/// One static hostile with a square detection zone of the given
/// Chebyshev radius around it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentrySpec {
    pub pos: Pos,
    pub radius: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub size: usize,
    pub vision: VisionPattern,
    pub start: Pos,
    pub sentries: Vec<SentrySpec>,
    pub relic: Pos,
    pub cloak: Pos,
    pub exit: Pos,
}

impl Scenario {
    /// Validates the description and assembles the immutable grid.
    ///
    /// A detection zone covering the start cell is not an error: the
    /// grid is built anyway and flagged unwinnable, matching how a
    /// randomly drawn round can simply be lost before the first move.
    pub fn build(&self) -> Result<Grid, ConfigError> {
        if self.size < MIN_GRID_SIZE {
            return Err(ConfigError::SizeTooSmall { size: self.size });
        }
        let mut grid = Grid::new(self.size, self.vision);

        grid.place(EntityKind::Agent, self.start)?;
        grid.set_start(self.start);

        for sentry in &self.sentries {
            if sentry.radius == 0 || sentry.radius as usize >= self.size {
                return Err(ConfigError::InvalidRadius { radius: sentry.radius });
            }
            grid.place(EntityKind::Sentry, sentry.pos)?;
        }
        for sentry in &self.sentries {
            self.spread_zone(&mut grid, sentry);
        }

        grid.place(EntityKind::Relic, self.relic)?;
        grid.place(EntityKind::Cloak, self.cloak)?;
        grid.place(EntityKind::Exit, self.exit)?;
        grid.set_exit(self.exit);

        Ok(grid)
    }

    /// Marks every empty cell within the sentry's radius as watched.
    /// Cells already holding an entity keep it; a zone reaching the
    /// agent's start cell makes the round unwinnable.
    fn spread_zone(&self, grid: &mut Grid, sentry: &SentrySpec) {
        let r = sentry.radius as i32;
        for dy in -r..=r {
            for dx in -r..=r {
                if dy == 0 && dx == 0 {
                    continue;
                }
                let pos = Pos { y: sentry.pos.y + dy, x: sentry.pos.x + dx };
                if !grid.in_bounds(pos) {
                    continue;
                }
                match grid.kind_at(pos) {
                    Some(EntityKind::Agent) => grid.mark_unwinnable(),
                    Some(_) => {}
                    None => {
                        // cannot fail: bounds and vacancy were just checked
                        let _ = grid.place(EntityKind::Watch, pos);
                    }
                }
            }
        }
    }

    /// Stable identity of the scenario contents. Two value-identical
    /// scenarios hash alike regardless of how they were produced.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.update(&(self.size as u64).to_le_bytes());
        hasher.update(&[match self.vision {
            VisionPattern::Ring1 => 1,
            VisionPattern::Ring2 => 2,
        }]);
        hash_pos(&mut hasher, self.start);
        hasher.update(&(self.sentries.len() as u64).to_le_bytes());
        for sentry in &self.sentries {
            hash_pos(&mut hasher, sentry.pos);
            hasher.update(&sentry.radius.to_le_bytes());
        }
        hash_pos(&mut hasher, self.relic);
        hash_pos(&mut hasher, self.cloak);
        hash_pos(&mut hasher, self.exit);
        hasher.digest()
    }
}

fn hash_pos(hasher: &mut Xxh3, pos: Pos) {
    hasher.update(&pos.y.to_le_bytes());
    hasher.update(&pos.x.to_le_bytes());
}

pub fn format_fingerprint(fingerprint: u64) -> String {
    format!("0x{fingerprint:016x}")
}
