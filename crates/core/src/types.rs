use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

/// What occupies a grid cell. The grid holds at most one entity per cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    Agent,
    Sentry,
    Watch,
    Relic,
    Cloak,
    Exit,
}

impl EntityKind {
    pub fn symbol(self) -> char {
        match self {
            Self::Agent => 'A',
            Self::Sentry => 'S',
            Self::Watch => '*',
            Self::Relic => 'R',
            Self::Cloak => 'C',
            Self::Exit => 'E',
        }
    }
}

/// Fixed perception shape of the mobile agent. Movement is always one
/// step; under `Ring2` perception reaches further than a single move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisionPattern {
    Ring1,
    Ring2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    AStar,
    Backtracking,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AStar => write!(f, "A Star"),
            Self::Backtracking => write!(f, "Backtracking"),
        }
    }
}

/// Invalid scenario configuration. Raised synchronously at grid
/// construction and never retried; a caller bug, not a game outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    SizeTooSmall { size: usize },
    OutOfBounds { pos: Pos, size: usize },
    CellOccupied { pos: Pos },
    InvalidRadius { radius: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeTooSmall { size } => {
                write!(f, "grid size {size} is too small to hold the scenario")
            }
            Self::OutOfBounds { pos, size } => {
                write!(f, "position [{},{}] is outside the {size}x{size} grid", pos.x, pos.y)
            }
            Self::CellOccupied { pos } => {
                write!(f, "cell [{},{}] is already occupied", pos.x, pos.y)
            }
            Self::InvalidRadius { radius } => {
                write!(f, "sentry perception radius {radius} is invalid")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Ordered waypoints from the agent start to the exit, inclusive.
/// Produced once per successful search and immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub waypoints: Vec<Pos>,
}

impl Route {
    pub fn step_count(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub expanded: u32,
    pub revealed: u32,
    pub blind_moves: u32,
}

/// Result of one engine call. `route == None` is the expected no-path
/// outcome (a loss), never an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    pub route: Option<Route>,
    pub stats: SearchStats,
}
