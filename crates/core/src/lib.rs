pub mod grid;
pub mod scenario;
pub mod search;
pub mod types;

pub use grid::{Entity, EntityId, Grid};
pub use scenario::{Scenario, SentrySpec};
pub use search::find_minimal_path;
pub use types::*;
