//! bc-rules -- the turn-level gameplay rules: world state, robot records,
//! action arbitration, delay accounting, death resolution, and the signal
//! log that `bc-engine` drains every round.
//!
//! `bc-core` owns what can't change once a match starts (the catalog, the
//! map, the tunables); this crate owns everything that does.

#![deny(unsafe_code)]

pub mod controller;
pub mod death;
pub mod delay;
pub mod memory;
pub mod robot;
mod serde_map_as_pairs;
pub mod signal_log;
pub mod skills;
pub mod world;

pub mod prelude {
    pub use crate::controller::RobotController;
    pub use crate::memory::MapMemory;
    pub use crate::robot::{BuildState, Infection, RobotRecord};
    pub use crate::signal_log::SignalLog;
    pub use crate::world::{ResearchProgress, TeamState, World, TEAM_MEMORY_SIZE};
}
