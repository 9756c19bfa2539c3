//! bc-core -- geometry, catalog, map data, and the closed types shared by
//! every other crate in the simulation.
//!
//! This crate has no notion of *mutable* simulation state: it defines the
//! value types (locations, directions, robot stats, the immutable map,
//! engine tunables) and the two closed enums that cross the
//! `RobotController` boundary (`ActionError`) and the event stream
//! (`Signal`). `bc-rules` and `bc-engine` build the actual simulation on
//! top of these.

pub mod catalog;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod identity;
pub mod map;
pub mod signal;

/// Convenience re-exports for common usage across the workspace.
pub mod prelude {
    pub use crate::catalog::{CommanderSkillType, RobotType, RobotTypeId, Team, Upgrade};
    pub use crate::constants::{EngineConstants, ZombieOverflowPolicy};
    pub use crate::error::ActionError;
    pub use crate::geometry::{Direction, MapLocation};
    pub use crate::identity::{IdAllocator, RobotId};
    pub use crate::map::{GameMap, InitialRobotPlacement, TerrainTile, ZombieSpawnSchedule};
    pub use crate::signal::{DeathCause, Signal, SpatialSignal};
}
