//! bc-engine -- the round driver: turn order, end-of-round bookkeeping,
//! zombie spawn application, victory determination, snapshot/restore, and
//! deterministic replay.
//!
//! `bc-rules` owns what a single action does; this crate owns the sequence
//! that turns a pile of actions into a match.

#![deny(unsafe_code)]

pub mod logging;
pub mod replay;
pub mod round;
pub mod snapshot;
pub mod victory;
pub mod zombies;

pub mod prelude {
    pub use crate::logging::init_tracing;
    pub use crate::replay::{replay, ReplayCheckpoint, ReplayDivergence, ReplayLog, ReplayRecorder, ReplayResult};
    pub use crate::round::RoundEngine;
    pub use crate::snapshot::{capture, restore, state_hash, MatchSnapshot};
    pub use crate::victory::{check_victory, MatchOutcome, VictoryReason};
    pub use crate::zombies::apply_zombie_schedule;
}
