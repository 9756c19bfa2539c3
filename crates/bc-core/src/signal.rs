//! The `Signal` tagged union (engine event stream) and [`SpatialSignal`]
//! (per-robot inbox entry).
//!
//! These are two distinct things that happen to share a name in the source
//! rules:
//!
//! - [`Signal`] is the deterministic, ordered log the engine emits every
//!   round for external consumers (viewer, replay writer). It is produced
//!   by every action, not just `broadcastSignal`/`broadcastMessageSignal`.
//! - [`SpatialSignal`] is specifically the payload delivered into a
//!   recipient robot's inbox by the spatial broadcast mechanism (§4.6).
//!
//! Encoding `Signal` as a tagged union and matching over it (rather than a
//! trait-object "accept(visitor)" double dispatch) is the design this engine
//! follows throughout.

use serde::{Deserialize, Serialize};

use crate::catalog::{RobotTypeId, Team, Upgrade};
use crate::geometry::MapLocation;
use crate::identity::RobotId;

/// Why a robot died -- determines the rubble/part payout at reap time (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DeathCause {
    RegularAttack,
    TurretAttack,
    Activation,
    SelfDestruct,
    ZombieDenDestroyed { reward_team: Team },
}

/// The per-round, ordered engine event log. Variant order within a round
/// follows the concatenation of `(round, id)` described in §5.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Signal {
    Movement {
        actor: RobotId,
        new_location: MapLocation,
        delay: f64,
    },
    Attack {
        actor: RobotId,
        target_location: MapLocation,
    },
    Spawn {
        parent: RobotId,
        spawned: RobotId,
        robot_type: RobotTypeId,
        location: MapLocation,
    },
    Mine {
        actor: RobotId,
        location: MapLocation,
        amount: f64,
    },
    Research {
        team: Team,
        upgrade: Upgrade,
        completed: bool,
    },
    Cast {
        actor: RobotId,
        location: MapLocation,
    },
    IndicatorDot {
        actor: RobotId,
        location: MapLocation,
        red: u8,
        green: u8,
        blue: u8,
    },
    IndicatorLine {
        actor: RobotId,
        from: MapLocation,
        to: MapLocation,
        red: u8,
        green: u8,
        blue: u8,
    },
    IndicatorString {
        actor: RobotId,
        slot: u32,
        text: String,
    },
    MatchObservation {
        actor: RobotId,
        text: String,
    },
    LocationSupplyChange {
        location: MapLocation,
        new_supply: f64,
    },
    Death {
        id: RobotId,
        cause: DeathCause,
    },
    ZombieDenDestroyed {
        reward_team: Team,
    },
}

/// The payload delivered to a recipient robot's inbox by the spatial signal
/// mechanism. Distinct from [`Signal`]: this is gameplay-visible data read
/// back by `readSignal`, not an external-observer event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialSignal {
    pub sender_id: RobotId,
    pub sender_team: Team,
    pub sender_location: MapLocation,
    pub message: Option<[i32; 2]>,
}
