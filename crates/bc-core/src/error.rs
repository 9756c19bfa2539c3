//! `ActionError` -- the closed set of legality failures a `RobotController`
//! method can return.
//!
//! Modeled on the same `thiserror` idiom used throughout the corpus for
//! closed, expected, caller-handled error enums: each variant names exactly
//! one failure mode and formats a message useful in logs without leaking
//! internal state.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionError {
    #[error("actor is not active: delay {delay} >= 1.0 for this action class")]
    NotActive { delay: f64 },

    #[error("can't do that, bro: {reason}")]
    CantDoThatBro { reason: String },

    #[error("can't sense that: location/object not in sight and not same team")]
    CantSenseThat,

    #[error("can't move there: target tile is blocked or impassable")]
    CantMoveThere,

    #[error("out of range: target is outside the permitted radius")]
    OutOfRange,

    #[error("not enough resource: required {required}, available {available}")]
    NotEnoughResource { required: f64, available: f64 },

    #[error("missing upgrade required for this action")]
    MissingUpgrade,

    #[error("no robot there: required occupant is absent")]
    NoRobotThere,
}
