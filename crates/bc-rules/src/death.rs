//! Death resolution (§4.5): how much rubble a dead robot leaves behind, and
//! the health a zombie infection outbreak spawns at.

use bc_core::prelude::{DeathCause, EngineConstants, Team};

/// Rubble deposited on a dead robot's tile. A regular kill leaves the full
/// max health in rubble; a turret kill (already mostly structural damage)
/// leaves only a fraction; deaths that never involved combat damage
/// (activation, self-destruct, a den destroyed outright) leave none.
pub fn rubble_on_death(cause: DeathCause, max_health: f64, constants: &EngineConstants) -> f64 {
    match cause {
        DeathCause::RegularAttack => max_health,
        DeathCause::TurretAttack => max_health * constants.rubble_from_turret_factor,
        DeathCause::Activation | DeathCause::SelfDestruct | DeathCause::ZombieDenDestroyed { .. } => 0.0,
    }
}

/// The team credited with a zombie den's destruction, if any.
pub fn den_destruction_reward(cause: DeathCause) -> Option<Team> {
    match cause {
        DeathCause::ZombieDenDestroyed { reward_team } => Some(reward_team),
        _ => None,
    }
}
