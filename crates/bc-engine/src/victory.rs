//! Victory determination (§4.7): archon destruction, the round-limit
//! tiebreak ladder, and the same-round double-archon-death tiebreak.

use std::collections::HashMap;

use bc_core::prelude::*;
use bc_rules::prelude::{SignalLog, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VictoryReason {
    ArchonsDestroyed,
    /// Both teams' last archon died in the same round; broken by which
    /// team's archon death was emitted later in that round's signal log
    /// (i.e. held out longer within the round).
    DoubleArchonDeathTiebreak,
    RoundLimitArchonCount,
    RoundLimitTotalHealth,
    RoundLimitRobotIdHash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOutcome {
    pub winner: Team,
    pub reason: VictoryReason,
}

fn archon_count(world: &World, team: Team) -> usize {
    world
        .robots_of_team(team)
        .filter(|r| r.robot_type == RobotTypeId::Archon)
        .count()
}

fn total_health(world: &World, team: Team) -> f64 {
    world.robots_of_team(team).map(|r| r.health).sum()
}

/// Deterministic tiebreak over a team's surviving robot ids: neither side
/// "deserves" a hash-based win, but a real match must resolve ties somehow,
/// and this keeps the resolution a pure function of final state.
fn id_hash(world: &World, team: Team) -> u64 {
    let mut ids: Vec<u32> = world.robots_of_team(team).map(|r| r.id.0).collect();
    ids.sort_unstable();
    let bytes: Vec<u8> = ids.iter().flat_map(|id| id.to_le_bytes()).collect();
    let digest = blake3::hash(&bytes);
    let hash_bytes = digest.as_bytes();
    u64::from_le_bytes(hash_bytes[0..8].try_into().unwrap())
}

fn resolve_round_limit(world: &World) -> MatchOutcome {
    let a_archons = archon_count(world, Team::A);
    let b_archons = archon_count(world, Team::B);
    if a_archons != b_archons {
        let winner = if a_archons > b_archons { Team::A } else { Team::B };
        return MatchOutcome {
            winner,
            reason: VictoryReason::RoundLimitArchonCount,
        };
    }
    let a_health = total_health(world, Team::A);
    let b_health = total_health(world, Team::B);
    if (a_health - b_health).abs() > 1e-9 {
        let winner = if a_health > b_health { Team::A } else { Team::B };
        return MatchOutcome {
            winner,
            reason: VictoryReason::RoundLimitTotalHealth,
        };
    }
    let winner = if id_hash(world, Team::A) >= id_hash(world, Team::B) {
        Team::A
    } else {
        Team::B
    };
    MatchOutcome {
        winner,
        reason: VictoryReason::RoundLimitRobotIdHash,
    }
}

fn resolve_double_archon_death(dying_archons: &[(Team, RobotId)], log: &SignalLog) -> MatchOutcome {
    let mut last_emission_index: HashMap<Team, usize> = HashMap::new();
    for (index, signal) in log.iter().enumerate() {
        if let Signal::Death { id, .. } = signal {
            if let Some((team, _)) = dying_archons.iter().find(|(_, archon_id)| archon_id == id) {
                last_emission_index.insert(*team, index);
            }
        }
    }
    let a_index = last_emission_index.get(&Team::A).copied().unwrap_or(0);
    let b_index = last_emission_index.get(&Team::B).copied().unwrap_or(0);
    let winner = if a_index >= b_index { Team::A } else { Team::B };
    MatchOutcome {
        winner,
        reason: VictoryReason::DoubleArchonDeathTiebreak,
    }
}

/// Check whether the match has ended. Must be called after a round's deaths
/// have been reaped. `dying_archons` is the set of (team, id) pairs for
/// archons that died this round, captured before they were reaped -- needed
/// only to resolve the simultaneous-death tiebreak.
pub fn check_victory(world: &World, dying_archons: &[(Team, RobotId)]) -> Option<MatchOutcome> {
    let a_alive = archon_count(world, Team::A) > 0;
    let b_alive = archon_count(world, Team::B) > 0;
    match (a_alive, b_alive) {
        (false, false) => Some(resolve_double_archon_death(dying_archons, world.signal_log())),
        (false, true) => Some(MatchOutcome {
            winner: Team::B,
            reason: VictoryReason::ArchonsDestroyed,
        }),
        (true, false) => Some(MatchOutcome {
            winner: Team::A,
            reason: VictoryReason::ArchonsDestroyed,
        }),
        (true, true) => {
            if world.round() >= world.map.rounds {
                Some(resolve_round_limit(world))
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bc_core::prelude::{EngineConstants, GameMap};

    #[test]
    fn team_with_no_surviving_archon_loses() {
        let mut world = World::new(GameMap::blank(10, 10, 10, 1), EngineConstants::default());
        world.spawn_active(RobotTypeId::Archon, Team::A, MapLocation::new(0, 0));
        world.spawn_active(RobotTypeId::Soldier, Team::B, MapLocation::new(5, 5));
        let outcome = check_victory(&world, &[]).unwrap();
        assert_eq!(outcome.winner, Team::A);
        assert_eq!(outcome.reason, VictoryReason::ArchonsDestroyed);
    }

    #[test]
    fn round_limit_breaks_tie_by_archon_count() {
        let mut world = World::new(GameMap::blank(10, 10, 10, 1), EngineConstants::default());
        world.spawn_active(RobotTypeId::Archon, Team::A, MapLocation::new(0, 0));
        world.spawn_active(RobotTypeId::Archon, Team::A, MapLocation::new(1, 0));
        world.spawn_active(RobotTypeId::Archon, Team::B, MapLocation::new(5, 5));
        for _ in 0..10 {
            world.advance_round();
        }
        let outcome = check_victory(&world, &[]).unwrap();
        assert_eq!(outcome.winner, Team::A);
        assert_eq!(outcome.reason, VictoryReason::RoundLimitArchonCount);
    }

    #[test]
    fn no_victory_before_archons_die_or_round_limit() {
        let mut world = World::new(GameMap::blank(10, 10, 100, 1), EngineConstants::default());
        world.spawn_active(RobotTypeId::Archon, Team::A, MapLocation::new(0, 0));
        world.spawn_active(RobotTypeId::Archon, Team::B, MapLocation::new(5, 5));
        assert!(check_victory(&world, &[]).is_none());
    }
}
