//! The robot type table, team enumeration, and research catalog.
//!
//! `RobotTypeId` is the closed set of unit kinds; `RobotType` is the stat
//! block a given id resolves to via [`RobotTypeId::stats`]. Stats are
//! returned by value rather than looked up in a registry: there is a fixed,
//! small, known set of types, so a `match` is both the simplest and the
//! fastest implementation.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Team {
    A,
    B,
    Neutral,
    Zombie,
}

impl Team {
    /// The opposing team for combat/vision purposes. Only meaningful for
    /// the two playing teams.
    pub fn opponent(self) -> Team {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
            Team::Neutral => Team::Neutral,
            Team::Zombie => Team::Zombie,
        }
    }

    /// Whether this team participates in resource income, research, and
    /// victory conditions (i.e. is one of the two playing teams).
    pub fn is_playing_team(self) -> bool {
        matches!(self, Team::A | Team::B)
    }
}

// ---------------------------------------------------------------------------
// Upgrade / CommanderSkillType
// ---------------------------------------------------------------------------

/// Researchable team-wide upgrades. Each takes `num_rounds()` rounds to
/// complete once started and costs `cost()` in team resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Upgrade {
    /// Widens sensor radius for all of the team's units.
    Vision,
    /// Reduces incoming rubble-based movement penalties.
    Pathfinding,
    /// Increases archon part income.
    Fusion,
}

impl Upgrade {
    pub fn num_rounds(self) -> u32 {
        match self {
            Upgrade::Vision => 200,
            Upgrade::Pathfinding => 200,
            Upgrade::Fusion => 300,
        }
    }

    pub fn cost(self) -> f64 {
        match self {
            Upgrade::Vision => 200.0,
            Upgrade::Pathfinding => 150.0,
            Upgrade::Fusion => 250.0,
        }
    }
}

/// Commander-only learned skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CommanderSkillType {
    Flash,
    Leadership,
    Regeneration,
}

// ---------------------------------------------------------------------------
// RobotTypeId / RobotType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RobotTypeId {
    Archon,
    Beaver,
    Soldier,
    Guard,
    Basher,
    Turret,
    Commander,
    Launcher,
    Missile,
    ZombieDen,
    StandardZombie,
    RangedZombie,
    FastZombie,
    BigZombie,
}

/// The full stat block for a [`RobotTypeId`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RobotType {
    pub id: RobotTypeId,
    pub max_health: f64,
    pub attack_power: f64,
    pub attack_delay: f64,
    pub cooldown_delay: f64,
    pub movement_delay: f64,
    pub sensor_radius_squared: i64,
    pub attack_radius_squared: i64,
    /// Inclusive minimum attack range, squared. Zero except for units like
    /// `TURRET` that cannot fire at point-blank range.
    pub min_attack_radius_squared: i64,
    pub bytecode_limit: u32,
    pub free_bytecode_threshold: u32,
    pub part_cost: f64,
    pub ore_cost: f64,
    pub build_turns: u32,
    pub dependency: Option<RobotTypeId>,
    pub spawn_source: Option<RobotTypeId>,
    pub can_move: bool,
    pub can_attack: bool,
    pub can_build: bool,
    pub can_spawn: bool,
    pub can_mine: bool,
    pub can_launch: bool,
    pub can_research: bool,
    pub is_building: bool,
}

impl RobotTypeId {
    /// All non-zombie player-constructible/spawnable types, in a fixed
    /// order -- used by tests and by catalog-wide sanity checks.
    pub const PLAYER_TYPES: [RobotTypeId; 8] = [
        RobotTypeId::Archon,
        RobotTypeId::Beaver,
        RobotTypeId::Soldier,
        RobotTypeId::Guard,
        RobotTypeId::Basher,
        RobotTypeId::Turret,
        RobotTypeId::Commander,
        RobotTypeId::Launcher,
    ];

    fn free_threshold(limit: u32) -> u32 {
        limit.saturating_sub(4000)
    }

    pub fn stats(self) -> RobotType {
        use RobotTypeId::*;
        match self {
            Archon => RobotType {
                id: self,
                max_health: 1000.0,
                attack_power: 0.0,
                attack_delay: 0.0,
                cooldown_delay: 0.0,
                movement_delay: 2.0,
                sensor_radius_squared: 52,
                attack_radius_squared: 0,
                min_attack_radius_squared: 0,
                bytecode_limit: 10_000,
                free_bytecode_threshold: Self::free_threshold(10_000),
                part_cost: 0.0,
                ore_cost: 0.0,
                build_turns: 0,
                dependency: None,
                spawn_source: None,
                can_move: true,
                can_attack: false,
                can_build: false,
                can_spawn: true,
                can_mine: false,
                can_launch: false,
                can_research: true,
                is_building: false,
            },
            Beaver => RobotType {
                id: self,
                max_health: 200.0,
                attack_power: 0.0,
                attack_delay: 0.0,
                cooldown_delay: 1.0,
                movement_delay: 2.0,
                sensor_radius_squared: 35,
                attack_radius_squared: 0,
                min_attack_radius_squared: 0,
                bytecode_limit: 10_000,
                free_bytecode_threshold: Self::free_threshold(10_000),
                part_cost: 50.0,
                ore_cost: 0.0,
                build_turns: 0,
                dependency: None,
                spawn_source: Some(Archon),
                can_move: true,
                can_attack: false,
                can_build: true,
                can_spawn: false,
                can_mine: true,
                can_launch: false,
                can_research: false,
                is_building: false,
            },
            Soldier => RobotType {
                id: self,
                max_health: 60.0,
                attack_power: 4.0,
                attack_delay: 1.0,
                cooldown_delay: 1.0,
                movement_delay: 1.0,
                sensor_radius_squared: 17,
                attack_radius_squared: 13,
                min_attack_radius_squared: 0,
                bytecode_limit: 10_000,
                free_bytecode_threshold: Self::free_threshold(10_000),
                part_cost: 60.0,
                ore_cost: 0.0,
                build_turns: 20,
                dependency: None,
                spawn_source: Some(Archon),
                can_move: true,
                can_attack: true,
                can_build: false,
                can_spawn: false,
                can_mine: false,
                can_launch: false,
                can_research: false,
                is_building: false,
            },
            Guard => RobotType {
                id: self,
                max_health: 100.0,
                attack_power: 10.0,
                attack_delay: 1.0,
                cooldown_delay: 1.0,
                movement_delay: 1.0,
                sensor_radius_squared: 24,
                attack_radius_squared: 10,
                min_attack_radius_squared: 0,
                bytecode_limit: 10_000,
                free_bytecode_threshold: Self::free_threshold(10_000),
                part_cost: 75.0,
                ore_cost: 0.0,
                build_turns: 20,
                dependency: None,
                spawn_source: Some(Archon),
                can_move: true,
                can_attack: true,
                can_build: false,
                can_spawn: false,
                can_mine: false,
                can_launch: false,
                can_research: false,
                is_building: false,
            },
            Basher => RobotType {
                id: self,
                max_health: 120.0,
                attack_power: 8.0,
                attack_delay: 1.0,
                cooldown_delay: 1.0,
                movement_delay: 2.0,
                sensor_radius_squared: 20,
                // BASHER does not target-attack; it bashes its own tile's
                // surroundings, so its attack radius is purely informational.
                attack_radius_squared: 2,
                min_attack_radius_squared: 0,
                bytecode_limit: 10_000,
                free_bytecode_threshold: Self::free_threshold(10_000),
                part_cost: 80.0,
                ore_cost: 0.0,
                build_turns: 25,
                dependency: None,
                spawn_source: Some(Archon),
                can_move: true,
                can_attack: true,
                can_build: false,
                can_spawn: false,
                can_mine: false,
                can_launch: false,
                can_research: false,
                is_building: false,
            },
            Turret => RobotType {
                id: self,
                max_health: 150.0,
                attack_power: 26.0,
                attack_delay: 1.0,
                cooldown_delay: 2.0,
                movement_delay: 0.0,
                sensor_radius_squared: 48,
                attack_radius_squared: 48,
                min_attack_radius_squared: 24,
                bytecode_limit: 10_000,
                free_bytecode_threshold: Self::free_threshold(10_000),
                part_cost: 100.0,
                ore_cost: 0.0,
                build_turns: 30,
                dependency: None,
                spawn_source: Some(Beaver),
                can_move: false,
                can_attack: true,
                can_build: false,
                can_spawn: false,
                can_mine: false,
                can_launch: false,
                can_research: false,
                is_building: true,
            },
            Commander => RobotType {
                id: self,
                max_health: 500.0,
                attack_power: 15.0,
                attack_delay: 1.0,
                cooldown_delay: 1.0,
                movement_delay: 1.0,
                sensor_radius_squared: 53,
                attack_radius_squared: 24,
                min_attack_radius_squared: 0,
                bytecode_limit: 20_000,
                free_bytecode_threshold: Self::free_threshold(20_000),
                part_cost: 200.0,
                ore_cost: 0.0,
                build_turns: 0,
                dependency: None,
                spawn_source: Some(Archon),
                can_move: true,
                can_attack: true,
                can_build: false,
                can_spawn: false,
                can_mine: false,
                can_launch: false,
                can_research: false,
                is_building: false,
            },
            Launcher => RobotType {
                id: self,
                max_health: 140.0,
                attack_power: 0.0,
                attack_delay: 0.0,
                cooldown_delay: 0.0,
                movement_delay: 2.0,
                sensor_radius_squared: 30,
                attack_radius_squared: 0,
                min_attack_radius_squared: 0,
                bytecode_limit: 10_000,
                free_bytecode_threshold: Self::free_threshold(10_000),
                part_cost: 100.0,
                ore_cost: 20.0,
                build_turns: 25,
                dependency: Some(Turret),
                spawn_source: Some(Archon),
                can_move: true,
                can_attack: false,
                can_build: false,
                can_spawn: false,
                can_mine: false,
                can_launch: true,
                can_research: false,
                is_building: false,
            },
            Missile => RobotType {
                id: self,
                max_health: 1.0,
                attack_power: 30.0,
                attack_delay: 0.0,
                cooldown_delay: 0.0,
                movement_delay: 1.0,
                sensor_radius_squared: 5,
                attack_radius_squared: 4,
                min_attack_radius_squared: 0,
                bytecode_limit: 2_000,
                free_bytecode_threshold: Self::free_threshold(2_000),
                part_cost: 0.0,
                ore_cost: 0.0,
                build_turns: 0,
                dependency: None,
                spawn_source: None,
                can_move: true,
                can_attack: false,
                can_build: false,
                can_spawn: false,
                can_mine: false,
                can_launch: false,
                can_research: false,
                is_building: false,
            },
            ZombieDen => RobotType {
                id: self,
                max_health: 600.0,
                attack_power: 0.0,
                attack_delay: 0.0,
                cooldown_delay: 0.0,
                movement_delay: 0.0,
                sensor_radius_squared: 0,
                attack_radius_squared: 0,
                min_attack_radius_squared: 0,
                bytecode_limit: 0,
                free_bytecode_threshold: 0,
                part_cost: 0.0,
                ore_cost: 0.0,
                build_turns: 0,
                dependency: None,
                spawn_source: None,
                can_move: false,
                can_attack: false,
                can_build: false,
                can_spawn: false,
                can_mine: false,
                can_launch: false,
                can_research: false,
                is_building: true,
            },
            StandardZombie => RobotType {
                id: self,
                max_health: 100.0,
                attack_power: 10.0,
                attack_delay: 1.0,
                cooldown_delay: 1.0,
                movement_delay: 2.0,
                sensor_radius_squared: 24,
                attack_radius_squared: 2,
                min_attack_radius_squared: 0,
                bytecode_limit: 0,
                free_bytecode_threshold: 0,
                part_cost: 0.0,
                ore_cost: 0.0,
                build_turns: 0,
                dependency: None,
                spawn_source: None,
                can_move: true,
                can_attack: true,
                can_build: false,
                can_spawn: false,
                can_mine: false,
                can_launch: false,
                can_research: false,
                is_building: false,
            },
            RangedZombie => RobotType {
                id: self,
                max_health: 70.0,
                attack_power: 8.0,
                attack_delay: 1.0,
                cooldown_delay: 1.0,
                movement_delay: 2.0,
                sensor_radius_squared: 30,
                attack_radius_squared: 15,
                min_attack_radius_squared: 0,
                bytecode_limit: 0,
                free_bytecode_threshold: 0,
                part_cost: 0.0,
                ore_cost: 0.0,
                build_turns: 0,
                dependency: None,
                spawn_source: None,
                can_move: true,
                can_attack: true,
                can_build: false,
                can_spawn: false,
                can_mine: false,
                can_launch: false,
                can_research: false,
                is_building: false,
            },
            FastZombie => RobotType {
                id: self,
                max_health: 50.0,
                attack_power: 3.0,
                attack_delay: 1.0,
                cooldown_delay: 1.0,
                movement_delay: 1.0,
                sensor_radius_squared: 20,
                attack_radius_squared: 2,
                min_attack_radius_squared: 0,
                bytecode_limit: 0,
                free_bytecode_threshold: 0,
                part_cost: 0.0,
                ore_cost: 0.0,
                build_turns: 0,
                dependency: None,
                spawn_source: None,
                can_move: true,
                can_attack: true,
                can_build: false,
                can_spawn: false,
                can_mine: false,
                can_launch: false,
                can_research: false,
                is_building: false,
            },
            BigZombie => RobotType {
                id: self,
                max_health: 500.0,
                attack_power: 20.0,
                attack_delay: 1.0,
                cooldown_delay: 2.0,
                movement_delay: 3.0,
                sensor_radius_squared: 24,
                attack_radius_squared: 4,
                min_attack_radius_squared: 0,
                bytecode_limit: 0,
                free_bytecode_threshold: 0,
                part_cost: 0.0,
                ore_cost: 0.0,
                build_turns: 0,
                dependency: None,
                spawn_source: None,
                can_move: true,
                can_attack: true,
                can_build: false,
                can_spawn: false,
                can_mine: false,
                can_launch: false,
                can_research: false,
                is_building: false,
            },
        }
    }

    pub fn is_zombie(self) -> bool {
        matches!(
            self,
            RobotTypeId::ZombieDen
                | RobotTypeId::StandardZombie
                | RobotTypeId::RangedZombie
                | RobotTypeId::FastZombie
                | RobotTypeId::BigZombie
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archon_matches_scenario_one_max_health() {
        assert_eq!(RobotTypeId::Archon.stats().max_health, 1000.0);
    }

    #[test]
    fn soldier_attack_power_matches_scenario_one() {
        assert_eq!(RobotTypeId::Soldier.stats().attack_power, 4.0);
    }

    #[test]
    fn free_bytecode_threshold_is_limit_minus_4000() {
        let beaver = RobotTypeId::Beaver.stats();
        assert_eq!(beaver.free_bytecode_threshold, beaver.bytecode_limit - 4000);
    }

    #[test]
    fn turret_has_minimum_attack_range() {
        let turret = RobotTypeId::Turret.stats();
        assert_eq!(turret.min_attack_radius_squared, 24);
        assert_eq!(turret.attack_radius_squared, 48);
    }

    #[test]
    fn team_opponent_is_involutive() {
        assert_eq!(Team::A.opponent().opponent(), Team::A);
        assert_eq!(Team::A.opponent(), Team::B);
    }

    #[test]
    fn zombie_classification() {
        assert!(RobotTypeId::StandardZombie.is_zombie());
        assert!(!RobotTypeId::Soldier.is_zombie());
    }

    #[test]
    fn only_launcher_can_launch_missiles() {
        for robot_type in RobotTypeId::PLAYER_TYPES {
            assert_eq!(robot_type.stats().can_launch, robot_type == RobotTypeId::Launcher);
        }
    }
}
