//! [`RobotRecord`] -- the mutable per-robot state the [`World`](crate::world::World)
//! tracks, and its construction/build lifecycle.

use std::collections::{HashMap, VecDeque};

use bc_core::prelude::*;
use serde::{Deserialize, Serialize};

/// Where a robot is in its build-out. Covers both `ARCHON::spawn` results
/// (which start `Active` immediately for mobile units) and `BEAVER::build`
/// results (buildings sit in `UnderConstruction` until `build_turns` elapses).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BuildState {
    UnderConstruction { turns_remaining: u32 },
    Active,
}

/// A robot that has been infected by a zombie bash and will turn at end of
/// round unless the infection somehow clears first (it never does in this
/// rule set, but the field is tracked separately from health for clarity).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Infection {
    pub damage_remaining: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotRecord {
    pub id: RobotId,
    pub robot_type: RobotTypeId,
    pub team: Team,
    pub location: MapLocation,
    pub health: f64,
    /// This robot's effective max health. Equal to `robot_type.stats().max_health`
    /// except for outbreak-scaled zombies, whose spawner multiplies both
    /// `health` and this field by the round's outbreak multiplier -- rubble
    /// deposited on death must reflect the scaled value, not the catalog base.
    pub max_health: f64,
    pub core_delay: f64,
    pub weapon_delay: f64,
    pub supply_level: f64,
    pub missile_count: u32,
    pub xp: u32,
    pub bytecodes_used_last_turn: u32,
    pub build_state: BuildState,
    pub infection: Option<Infection>,
    pub learned_skills: Vec<CommanderSkillType>,
    pub inbox: VecDeque<SpatialSignal>,
    pub basic_signals_sent_this_turn: u32,
    pub message_signals_sent_this_turn: u32,
    pub indicator_strings: Vec<String>,
    /// Set by `move_direction`/`cast_flash`, cleared at end of round. Gates
    /// `launch`, which requires the launcher to have held still this turn.
    pub moved_this_turn: bool,
    /// Radio-channel writes this robot made so far this turn. `readBroadcast`
    /// checks here before falling back to the team's round-delayed visible
    /// map, giving the writer a same-turn "queued read" of its own write
    /// without exposing it to the rest of the team until next round.
    pub own_broadcast_writes_this_turn: HashMap<u32, i32>,
}

impl RobotRecord {
    pub fn new_active(id: RobotId, robot_type: RobotTypeId, team: Team, location: MapLocation) -> Self {
        let stats = robot_type.stats();
        Self {
            id,
            robot_type,
            team,
            location,
            health: stats.max_health,
            max_health: stats.max_health,
            core_delay: 0.0,
            weapon_delay: 0.0,
            supply_level: 0.0,
            missile_count: 0,
            xp: 0,
            bytecodes_used_last_turn: 0,
            build_state: BuildState::Active,
            infection: None,
            learned_skills: Vec::new(),
            inbox: VecDeque::new(),
            basic_signals_sent_this_turn: 0,
            message_signals_sent_this_turn: 0,
            indicator_strings: vec![String::new(); EngineConstants::default().number_of_indicator_strings as usize],
            moved_this_turn: false,
            own_broadcast_writes_this_turn: HashMap::new(),
        }
    }

    /// A building spawned by `BEAVER::build`, starting at 1 hp and growing
    /// over `build_turns` rounds (§4.3). Left at 1hp rather than max so that
    /// an incomplete building is fragile, matching the source rule that a
    /// building under construction can be destroyed by a single hit.
    pub fn new_under_construction(
        id: RobotId,
        robot_type: RobotTypeId,
        team: Team,
        location: MapLocation,
        build_turns: u32,
    ) -> Self {
        let mut record = Self::new_active(id, robot_type, team, location);
        record.health = 1.0;
        record.build_state = BuildState::UnderConstruction {
            turns_remaining: build_turns,
        };
        record
    }

    pub fn stats(&self) -> RobotType {
        self.robot_type.stats()
    }

    pub fn is_active(&self) -> bool {
        matches!(self.build_state, BuildState::Active)
    }

    pub fn is_infected(&self) -> bool {
        self.infection.is_some()
    }

    /// Whether `delay` permits acting this round: the source rules treat any
    /// delay `< 1.0` as "this turn has arrived" for that action class.
    pub fn can_act_with(delay: f64) -> bool {
        delay < 1.0
    }

    pub fn reset_turn_counters(&mut self) {
        self.basic_signals_sent_this_turn = 0;
        self.message_signals_sent_this_turn = 0;
        self.moved_this_turn = false;
        self.own_broadcast_writes_this_turn.clear();
        self.bytecodes_used_last_turn = 0;
    }
}
