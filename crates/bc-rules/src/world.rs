//! [`World`] -- the authoritative mutable match state.
//!
//! Adapted from the ascending-id iteration and registry-separation idioms
//! of the teacher's entity world, rewritten without an archetype/component
//! split: a round-based simulation with a closed, known set of per-robot
//! fields has no need for one, and a flat `BTreeMap<RobotId, RobotRecord>`
//! gives the same "always iterate in id order" guarantee for free.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use bc_core::prelude::*;
use serde::{Deserialize, Serialize};

use crate::death;
use crate::memory::MapMemory;
use crate::robot::{BuildState, Infection, RobotRecord};
use crate::signal_log::SignalLog;

/// Length of the per-team shared integer memory array (`teamMemory`).
pub const TEAM_MEMORY_SIZE: usize = 32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchProgress {
    pub upgrade: Upgrade,
    pub rounds_remaining: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamState {
    pub resources: f64,
    /// Ore reserve, distinct from `resources` (parts): credited by `mine()`
    /// draining a tile's ore deposit, debited by `oreCost` on build/spawn.
    pub ore: f64,
    pub upgrades: BTreeSet<Upgrade>,
    pub research: Option<ResearchProgress>,
    pub robot_counts: BTreeMap<RobotTypeId, u32>,
    /// Total COMMANDERs this team has ever spawned, never decremented on
    /// death. Drives the spawn-cost doubling in `spawn()`.
    pub commander_spawned_count: u32,
    pub team_memory: [i64; TEAM_MEMORY_SIZE],
    /// Snapshot of `team_memory` taken at the start of the round, before any
    /// robot's turn runs this round. `getTeamMemory()` reads this, not the
    /// live array, so a write by an earlier-acting robot this round is never
    /// visible to a later one in the same round.
    pub old_team_memory: [i64; TEAM_MEMORY_SIZE],
    /// Broadcast values visible for reading this round (written last round).
    pub broadcast_visible: BTreeMap<u32, i32>,
    /// Broadcast values written this round; swapped into `broadcast_visible`
    /// at end of round so writers can't read their own value same-round.
    pub broadcast_pending: BTreeMap<u32, i32>,
    pub map_memory: MapMemory,
}

impl Default for TeamState {
    fn default() -> Self {
        Self {
            resources: 0.0,
            ore: 0.0,
            upgrades: BTreeSet::new(),
            research: None,
            robot_counts: BTreeMap::new(),
            commander_spawned_count: 0,
            team_memory: [0; TEAM_MEMORY_SIZE],
            old_team_memory: [0; TEAM_MEMORY_SIZE],
            broadcast_visible: BTreeMap::new(),
            broadcast_pending: BTreeMap::new(),
            map_memory: MapMemory::new(),
        }
    }
}

impl TeamState {
    pub fn has_upgrade(&self, upgrade: Upgrade) -> bool {
        self.upgrades.contains(&upgrade)
    }

    /// Whether this team currently has a living COMMANDER -- derived from
    /// `robot_counts` rather than stored, so it can never desync from it.
    pub fn has_commander(&self) -> bool {
        self.robot_counts.get(&RobotTypeId::Commander).copied().unwrap_or(0) > 0
    }

    /// Whether this team owns (has ever built/spawned and still has) at
    /// least one robot of `dependency` -- the gate a `RobotType::dependency`
    /// checks before a build/spawn is allowed.
    pub fn owns(&self, robot_type: RobotTypeId) -> bool {
        self.robot_counts.get(&robot_type).copied().unwrap_or(0) > 0
    }

    pub fn swap_broadcasts(&mut self) {
        self.broadcast_visible.append(&mut self.broadcast_pending);
    }

    /// Called once at the start of each round, before any robot acts.
    pub fn snapshot_team_memory(&mut self) {
        self.old_team_memory = self.team_memory;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub map: GameMap,
    pub constants: EngineConstants,
    round: u32,
    id_allocator: IdAllocator,
    robots: BTreeMap<RobotId, RobotRecord>,
    #[serde(with = "crate::serde_map_as_pairs")]
    location_index: HashMap<MapLocation, RobotId>,
    team_a: TeamState,
    team_b: TeamState,
    pending_deaths: Vec<(RobotId, DeathCause)>,
    #[serde(skip)]
    signal_log: SignalLog,
}

impl World {
    pub fn new(map: GameMap, constants: EngineConstants) -> Self {
        let mut world = Self {
            map,
            constants,
            round: 0,
            id_allocator: IdAllocator::new(),
            robots: BTreeMap::new(),
            location_index: HashMap::new(),
            team_a: TeamState {
                resources: constants.parts_initial_amount,
                ..TeamState::default()
            },
            team_b: TeamState {
                resources: constants.parts_initial_amount,
                ..TeamState::default()
            },
            pending_deaths: Vec::new(),
            signal_log: SignalLog::new(),
        };
        let placements = world.map.initial_robots.clone();
        for placement in placements {
            world.spawn_active(placement.robot_type, placement.team, placement.location);
        }
        world
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn advance_round(&mut self) {
        self.round += 1;
    }

    pub fn signal_log(&self) -> &SignalLog {
        &self.signal_log
    }

    pub fn signal_log_mut(&mut self) -> &mut SignalLog {
        &mut self.signal_log
    }

    pub fn emit(&mut self, signal: Signal) {
        self.signal_log.push(signal);
    }

    pub fn team_state(&self, team: Team) -> &TeamState {
        match team {
            Team::A => &self.team_a,
            Team::B => &self.team_b,
            _ => panic!("team_state is only defined for the two playing teams"),
        }
    }

    pub fn team_state_mut(&mut self, team: Team) -> &mut TeamState {
        match team {
            Team::A => &mut self.team_a,
            Team::B => &mut self.team_b,
            _ => panic!("team_state_mut is only defined for the two playing teams"),
        }
    }

    pub fn robot(&self, id: RobotId) -> Option<&RobotRecord> {
        self.robots.get(&id)
    }

    pub fn robot_mut(&mut self, id: RobotId) -> Option<&mut RobotRecord> {
        self.robots.get_mut(&id)
    }

    pub fn robot_at(&self, loc: MapLocation) -> Option<&RobotRecord> {
        self.location_index.get(&loc).and_then(|id| self.robots.get(id))
    }

    pub fn is_occupied(&self, loc: MapLocation) -> bool {
        self.location_index.contains_key(&loc)
    }

    /// All robot ids, ascending -- the deterministic per-round turn order.
    pub fn ids_ascending(&self) -> Vec<RobotId> {
        self.robots.keys().copied().collect()
    }

    pub fn robots_of_team(&self, team: Team) -> impl Iterator<Item = &RobotRecord> {
        self.robots.values().filter(move |r| r.team == team)
    }

    /// Every live robot, ascending id order (§4.1 `allObjects`).
    pub fn all_robots(&self) -> impl Iterator<Item = &RobotRecord> {
        self.robots.values()
    }

    /// A robot's effective squared sensor radius, widened by
    /// `VISION_UPGRADE_BONUS_RADIUS_SQUARED` once its team has researched
    /// `Upgrade::Vision`.
    fn effective_sensor_radius_squared(&self, robot: &RobotRecord) -> i64 {
        let base = robot.robot_type.stats().sensor_radius_squared;
        if self.team_state(robot.team).has_upgrade(Upgrade::Vision) {
            base + self.constants.vision_upgrade_bonus_radius_squared
        } else {
            base
        }
    }

    /// True iff `loc` is currently within sensor range of any living robot
    /// of `team` (§4.1/§4.2: team-wide sight, as opposed to a single
    /// robot's own sensor range).
    pub fn is_in_team_sight(&self, team: Team, loc: MapLocation) -> bool {
        self.robots_of_team(team)
            .any(|r| r.location.distance_squared_to(loc) <= self.effective_sensor_radius_squared(r))
    }

    /// §4.1 `senseOre(team, loc)`: the tile's current ore if in team sight,
    /// else the team's last-remembered value, else `-1.0`.
    pub fn sense_ore(&self, team: Team, loc: MapLocation) -> f64 {
        if self.is_in_team_sight(team, loc) {
            self.map.ore_at(loc)
        } else {
            self.team_state(team).map_memory.remembered_ore(loc)
        }
    }

    /// §4.1 `senseMapTerrain(team, loc)`: the tile's terrain if in team
    /// sight, else the team's last-remembered terrain, else `None` (the
    /// tile has never been sighted).
    pub fn sense_map_terrain(&self, team: Team, loc: MapLocation) -> Option<TerrainTile> {
        if self.is_in_team_sight(team, loc) {
            Some(self.map.terrain_at(loc))
        } else {
            self.team_state(team).map_memory.remembered_terrain(loc)
        }
    }

    /// The map-authored starting locations of `team`'s archons, sorted
    /// ascending by `(y, x)` -- a fixed, deterministic order for external
    /// tooling that wants to identify "home" positions without scanning
    /// the live robot table (which may have moved or lost them by now).
    pub fn initial_archon_locations(&self, team: Team) -> Vec<MapLocation> {
        let mut locations: Vec<MapLocation> = self
            .map
            .initial_robots
            .iter()
            .filter(|placement| placement.team == team && placement.robot_type == RobotTypeId::Archon)
            .map(|placement| placement.location)
            .collect();
        locations.sort_by_key(|loc| (loc.y, loc.x));
        locations
    }

    fn register(&mut self, record: RobotRecord) -> RobotId {
        let id = record.id;
        self.location_index.insert(record.location, id);
        if record.team.is_playing_team() {
            *self
                .team_state_mut(record.team)
                .robot_counts
                .entry(record.robot_type)
                .or_insert(0) += 1;
        }
        self.robots.insert(id, record);
        id
    }

    pub fn spawn_active(&mut self, robot_type: RobotTypeId, team: Team, location: MapLocation) -> RobotId {
        self.collect_parts_at(team, location);
        let id = self.id_allocator.allocate();
        let record = RobotRecord::new_active(id, robot_type, team, location);
        self.register(record)
    }

    pub fn spawn_under_construction(
        &mut self,
        robot_type: RobotTypeId,
        team: Team,
        location: MapLocation,
    ) -> RobotId {
        self.collect_parts_at(team, location);
        let id = self.id_allocator.allocate();
        let build_turns = robot_type.stats().build_turns;
        let record = RobotRecord::new_under_construction(id, robot_type, team, location, build_turns);
        self.register(record)
    }

    pub fn move_robot(&mut self, id: RobotId, new_location: MapLocation) {
        if let Some(record) = self.robots.get_mut(&id) {
            self.location_index.remove(&record.location);
            record.location = new_location;
            self.location_index.insert(new_location, id);
            let team = record.team;
            self.collect_parts_at(team, new_location);
        }
    }

    /// A robot landing on a tile (by spawning or moving) picks up any parts
    /// sitting there: the tile empties and the team is credited the value.
    fn collect_parts_at(&mut self, team: Team, location: MapLocation) {
        if !team.is_playing_team() {
            return;
        }
        let parts = self.map.parts_at(location);
        if parts > 0.0 {
            self.map.set_parts_at(location, 0.0);
            let _ = self.adjust_resources(team, parts);
        }
    }

    pub fn adjust_resources(&mut self, team: Team, delta: f64) -> Result<(), ActionError> {
        let state = self.team_state_mut(team);
        let new_total = state.resources + delta;
        if new_total < 0.0 {
            return Err(ActionError::NotEnoughResource {
                required: -delta,
                available: state.resources,
            });
        }
        state.resources = new_total;
        Ok(())
    }

    pub fn adjust_ore(&mut self, team: Team, delta: f64) -> Result<(), ActionError> {
        let state = self.team_state_mut(team);
        let new_total = state.ore + delta;
        if new_total < 0.0 {
            return Err(ActionError::NotEnoughResource {
                required: -delta,
                available: state.ore,
            });
        }
        state.ore = new_total;
        Ok(())
    }

    /// Records a successful COMMANDER spawn for the team's cost-doubling
    /// counter. Never decremented -- doubling tracks lifetime spawns, not
    /// living commanders.
    pub fn record_commander_spawned(&mut self, team: Team) {
        self.team_state_mut(team).commander_spawned_count += 1;
    }

    /// Converts a NEUTRAL robot to `new_team` in place, at full health --
    /// the effect of `activate()`. Immediate, not deferred through
    /// `queue_death`/`reap_deaths`: the robot keeps its id and location and
    /// is simply re-owned, so there is no tick where the tile is briefly
    /// unoccupied.
    pub fn convert_team(&mut self, id: RobotId, new_team: Team) {
        let Some(record) = self.robots.get_mut(&id) else { return };
        record.team = new_team;
        record.health = record.max_health;
        let robot_type = record.robot_type;
        if new_team.is_playing_team() {
            *self
                .team_state_mut(new_team)
                .robot_counts
                .entry(robot_type)
                .or_insert(0) += 1;
        }
    }

    pub fn queue_death(&mut self, id: RobotId, cause: DeathCause) {
        self.pending_deaths.push((id, cause));
    }

    /// Deaths queued so far this round, not yet reaped -- the robots named
    /// here are still present in the world. Used by victory determination to
    /// identify archons dying this round before [`reap_deaths`](Self::reap_deaths)
    /// removes them.
    pub fn pending_deaths(&self) -> &[(RobotId, DeathCause)] {
        &self.pending_deaths
    }

    fn deregister(&mut self, id: RobotId) -> Option<RobotRecord> {
        let record = self.robots.remove(&id)?;
        self.location_index.remove(&record.location);
        if let Some(counts) = match record.team {
            Team::A => Some(&mut self.team_a.robot_counts),
            Team::B => Some(&mut self.team_b.robot_counts),
            _ => None,
        } {
            if let Some(count) = counts.get_mut(&record.robot_type) {
                *count = count.saturating_sub(1);
            }
        }
        Some(record)
    }

    /// Resolve every death queued this round (§4.5): deposit rubble, credit
    /// den-destruction rewards, emit `Signal::Death`, and turn infected
    /// corpses into zombies scaled by the current outbreak multiplier.
    pub fn reap_deaths(&mut self, outbreak_multiplier: f64) {
        let deaths = std::mem::take(&mut self.pending_deaths);
        for (id, cause) in deaths {
            let Some(record) = self.deregister(id) else { continue };
            let rubble = death::rubble_on_death(cause, record.max_health, &self.constants);
            if rubble > 0.0 {
                let existing = self.map.rubble_at(record.location);
                self.map.set_rubble_at(record.location, existing + rubble);
            }
            if let Some(reward_team) = death::den_destruction_reward(cause) {
                let _ = self.adjust_resources(reward_team, self.constants.den_part_reward);
                self.emit(Signal::ZombieDenDestroyed { reward_team });
            }
            self.emit(Signal::Death { id, cause });
            self.credit_commander_xp_near(record.location);
            if record.is_infected() {
                let zombie_type = RobotTypeId::RangedZombie;
                let zombie_id = self.spawn_active(zombie_type, Team::Zombie, record.location);
                if let Some(zombie) = self.robot_mut(zombie_id) {
                    let scaled = zombie_type.stats().max_health * outbreak_multiplier;
                    zombie.health = scaled;
                    zombie.max_health = scaled;
                }
            }
        }
    }

    /// Credit every living commander within sensor range of `loc` with XP
    /// for a death that just occurred there, regardless of team or cause.
    fn credit_commander_xp_near(&mut self, loc: MapLocation) {
        let credit = self.constants.commander_xp_per_nearby_death;
        for commander in self.robots.values_mut() {
            if commander.robot_type == RobotTypeId::Commander
                && commander.is_active()
                && commander.location.distance_squared_to(loc) <= commander.stats().sensor_radius_squared
            {
                commander.xp += credit;
            }
        }
    }

    pub fn infect(&mut self, id: RobotId, damage_remaining: f64) {
        if let Some(record) = self.robot_mut(id) {
            record.infection = Some(Infection { damage_remaining });
        }
    }

    /// Advance building construction timers; buildings that finish this
    /// round flip to `Active`.
    pub fn advance_construction(&mut self) {
        for record in self.robots.values_mut() {
            if let BuildState::UnderConstruction { turns_remaining } = record.build_state {
                if turns_remaining <= 1 {
                    record.build_state = BuildState::Active;
                    record.health = record.stats().max_health;
                } else {
                    record.build_state = BuildState::UnderConstruction {
                        turns_remaining: turns_remaining - 1,
                    };
                }
            }
        }
    }
}
