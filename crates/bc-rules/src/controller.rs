//! `RobotController` -- the action-arbitration surface a robot's turn is
//! played through.
//!
//! Adapted from the validate -> queue -> apply pattern of the teacher's
//! command buffer, collapsed to validate -> charge -> emit -> mutate: the
//! source rules require every action's effect to be immediately visible to
//! later actions in the same round, so there is no deferred-apply phase.

use bc_core::prelude::*;
use tracing::debug;

use crate::world::World;

/// Borrows the world and fixes which robot is acting for the duration of a
/// turn. One `RobotController` is constructed per robot per round by the
/// round engine and discarded at the end of that robot's turn.
pub struct RobotController<'w> {
    world: &'w mut World,
    actor: RobotId,
}

impl<'w> RobotController<'w> {
    pub fn new(world: &'w mut World, actor: RobotId) -> Self {
        Self { world, actor }
    }

    pub fn id(&self) -> RobotId {
        self.actor
    }

    fn actor_record(&self) -> &crate::robot::RobotRecord {
        self.world.robot(self.actor).expect("acting robot must exist")
    }

    fn actor_record_mut(&mut self) -> &mut crate::robot::RobotRecord {
        self.world.robot_mut(self.actor).expect("acting robot must exist")
    }

    pub fn team(&self) -> Team {
        self.actor_record().team
    }

    pub fn location(&self) -> MapLocation {
        self.actor_record().location
    }

    pub fn robot_type(&self) -> RobotTypeId {
        self.actor_record().robot_type
    }

    pub fn health(&self) -> f64 {
        self.actor_record().health
    }

    pub fn core_delay(&self) -> f64 {
        self.actor_record().core_delay
    }

    pub fn weapon_delay(&self) -> f64 {
        self.actor_record().weapon_delay
    }

    fn require_active(&self) -> Result<(), ActionError> {
        if !self.actor_record().is_active() {
            return Err(ActionError::CantDoThatBro {
                reason: "robot is still under construction".into(),
            });
        }
        Ok(())
    }

    fn require_core_ready(&self) -> Result<(), ActionError> {
        let delay = self.core_delay();
        if delay >= 1.0 {
            return Err(ActionError::NotActive { delay });
        }
        Ok(())
    }

    fn require_weapon_ready(&self) -> Result<(), ActionError> {
        let delay = self.weapon_delay();
        if delay >= 1.0 {
            return Err(ActionError::NotActive { delay });
        }
        Ok(())
    }

    fn require_in_sensor_range(&self, loc: MapLocation) -> Result<(), ActionError> {
        if self.location().distance_squared_to(loc) > self.effective_sensor_radius_squared() {
            return Err(ActionError::CantSenseThat);
        }
        Ok(())
    }

    /// The caller's squared sensor radius, widened by `VISION_UPGRADE_BONUS_RADIUS_SQUARED`
    /// once the team has researched `Upgrade::Vision`.
    fn effective_sensor_radius_squared(&self) -> i64 {
        let base = self.robot_type().stats().sensor_radius_squared;
        if self.world.team_state(self.team()).has_upgrade(Upgrade::Vision) {
            base + self.world.constants.vision_upgrade_bonus_radius_squared
        } else {
            base
        }
    }

    // -- sensing ------------------------------------------------------

    pub fn can_sense_location(&self, loc: MapLocation) -> bool {
        self.location().distance_squared_to(loc) <= self.effective_sensor_radius_squared()
    }

    pub fn sense_robot_at(&self, loc: MapLocation) -> Result<Option<RobotId>, ActionError> {
        self.require_in_sensor_range(loc)?;
        Ok(self.world.robot_at(loc).map(|r| r.id))
    }

    pub fn sense_rubble(&self, loc: MapLocation) -> f64 {
        if self.can_sense_location(loc) {
            self.world.map.rubble_at(loc)
        } else {
            self.world.team_state(self.team()).map_memory.remembered_rubble(loc)
        }
    }

    pub fn sense_parts(&self, loc: MapLocation) -> f64 {
        if self.can_sense_location(loc) {
            self.world.map.parts_at(loc)
        } else {
            self.world.team_state(self.team()).map_memory.remembered_parts(loc)
        }
    }

    /// §4.1 `senseOre(team, loc)`, called against the caller's own team.
    pub fn sense_ore(&self, loc: MapLocation) -> f64 {
        self.world.sense_ore(self.team(), loc)
    }

    /// §4.1 `senseMapTerrain(team, loc)`, called against the caller's own
    /// team. `None` means the tile has never been within this team's sight.
    pub fn sense_map_terrain(&self, loc: MapLocation) -> Option<TerrainTile> {
        self.world.sense_map_terrain(self.team(), loc)
    }

    /// §4.2 `sensePartLocations(radius)`: every tile within `radius_squared`
    /// of the caller (unbounded if negative) that is currently in the
    /// caller's sensor range and has `parts > 0`.
    pub fn sense_part_locations(&self, radius_squared: i64) -> Vec<MapLocation> {
        let center = self.location();
        self.world
            .map
            .all_locations()
            .filter(|&loc| radius_squared < 0 || center.distance_squared_to(loc) <= radius_squared)
            .filter(|&loc| self.can_sense_location(loc))
            .filter(|&loc| self.world.map.parts_at(loc) > 0.0)
            .collect()
    }

    /// §4.2 `senseNearbyGameObjects(type, center, radiusSquared, teamFilter)`:
    /// every live robot within `radius_squared` of `center` (unbounded if
    /// negative) that is either within the caller's own sensor range or on
    /// the caller's own team (always visible to it), optionally narrowed by
    /// `robot_type`/`team_filter`, excluding the caller. Ascending id order.
    pub fn sense_nearby_game_objects(
        &self,
        robot_type: Option<RobotTypeId>,
        center: MapLocation,
        radius_squared: i64,
        team_filter: Option<Team>,
    ) -> Vec<RobotId> {
        let caller = self.actor;
        let caller_team = self.team();
        self.world
            .all_robots()
            .filter(|r| r.id != caller)
            .filter(|r| radius_squared < 0 || center.distance_squared_to(r.location) <= radius_squared)
            .filter(|r| r.team == caller_team || self.can_sense_location(r.location))
            .filter(|r| robot_type.map_or(true, |t| r.robot_type == t))
            .filter(|r| team_filter.map_or(true, |t| r.team == t))
            .map(|r| r.id)
            .collect()
    }

    /// Refresh this robot's team's map memory for every tile currently in
    /// sensor range -- called once at the start of the robot's turn.
    pub fn refresh_memory(&mut self) {
        let center = self.location();
        let radius = self.effective_sensor_radius_squared();
        let team = self.team();
        let mut to_record = Vec::new();
        for loc in self.world.map.all_locations() {
            if center.distance_squared_to(loc) <= radius {
                to_record.push((
                    loc,
                    self.world.map.rubble_at(loc),
                    self.world.map.parts_at(loc),
                    self.world.map.ore_at(loc),
                    self.world.map.terrain_at(loc),
                ));
            }
        }
        let state = self.world.team_state_mut(team);
        for (loc, rubble, parts, ore, terrain) in to_record {
            state.map_memory.record(loc, rubble, parts, ore, terrain);
        }
    }

    // -- movement -------------------------------------------------------

    pub fn can_move(&self, direction: Direction) -> bool {
        self.try_move_precheck(direction).is_ok()
    }

    fn try_move_precheck(&self, direction: Direction) -> Result<MapLocation, ActionError> {
        self.require_active()?;
        self.require_core_ready()?;
        if !self.robot_type().stats().can_move {
            return Err(ActionError::CantDoThatBro {
                reason: "this robot type cannot move".into(),
            });
        }
        if !direction.is_movement_direction() {
            return Err(ActionError::CantMoveThere);
        }
        let target = self.location().add(direction);
        if self.world.map.terrain_at(target) != TerrainTile::Normal {
            return Err(ActionError::CantMoveThere);
        }
        if self.world.map.rubble_at(target) >= self.world.constants.rubble_obstruction_thresh {
            return Err(ActionError::CantMoveThere);
        }
        if self.world.is_occupied(target) {
            return Err(ActionError::CantMoveThere);
        }
        Ok(target)
    }

    pub fn move_direction(&mut self, direction: Direction) -> Result<(), ActionError> {
        let target = self.try_move_precheck(direction)?;
        let rubble = self.world.map.rubble_at(target);
        let stats = self.robot_type().stats();
        let mut delay = stats.movement_delay;
        if stats.can_mine {
            delay += self.world.constants.mining_movement_delay;
        }
        if direction.is_diagonal() {
            delay *= std::f64::consts::SQRT_2;
        }
        let team = self.team();
        if rubble > self.world.constants.slow_threshold && !self.world.team_state(team).has_upgrade(Upgrade::Pathfinding) {
            delay *= 2.0;
        }
        let actor = self.actor;
        self.world.move_robot(actor, target);
        let record = self.actor_record_mut();
        record.core_delay += delay;
        record.weapon_delay += delay;
        record.moved_this_turn = true;
        let delay_emitted = record.core_delay;
        self.world.emit(Signal::Movement {
            actor,
            new_location: target,
            delay: delay_emitted,
        });
        debug!(actor = actor.0, to = %target, "robot moved");
        Ok(())
    }

    // -- combat -----------------------------------------------------------

    pub fn can_attack_location(&self, loc: MapLocation) -> bool {
        let stats = self.robot_type().stats();
        stats.can_attack
            && self.require_weapon_ready().is_ok()
            && self.require_active().is_ok()
            && {
                let d = self.location().distance_squared_to(loc);
                d >= stats.min_attack_radius_squared && d <= stats.attack_radius_squared
            }
    }

    pub fn attack_location(&mut self, loc: MapLocation) -> Result<(), ActionError> {
        self.require_active()?;
        self.require_weapon_ready()?;
        let stats = self.robot_type().stats();
        if !stats.can_attack {
            return Err(ActionError::CantDoThatBro {
                reason: "this robot type cannot attack".into(),
            });
        }
        if self.robot_type() == RobotTypeId::Basher {
            return Err(ActionError::CantDoThatBro {
                reason: "BASHER does not target-attack, use bash()".into(),
            });
        }
        let distance = self.location().distance_squared_to(loc);
        if distance < stats.min_attack_radius_squared || distance > stats.attack_radius_squared {
            return Err(ActionError::OutOfRange);
        }
        let actor = self.actor;
        let actor_team = self.team();
        let is_turret = self.robot_type() == RobotTypeId::Turret;
        let mut damage = stats.attack_power;

        self.world.emit(Signal::Attack {
            actor,
            target_location: loc,
        });

        if let Some(target) = self.world.robot_at(loc).map(|r| r.id) {
            let target_team = self.world.robot(target).map(|r| r.team);
            if target_team == Some(actor_team) {
                return Err(ActionError::CantDoThatBro {
                    reason: "cannot attack your own team".into(),
                });
            }
            if actor_team == Team::Zombie && self.world.robot(target).map(|r| r.robot_type) == Some(RobotTypeId::Guard) {
                damage *= 1.0 - self.world.constants.guard_damage_reduction;
            }
            let target_is_zombie = target_team == Some(Team::Zombie);
            if let Some(record) = self.world.robot_mut(target) {
                record.health -= damage;
                if record.health <= 0.0 {
                    let is_den = record.robot_type == RobotTypeId::ZombieDen;
                    let cause = if is_turret {
                        DeathCause::TurretAttack
                    } else if is_den {
                        DeathCause::ZombieDenDestroyed { reward_team: actor_team }
                    } else {
                        DeathCause::RegularAttack
                    };
                    self.world.queue_death(target, cause);
                }
            }
            let _ = target_is_zombie;
        }

        let record = self.actor_record_mut();
        record.weapon_delay += stats.cooldown_delay;
        record.core_delay += stats.attack_delay;
        Ok(())
    }

    /// BASHER-only: damages every occupant of the eight tiles adjacent to
    /// the actor's own location, friend and foe alike -- there is no
    /// target location to aim, unlike `attack_location`.
    pub fn bash(&mut self) -> Result<(), ActionError> {
        self.require_active()?;
        self.require_weapon_ready()?;
        if self.robot_type() != RobotTypeId::Basher {
            return Err(ActionError::CantDoThatBro {
                reason: "only BASHER can bash".into(),
            });
        }
        let stats = self.robot_type().stats();
        let actor = self.actor;
        let actor_team = self.team();
        let center = self.location();
        self.world.emit(Signal::Attack {
            actor,
            target_location: center,
        });
        let targets: Vec<RobotId> = Direction::COMPASS
            .iter()
            .filter_map(|&dir| self.world.robot_at(center.add(dir)).map(|r| r.id))
            .collect();
        for target in targets {
            let mut damage = stats.attack_power;
            if actor_team == Team::Zombie && self.world.robot(target).map(|r| r.robot_type) == Some(RobotTypeId::Guard) {
                damage *= 1.0 - self.world.constants.guard_damage_reduction;
            }
            let mut died = false;
            let mut is_den = false;
            if let Some(record) = self.world.robot_mut(target) {
                record.health -= damage;
                died = record.health <= 0.0;
                is_den = record.robot_type == RobotTypeId::ZombieDen;
            }
            if died {
                let cause = if is_den {
                    DeathCause::ZombieDenDestroyed { reward_team: actor_team }
                } else {
                    DeathCause::RegularAttack
                };
                self.world.queue_death(target, cause);
            }
        }
        let record = self.actor_record_mut();
        record.weapon_delay += stats.cooldown_delay;
        record.core_delay += stats.attack_delay;
        Ok(())
    }

    // -- construction -----------------------------------------------------

    /// Shared legality for `build`/`spawn`: the caller's type must match
    /// `robot_type`'s `spawnSource`, and any `dependency` type must already
    /// be owned by the team. Identical for both entry points -- they differ
    /// only in whether the result starts under construction or active.
    fn check_spawn_source_and_dependency(&self, robot_type: RobotTypeId) -> Result<(), ActionError> {
        let stats = robot_type.stats();
        if let Some(required_source) = stats.spawn_source {
            if self.robot_type() != required_source {
                return Err(ActionError::CantDoThatBro {
                    reason: format!("{robot_type:?} can only be created by {required_source:?}"),
                });
            }
        }
        if let Some(dependency) = stats.dependency {
            if !self.world.team_state(self.team()).owns(dependency) {
                return Err(ActionError::CantDoThatBro {
                    reason: format!("{robot_type:?} requires an existing {dependency:?}"),
                });
            }
        }
        Ok(())
    }

    /// COMMANDER's part cost doubles per commander this team has already
    /// spawned, capped at eight doublings.
    fn spawn_cost(&self, robot_type: RobotTypeId, team: Team) -> f64 {
        let stats = robot_type.stats();
        if robot_type != RobotTypeId::Commander {
            return stats.part_cost;
        }
        let doublings = self.world.team_state(team).commander_spawned_count.min(8);
        stats.part_cost * 2f64.powi(doublings as i32)
    }

    pub fn build(&mut self, robot_type: RobotTypeId, direction: Direction) -> Result<RobotId, ActionError> {
        self.require_active()?;
        self.require_core_ready()?;
        if !self.robot_type().stats().can_build {
            return Err(ActionError::CantDoThatBro {
                reason: "this robot type cannot build".into(),
            });
        }
        self.check_spawn_source_and_dependency(robot_type)?;
        if !direction.is_movement_direction() {
            return Err(ActionError::CantMoveThere);
        }
        let target = self.location().add(direction);
        if self.world.map.terrain_at(target) != TerrainTile::Normal || self.world.is_occupied(target) {
            return Err(ActionError::CantMoveThere);
        }
        let stats = robot_type.stats();
        let team = self.team();
        self.world.adjust_resources(team, -stats.part_cost)?;
        if stats.ore_cost > 0.0 {
            self.world.adjust_ore(team, -stats.ore_cost)?;
        }
        let parent = self.actor;
        let spawned = self.world.spawn_under_construction(robot_type, team, target);
        self.world.emit(Signal::Spawn {
            parent,
            spawned,
            robot_type,
            location: target,
        });
        let mining_loading_delay = self.world.constants.mining_loading_delay.max(1.0);
        let record = self.actor_record_mut();
        record.core_delay += mining_loading_delay;
        Ok(spawned)
    }

    pub fn spawn(&mut self, robot_type: RobotTypeId, direction: Direction) -> Result<RobotId, ActionError> {
        self.require_active()?;
        self.require_core_ready()?;
        if !self.robot_type().stats().can_spawn {
            return Err(ActionError::CantDoThatBro {
                reason: "this robot type cannot spawn units".into(),
            });
        }
        self.check_spawn_source_and_dependency(robot_type)?;
        if !direction.is_movement_direction() {
            return Err(ActionError::CantMoveThere);
        }
        let target = self.location().add(direction);
        if self.world.map.terrain_at(target) != TerrainTile::Normal || self.world.is_occupied(target) {
            return Err(ActionError::CantMoveThere);
        }
        let team = self.team();
        if robot_type == RobotTypeId::Launcher && !self.world.team_state(team).has_upgrade(Upgrade::Fusion) {
            return Err(ActionError::MissingUpgrade);
        }
        let stats = robot_type.stats();
        let part_cost = self.spawn_cost(robot_type, team);
        self.world.adjust_resources(team, -part_cost)?;
        if stats.ore_cost > 0.0 {
            self.world.adjust_ore(team, -stats.ore_cost)?;
        }
        let parent = self.actor;
        let spawned = self.world.spawn_active(robot_type, team, target);
        if robot_type == RobotTypeId::Commander {
            self.world.record_commander_spawned(team);
        }
        self.world.emit(Signal::Spawn {
            parent,
            spawned,
            robot_type,
            location: target,
        });
        let record = self.actor_record_mut();
        record.core_delay += 2.0;
        Ok(spawned)
    }

    // -- missiles -----------------------------------------------------

    pub fn launch_missile(&mut self, direction: Direction) -> Result<RobotId, ActionError> {
        self.require_active()?;
        self.require_core_ready()?;
        if !self.robot_type().stats().can_launch {
            return Err(ActionError::CantDoThatBro {
                reason: "this robot type cannot launch missiles".into(),
            });
        }
        if self.actor_record().moved_this_turn {
            return Err(ActionError::CantDoThatBro {
                reason: "cannot launch a missile after moving this turn".into(),
            });
        }
        if self.actor_record().missile_count == 0 {
            return Err(ActionError::CantDoThatBro {
                reason: "no missiles in reserve".into(),
            });
        }
        if !direction.is_movement_direction() {
            return Err(ActionError::CantMoveThere);
        }
        let target = self.location().add(direction);
        if self.world.map.terrain_at(target) != TerrainTile::Normal || self.world.is_occupied(target) {
            return Err(ActionError::CantMoveThere);
        }
        let parent = self.actor;
        let team = self.team();
        let spawned = self.world.spawn_active(RobotTypeId::Missile, team, target);
        self.world.emit(Signal::Spawn {
            parent,
            spawned,
            robot_type: RobotTypeId::Missile,
            location: target,
        });
        let record = self.actor_record_mut();
        record.missile_count -= 1;
        record.core_delay += 1.0;
        Ok(spawned)
    }

    // -- supply ---------------------------------------------------------

    /// A robot at `loc`'s supply level if it is visible; `None` when out of
    /// sensor range or the tile is empty. Supply is too volatile a stat to
    /// memorize meaningfully, unlike rubble/parts, so there is no remembered
    /// fallback here.
    pub fn sense_supply_level(&self, loc: MapLocation) -> Option<f64> {
        if !self.can_sense_location(loc) {
            return None;
        }
        self.world.robot_at(loc).map(|r| r.supply_level)
    }

    pub fn transfer_supplies(&mut self, amount: f64, loc: MapLocation) -> Result<(), ActionError> {
        self.require_active()?;
        if amount < 0.0 {
            return Err(ActionError::CantDoThatBro {
                reason: "supply transfer amount must be nonnegative".into(),
            });
        }
        let distance = self.location().distance_squared_to(loc);
        if distance > self.world.constants.supply_transfer_radius_squared {
            return Err(ActionError::OutOfRange);
        }
        let Some(target) = self.world.robot_at(loc).map(|r| r.id) else {
            return Err(ActionError::NoRobotThere);
        };
        if self.world.robot(target).map(|r| r.team) != Some(self.team()) {
            return Err(ActionError::CantDoThatBro {
                reason: "can only transfer supplies to friendly robots".into(),
            });
        }
        let available = self.actor_record().supply_level;
        let transferred = amount.min(available);
        self.actor_record_mut().supply_level -= transferred;
        let new_supply = {
            let record = self.world.robot_mut(target).expect("target robot just confirmed present");
            record.supply_level += transferred;
            record.supply_level
        };
        self.world.emit(Signal::LocationSupplyChange { location: loc, new_supply });
        Ok(())
    }

    // -- commander skills -------------------------------------------------

    pub fn cast_flash(&mut self, loc: MapLocation) -> Result<(), ActionError> {
        self.require_active()?;
        self.require_core_ready()?;
        if self.robot_type() != RobotTypeId::Commander {
            return Err(ActionError::CantDoThatBro {
                reason: "only commanders can cast flash".into(),
            });
        }
        if !self.actor_record().learned_skills.contains(&CommanderSkillType::Flash) {
            return Err(ActionError::CantDoThatBro {
                reason: "flash has not been learned yet".into(),
            });
        }
        if !self.can_sense_location(loc) {
            return Err(ActionError::CantSenseThat);
        }
        if self.world.map.terrain_at(loc) != TerrainTile::Normal || self.world.is_occupied(loc) {
            return Err(ActionError::CantMoveThere);
        }
        let actor = self.actor;
        let flash_delay = self.world.constants.flash_movement_delay;
        self.world.move_robot(actor, loc);
        let record = self.actor_record_mut();
        record.core_delay += flash_delay;
        record.weapon_delay += flash_delay;
        record.moved_this_turn = true;
        self.world.emit(Signal::Cast { actor, location: loc });
        debug!(actor = actor.0, to = %loc, "commander flashed");
        Ok(())
    }

    pub fn repair(&mut self, target: RobotId) -> Result<(), ActionError> {
        self.require_active()?;
        self.require_core_ready()?;
        if self.robot_type() != RobotTypeId::Archon {
            return Err(ActionError::CantDoThatBro {
                reason: "only archons can repair".into(),
            });
        }
        let Some(record) = self.world.robot(target) else {
            return Err(ActionError::NoRobotThere);
        };
        if record.team != self.team() {
            return Err(ActionError::CantDoThatBro {
                reason: "can only repair friendly robots".into(),
            });
        }
        let loc = record.location;
        if !self.location().is_adjacent_to(loc) && loc != self.location() {
            return Err(ActionError::OutOfRange);
        }
        let amount = self.world.constants.archon_repair_amount;
        let max_health = record.max_health;
        if let Some(record) = self.world.robot_mut(target) {
            record.health = (record.health + amount).min(max_health);
        }
        Ok(())
    }

    pub fn clear_rubble(&mut self, direction: Direction) -> Result<(), ActionError> {
        self.require_active()?;
        self.require_core_ready()?;
        let target = self.location().add(direction);
        let rubble = self.world.map.rubble_at(target);
        if rubble <= 0.0 {
            return Err(ActionError::CantDoThatBro {
                reason: "no rubble to clear here".into(),
            });
        }
        let remaining = (rubble * (1.0 - self.world.constants.rubble_clear_percentage)
            - self.world.constants.rubble_clear_flat_amount)
            .max(0.0);
        self.world.map.set_rubble_at(target, remaining);
        let record = self.actor_record_mut();
        record.core_delay += 1.0;
        Ok(())
    }

    // -- economy ------------------------------------------------------

    pub fn mine(&mut self) -> Result<f64, ActionError> {
        self.require_active()?;
        self.require_core_ready()?;
        if !self.robot_type().stats().can_mine {
            return Err(ActionError::CantDoThatBro {
                reason: "this robot type cannot mine".into(),
            });
        }
        let loc = self.location();
        let available = self.world.map.ore_at(loc);
        if available <= 0.0 {
            return Err(ActionError::CantDoThatBro {
                reason: "no ore left to mine here".into(),
            });
        }
        let mined = available.min(self.world.constants.mining_rate);
        self.world.map.set_ore_at(loc, available - mined);
        let team = self.team();
        self.world.adjust_ore(team, mined)?;
        let actor = self.actor;
        self.world.emit(Signal::Mine {
            actor,
            location: loc,
            amount: mined,
        });
        let mining_loading_delay = self.world.constants.mining_loading_delay;
        let record = self.actor_record_mut();
        record.core_delay += mining_loading_delay;
        Ok(mined)
    }

    pub fn research(&mut self, upgrade: Upgrade) -> Result<(), ActionError> {
        self.require_active()?;
        if self.robot_type() != RobotTypeId::Archon {
            return Err(ActionError::CantDoThatBro {
                reason: "only archons can start research".into(),
            });
        }
        let team = self.team();
        let state = self.world.team_state(team);
        if state.has_upgrade(upgrade) {
            return Err(ActionError::CantDoThatBro {
                reason: "upgrade already researched".into(),
            });
        }
        if state.research.is_some() {
            return Err(ActionError::CantDoThatBro {
                reason: "research already in progress".into(),
            });
        }
        self.world.adjust_resources(team, -upgrade.cost())?;
        self.world.team_state_mut(team).research = Some(crate::world::ResearchProgress {
            upgrade,
            rounds_remaining: upgrade.num_rounds(),
        });
        self.world.emit(Signal::Research {
            team,
            upgrade,
            completed: false,
        });
        Ok(())
    }

    // -- broadcast / signal -----------------------------------------------

    pub fn broadcast(&mut self, channel: u32, value: i32) -> Result<(), ActionError> {
        if channel >= self.world.constants.broadcast_max_channels {
            return Err(ActionError::CantDoThatBro {
                reason: "channel out of range".into(),
            });
        }
        let team = self.team();
        self.world.team_state_mut(team).broadcast_pending.insert(channel, value);
        let broadcast_base_delay_increase = self.world.constants.broadcast_base_delay_increase;
        let broadcast_additional_delay_increase = self.world.constants.broadcast_additional_delay_increase;
        let record = self.actor_record_mut();
        record.core_delay += broadcast_base_delay_increase;
        record.weapon_delay += broadcast_additional_delay_increase;
        record.own_broadcast_writes_this_turn.insert(channel, value);
        Ok(())
    }

    /// A robot's own writes this turn are visible to it immediately (queued
    /// reads); everyone else on the team sees them starting next round.
    pub fn read_broadcast(&self, channel: u32) -> Option<i32> {
        if let Some(value) = self.actor_record().own_broadcast_writes_this_turn.get(&channel) {
            return Some(*value);
        }
        self.world.team_state(self.team()).broadcast_visible.get(&channel).copied()
    }

    pub fn broadcast_signal(&mut self, radius_squared: i64) -> Result<(), ActionError> {
        self.send_signal(radius_squared, None)
    }

    pub fn broadcast_message_signal(&mut self, radius_squared: i64, message: [i32; 2]) -> Result<(), ActionError> {
        self.send_signal(radius_squared, Some(message))
    }

    fn send_signal(&mut self, radius_squared: i64, message: Option<[i32; 2]>) -> Result<(), ActionError> {
        self.require_active()?;
        let constants = self.world.constants;
        let record = self.actor_record();
        let (used, limit) = if message.is_some() {
            (record.message_signals_sent_this_turn, constants.message_signals_per_turn)
        } else {
            (record.basic_signals_sent_this_turn, constants.basic_signals_per_turn)
        };
        if used >= limit {
            return Err(ActionError::CantDoThatBro {
                reason: "signal budget exhausted this turn".into(),
            });
        }
        let sender_id = self.actor;
        let sender_team = self.team();
        let sender_location = self.location();
        let spatial = SpatialSignal {
            sender_id,
            sender_team,
            sender_location,
            message,
        };
        let max_queue = constants.signal_queue_max_size;
        let targets: Vec<RobotId> = self
            .world
            .map
            .all_locations()
            .filter(|loc| sender_location.distance_squared_to(*loc) <= radius_squared)
            .filter_map(|loc| self.world.robot_at(loc).map(|r| r.id))
            .collect();
        for target in targets {
            if let Some(record) = self.world.robot_mut(target) {
                if record.inbox.len() >= max_queue {
                    record.inbox.pop_front();
                }
                record.inbox.push_back(spatial.clone());
            }
        }
        let excess = (radius_squared - self.effective_sensor_radius_squared()).max(0) as f64;
        let extra_delay = excess * constants.signal_excess_radius_delay_per_unit;
        let record = self.actor_record_mut();
        if message.is_some() {
            record.message_signals_sent_this_turn += 1;
        } else {
            record.basic_signals_sent_this_turn += 1;
        }
        record.core_delay += extra_delay;
        record.weapon_delay += extra_delay;
        Ok(())
    }

    pub fn get_basic_signal_count(&self) -> u32 {
        self.actor_record().basic_signals_sent_this_turn
    }

    pub fn get_message_signal_count(&self) -> u32 {
        self.actor_record().message_signals_sent_this_turn
    }

    /// Reports this turn's bytecode usage for §4.4's delay-decay formula.
    /// `RoundEngine::decay_delays` reads `bytecodes_used_last_turn` at end
    /// of round; a caller that never reports defaults to 0 (the cheapest
    /// possible turn) and decays by the maximum amount every round.
    pub fn record_bytecodes_used(&mut self, used: u32) {
        self.actor_record_mut().bytecodes_used_last_turn = used;
    }

    pub fn read_signal(&mut self) -> Option<SpatialSignal> {
        self.actor_record_mut().inbox.pop_front()
    }

    pub fn signal_queue_len(&self) -> usize {
        self.actor_record().inbox.len()
    }

    pub fn empty_signal_queue(&mut self) {
        self.actor_record_mut().inbox.clear();
    }

    // -- team memory --------------------------------------------------

    /// Returns the team memory snapshot taken at the start of this round, not
    /// the live array -- a write by an earlier-acting teammate this round is
    /// not visible until next round.
    pub fn get_team_memory(&self) -> [i64; crate::world::TEAM_MEMORY_SIZE] {
        self.world.team_state(self.team()).old_team_memory
    }

    pub fn set_team_memory(&mut self, index: usize, value: i64) -> Result<(), ActionError> {
        if index >= crate::world::TEAM_MEMORY_SIZE {
            return Err(ActionError::CantDoThatBro {
                reason: "team memory index out of range".into(),
            });
        }
        let team = self.team();
        self.world.team_state_mut(team).team_memory[index] = value;
        Ok(())
    }

    // -- indicators / observations -----------------------------------

    pub fn indicator_dot(&mut self, loc: MapLocation, rgb: (u8, u8, u8)) {
        let actor = self.actor;
        self.world.emit(Signal::IndicatorDot {
            actor,
            location: loc,
            red: rgb.0,
            green: rgb.1,
            blue: rgb.2,
        });
    }

    pub fn indicator_line(&mut self, from: MapLocation, to: MapLocation, rgb: (u8, u8, u8)) {
        let actor = self.actor;
        self.world.emit(Signal::IndicatorLine {
            actor,
            from,
            to,
            red: rgb.0,
            green: rgb.1,
            blue: rgb.2,
        });
    }

    pub fn set_indicator_string(&mut self, slot: u32, text: String) {
        let actor = self.actor;
        self.world.emit(Signal::IndicatorString { actor, slot, text: text.clone() });
        if let Some(record) = self.world.robot_mut(actor) {
            if let Some(slot_str) = record.indicator_strings.get_mut(slot as usize) {
                *slot_str = text;
            }
        }
    }

    pub fn add_match_observation(&mut self, text: String) {
        let actor = self.actor;
        self.world.emit(Signal::MatchObservation { actor, text });
    }

    // -- self-destruct / activation ---------------------------------------

    pub fn disintegrate(&mut self) {
        let actor = self.actor;
        self.world.queue_death(actor, DeathCause::SelfDestruct);
    }

    /// MISSILE-only: deals AoE damage to every other occupant within the
    /// type's `attack_radius_squared` of its current location, then
    /// self-destructs -- there is no surviving a detonation.
    pub fn explode(&mut self) -> Result<(), ActionError> {
        self.require_active()?;
        if self.robot_type() != RobotTypeId::Missile {
            return Err(ActionError::CantDoThatBro {
                reason: "only MISSILE can explode".into(),
            });
        }
        let stats = self.robot_type().stats();
        let actor = self.actor;
        let center = self.location();
        self.world.emit(Signal::Attack {
            actor,
            target_location: center,
        });
        let targets: Vec<RobotId> = self
            .world
            .map
            .all_locations()
            .filter(|loc| center.distance_squared_to(*loc) <= stats.attack_radius_squared)
            .filter_map(|loc| self.world.robot_at(loc).map(|r| r.id))
            .filter(|&id| id != actor)
            .collect();
        for target in targets {
            let mut died = false;
            if let Some(record) = self.world.robot_mut(target) {
                record.health -= stats.attack_power;
                died = record.health <= 0.0;
            }
            if died {
                self.world.queue_death(target, DeathCause::RegularAttack);
            }
        }
        self.world.queue_death(actor, DeathCause::SelfDestruct);
        Ok(())
    }

    /// Converts an adjacent NEUTRAL robot to the caller's team at full
    /// health. Immediate, not queued through `reap_deaths` -- the neutral
    /// is "consumed" in place rather than removed and replaced, so the
    /// tile is never briefly unoccupied. Emits `Signal::Death { cause:
    /// Activation }` for the consumed neutral identity so replay/observers
    /// can see the activation happened, even though no rubble results.
    pub fn activate(&mut self, target: RobotId) -> Result<(), ActionError> {
        self.require_active()?;
        self.require_core_ready()?;
        let Some(record) = self.world.robot(target) else {
            return Err(ActionError::NoRobotThere);
        };
        if record.team != Team::Neutral {
            return Err(ActionError::CantDoThatBro {
                reason: "activate only affects neutral units".into(),
            });
        }
        let loc = record.location;
        if !self.location().is_adjacent_to(loc) {
            return Err(ActionError::OutOfRange);
        }
        let team = self.team();
        self.world.emit(Signal::Death {
            id: target,
            cause: DeathCause::Activation,
        });
        self.world.convert_team(target, team);
        let record = self.actor_record_mut();
        record.core_delay += 2.0;
        Ok(())
    }
}
