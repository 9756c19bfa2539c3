//! [`RoundEngine`] -- the ascending-id turn loop and end-of-round bookkeeping.
//!
//! Adapted from the teacher's `TickLoop`: a fixed-order driver over a single
//! mutable world, advancing a counter once per call. The 60 Hz `add_system`
//! registry collapses to a single fixed phase sequence, since a round here
//! has one phase (play every robot's turn in ascending id order) rather than
//! a pipeline of independently-registered systems; the round-end bookkeeping
//! (delay decay, construction, income, research, deaths, zombie spawns) is
//! the direct analog of the teacher's "apply command buffer" phase.

use bc_core::prelude::*;
use bc_rules::prelude::{RobotController, World};
use tracing::debug;

use crate::victory::{self, MatchOutcome};
use crate::zombies;

pub struct RoundEngine {
    world: World,
    last_outcome: Option<MatchOutcome>,
}

impl RoundEngine {
    pub fn new(world: World) -> Self {
        Self {
            world,
            last_outcome: None,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.last_outcome
    }

    /// Play one round: advance the round counter, give every living robot a
    /// turn in ascending id order via `play_turn`, then run end-of-round
    /// bookkeeping. Returns the match outcome the moment this round decides
    /// one (the engine does not auto-stop; callers check this each round).
    pub fn step_round(&mut self, mut play_turn: impl FnMut(&mut RobotController)) -> Option<MatchOutcome> {
        self.world.advance_round();
        let round = self.world.round();
        debug!(round, "starting round");

        for team in [Team::A, Team::B] {
            self.world.team_state_mut(team).swap_broadcasts();
            self.world.team_state_mut(team).snapshot_team_memory();
        }

        for id in self.world.ids_ascending() {
            if self.world.robot(id).is_none() {
                continue;
            }
            {
                let mut controller = RobotController::new(&mut self.world, id);
                controller.refresh_memory();
            }
            let mut controller = RobotController::new(&mut self.world, id);
            play_turn(&mut controller);
        }

        self.end_of_round(round);
        self.last_outcome
    }

    fn end_of_round(&mut self, round: u32) {
        self.decay_delays();
        self.world.advance_construction();
        self.apply_income();
        self.advance_research();
        self.replenish_missiles();
        self.unlock_commander_skills();

        let dying_archons: Vec<(Team, RobotId)> = self
            .world
            .pending_deaths()
            .iter()
            .filter_map(|(id, _)| {
                let record = self.world.robot(*id)?;
                (record.robot_type == RobotTypeId::Archon).then_some((record.team, *id))
            })
            .collect();

        let outbreak_multiplier = self.world.map.zombie_spawn_schedule.outbreak_multiplier_at(round);
        self.world.reap_deaths(outbreak_multiplier);
        zombies::apply_zombie_schedule(&mut self.world);

        self.last_outcome = victory::check_victory(&self.world, &dying_archons);
    }

    fn decay_delays(&mut self) {
        for id in self.world.ids_ascending() {
            let Some(record) = self.world.robot_mut(id) else { continue };
            let stats = record.stats();
            let used = record.bytecodes_used_last_turn;
            record.core_delay = bc_rules::delay::apply_decay(
                record.core_delay,
                used,
                stats.free_bytecode_threshold,
                stats.bytecode_limit,
            );
            record.weapon_delay = bc_rules::delay::apply_decay(
                record.weapon_delay,
                used,
                stats.free_bytecode_threshold,
                stats.bytecode_limit,
            );
            record.reset_turn_counters();
        }
    }

    fn apply_income(&mut self) {
        for team in [Team::A, Team::B] {
            let archons = self
                .world
                .robots_of_team(team)
                .filter(|r| r.robot_type == RobotTypeId::Archon)
                .count() as f64;
            let unit_count = self.world.robots_of_team(team).count() as f64;
            let fusion_bonus = if self.world.team_state(team).has_upgrade(Upgrade::Fusion) {
                self.world.constants.fusion_income_bonus * archons
            } else {
                0.0
            };
            let income = (self.world.constants.archon_part_income * archons + fusion_bonus
                - self.world.constants.part_income_unit_penalty * unit_count)
                .max(0.0);
            let _ = self.world.adjust_resources(team, income);
        }
    }

    /// Every active `LAUNCHER` accrues one missile per round, capped.
    fn replenish_missiles(&mut self) {
        let cap = self.world.constants.missile_count_max;
        for id in self.world.ids_ascending() {
            let Some(record) = self.world.robot_mut(id) else { continue };
            if record.robot_type == RobotTypeId::Launcher && record.is_active() {
                record.missile_count = (record.missile_count + 1).min(cap);
            }
        }
    }

    fn unlock_commander_skills(&mut self) {
        for id in self.world.ids_ascending() {
            let Some(record) = self.world.robot_mut(id) else { continue };
            if record.robot_type != RobotTypeId::Commander {
                continue;
            }
            for skill in bc_rules::skills::unlocked_at(record.xp) {
                if !record.learned_skills.contains(&skill) {
                    record.learned_skills.push(skill);
                }
            }
        }
    }

    fn advance_research(&mut self) {
        for team in [Team::A, Team::B] {
            let Some(mut progress) = self.world.team_state(team).research.clone() else {
                continue;
            };
            if progress.rounds_remaining <= 1 {
                self.world.team_state_mut(team).upgrades.insert(progress.upgrade);
                self.world.team_state_mut(team).research = None;
                self.world.emit(Signal::Research {
                    team,
                    upgrade: progress.upgrade,
                    completed: true,
                });
            } else {
                progress.rounds_remaining -= 1;
                self.world.team_state_mut(team).research = Some(progress);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bc_core::prelude::{EngineConstants, GameMap};

    #[test]
    fn step_round_advances_the_round_counter() {
        let world = World::new(GameMap::blank(10, 10, 100, 1), EngineConstants::default());
        let mut engine = RoundEngine::new(world);
        engine.step_round(|_controller| {});
        assert_eq!(engine.world().round(), 1);
    }

    #[test]
    fn step_round_visits_robots_in_ascending_id_order() {
        let mut world = World::new(GameMap::blank(10, 10, 100, 1), EngineConstants::default());
        world.spawn_active(RobotTypeId::Soldier, Team::A, MapLocation::new(0, 0));
        world.spawn_active(RobotTypeId::Soldier, Team::A, MapLocation::new(1, 0));
        let mut engine = RoundEngine::new(world);
        let mut visited = Vec::new();
        engine.step_round(|controller| visited.push(controller.id().0));
        assert_eq!(visited, vec![0, 1]);
    }

    #[test]
    fn launcher_gains_a_missile_every_round_up_to_the_cap() {
        let mut world = World::new(GameMap::blank(10, 10, 100, 1), EngineConstants::default());
        let launcher = world.spawn_active(RobotTypeId::Launcher, Team::A, MapLocation::new(0, 0));
        let cap = world.constants.missile_count_max;
        let mut engine = RoundEngine::new(world);
        for _ in 0..(cap + 2) {
            engine.step_round(|_controller| {});
        }
        assert_eq!(engine.world().robot(launcher).unwrap().missile_count, cap);
    }

    #[test]
    fn commander_unlocks_skills_as_xp_crosses_thresholds() {
        let mut world = World::new(GameMap::blank(10, 10, 100, 1), EngineConstants::default());
        let commander = world.spawn_active(RobotTypeId::Commander, Team::A, MapLocation::new(0, 0));
        world.robot_mut(commander).unwrap().xp = 10;
        let mut engine = RoundEngine::new(world);
        engine.step_round(|_controller| {});
        let skills = &engine.world().robot(commander).unwrap().learned_skills;
        assert!(skills.contains(&bc_core::prelude::CommanderSkillType::Flash));
    }

    #[test]
    fn team_memory_reads_see_the_round_start_snapshot_not_same_round_writes() {
        let mut world = World::new(GameMap::blank(10, 10, 100, 1), EngineConstants::default());
        let first = world.spawn_active(RobotTypeId::Soldier, Team::A, MapLocation::new(0, 0));
        let second = world.spawn_active(RobotTypeId::Soldier, Team::A, MapLocation::new(1, 0));
        let mut engine = RoundEngine::new(world);
        let mut second_saw: Option<i64> = None;
        engine.step_round(|controller| {
            if controller.id() == first {
                controller.set_team_memory(0, 42).unwrap();
            } else if controller.id() == second {
                second_saw = Some(controller.get_team_memory()[0]);
            }
        });
        assert_eq!(second_saw, Some(0));
        let mut third_round_saw = None;
        engine.step_round(|controller| {
            if controller.id() == second {
                third_round_saw = Some(controller.get_team_memory()[0]);
            }
        });
        assert_eq!(third_round_saw, Some(42));
    }

    #[test]
    fn reported_bytecode_usage_reduces_the_end_of_round_decay() {
        let mut world = World::new(GameMap::blank(10, 10, 100, 1), EngineConstants::default());
        let idle = world.spawn_active(RobotTypeId::Soldier, Team::A, MapLocation::new(0, 0));
        let busy = world.spawn_active(RobotTypeId::Soldier, Team::A, MapLocation::new(1, 0));
        let limit = RobotTypeId::Soldier.stats().bytecode_limit;
        world.robot_mut(idle).unwrap().core_delay = 2.0;
        world.robot_mut(busy).unwrap().core_delay = 2.0;
        let mut engine = RoundEngine::new(world);

        engine.step_round(|controller| {
            if controller.id() == busy {
                controller.record_bytecodes_used(limit);
            }
        });

        let idle_delay = engine.world().robot(idle).unwrap().core_delay;
        let busy_delay = engine.world().robot(busy).unwrap().core_delay;
        assert_eq!(idle_delay, 1.0, "a turn with no reported usage decays by the full amount");
        assert_eq!(busy_delay, 1.3, "a turn at the bytecode limit only decays by 0.7");
    }

    #[test]
    fn bytecode_usage_does_not_carry_over_to_the_next_round() {
        let mut world = World::new(GameMap::blank(10, 10, 100, 1), EngineConstants::default());
        let soldier = world.spawn_active(RobotTypeId::Soldier, Team::A, MapLocation::new(0, 0));
        let limit = RobotTypeId::Soldier.stats().bytecode_limit;
        world.robot_mut(soldier).unwrap().core_delay = 4.0;
        let mut engine = RoundEngine::new(world);

        engine.step_round(|controller| {
            if controller.id() == soldier {
                controller.record_bytecodes_used(limit);
            }
        });
        engine.step_round(|_controller| {});

        let after_first: f64 = 4.0 - 0.7;
        let after_second = (after_first - 1.0).max(0.0);
        assert_eq!(engine.world().robot(soldier).unwrap().core_delay, after_second);
    }

    #[test]
    fn archon_income_accrues_each_round() {
        let mut world = World::new(GameMap::blank(10, 10, 100, 1), EngineConstants::default());
        world.spawn_active(RobotTypeId::Archon, Team::A, MapLocation::new(0, 0));
        let before = world.team_state(Team::A).resources;
        let mut engine = RoundEngine::new(world);
        engine.step_round(|_controller| {});
        assert!(engine.world().team_state(Team::A).resources > before);
    }
}
