//! Zombie spawn schedule application (§4.8): every den places its scheduled
//! wave on an adjacent free tile, in deterministic compass order, health
//! scaled by the round's outbreak multiplier.

use bc_rules::prelude::World;
use bc_core::prelude::*;
use tracing::warn;

fn find_free_adjacent_tile(world: &World, den: MapLocation) -> Option<MapLocation> {
    Direction::COMPASS.iter().map(|&dir| den.add(dir)).find(|&tile| {
        world.map.terrain_at(tile) == TerrainTile::Normal && !world.is_occupied(tile)
    })
}

/// Apply every schedule entry due this round to every zombie den currently
/// standing. Returns the number of zombies that could not be placed because
/// a den had no free adjacent tile (informational, for callers that want to
/// surface it beyond the `Discard`/`Requeue` policy's own logging).
pub fn apply_zombie_schedule(world: &mut World) -> u32 {
    let round = world.round();
    let entries = world.map.zombie_spawn_schedule.entries_for_round(round);
    if entries.is_empty() {
        return 0;
    }
    let outbreak_multiplier = world.map.zombie_spawn_schedule.outbreak_multiplier_at(round);
    let den_locations: Vec<MapLocation> = world
        .robots_of_team(Team::Zombie)
        .filter(|r| r.robot_type == RobotTypeId::ZombieDen)
        .map(|r| r.location)
        .collect();

    let mut unplaced = 0u32;
    for den_loc in den_locations {
        for &(robot_type, count) in &entries {
            let mut overflow = 0u32;
            for _ in 0..count {
                match find_free_adjacent_tile(world, den_loc) {
                    Some(tile) => {
                        let id = world.spawn_active(robot_type, Team::Zombie, tile);
                        if let Some(record) = world.robot_mut(id) {
                            let scaled = robot_type.stats().max_health * outbreak_multiplier;
                            record.health = scaled;
                            record.max_health = scaled;
                        }
                    }
                    None => overflow += 1,
                }
            }
            if overflow > 0 {
                unplaced += overflow;
                match world.constants.zombie_overflow_policy {
                    ZombieOverflowPolicy::Discard => {
                        warn!(den = %den_loc, robot_type = ?robot_type, overflow, "zombie spawn overflow discarded: no free adjacent tile");
                    }
                    ZombieOverflowPolicy::Requeue => {
                        world.map.zombie_spawn_schedule.add(round + 1, robot_type, overflow);
                    }
                }
            }
        }
    }
    unplaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use bc_core::prelude::{EngineConstants, GameMap};

    fn world_with_den(rounds: u32) -> World {
        let mut map = GameMap::blank(20, 20, rounds, 1);
        map.zombie_spawn_schedule.add(1, RobotTypeId::StandardZombie, 2);
        let mut world = World::new(map, EngineConstants::default());
        world.spawn_active(RobotTypeId::ZombieDen, Team::Zombie, MapLocation::new(10, 10));
        world.advance_round();
        world
    }

    #[test]
    fn schedule_spawns_zombies_adjacent_to_the_den() {
        let mut world = world_with_den(100);
        let unplaced = apply_zombie_schedule(&mut world);
        assert_eq!(unplaced, 0);
        let zombies: Vec<_> = world
            .robots_of_team(Team::Zombie)
            .filter(|r| r.robot_type == RobotTypeId::StandardZombie)
            .collect();
        assert_eq!(zombies.len(), 2);
        for zombie in zombies {
            assert!(MapLocation::new(10, 10).is_adjacent_to(zombie.location));
        }
    }

    #[test]
    fn empty_round_spawns_nothing() {
        let mut world = world_with_den(100);
        world.advance_round();
        let unplaced = apply_zombie_schedule(&mut world);
        assert_eq!(unplaced, 0);
    }

    #[test]
    fn discard_policy_warns_and_drops_overflow_when_den_is_surrounded() {
        let mut map = GameMap::blank(5, 5, 100, 1);
        map.zombie_spawn_schedule.add(1, RobotTypeId::StandardZombie, 9);
        let mut world = World::new(map, EngineConstants::default());
        let den = MapLocation::new(2, 2);
        world.spawn_active(RobotTypeId::ZombieDen, Team::Zombie, den);
        for dir in Direction::COMPASS {
            world.spawn_active(RobotTypeId::StandardZombie, Team::Zombie, den.add(dir));
        }
        world.advance_round();
        let unplaced = apply_zombie_schedule(&mut world);
        assert_eq!(unplaced, 9);
    }
}
