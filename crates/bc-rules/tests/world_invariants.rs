//! Property tests for `World`/`RobotController` invariants named in §8:
//! tile occupancy, rubble-clearing monotonicity, and signal-inbox isolation.

use bc_core::prelude::*;
use bc_rules::prelude::*;
use proptest::prelude::*;

/// A single attempted move by one of two robots sharing a small arena --
/// legality is left to `move_direction` itself, including illegal/colliding
/// attempts, since the invariant under test must hold regardless.
#[derive(Debug, Clone, Copy)]
struct MoveAttempt {
    actor_is_a: bool,
    direction_index: usize,
}

fn move_attempt_strategy() -> impl Strategy<Value = MoveAttempt> {
    (proptest::bool::ANY, 0usize..Direction::COMPASS.len())
        .prop_map(|(actor_is_a, direction_index)| MoveAttempt { actor_is_a, direction_index })
}

proptest! {
    /// §8 invariant: no two robots ever occupy the same tile, no matter
    /// what sequence of (possibly illegal, possibly colliding) move
    /// attempts two robots make against each other.
    #[test]
    fn at_most_one_robot_per_tile_under_random_move_attempts(
        attempts in prop::collection::vec(move_attempt_strategy(), 1..40)
    ) {
        let mut world = World::new(GameMap::blank(5, 5, 10_000, 1), EngineConstants::default());
        let a = world.spawn_active(RobotTypeId::Soldier, Team::A, MapLocation::new(2, 2));
        let b = world.spawn_active(RobotTypeId::Soldier, Team::B, MapLocation::new(2, 3));
        for attempt in attempts {
            let actor = if attempt.actor_is_a { a } else { b };
            world.robot_mut(actor).unwrap().core_delay = 0.0;
            let dir = Direction::COMPASS[attempt.direction_index];
            let mut controller = RobotController::new(&mut world, actor);
            let _ = controller.move_direction(dir);
        }
        let mut seen = std::collections::HashSet::new();
        for r in world.all_robots() {
            prop_assert!(seen.insert(r.location), "two robots occupy {:?}", r.location);
        }
    }

    /// §8 invariant: clearing rubble on the same tile repeatedly never
    /// increases it and never drives it negative.
    #[test]
    fn clear_rubble_is_monotonically_non_increasing_and_never_negative(
        initial_rubble in 0.0f64..500.0,
        repetitions in 1usize..20,
    ) {
        let mut world = World::new(GameMap::blank(10, 10, 10_000, 1), EngineConstants::default());
        let beaver = world.spawn_active(RobotTypeId::Beaver, Team::A, MapLocation::new(5, 5));
        let target = MapLocation::new(6, 5);
        world.map.set_rubble_at(target, initial_rubble);
        let mut previous = world.map.rubble_at(target);
        for _ in 0..repetitions {
            world.robot_mut(beaver).unwrap().core_delay = 0.0;
            let mut controller = RobotController::new(&mut world, beaver);
            let _ = controller.clear_rubble(Direction::East);
            let current = world.map.rubble_at(target);
            prop_assert!(current >= 0.0);
            prop_assert!(current <= previous);
            previous = current;
        }
    }

    /// §8 invariant: a broadcast signal is delivered only to robots its own
    /// radius actually reaches -- a robot's inbox never receives a cast
    /// whose `radiusSquared` falls short of that robot's distance from the
    /// caster.
    #[test]
    fn signal_cast_never_reaches_a_robot_outside_its_radius(
        dx in -10i32..=10, dy in -10i32..=10, radius_squared in 0i64..50,
    ) {
        let mut world = World::new(GameMap::blank(25, 25, 100, 1), EngineConstants::default());
        let center = MapLocation::new(12, 12);
        let caster = world.spawn_active(RobotTypeId::Archon, Team::A, center);
        let listener_loc = MapLocation::new(12 + dx, 12 + dy);
        prop_assume!(listener_loc != center);
        let in_range = center.distance_squared_to(listener_loc) <= radius_squared;
        let listener = world.spawn_active(RobotTypeId::Archon, Team::A, listener_loc);
        {
            let mut controller = RobotController::new(&mut world, caster);
            let _ = controller.broadcast_signal(radius_squared);
        }
        let mut listener_controller = RobotController::new(&mut world, listener);
        let received = listener_controller.read_signal().is_some();
        prop_assert_eq!(received, in_range);
    }
}
