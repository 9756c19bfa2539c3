//! Benchmarks for the round driver: how `step_round`'s cost scales with the
//! number of robots on the field, and the overhead of a snapshot capture.

use bc_core::prelude::{EngineConstants, GameMap, MapLocation, RobotTypeId, Team};
use bc_engine::prelude::RoundEngine;
use bc_engine::snapshot;
use bc_rules::prelude::World;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn world_with_soldiers(per_team: i32) -> World {
    let mut world = World::new(GameMap::blank(64, 64, 3000, 1), EngineConstants::default());
    world.spawn_active(RobotTypeId::Archon, Team::A, MapLocation::new(0, 0));
    world.spawn_active(RobotTypeId::Archon, Team::B, MapLocation::new(63, 63));
    for i in 0..per_team {
        world.spawn_active(RobotTypeId::Soldier, Team::A, MapLocation::new(1 + i, 0));
        world.spawn_active(RobotTypeId::Soldier, Team::B, MapLocation::new(62 - i, 63));
    }
    world
}

fn bench_step_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_round");
    for per_team in [1, 8, 32] {
        group.bench_with_input(BenchmarkId::from_parameter(per_team), &per_team, |b, &per_team| {
            b.iter_batched(
                || RoundEngine::new(world_with_soldiers(per_team)),
                |mut engine| {
                    engine.step_round(|_controller| {});
                    black_box(engine.world().round());
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_snapshot_capture(c: &mut Criterion) {
    let world = world_with_soldiers(32);
    c.bench_function("snapshot_capture_64_robots", |b| {
        b.iter(|| black_box(snapshot::capture(&world)));
    });
}

criterion_group!(benches, bench_step_round, bench_snapshot_capture);
criterion_main!(benches);
