//! The immutable-after-load [`GameMap`] and its embedded zombie spawn
//! schedule.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{RobotTypeId, Team};
use crate::geometry::MapLocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerrainTile {
    Normal,
    Void,
    OffMap,
}

/// A robot placed on the map at match start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialRobotPlacement {
    pub robot_type: RobotTypeId,
    pub team: Team,
    pub location: MapLocation,
}

// ---------------------------------------------------------------------------
// ZombieSpawnSchedule
// ---------------------------------------------------------------------------

/// Maps scheduled rounds to the zombies that spawn at every den on that
/// round. Backed by a `BTreeMap` so [`rounds`](Self::rounds) is always
/// sorted and unique by construction -- no separate invariant to maintain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ZombieSpawnSchedule {
    entries: BTreeMap<u32, Vec<(RobotTypeId, u32)>>,
    /// Outbreak health multiplier that becomes effective starting at the
    /// given round and holds until the next configured level. Map-authored
    /// rather than derived from a formula, since the source material leaves
    /// the exact round-to-multiplier curve unspecified and only pins
    /// specific (round, multiplier) pairs via test scenarios.
    outbreak_levels: BTreeMap<u32, f64>,
}

impl ZombieSpawnSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, round: u32, robot_type: RobotTypeId, count: u32) {
        self.entries.entry(round).or_default().push((robot_type, count));
    }

    /// Sorted, unique rounds that have a scheduled spawn.
    pub fn rounds(&self) -> Vec<u32> {
        self.entries.keys().copied().collect()
    }

    /// The `(type, count)` pairs scheduled for `round`. Returns a fresh copy;
    /// mutating it never affects the stored schedule.
    pub fn entries_for_round(&self, round: u32) -> Vec<(RobotTypeId, u32)> {
        self.entries.get(&round).cloned().unwrap_or_default()
    }

    /// Configure the outbreak multiplier to take effect from `round` onward.
    pub fn set_outbreak_level(&mut self, round: u32, multiplier: f64) {
        self.outbreak_levels.insert(round, multiplier);
    }

    /// The outbreak multiplier in effect at `round`: the value configured at
    /// the latest round `<= round`, or `1.0` if none has been configured yet.
    pub fn outbreak_multiplier_at(&self, round: u32) -> f64 {
        self.outbreak_levels
            .range(..=round)
            .next_back()
            .map(|(_, &mult)| mult)
            .unwrap_or(1.0)
    }
}

// ---------------------------------------------------------------------------
// GameMap
// ---------------------------------------------------------------------------

/// The parsed, immutable map value the engine consumes. Construction/parsing
/// of an on-disk map format is out of scope for this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMap {
    pub width: i32,
    pub height: i32,
    pub origin_x: i32,
    pub origin_y: i32,
    pub rounds: u32,
    pub seed: u64,
    rubble: Vec<Vec<f64>>,
    parts: Vec<Vec<f64>>,
    ore: Vec<Vec<f64>>,
    terrain: Vec<Vec<TerrainTile>>,
    pub initial_robots: Vec<InitialRobotPlacement>,
    pub zombie_spawn_schedule: ZombieSpawnSchedule,
}

impl GameMap {
    /// Build a blank `width x height` map of normal terrain, zero rubble
    /// and zero parts -- the baseline that tests and scenario builders
    /// customize from.
    pub fn blank(width: i32, height: i32, rounds: u32, seed: u64) -> Self {
        let row_rubble = vec![0.0; height as usize];
        let row_parts = vec![0.0; height as usize];
        let row_ore = vec![0.0; height as usize];
        let row_terrain = vec![TerrainTile::Normal; height as usize];
        Self {
            width,
            height,
            origin_x: 0,
            origin_y: 0,
            rounds,
            seed,
            rubble: vec![row_rubble; width as usize],
            parts: vec![row_parts; width as usize],
            ore: vec![row_ore; width as usize],
            terrain: vec![row_terrain; width as usize],
            initial_robots: Vec::new(),
            zombie_spawn_schedule: ZombieSpawnSchedule::new(),
        }
    }

    fn index(&self, loc: MapLocation) -> Option<(usize, usize)> {
        if !self.in_bounds(loc) {
            return None;
        }
        let ix = (loc.x - self.origin_x) as usize;
        let iy = (loc.y - self.origin_y) as usize;
        Some((ix, iy))
    }

    pub fn in_bounds(&self, loc: MapLocation) -> bool {
        loc.x >= self.origin_x
            && loc.y >= self.origin_y
            && loc.x < self.origin_x + self.width
            && loc.y < self.origin_y + self.height
    }

    pub fn terrain_at(&self, loc: MapLocation) -> TerrainTile {
        match self.index(loc) {
            Some((x, y)) => self.terrain[x][y],
            None => TerrainTile::OffMap,
        }
    }

    pub fn set_terrain(&mut self, loc: MapLocation, tile: TerrainTile) {
        if let Some((x, y)) = self.index(loc) {
            self.terrain[x][y] = tile;
        }
    }

    pub fn rubble_at(&self, loc: MapLocation) -> f64 {
        match self.index(loc) {
            Some((x, y)) => self.rubble[x][y],
            None => 0.0,
        }
    }

    pub fn set_rubble_at(&mut self, loc: MapLocation, value: f64) {
        if let Some((x, y)) = self.index(loc) {
            self.rubble[x][y] = value.max(0.0);
        }
    }

    pub fn parts_at(&self, loc: MapLocation) -> f64 {
        match self.index(loc) {
            Some((x, y)) => self.parts[x][y],
            None => 0.0,
        }
    }

    pub fn set_parts_at(&mut self, loc: MapLocation, value: f64) {
        if let Some((x, y)) = self.index(loc) {
            self.parts[x][y] = value.max(0.0);
        }
    }

    /// Optional per-tile ore deposit, separate from parts: drained by
    /// `mine()` and credited to the miner's team's ore reserve rather than
    /// its parts reserve.
    pub fn ore_at(&self, loc: MapLocation) -> f64 {
        match self.index(loc) {
            Some((x, y)) => self.ore[x][y],
            None => 0.0,
        }
    }

    pub fn set_ore_at(&mut self, loc: MapLocation, value: f64) {
        if let Some((x, y)) = self.index(loc) {
            self.ore[x][y] = value.max(0.0);
        }
    }

    /// All in-bounds locations, in ascending `(x, y)` order.
    pub fn all_locations(&self) -> impl Iterator<Item = MapLocation> + '_ {
        (0..self.width).flat_map(move |dx| {
            (0..self.height).map(move |dy| MapLocation::new(self.origin_x + dx, self.origin_y + dy))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_map_has_no_rubble_or_parts() {
        let map = GameMap::blank(10, 10, 100, 42);
        assert_eq!(map.rubble_at(MapLocation::new(2, 2)), 0.0);
        assert_eq!(map.parts_at(MapLocation::new(2, 2)), 0.0);
    }

    #[test]
    fn off_map_tile_reports_off_map_terrain_and_zero_rubble() {
        let map = GameMap::blank(10, 10, 100, 42);
        assert_eq!(map.terrain_at(MapLocation::new(-1, 0)), TerrainTile::OffMap);
        assert_eq!(map.rubble_at(MapLocation::new(50, 50)), 0.0);
    }

    #[test]
    fn set_and_get_round_trip() {
        let mut map = GameMap::blank(10, 10, 100, 42);
        let loc = MapLocation::new(2, 2);
        map.set_rubble_at(loc, 200.0);
        map.set_parts_at(loc, 30.0);
        map.set_ore_at(loc, 15.0);
        assert_eq!(map.rubble_at(loc), 200.0);
        assert_eq!(map.parts_at(loc), 30.0);
        assert_eq!(map.ore_at(loc), 15.0);
    }

    #[test]
    fn blank_map_has_no_ore() {
        let map = GameMap::blank(10, 10, 100, 42);
        assert_eq!(map.ore_at(MapLocation::new(2, 2)), 0.0);
    }

    #[test]
    fn zombie_spawn_schedule_rounds_are_sorted_and_unique() {
        let mut schedule = ZombieSpawnSchedule::new();
        schedule.add(601, RobotTypeId::RangedZombie, 3);
        schedule.add(200, RobotTypeId::StandardZombie, 5);
        schedule.add(601, RobotTypeId::StandardZombie, 1);
        assert_eq!(schedule.rounds(), vec![200, 601]);
    }

    #[test]
    fn zombie_spawn_schedule_copy_is_independent_of_storage() {
        let mut schedule = ZombieSpawnSchedule::new();
        schedule.add(10, RobotTypeId::StandardZombie, 2);
        let mut copy = schedule.entries_for_round(10);
        copy.push((RobotTypeId::FastZombie, 99));
        assert_eq!(schedule.entries_for_round(10).len(), 1);
    }
}
