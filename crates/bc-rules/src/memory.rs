//! Per-team map memory: the last sighted rubble/parts value at a location,
//! cached independently of current vision (§4.2). Sensing a tile you can no
//! longer see returns this cached value rather than failing, and a tile
//! that has never been sighted reports `-1`.

use std::collections::HashMap;

use bc_core::prelude::{MapLocation, TerrainTile};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MapMemory {
    #[serde(with = "crate::serde_map_as_pairs")]
    rubble: HashMap<MapLocation, f64>,
    #[serde(with = "crate::serde_map_as_pairs")]
    parts: HashMap<MapLocation, f64>,
    #[serde(with = "crate::serde_map_as_pairs")]
    ore: HashMap<MapLocation, f64>,
    #[serde(with = "crate::serde_map_as_pairs")]
    terrain: HashMap<MapLocation, TerrainTile>,
}

impl MapMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, loc: MapLocation, rubble: f64, parts: f64, ore: f64, terrain: TerrainTile) {
        self.rubble.insert(loc, rubble);
        self.parts.insert(loc, parts);
        self.ore.insert(loc, ore);
        self.terrain.insert(loc, terrain);
    }

    /// `-1.0` if `loc` has never been within this team's sensor range.
    pub fn remembered_rubble(&self, loc: MapLocation) -> f64 {
        self.rubble.get(&loc).copied().unwrap_or(-1.0)
    }

    /// `-1.0` if `loc` has never been within this team's sensor range.
    pub fn remembered_parts(&self, loc: MapLocation) -> f64 {
        self.parts.get(&loc).copied().unwrap_or(-1.0)
    }

    /// `-1.0` if `loc` has never been within this team's sensor range.
    pub fn remembered_ore(&self, loc: MapLocation) -> f64 {
        self.ore.get(&loc).copied().unwrap_or(-1.0)
    }

    /// `None` if `loc` has never been within this team's sensor range --
    /// unlike the numeric senses, terrain has no natural `-1` sentinel.
    pub fn remembered_terrain(&self, loc: MapLocation) -> Option<TerrainTile> {
        self.terrain.get(&loc).copied()
    }

    pub fn has_ever_sighted(&self, loc: MapLocation) -> bool {
        self.rubble.contains_key(&loc)
    }
}
