//! `MapLocation` and `Direction` -- the integer grid geometry underlying
//! every sensed or mutated piece of world state.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MapLocation
// ---------------------------------------------------------------------------

/// An integer point on the map grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MapLocation {
    pub x: i32,
    pub y: i32,
}

impl MapLocation {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance -- the unit used throughout for radii,
    /// since it avoids a square root and keeps comparisons exact on integers.
    pub fn distance_squared_to(self, other: MapLocation) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }

    /// Chebyshev (king-move) distance, used for adjacency checks.
    pub fn chebyshev_distance_to(self, other: MapLocation) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// The neighbor in the given direction. `NONE` is the identity; `OMNI`
    /// is not a movement direction and also resolves to the identity (callers
    /// that need to reject it do so before calling `add`).
    pub fn add(self, dir: Direction) -> MapLocation {
        let (dx, dy) = dir.delta();
        MapLocation::new(self.x + dx, self.y + dy)
    }

    pub fn is_adjacent_to(self, other: MapLocation) -> bool {
        self != other && self.chebyshev_distance_to(other) <= 1
    }
}

impl std::fmt::Display for MapLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// The eight compass directions plus the two sentinels `NONE` and `OMNI`.
///
/// `NONE` means "no movement" (used for in-place actions); `OMNI` means
/// "all directions" (used for area-of-effect signals) and is never a valid
/// argument to a movement action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    None,
    Omni,
}

impl Direction {
    /// The eight compass directions in clockwise order starting at North --
    /// the deterministic iteration order used for adjacent-tile scans
    /// (zombie spawn placement, adjacency checks).
    pub const COMPASS: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::NorthEast => (1, 1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, -1),
            Direction::South => (0, -1),
            Direction::SouthWest => (-1, -1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, 1),
            Direction::None | Direction::Omni => (0, 0),
        }
    }

    pub fn is_diagonal(self) -> bool {
        matches!(
            self,
            Direction::NorthEast | Direction::SouthEast | Direction::SouthWest | Direction::NorthWest
        )
    }

    /// True for the eight compass directions; false for `NONE`/`OMNI`.
    pub fn is_movement_direction(self) -> bool {
        !matches!(self, Direction::None | Direction::Omni)
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::NorthEast => Direction::SouthWest,
            Direction::East => Direction::West,
            Direction::SouthEast => Direction::NorthWest,
            Direction::South => Direction::North,
            Direction::SouthWest => Direction::NorthEast,
            Direction::West => Direction::East,
            Direction::NorthWest => Direction::SouthEast,
            Direction::None => Direction::None,
            Direction::Omni => Direction::Omni,
        }
    }
}
