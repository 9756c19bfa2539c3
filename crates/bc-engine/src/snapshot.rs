//! Match snapshot and restore with BLAKE3 hashing.
//!
//! Directly adapted from the teacher's `EngineSnapshot`/`compute_hash` pair:
//! a serializable copy of the full simulation state plus a content hash used
//! both for integrity checking on restore and for cross-run determinism
//! verification (run the same match twice, compare hashes every round).

use bc_rules::prelude::World;
use serde::{Deserialize, Serialize};

/// A serializable snapshot of the full match state at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub world: World,
    /// BLAKE3 hex digest of the serialized world. Used for integrity
    /// checking on restore and cross-run determinism comparisons.
    pub hash: String,
}

fn compute_hash(world: &World) -> String {
    let json_bytes =
        serde_json::to_vec(world).expect("World should always be JSON-serializable");
    blake3::hash(&json_bytes).to_hex().to_string()
}

/// Capture a complete snapshot of `world`, including its content hash.
pub fn capture(world: &World) -> MatchSnapshot {
    let hash = compute_hash(world);
    MatchSnapshot {
        world: world.clone(),
        hash,
    }
}

/// The BLAKE3 hex digest of `world`'s current state, without allocating a
/// full snapshot -- used by the determinism test harness to compare two
/// independent runs round by round.
pub fn state_hash(world: &World) -> String {
    compute_hash(world)
}

/// Verify and return the world held by a snapshot. Recomputes the hash from
/// the snapshot's own world and rejects a mismatch before handing back any
/// state, so a corrupted or tampered snapshot never gets applied.
pub fn restore(snapshot: &MatchSnapshot) -> anyhow::Result<World> {
    let expected = compute_hash(&snapshot.world);
    if expected != snapshot.hash {
        anyhow::bail!(
            "snapshot hash mismatch: recorded {} but recomputed {expected}; snapshot may be corrupted",
            snapshot.hash
        );
    }
    Ok(snapshot.world.clone())
}
