//! Monotonic robot identity.
//!
//! Unlike a generational entity allocator (which recycles freed slots and
//! distinguishes stale references by generation), robot ids in this engine
//! are assigned once at spawn completion and never reused for the lifetime
//! of a match -- the source rules require ids to remain valid references
//! for signals, team memory, and replay logs even after the robot they once
//! named has died. [`IdAllocator`] reflects that: it only ever increments.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RobotId(pub u32);

impl std::fmt::Display for RobotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out strictly increasing [`RobotId`]s for the lifetime of a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Construct an allocator that continues from `next` (e.g. when restoring
    /// a snapshot): the next call to [`allocate`](Self::allocate) returns
    /// `RobotId(next)`.
    pub fn resuming_from(next: u32) -> Self {
        Self { next }
    }

    pub fn allocate(&mut self) -> RobotId {
        let id = RobotId(self.next);
        self.next = self
            .next
            .checked_add(1)
            .expect("robot id space exhausted (u32::MAX robots spawned in one match)");
        id
    }

    /// The id that the next call to `allocate` will return -- used to
    /// capture allocator state in a snapshot.
    pub fn peek_next(&self) -> u32 {
        self.next
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_is_monotonic_and_never_recycles() {
        let mut alloc = IdAllocator::new();
        let ids: Vec<_> = (0..5).map(|_| alloc.allocate()).collect();
        assert_eq!(
            ids,
            vec![RobotId(0), RobotId(1), RobotId(2), RobotId(3), RobotId(4)]
        );
    }

    #[test]
    fn resuming_from_continues_the_sequence() {
        let mut alloc = IdAllocator::resuming_from(100);
        assert_eq!(alloc.allocate(), RobotId(100));
        assert_eq!(alloc.allocate(), RobotId(101));
    }
}
