//! Deterministic replay: periodic state-hash checkpoints recorded during a
//! match, replayed against a fresh [`RoundEngine`] to verify that the same
//! initial state plus the same controller decisions reproduce the same
//! state at every checkpoint.
//!
//! Directly adapted from the teacher's `ReplayRecorder`/`ReplayLog`/`replay`
//! trio: validate the log fully before mutating anything, then replay round
//! by round, stopping at the first checkpoint mismatch while still
//! reporting how far it got.

use std::collections::BTreeMap;

use bc_rules::prelude::RobotController;
use serde::{Deserialize, Serialize};

use crate::round::RoundEngine;
use crate::snapshot::{self, MatchSnapshot};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayLog {
    pub initial_snapshot: MatchSnapshot,
    /// Total number of rounds that were recorded. Replay executes exactly
    /// this many rounds from the initial snapshot.
    pub total_rounds: u32,
    pub checkpoints: Vec<ReplayCheckpoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayCheckpoint {
    pub round: u32,
    pub state_hash: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayResult {
    pub completed: bool,
    pub rounds_replayed: u32,
    pub first_divergence: Option<ReplayDivergence>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayDivergence {
    pub round: u32,
    pub expected_hash: String,
    pub actual_hash: String,
}

pub struct ReplayRecorder {
    log: ReplayLog,
    checkpoint_interval: u32,
    rounds_recorded: u32,
}

impl ReplayRecorder {
    pub fn new(initial_snapshot: MatchSnapshot, checkpoint_interval: u32) -> Self {
        Self {
            log: ReplayLog {
                initial_snapshot,
                total_rounds: 0,
                checkpoints: Vec::new(),
            },
            checkpoint_interval,
            rounds_recorded: 0,
        }
    }

    /// Record state after completing `round`. Call once per round, in order.
    pub fn record_round(&mut self, round: u32, engine: &RoundEngine) {
        self.rounds_recorded += 1;
        let should_checkpoint = self.checkpoint_interval == 0 || round % self.checkpoint_interval == 0;
        if should_checkpoint {
            self.log.checkpoints.push(ReplayCheckpoint {
                round,
                state_hash: snapshot::state_hash(engine.world()),
            });
        }
    }

    pub fn finish(mut self) -> ReplayLog {
        self.log.total_rounds = self.rounds_recorded;
        self.log
    }
}

/// Replay `log` by restoring its initial snapshot into a fresh
/// [`RoundEngine`] and driving it forward with `play_turn`, comparing the
/// state hash at each recorded checkpoint round.
///
/// `play_turn` must make the exact same decisions the original run made
/// (e.g. by replaying recorded player-controller actions) -- this function
/// verifies engine determinism given identical decisions, not controller
/// behavior itself.
pub fn replay(log: &ReplayLog, mut play_turn: impl FnMut(&mut RobotController)) -> anyhow::Result<ReplayResult> {
    let mut checkpoint_map: BTreeMap<u32, String> = BTreeMap::new();
    for checkpoint in &log.checkpoints {
        if checkpoint_map.contains_key(&checkpoint.round) {
            anyhow::bail!("replay log contains duplicate checkpoint at round {}", checkpoint.round);
        }
        checkpoint_map.insert(checkpoint.round, checkpoint.state_hash.clone());
    }

    let world = snapshot::restore(&log.initial_snapshot)?;
    let mut engine = RoundEngine::new(world);

    if log.total_rounds == 0 {
        return Ok(ReplayResult {
            completed: true,
            rounds_replayed: 0,
            first_divergence: None,
        });
    }

    let start_round = engine.world().round();
    let mut rounds_replayed = 0u32;
    for round_offset in 1..=log.total_rounds {
        let round = start_round + round_offset;
        engine.step_round(&mut play_turn);
        rounds_replayed += 1;

        if let Some(expected_hash) = checkpoint_map.get(&round) {
            let actual_hash = snapshot::state_hash(engine.world());
            if &actual_hash != expected_hash {
                return Ok(ReplayResult {
                    completed: false,
                    rounds_replayed,
                    first_divergence: Some(ReplayDivergence {
                        round,
                        expected_hash: expected_hash.clone(),
                        actual_hash,
                    }),
                });
            }
        }
    }

    Ok(ReplayResult {
        completed: true,
        rounds_replayed,
        first_divergence: None,
    })
}
