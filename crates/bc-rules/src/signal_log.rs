//! Per-round engine event log.
//!
//! Adapted from the clear-per-tick, query-by-criterion idiom used by the
//! teacher's change journal: rather than buffering component diffs for a
//! later apply pass, this buffers the already-applied [`Signal`] events a
//! round produced, in emission order, for the viewer/replay writer to drain.

use bc_core::prelude::{RobotId, Signal};

#[derive(Debug, Clone, Default)]
pub struct SignalLog {
    entries: Vec<Signal>,
}

impl SignalLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, signal: Signal) {
        self.entries.push(signal);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Signal> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All signals emitted by a given actor this round, in emission order.
    pub fn by_actor(&self, actor: RobotId) -> impl Iterator<Item = &Signal> {
        self.entries.iter().filter(move |signal| signal_actor(signal) == Some(actor))
    }

    pub fn into_vec(self) -> Vec<Signal> {
        self.entries
    }
}

fn signal_actor(signal: &Signal) -> Option<RobotId> {
    match signal {
        Signal::Movement { actor, .. }
        | Signal::Attack { actor, .. }
        | Signal::Mine { actor, .. }
        | Signal::Cast { actor, .. }
        | Signal::IndicatorDot { actor, .. }
        | Signal::IndicatorLine { actor, .. }
        | Signal::IndicatorString { actor, .. }
        | Signal::MatchObservation { actor, .. } => Some(*actor),
        Signal::Spawn { parent, .. } => Some(*parent),
        Signal::Research { .. }
        | Signal::LocationSupplyChange { .. }
        | Signal::ZombieDenDestroyed { .. } => None,
        Signal::Death { id, .. } => Some(*id),
    }
}
