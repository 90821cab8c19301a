//! Snapshot history supporting reverse stepping.
//!
//! After every successful step the pre-step machine state is pushed here.
//! Stepping back pops and restores the most recent snapshot. Snapshots are
//! full deep copies; nothing is shared with the live state, so a restored
//! state is bit-identical to what was saved.

use crate::sim::session::MachineState;

/// A stack of full-state snapshots, newest last.
///
/// Bounded only by available memory; cleared by reset and re-assembly.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct History {
    snapshots: Vec<MachineState>,
}

impl History {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Saves a snapshot.
    pub fn push(&mut self, state: MachineState) {
        self.snapshots.push(state);
    }

    /// Removes and returns the most recent snapshot.
    pub fn pop(&mut self) -> Option<MachineState> {
        self.snapshots.pop()
    }

    /// Discards all snapshots.
    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether no snapshot is stored.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
