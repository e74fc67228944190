//! Capped undo/redo history.
//!
//! The history is an ordered sequence of immutable deep snapshots of the
//! element array plus a cursor into it. It always contains at least one
//! snapshot (the empty board), so the cursor invariant `step < len` holds
//! from construction onward. Committing while the cursor sits before the end
//! truncates the redo tail first; committing past the cap evicts the oldest
//! snapshot from the front.
//!
//! History is strictly local. Undo/redo restore a snapshot and hand it back
//! to the caller, which is responsible for broadcasting a full-sync — peers
//! never see history operations themselves.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use protocol::Element;

use crate::consts::HISTORY_CAP;

/// Snapshot stack with a cursor. See the module docs for semantics.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Vec<Element>>,
    step: usize,
}

impl History {
    /// Create a history seeded with a single empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self { snapshots: vec![Vec::new()], step: 0 }
    }

    /// Append a deep copy of `elements` after the cursor, discarding any redo
    /// tail and evicting the oldest snapshot beyond [`HISTORY_CAP`].
    pub fn commit(&mut self, elements: &[Element]) {
        self.snapshots.truncate(self.step + 1);
        self.snapshots.push(elements.to_vec());
        if self.snapshots.len() > HISTORY_CAP {
            self.snapshots.remove(0);
        }
        self.step = self.snapshots.len() - 1;
    }

    /// Step the cursor back one snapshot, if possible.
    pub fn undo(&mut self) -> Option<&[Element]> {
        if self.step == 0 {
            return None;
        }
        self.step -= 1;
        Some(&self.snapshots[self.step])
    }

    /// Step the cursor forward one snapshot, if possible.
    pub fn redo(&mut self) -> Option<&[Element]> {
        if self.step + 1 >= self.snapshots.len() {
            return None;
        }
        self.step += 1;
        Some(&self.snapshots[self.step])
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.step > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.step + 1 < self.snapshots.len()
    }

    /// Number of snapshots currently held. Never exceeds [`HISTORY_CAP`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// The history always holds at least the initial snapshot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Current cursor position. Always `< len()`.
    #[must_use]
    pub fn step(&self) -> usize {
        self.step
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
