//! Bounded undo/redo log of editing-surface snapshots.
//!
//! The log is a linear sequence of snapshots plus a cursor at the
//! currently displayed one. Recording after an undo discards the redo
//! branch; the sequence is capped, evicting the oldest entry on overflow.
//! Every bound clamps. The log itself never fails and never panics.

use meme_scene::Snapshot;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Default cap on retained snapshots per session.
pub const DEFAULT_MAX_HISTORY: usize = 20;

fn default_max_entries() -> usize {
    DEFAULT_MAX_HISTORY
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "HistoryWire")]
pub struct History {
    /// Oldest first.
    entries: Vec<Snapshot>,
    /// Index of the currently displayed snapshot; `None` iff empty.
    cursor: Option<usize>,
    max_entries: usize,
}

/// Raw serialized form. Deserialization goes through here so an
/// out-of-range cursor or an over-long entry list clamps back into the
/// invariant instead of being trusted.
#[derive(Deserialize)]
struct HistoryWire {
    #[serde(default)]
    entries: Vec<Snapshot>,
    #[serde(default)]
    cursor: Option<usize>,
    #[serde(default = "default_max_entries")]
    max_entries: usize,
}

impl From<HistoryWire> for History {
    fn from(wire: HistoryWire) -> Self {
        let max_entries = wire.max_entries.max(1);
        let mut entries = wire.entries;
        if entries.len() > max_entries {
            entries.drain(..entries.len() - max_entries);
        }
        let cursor = match entries.len() {
            0 => None,
            len => Some(wire.cursor.unwrap_or(len - 1).min(len - 1)),
        };
        Self {
            entries,
            cursor,
            max_entries,
        }
    }
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_HISTORY)
    }

    /// A log retaining at most `max_entries` snapshots (floored at 1).
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            max_entries: max_entries.max(1),
        }
    }

    /// Record a snapshot of a just-completed mutation. Any redo branch is
    /// discarded first; the cursor always ends on the new snapshot.
    pub fn record(&mut self, snapshot: Snapshot) {
        if let Some(cursor) = self.cursor {
            // drop the redo branch before appending
            self.entries.truncate(cursor + 1);
        }

        self.entries.push(snapshot);
        if self.entries.len() > self.max_entries {
            self.entries.remove(0);
        }
        self.cursor = Some(self.entries.len() - 1);

        trace!(len = self.entries.len(), cursor = ?self.cursor, "recorded snapshot");
    }

    /// Step back one snapshot and return it. No-op at the oldest snapshot
    /// or on an empty log.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        let cursor = self.cursor?;
        if cursor == 0 {
            return None;
        }
        self.cursor = Some(cursor - 1);
        debug!(cursor = cursor - 1, "undo");
        self.entries.get(cursor - 1)
    }

    /// Step forward one snapshot and return it. No-op at the newest.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        let cursor = self.cursor?;
        if cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor = Some(cursor + 1);
        debug!(cursor = cursor + 1, "redo");
        self.entries.get(cursor + 1)
    }

    /// The snapshot `undo` would land on, without moving the cursor.
    /// Lets callers attempt a restore before committing the step.
    pub fn peek_undo(&self) -> Option<&Snapshot> {
        let cursor = self.cursor?;
        if cursor == 0 {
            return None;
        }
        self.entries.get(cursor - 1)
    }

    /// The snapshot `redo` would land on, without moving the cursor.
    pub fn peek_redo(&self) -> Option<&Snapshot> {
        self.entries.get(self.cursor? + 1)
    }

    /// The snapshot currently under the cursor.
    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.get(self.cursor?)
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(cursor) if cursor > 0)
    }

    pub fn can_redo(&self) -> bool {
        match self.cursor {
            Some(cursor) => cursor + 1 < self.entries.len(),
            None => false,
        }
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
