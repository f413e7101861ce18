// In-memory copy of the feed's snapshot history. Replaced wholesale on every fetch.

use crate::models::Snapshot;

/// Ordered raw snapshots in feed order (not guaranteed chronological).
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    sequence: Vec<Snapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshots(sequence: Vec<Snapshot>) -> Self {
        Self { sequence }
    }

    /// Swaps in a fresh history; the feed is authoritative, nothing is appended.
    pub fn replace(&mut self, sequence: Vec<Snapshot>) {
        self.sequence = sequence;
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.sequence
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.sequence.last()
    }

    /// Second-to-last snapshot; `None` with fewer than two.
    pub fn previous(&self) -> Option<&Snapshot> {
        let n = self.sequence.len();
        if n < 2 {
            return None;
        }
        self.sequence.get(n - 2)
    }

    /// Last `n` snapshots in original order, or all of them if fewer exist.
    pub fn recent_window(&self, n: usize) -> &[Snapshot] {
        let start = self.sequence.len().saturating_sub(n);
        &self.sequence[start..]
    }
}
