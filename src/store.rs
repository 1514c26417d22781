use std::sync::RwLock;

use crate::gateway::types::Decision;

/// Ordered record of every decision that marked a plant for cutting.
/// Insertion order is response-arrival order. Readers only ever see
/// defensive copies, so a snapshot is unaffected by later appends or clears.
#[derive(Debug, Default)]
pub struct CutResultStore {
    entries: RwLock<Vec<Decision>>,
}

impl CutResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The inference gateway is the only production writer; everything else
    /// reads snapshots.
    pub fn append(&self, decision: Decision) {
        let mut entries = self.entries.write().expect("lock poisoned");
        entries.push(decision);
    }

    pub fn snapshot(&self) -> Vec<Decision> {
        self.entries.read().expect("lock poisoned").clone()
    }

    pub fn count(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write().expect("lock poisoned");
        let removed = entries.len();
        entries.clear();
        tracing::info!(target: "store", removed, "cut_results_cleared");
    }
}
