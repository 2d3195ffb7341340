//! Bounded history of mode A results, most recent first.

use std::collections::VecDeque;
use std::sync::Arc;

use claimcheck_core::AnalysisResult;

/// Ring buffer of result snapshots. Pushing past capacity evicts the
/// oldest entry. Entries are shared and never mutated.
#[derive(Debug, Clone)]
pub struct AnalysisHistory {
    entries: VecDeque<Arc<AnalysisResult>>,
    capacity: usize,
}

impl AnalysisHistory {
    /// A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, result: Arc<AnalysisResult>) {
        self.entries.push_front(result);

        if self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_back() {
                tracing::info!(
                    result_id = %evicted.id,
                    capacity = self.capacity,
                    "Evicted oldest analysis from history"
                );
            }
        }
    }

    /// Most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<AnalysisResult>> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&Arc<AnalysisResult>> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for AnalysisHistory {
    fn default() -> Self {
        Self::new(10)
    }
}
