//! Pipeline statistics tracking.
//!
//! Thread-safe outcome counters shared across worker tasks, printed at the
//! end of each batch run.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use strum::IntoEnumIterator;

use super::types::OutcomeKind;

/// Thread-safe pipeline statistics tracker.
///
/// Tracks per-domain outcomes using atomic counters, allowing concurrent
/// access from multiple tasks. All outcome kinds are initialized to zero on
/// creation, so `record` can never miss a key.
pub struct PipelineStats {
    outcomes: HashMap<OutcomeKind, AtomicUsize>,
}

impl PipelineStats {
    pub fn new() -> Self {
        let mut outcomes = HashMap::new();
        for kind in OutcomeKind::iter() {
            outcomes.insert(kind, AtomicUsize::new(0));
        }
        PipelineStats { outcomes }
    }

    /// Increment the counter for an outcome.
    pub fn record(&self, kind: OutcomeKind) {
        if let Some(counter) = self.outcomes.get(&kind) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "No counter for outcome {:?}; PipelineStats was not fully initialized",
                kind
            );
        }
    }

    /// Current count for an outcome.
    pub fn count(&self, kind: OutcomeKind) -> usize {
        self.outcomes
            .get(&kind)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Logs a one-line entry per non-zero outcome counter.
    pub fn log_summary(&self) {
        for kind in OutcomeKind::iter() {
            let count = self.count(kind);
            if count > 0 {
                log::info!("  {}: {}", kind, count);
            }
        }
    }
}

impl Default for PipelineStats {
    fn default() -> Self {
        Self::new()
    }
}
