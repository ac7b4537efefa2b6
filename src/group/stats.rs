//! # Batch Group Statistics
//!
//! Point-in-time counters for a batch group, suitable for logging or exporting.

use serde::{Deserialize, Serialize};

/// Snapshot of a batch group's counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchGroupStats {
    /// Effective batch size
    pub limit: usize,

    /// Tasks actually started
    pub submitted: u64,

    /// Tasks dropped because the group was halted
    pub suppressed: u64,

    /// Callback invocations
    pub batches_delivered: u64,

    /// Results handed to the callback across all batches
    pub results_delivered: u64,

    /// Failed tasks observed when draining batches, including errors that lost the
    /// first-error race
    pub task_errors: u64,

    /// Whether a callback error latched the group
    pub halted: bool,
}

impl BatchGroupStats {
    /// Mean number of results per delivered batch
    pub fn average_batch_size(&self) -> f64 {
        if self.batches_delivered == 0 {
            return 0.0;
        }

        self.results_delivered as f64 / self.batches_delivered as f64
    }

    /// Tasks started whose results have not reached the callback yet
    pub fn undelivered(&self) -> u64 {
        self.submitted.saturating_sub(self.results_delivered)
    }
}
