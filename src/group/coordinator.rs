//! Batch boundary and terminal-error state machine shared by both group flavours.
//!
//! The flavours own task execution and result collection; the coordinator owns
//! everything that decides what happens with a drained batch.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

use super::stats::BatchGroupStats;

pub(crate) struct BatchCoordinator<T, E, C> {
    name: String,
    limit: usize,
    callback: C,
    submitted: u64,
    halted: AtomicBool,
    terminal_error: Option<E>,
    stats: BatchGroupStats,
    _results: PhantomData<fn(Vec<T>)>,
}

impl<T, E, C> BatchCoordinator<T, E, C>
where
    C: FnMut(Vec<T>, Option<E>) -> Result<(), E>,
{
    pub(crate) fn new(name: String, limit: usize, callback: C) -> Self {
        if limit == 0 {
            warn!(group = %name, "Batch limit of 0 requested, using 1");
        }
        let limit = limit.max(1);

        Self {
            name,
            limit,
            callback,
            submitted: 0,
            halted: AtomicBool::new(false),
            terminal_error: None,
            stats: BatchGroupStats {
                limit,
                ..Default::default()
            },
            _results: PhantomData,
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn limit(&self) -> usize {
        self.limit
    }

    pub(crate) fn submitted(&self) -> u64 {
        self.submitted
    }

    pub(crate) fn is_halted(&self) -> bool {
        self.halted.load(Ordering::Acquire)
    }

    pub(crate) fn terminal_error(&self) -> Option<&E> {
        self.terminal_error.as_ref()
    }

    /// A full batch has been dispatched and must be drained before the next start
    pub(crate) fn at_boundary(&self) -> bool {
        self.submitted > 0 && self.submitted % self.limit as u64 == 0
    }

    pub(crate) fn record_start(&mut self) {
        self.submitted += 1;
        self.stats.submitted = self.submitted;
    }

    pub(crate) fn record_suppressed(&mut self) {
        self.stats.suppressed += 1;
    }

    pub(crate) fn record_task_errors(&mut self, count: u64) {
        self.stats.task_errors += count;
    }

    /// Hand a drained batch to the callback.
    ///
    /// Empty batches never reach the callback. Returns `false` once the group is
    /// halted, including when this very call latched the terminal error.
    pub(crate) fn deliver(&mut self, values: Vec<T>, first_error: Option<E>) -> bool {
        if values.is_empty() {
            return !self.is_halted();
        }

        let batch = self.stats.batches_delivered + 1;
        let results = values.len() as u64;
        debug!(
            group = %self.name,
            batch = batch,
            results = results,
            has_task_error = first_error.is_some(),
            "Delivering batch"
        );

        let outcome = (self.callback)(values, first_error);
        self.stats.batches_delivered = batch;
        self.stats.results_delivered += results;

        match outcome {
            Ok(()) => true,
            Err(err) => {
                self.halt(err);
                false
            }
        }
    }

    fn halt(&mut self, err: E) {
        self.terminal_error = Some(err);
        self.halted.store(true, Ordering::Release);
        self.stats.halted = true;

        debug!(
            group = %self.name,
            batch = self.stats.batches_delivered,
            submitted = self.submitted,
            "Callback returned an error, halting group"
        );
    }

    pub(crate) fn stats(&self) -> BatchGroupStats {
        self.stats.clone()
    }

    pub(crate) fn into_result(self) -> Result<(), E> {
        debug!(
            group = %self.name,
            batches = self.stats.batches_delivered,
            submitted = self.submitted,
            suppressed = self.stats.suppressed,
            halted = self.stats.halted,
            "Batch group finished"
        );

        match self.terminal_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
