//! Thread-backed batch group.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use crossbeam::sync::WaitGroup;
use parking_lot::Mutex;
use tracing::{info, trace};

use super::coordinator::BatchCoordinator;
use super::results::BatchResults;
use super::{BatchGroupStats, Outcome, Submission};
use crate::config::{BatchGroupConfig, DEFAULT_NAME};

type PanicPayload = Box<dyn Any + Send + 'static>;

/// State written by running tasks and drained by the coordinating caller
struct Shared<T, E> {
    results: BatchResults<T, E>,
    panic: Mutex<Option<PanicPayload>>,
}

impl<T, E> Shared<T, E> {
    fn record_panic(&self, payload: PanicPayload) {
        let mut slot = self.panic.lock();
        if slot.is_none() {
            *slot = Some(payload);
        }
    }
}

/// Batch group running each task on its own OS thread.
///
/// `submit` returns as soon as the task is spawned, except at a batch boundary where
/// it blocks until the previous batch has finished and the callback has returned.
/// The callback always runs on the thread calling `submit` or `finish`.
///
/// Dropping the group without calling `finish` detaches the in-flight threads and
/// discards the last batch.
///
/// # Panics
///
/// A panicking task does not poison the group. The panic is captured on the worker
/// thread and resumed on the caller when its batch is drained.
pub struct BatchGroup<T, E, C> {
    coordinator: BatchCoordinator<T, E, C>,
    shared: Arc<Shared<T, E>>,
    in_flight: WaitGroup,
}

impl<T, E, C> BatchGroup<T, E, C>
where
    T: Send + 'static,
    E: Send + 'static,
    C: FnMut(Vec<T>, Option<E>) -> Result<(), E>,
{
    /// Create a group delivering batches of `limit` results. A limit of 0 is treated as 1.
    pub fn new(limit: usize, callback: C) -> Self {
        Self::named(DEFAULT_NAME, limit, callback)
    }

    /// Create a group whose log events carry `name`
    pub fn named(name: impl Into<String>, limit: usize, callback: C) -> Self {
        let coordinator = BatchCoordinator::new(name.into(), limit, callback);
        let results = BatchResults::new(coordinator.limit());

        Self {
            coordinator,
            shared: Arc::new(Shared {
                results,
                panic: Mutex::new(None),
            }),
            in_flight: WaitGroup::new(),
        }
    }

    /// Create a group from loaded configuration
    pub fn from_config(config: &BatchGroupConfig, callback: C) -> Self {
        info!(
            group = %config.name,
            limit = config.effective_limit(),
            "Creating threaded batch group"
        );
        Self::named(config.name.clone(), config.limit, callback)
    }

    pub fn name(&self) -> &str {
        self.coordinator.name()
    }

    pub fn limit(&self) -> usize {
        self.coordinator.limit()
    }

    /// Whether a callback error has stopped the group
    pub fn is_halted(&self) -> bool {
        self.coordinator.is_halted()
    }

    /// The callback error that halted the group, if any
    pub fn terminal_error(&self) -> Option<&E> {
        self.coordinator.terminal_error()
    }

    pub fn stats(&self) -> BatchGroupStats {
        self.coordinator.stats()
    }

    /// Start `task` on a new thread.
    ///
    /// If a full batch is already in flight, this first waits for it and runs the
    /// callback. Returns [`Submission::Halted`] without running `task` when the group
    /// is, or just became, halted.
    pub fn submit<F>(&mut self, task: F) -> Submission
    where
        F: FnOnce() -> Outcome<T, E> + Send + 'static,
    {
        if self.coordinator.is_halted() {
            self.coordinator.record_suppressed();
            return Submission::Halted;
        }

        if self.coordinator.at_boundary() {
            let (values, first_error) = self.drain();
            if !self.coordinator.deliver(values, first_error) {
                self.coordinator.record_suppressed();
                return Submission::Halted;
            }
        }

        self.coordinator.record_start();
        trace!(
            group = %self.coordinator.name(),
            task = self.coordinator.submitted(),
            "Dispatching task"
        );

        let shared = Arc::clone(&self.shared);
        let in_flight = self.in_flight.clone();
        thread::spawn(move || {
            match panic::catch_unwind(AssertUnwindSafe(task)) {
                Ok(outcome) => shared.results.deposit(outcome),
                Err(payload) => shared.record_panic(payload),
            }
            drop(in_flight);
        });

        Submission::Started
    }

    /// Wait for the remaining tasks, deliver the final batch and report the first
    /// callback error of the group's lifetime.
    ///
    /// A halted group returns its terminal error without calling the callback again.
    pub fn finish(mut self) -> Result<(), E> {
        let (values, first_error) = self.drain();
        if !self.coordinator.is_halted() {
            self.coordinator.deliver(values, first_error);
        }
        self.coordinator.into_result()
    }

    /// Join every in-flight task and take the batch's results and first error
    fn drain(&mut self) -> (Vec<T>, Option<E>) {
        let in_flight = std::mem::replace(&mut self.in_flight, WaitGroup::new());
        in_flight.wait();

        let panicked = self.shared.panic.lock().take();
        if let Some(payload) = panicked {
            panic::resume_unwind(payload);
        }

        let batch = self.shared.results.take();
        self.coordinator.record_task_errors(batch.task_errors);

        (batch.values, batch.first_error)
    }
}
