//! Per-batch result buffer written by running tasks.

use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;
use tracing::trace;

use super::Outcome;

/// Results and first error of the batch in flight, in the order tasks completed
pub(crate) struct BatchResults<T, E> {
    sender: Sender<T>,
    receiver: Receiver<T>,
    first_error: Mutex<Option<E>>,
    task_errors: AtomicU64,
}

/// Everything a drained batch hands to the coordinator
pub(crate) struct DrainedBatch<T, E> {
    pub(crate) values: Vec<T>,
    pub(crate) first_error: Option<E>,
    pub(crate) task_errors: u64,
}

impl<T, E> BatchResults<T, E> {
    /// Buffer for one batch. Capacity equals the limit, which bounds the tasks in flight.
    pub(crate) fn new(capacity: usize) -> Self {
        let (sender, receiver) = channel::bounded(capacity);
        Self {
            sender,
            receiver,
            first_error: Mutex::new(None),
            task_errors: AtomicU64::new(0),
        }
    }

    /// Called by a task as it completes. The first error deposited in a batch wins.
    pub(crate) fn deposit(&self, outcome: Outcome<T, E>) {
        let (value, error) = outcome.into_parts();

        if let Some(error) = error {
            self.task_errors.fetch_add(1, Ordering::Relaxed);
            let mut slot = self.first_error.lock();
            if slot.is_none() {
                *slot = Some(error);
            }
        }

        if self.sender.try_send(value).is_err() {
            trace!("Result dropped, batch buffer full");
        }
    }

    /// Take the batch and reset the error slot. Only valid once every task has joined.
    pub(crate) fn take(&self) -> DrainedBatch<T, E> {
        DrainedBatch {
            values: self.receiver.try_iter().collect(),
            first_error: self.first_error.lock().take(),
            task_errors: self.task_errors.swap(0, Ordering::AcqRel),
        }
    }
}
