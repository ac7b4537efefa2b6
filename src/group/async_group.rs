//! Tokio-backed batch group.

use std::future::Future;
use std::panic;
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::task::JoinHandle;
use tracing::{info, trace, warn};

use super::coordinator::BatchCoordinator;
use super::results::BatchResults;
use super::{BatchGroupStats, Outcome, Submission};
use crate::config::{BatchGroupConfig, DEFAULT_NAME};

/// Batch group running each task as a tokio task.
///
/// Same contract as [`BatchGroup`](super::BatchGroup), with `submit` and `finish`
/// suspending instead of blocking. Each task deposits its outcome the moment it
/// completes, so a drained batch lists results in completion order and reports the
/// error of the earliest failing task, however late the batch is drained.
///
/// Must be used from within a tokio runtime.
///
/// ```rust
/// use batch_group::{AsyncBatchGroup, Outcome};
///
/// # #[tokio::main]
/// # async fn main() {
/// let mut sizes = Vec::new();
/// let mut group = AsyncBatchGroup::new(2, |values: Vec<u64>, _err: Option<String>| {
///     sizes.push(values.len());
///     Ok(())
/// });
///
/// for i in 0..5 {
///     group.submit(async move { Outcome::ok(i) }).await;
/// }
/// group.finish().await.unwrap();
///
/// assert_eq!(sizes, vec![2, 2, 1]);
/// # }
/// ```
///
/// # Panics
///
/// A panicking task is resumed on the awaiting caller when its batch is drained.
pub struct AsyncBatchGroup<T, E, C> {
    coordinator: BatchCoordinator<T, E, C>,
    results: Arc<BatchResults<T, E>>,
    in_flight: FuturesUnordered<JoinHandle<()>>,
}

impl<T, E, C> AsyncBatchGroup<T, E, C>
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
        let results = Arc::new(BatchResults::new(coordinator.limit()));

        Self {
            coordinator,
            results,
            in_flight: FuturesUnordered::new(),
        }
    }

    /// Create a group from loaded configuration
    pub fn from_config(config: &BatchGroupConfig, callback: C) -> Self {
        info!(
            group = %config.name,
            limit = config.effective_limit(),
            "Creating async batch group"
        );
        Self::named(config.name.clone(), config.limit, callback)
    }

    pub fn name(&self) -> &str {
        self.coordinator.name()
    }

    pub fn limit(&self) -> usize {
        self.coordinator.limit()
    }

    pub fn is_halted(&self) -> bool {
        self.coordinator.is_halted()
    }

    pub fn terminal_error(&self) -> Option<&E> {
        self.coordinator.terminal_error()
    }

    pub fn stats(&self) -> BatchGroupStats {
        self.coordinator.stats()
    }

    /// Spawn `task` on the runtime, first draining the previous batch if it is full
    pub async fn submit<F>(&mut self, task: F) -> Submission
    where
        F: Future<Output = Outcome<T, E>> + Send + 'static,
    {
        if self.coordinator.is_halted() {
            self.coordinator.record_suppressed();
            return Submission::Halted;
        }

        if self.coordinator.at_boundary() {
            let (values, first_error) = self.drain().await;
            if !self.coordinator.deliver(values, first_error) {
                self.coordinator.record_suppressed();
                return Submission::Halted;
            }
        }

        self.coordinator.record_start();
        trace!(
            group = %self.coordinator.name(),
            task = self.coordinator.submitted(),
            "Spawning task"
        );
        let results = Arc::clone(&self.results);
        self.in_flight.push(tokio::spawn(async move {
            results.deposit(task.await);
        }));

        Submission::Started
    }

    /// Await the remaining tasks, deliver the final batch and report the first
    /// callback error of the group's lifetime
    pub async fn finish(mut self) -> Result<(), E> {
        let (values, first_error) = self.drain().await;
        if !self.coordinator.is_halted() {
            self.coordinator.deliver(values, first_error);
        }
        self.coordinator.into_result()
    }

    /// Join every in-flight task and take the batch's results and first error
    async fn drain(&mut self) -> (Vec<T>, Option<E>) {
        while let Some(joined) = self.in_flight.next().await {
            if let Err(join_error) = joined {
                match join_error.try_into_panic() {
                    Ok(payload) => panic::resume_unwind(payload),
                    Err(join_error) => warn!(
                        group = %self.coordinator.name(),
                        error = %join_error,
                        "Task cancelled before reporting a result"
                    ),
                }
            }
        }

        let batch = self.results.take();
        self.coordinator.record_task_errors(batch.task_errors);

        (batch.values, batch.first_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn finish_without_submissions_is_a_no_op() {
        let mut calls = 0;
        let group = AsyncBatchGroup::new(3, |_: Vec<u8>, _: Option<String>| {
            calls += 1;
            Ok(())
        });
        assert!(group.finish().await.is_ok());
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn results_arrive_in_completion_order() {
        let mut delivered = Vec::new();
        let mut group = AsyncBatchGroup::new(3, |values: Vec<u64>, _: Option<String>| {
            delivered.push(values);
            Ok(())
        });

        for i in 0..3u64 {
            group
                .submit(async move {
                    tokio::time::sleep(Duration::from_millis(30 * (3 - i))).await;
                    Outcome::ok(i)
                })
                .await;
        }
        group.finish().await.unwrap();

        assert_eq!(delivered, vec![vec![2, 1, 0]]);
    }

    async fn explode() -> Outcome<u8, String> {
        panic!("async task exploded")
    }

    #[tokio::test]
    #[should_panic(expected = "async task exploded")]
    async fn task_panic_resumes_on_caller() {
        let mut group = AsyncBatchGroup::new(2, |_: Vec<u8>, _: Option<String>| Ok(()));
        group.submit(async { Outcome::ok(1) }).await;
        group.submit(explode()).await;
        let _ = group.finish().await;
    }

    #[test]
    fn drives_under_tokio_test_block_on() {
        let mut total = 0;
        tokio_test::block_on(async {
            let mut group = AsyncBatchGroup::new(4, |values: Vec<u32>, _: Option<String>| {
                total += values.iter().sum::<u32>();
                Ok(())
            });
            for i in 1..=8u32 {
                group.submit(async move { Outcome::ok(i) }).await;
            }
            group.finish().await.unwrap();
        });
        assert_eq!(total, 36);
    }
}
