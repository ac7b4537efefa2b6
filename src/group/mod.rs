//! # Batch Groups
//!
//! A batch group runs submitted tasks concurrently, at most `limit` at a time, and
//! hands their results to a callback one batch at a time.
//!
//! ## Lifecycle
//!
//! 1. Every `submit` starts its task immediately, unless a full batch is already in
//!    flight. In that case `submit` first waits for the batch, drains its results and
//!    invokes the callback with them and the batch's first task error.
//! 2. `finish` waits for the last, possibly partial, batch and delivers it the same way.
//!
//! Results inside a batch arrive in completion order. Batches arrive in submission
//! order.
//!
//! ## Errors
//!
//! A failed task still contributes its value. Only the first error of each batch is
//! passed to the callback; later ones in the same batch are counted and dropped. The
//! callback decides what a task error means:
//!
//! - `Ok(())` swallows it and the next batch starts with a clean error slot
//! - `Err(e)` halts the group: later submissions are suppressed and `finish` returns `e`
//!
//! ## Flavours
//!
//! - [`BatchGroup`] runs tasks on OS threads and blocks at batch boundaries
//! - [`AsyncBatchGroup`] runs tasks on the tokio runtime and awaits at batch boundaries
//!
//! ```rust
//! use batch_group::{BatchGroup, Outcome};
//!
//! let mut batches = Vec::new();
//! let mut group = BatchGroup::new(3, |mut values: Vec<u32>, err: Option<String>| {
//!     if let Some(err) = err {
//!         return Err(err);
//!     }
//!     values.sort_unstable();
//!     batches.push(values);
//!     Ok(())
//! });
//!
//! for i in 0..10 {
//!     group.submit(move || Outcome::ok(i));
//! }
//! group.finish().unwrap();
//!
//! assert_eq!(batches, vec![vec![0, 1, 2], vec![3, 4, 5], vec![6, 7, 8], vec![9]]);
//! ```

mod async_group;
mod coordinator;
mod results;
pub mod stats;
mod threaded;

pub use async_group::AsyncBatchGroup;
pub use stats::BatchGroupStats;
pub use threaded::BatchGroup;

/// What a task reports back: its value and, if it failed, an error.
///
/// The value is delivered to the callback whether or not the task failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T, E> {
    value: T,
    error: Option<E>,
}

impl<T, E> Outcome<T, E> {
    pub fn new(value: T, error: Option<E>) -> Self {
        Self { value, error }
    }

    /// Successful task
    pub fn ok(value: T) -> Self {
        Self { value, error: None }
    }

    /// Failed task that still produced a value for its batch
    pub fn failed(value: T, error: E) -> Self {
        Self {
            value,
            error: Some(error),
        }
    }

    /// Adapt a `Result`, substituting `T::default()` for the value of a failed task
    pub fn from_result(result: Result<T, E>) -> Self
    where
        T: Default,
    {
        match result {
            Ok(value) => Self::ok(value),
            Err(error) => Self::failed(T::default(), error),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn error(&self) -> Option<&E> {
        self.error.as_ref()
    }

    pub fn into_parts(self) -> (T, Option<E>) {
        (self.value, self.error)
    }
}

impl<T, E> From<(T, Option<E>)> for Outcome<T, E> {
    fn from((value, error): (T, Option<E>)) -> Self {
        Self::new(value, error)
    }
}

/// Result of a `submit` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The task was dispatched
    Started,
    /// The group is halted by a callback error; the task was dropped without running
    Halted,
}

impl Submission {
    pub fn is_started(self) -> bool {
        self == Submission::Started
    }
}
