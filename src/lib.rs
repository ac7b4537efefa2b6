#![allow(clippy::doc_markdown)] // Allow technical terms in docs without backticks
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Batch Group
//!
//! A batched concurrent task runner.
//!
//! ## Overview
//!
//! A batch group launches up to `limit` tasks concurrently, collects their results
//! as they complete, and hands each full batch to a user callback before the next
//! batch may start. The final partial batch is delivered when the group finishes.
//! The surface is two calls: `submit` work and `finish`.
//!
//! ## Error model
//!
//! - **Task errors** are data. The first one of each batch reaches the callback next
//!   to the batch's results; the rest of that batch's errors are dropped.
//! - **Callback errors** are terminal. Returning `Err` from the callback halts the
//!   group: later submissions never start and `finish` returns that exact error.
//!
//! ## Module Organization
//!
//! - [`group`] - [`BatchGroup`] (OS threads) and [`AsyncBatchGroup`] (tokio tasks)
//! - [`config`] - Layered configuration for named groups
//! - [`error`] - Errors raised by the crate itself
//! - [`logging`] - Console tracing subscriber for binaries and tests
//!
//! ## Quick Start
//!
//! ```rust
//! use batch_group::{BatchGroup, Outcome, Submission};
//!
//! let mut group = BatchGroup::new(2, |values: Vec<usize>, err: Option<String>| {
//!     match err {
//!         // Escalate: halt the group on the first failing batch
//!         Some(err) => Err(err),
//!         None => {
//!             assert!(!values.is_empty() && values.len() <= 2);
//!             Ok(())
//!         }
//!     }
//! });
//!
//! let mut started = 0;
//! for i in 0..6 {
//!     let submission = group.submit(move || {
//!         if i == 3 {
//!             Outcome::failed(i, format!("task {i} failed"))
//!         } else {
//!             Outcome::ok(i)
//!         }
//!     });
//!     if submission == Submission::Started {
//!         started += 1;
//!     }
//! }
//!
//! assert_eq!(started, 4);
//! assert_eq!(group.finish(), Err("task 3 failed".to_string()));
//! ```

pub mod config;
pub mod error;
pub mod group;
pub mod logging;

pub use config::{BatchGroupConfig, DEFAULT_LIMIT, MAX_LIMIT};
pub use error::{BatchGroupError, Result};
pub use group::{AsyncBatchGroup, BatchGroup, BatchGroupStats, Outcome, Submission};
