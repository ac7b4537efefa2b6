//! # Batch Group Configuration
//!
//! Declarative settings for a batch group: the name used in structured logs and the
//! batch size limit. Values are layered from optional TOML files and `BATCH_GROUP_*`
//! environment variables by [`loader`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::io;
//!
//! use batch_group::{BatchGroup, BatchGroupConfig, Outcome};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BatchGroupConfig::load()?;
//!
//! let mut group = BatchGroup::from_config(&config, |values: Vec<u64>, err: Option<io::Error>| {
//!     match err {
//!         Some(err) => Err(err),
//!         None => {
//!             println!("{values:?}");
//!             Ok(())
//!         }
//!     }
//! });
//! group.submit(|| Outcome::ok(42));
//! group.finish()?;
//! # Ok(())
//! # }
//! ```

pub mod loader;

use serde::{Deserialize, Serialize};

use crate::error::{BatchGroupError, Result};

/// Batch size used when no configuration overrides it
pub const DEFAULT_LIMIT: usize = 10;

/// Upper bound accepted by [`BatchGroupConfig::validate`]
pub const MAX_LIMIT: usize = 65_536;

/// Group name used when no configuration overrides it
pub const DEFAULT_NAME: &str = "batch-group";

/// Settings for a single batch group
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BatchGroupConfig {
    /// Name attached to every log event emitted by the group
    pub name: String,

    /// Number of tasks per batch. A limit of 0 is clamped to 1 by the group.
    pub limit: usize,
}

impl BatchGroupConfig {
    /// Create a configuration with an explicit name and limit
    pub fn new(name: impl Into<String>, limit: usize) -> Self {
        Self {
            name: name.into(),
            limit,
        }
    }

    /// Limit actually used by a group built from this configuration
    pub fn effective_limit(&self) -> usize {
        self.limit.max(1)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(BatchGroupError::missing_required_field(
                "name",
                "batch group configuration",
            ));
        }

        if self.limit > MAX_LIMIT {
            return Err(BatchGroupError::invalid_value(
                "limit",
                self.limit,
                format!("limit must not exceed {MAX_LIMIT}"),
            ));
        }

        Ok(())
    }
}

impl Default for BatchGroupConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            limit: DEFAULT_LIMIT,
        }
    }
}
