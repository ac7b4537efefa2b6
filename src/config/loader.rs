//! Configuration Loader
//!
//! Environment-aware loading of [`BatchGroupConfig`]. Sources are layered in order,
//! later sources overriding earlier ones:
//!
//! 1. `{config_dir}/batch_group.toml` (optional)
//! 2. `{config_dir}/batch_group.{environment}.toml` (optional)
//! 3. Environment variables with the `BATCH_GROUP_` prefix, e.g. `BATCH_GROUP_LIMIT=25`

use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::BatchGroupConfig;
use crate::error::Result;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "BATCH_GROUP";

/// Base file name looked up in the configuration directory
const CONFIG_FILE_STEM: &str = "batch_group";

impl BatchGroupConfig {
    /// Load configuration from `./config` with environment auto-detection
    pub fn load() -> Result<Self> {
        Self::load_from_directory(&default_config_directory(), &detect_environment())
    }

    /// Load configuration from a specific directory with an explicit environment.
    /// Useful in tests that must not depend on the process environment name.
    pub fn load_from_directory(config_dir: &Path, environment: &str) -> Result<Self> {
        debug!(
            environment = %environment,
            config_dir = %config_dir.display(),
            "Loading batch group configuration"
        );

        let base = config_dir.join(format!("{CONFIG_FILE_STEM}.toml"));
        let overlay = config_dir.join(format!("{CONFIG_FILE_STEM}.{environment}.toml"));

        let config: BatchGroupConfig = config::Config::builder()
            .add_source(config::File::from(base).required(false))
            .add_source(config::File::from(overlay).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;

        debug!(
            name = %config.name,
            limit = config.limit,
            "Batch group configuration loaded"
        );

        Ok(config)
    }

    /// Load configuration from a single file, format inferred from its extension
    pub fn from_file(path: &Path) -> Result<Self> {
        let config: BatchGroupConfig = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }
}

/// Get current environment from environment variables
pub fn detect_environment() -> String {
    env::var("BATCH_GROUP_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

fn default_config_directory() -> PathBuf {
    PathBuf::from("config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BatchGroupError;
    use std::fs;

    #[test]
    fn missing_directory_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            BatchGroupConfig::load_from_directory(&dir.path().join("absent"), "test").unwrap();
        assert_eq!(config, BatchGroupConfig::default());
    }

    #[test]
    fn environment_overlay_overrides_base_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("batch_group.toml"),
            "name = \"imports\"\nlimit = 8\n",
        )
        .unwrap();
        fs::write(dir.path().join("batch_group.test.toml"), "limit = 3\n").unwrap();

        let config = BatchGroupConfig::load_from_directory(dir.path(), "test").unwrap();
        assert_eq!(config.name, "imports");
        assert_eq!(config.limit, 3);

        let config = BatchGroupConfig::load_from_directory(dir.path(), "production").unwrap();
        assert_eq!(config.limit, 8);
    }

    #[test]
    fn from_file_validates_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oversized.toml");
        fs::write(&path, "name = \"imports\"\nlimit = 100000\n").unwrap();

        let err = BatchGroupConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, BatchGroupError::InvalidValue { .. }));
    }

    #[test]
    fn from_file_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = BatchGroupConfig::from_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, BatchGroupError::ConfigLoadError(_)));
    }
}
