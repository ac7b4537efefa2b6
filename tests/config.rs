//! Configuration Module Tests
//!
//! Loading `BatchGroupConfig` from files and building groups from it.

use std::fs;

use batch_group::{BatchGroup, BatchGroupConfig, BatchGroupError, Outcome, DEFAULT_LIMIT};

#[test]
fn config_has_expected_defaults() {
    let config = BatchGroupConfig::default();
    assert_eq!(config.name, "batch-group");
    assert_eq!(config.limit, DEFAULT_LIMIT);
}

#[test]
fn config_loads_from_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("imports.toml");
    fs::write(&path, "name = \"imports\"\nlimit = 5\n").unwrap();

    let config = BatchGroupConfig::from_file(&path).expect("config should load");
    assert_eq!(config, BatchGroupConfig::new("imports", 5));
}

#[test]
fn config_partial_file_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.toml");
    fs::write(&path, "limit = 2\n").unwrap();

    let config = BatchGroupConfig::from_file(&path).unwrap();
    assert_eq!(config.name, "batch-group");
    assert_eq!(config.limit, 2);
}

#[test]
fn config_rejects_blank_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blank.toml");
    fs::write(&path, "name = \"\"\n").unwrap();

    let err = BatchGroupConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, BatchGroupError::MissingRequiredField { .. }));
    assert!(err.to_string().contains("'name'"));
}

#[test]
fn config_rejects_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "limit = [not toml\n").unwrap();

    let err = BatchGroupConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, BatchGroupError::ConfigLoadError(_)));
}

#[test]
fn loaded_config_drives_group() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("batch_group.toml"),
        "name = \"loaded\"\nlimit = 3\n",
    )
    .unwrap();
    let config = BatchGroupConfig::load_from_directory(dir.path(), "test").unwrap();

    let mut sizes = Vec::new();
    let mut group = BatchGroup::from_config(&config, |values: Vec<u32>, _: Option<String>| {
        sizes.push(values.len());
        Ok(())
    });
    for i in 0..7 {
        group.submit(move || Outcome::ok(i));
    }
    assert!(group.finish().is_ok());
    assert_eq!(sizes, vec![3, 3, 1]);
}
