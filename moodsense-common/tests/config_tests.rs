//! Unit tests for configuration and graceful degradation
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate MOODSENSE_ROOT_FOLDER are marked with #[serial]
//! to ensure they run sequentially, not in parallel.

use moodsense_common::config::{
    ensure_root_folder, load_or_default, load_toml_config, resolve_root_folder, TomlConfig,
    ROOT_FOLDER_ENV,
};
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};

#[test]
#[serial]
fn test_cli_argument_wins_over_everything() {
    env::set_var(ROOT_FOLDER_ENV, "/from/env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..Default::default()
    };

    let root = resolve_root_folder(Some(Path::new("/from/cli")), &config);
    assert_eq!(root, PathBuf::from("/from/cli"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_env_wins_over_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/from/env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..Default::default()
    };

    let root = resolve_root_folder(None, &config);
    assert_eq!(root, PathBuf::from("/from/env"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_toml_used_when_no_cli_or_env() {
    env::remove_var(ROOT_FOLDER_ENV);
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..Default::default()
    };

    let root = resolve_root_folder(None, &config);
    assert_eq!(root, PathBuf::from("/from/toml"));
}

#[test]
#[serial]
fn test_compiled_default_when_nothing_configured() {
    env::remove_var(ROOT_FOLDER_ENV);
    let root = resolve_root_folder(None, &TomlConfig::default());
    assert!(root.to_string_lossy().contains("moodsense"));
}

#[test]
fn test_missing_toml_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_or_default(Some(&dir.path().join("absent.toml")));
    assert_eq!(config.port, 5731);
    assert!(config.classifier.endpoint.is_none());
}

#[test]
fn test_malformed_toml_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("moodsense-ai.toml");
    std::fs::write(&path, "port = \"not a number\"").unwrap();

    assert!(load_toml_config(&path).is_err());

    let config = load_or_default(Some(&path));
    assert_eq!(config.port, 5731);
}

#[test]
fn test_full_toml_file_is_parsed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("moodsense-ai.toml");
    std::fs::write(
        &path,
        r#"
port = 7001
root_folder = "/var/lib/moodsense"

[logging]
level = "debug"

[classifier]
endpoint = "http://127.0.0.1:5005"
timeout_secs = 5
detector_backend = "retinaface"
"#,
    )
    .unwrap();

    let config = load_toml_config(&path).unwrap();
    assert_eq!(config.port, 7001);
    assert_eq!(config.root_folder, Some(PathBuf::from("/var/lib/moodsense")));
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.classifier.timeout_secs, 5);
    assert_eq!(config.classifier.detector_backend, "retinaface");
}

#[test]
fn test_ensure_root_folder_creates_directory() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("nested").join("moodsense");

    ensure_root_folder(&root).unwrap();
    assert!(root.is_dir());

    // Idempotent
    ensure_root_folder(&root).unwrap();
}
