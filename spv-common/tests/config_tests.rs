//! Unit tests for configuration resolution and graceful degradation
//!
//! Covers:
//! - Priority order CLI → ENV → TOML → compiled default
//! - Missing TOML files SHALL NOT cause termination
//! - Unparseable TOML files are reported as configuration errors
//! - Automatic output directory creation
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate SPV_* variables are marked with #[serial].

use serial_test::serial;
use spv_common::config::{
    load_toml_config, resolve_path, CompiledDefaults, ConfigSource, OutputFolderInitializer,
    ENV_CONFIG_FILE, ENV_OUTPUT_DIR,
};
use spv_common::Error;
use std::env;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[test]
#[serial]
fn test_resolve_path_cli_has_highest_priority() {
    env::set_var(ENV_OUTPUT_DIR, "/tmp/spv-env-out");

    let resolved = resolve_path(
        Some(Path::new("/tmp/spv-cli-out")),
        ENV_OUTPUT_DIR,
        Some(Path::new("/tmp/spv-toml-out")),
        Path::new("data"),
    );
    assert_eq!(resolved, PathBuf::from("/tmp/spv-cli-out"));

    env::remove_var(ENV_OUTPUT_DIR);
}

#[test]
#[serial]
fn test_resolve_path_env_beats_toml() {
    env::set_var(ENV_OUTPUT_DIR, "/tmp/spv-env-out");

    let resolved = resolve_path(
        None,
        ENV_OUTPUT_DIR,
        Some(Path::new("/tmp/spv-toml-out")),
        Path::new("data"),
    );
    assert_eq!(resolved, PathBuf::from("/tmp/spv-env-out"));

    env::remove_var(ENV_OUTPUT_DIR);
}

#[test]
#[serial]
fn test_resolve_path_toml_beats_default() {
    env::remove_var(ENV_OUTPUT_DIR);

    let resolved = resolve_path(
        None,
        ENV_OUTPUT_DIR,
        Some(Path::new("/tmp/spv-toml-out")),
        Path::new("data"),
    );
    assert_eq!(resolved, PathBuf::from("/tmp/spv-toml-out"));
}

#[test]
#[serial]
fn test_resolve_path_falls_back_to_default() {
    env::remove_var(ENV_OUTPUT_DIR);

    let defaults = CompiledDefaults::new();
    let resolved = resolve_path(None, ENV_OUTPUT_DIR, None, &defaults.output_dir);
    assert_eq!(resolved, defaults.output_dir);
}

#[test]
#[serial]
fn test_missing_config_file_does_not_error() {
    env::remove_var(ENV_CONFIG_FILE);
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.toml");

    let loaded = load_toml_config(Some(&missing), "spv-convert").unwrap();
    assert!(loaded.config.output_dir.is_none());
    assert_eq!(loaded.config.logging.level, "info");
    // Reported once logging is up instead of being lost
    assert_eq!(loaded.source, ConfigSource::MissingRequested(missing));
}

#[test]
#[serial]
fn test_missing_config_from_env_var_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("typo.toml");
    env::set_var(ENV_CONFIG_FILE, &missing);

    let loaded = load_toml_config(None, "spv-convert").unwrap();
    assert_eq!(loaded.source, ConfigSource::MissingRequested(missing));

    env::remove_var(ENV_CONFIG_FILE);
}

#[test]
#[serial]
fn test_config_file_from_env_var() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("spv.toml");
    std::fs::write(&path, "input_dir = \"/srv/csv\"\n").unwrap();
    env::set_var(ENV_CONFIG_FILE, &path);

    let loaded = load_toml_config(None, "spv-convert").unwrap();
    assert_eq!(loaded.config.input_dir, Some(PathBuf::from("/srv/csv")));
    assert_eq!(loaded.source, ConfigSource::File(path.clone()));

    env::remove_var(ENV_CONFIG_FILE);
}

#[test]
fn test_invalid_config_file_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    std::fs::write(&path, "output_dir = [unterminated").unwrap();

    let result = load_toml_config(Some(&path), "spv-convert");
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_initializer_creates_nested_directory() {
    let temp_dir = TempDir::new().unwrap();
    let folder = temp_dir.path().join("viewer").join("data");

    let initializer = OutputFolderInitializer::new(folder.clone());
    initializer.ensure_directory_exists().unwrap();
    assert!(folder.is_dir());

    // Second call must be a no-op
    initializer.ensure_directory_exists().unwrap();
    assert_eq!(initializer.file_path("annotated.json"), folder.join("annotated.json"));
}

#[test]
fn test_initializer_rejects_file_in_place_of_directory() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("data");
    std::fs::write(&file, b"not a directory").unwrap();

    let initializer = OutputFolderInitializer::new(file);
    assert!(matches!(
        initializer.ensure_directory_exists(),
        Err(Error::Config(_))
    ));
}
