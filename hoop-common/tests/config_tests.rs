//! Tests for configuration loading and root folder resolution
//!
//! Tests that manipulate HOOP_ROOT_FOLDER are marked #[serial] so they do not
//! race each other.

use hoop_common::config::{
    default_root_folder, load_toml_config, write_toml_config, RootFolderInitializer,
    RootFolderResolver, ROOT_FOLDER_ENV,
};
use serde::{Deserialize, Serialize};
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct SampleConfig {
    port: u16,
    threshold: u32,
    label: Option<String>,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            port: 5731,
            threshold: 5,
            label: None,
        }
    }
}

#[test]
#[serial]
fn test_cli_arg_takes_priority_over_env() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/hoop-env-folder");

    let resolver = RootFolderResolver::new("test-module")
        .with_cli_arg(Some(PathBuf::from("/tmp/hoop-cli-folder")));
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/hoop-cli-folder"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_env_var_used_without_cli_arg() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/hoop-env-folder");

    let resolver = RootFolderResolver::new("test-module");
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/hoop-env-folder"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_blank_env_var_is_ignored() {
    env::set_var(ROOT_FOLDER_ENV, "   ");

    let resolver = RootFolderResolver::new("hoop-test-module-without-config");
    assert_eq!(resolver.resolve(), default_root_folder());

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
fn test_missing_config_file_yields_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.toml");

    let config: SampleConfig = load_toml_config(&path).unwrap();
    assert_eq!(config, SampleConfig::default());
}

#[test]
fn test_partial_config_file_fills_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("partial.toml");
    std::fs::write(&path, "threshold = 8\n").unwrap();

    let config: SampleConfig = load_toml_config(&path).unwrap();
    assert_eq!(config.threshold, 8);
    assert_eq!(config.port, 5731);
}

#[test]
fn test_malformed_config_file_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    std::fs::write(&path, "threshold = [not toml").unwrap();

    let result: hoop_common::Result<SampleConfig> = load_toml_config(&path);
    assert!(matches!(result, Err(hoop_common::Error::Config(_))));
}

#[test]
fn test_write_then_load_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("sample.toml");

    let config = SampleConfig {
        port: 9000,
        threshold: 3,
        label: Some("gym".to_string()),
    };
    write_toml_config(&config, &path).unwrap();

    let loaded: SampleConfig = load_toml_config(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_initializer_creates_root_folder() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("a").join("b");

    let initializer = RootFolderInitializer::new(root.clone());
    initializer.ensure_directory_exists().unwrap();

    assert!(root.is_dir());
    assert_eq!(initializer.file_path("state.toml"), root.join("state.toml"));
}
