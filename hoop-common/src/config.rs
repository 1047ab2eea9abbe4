//! Configuration loading and root folder resolution
//!
//! Each binary owns a typed config struct; this module provides the shared
//! plumbing: where the root folder lives, where the per-module TOML file lives,
//! and how a missing or partial TOML file degrades to defaults.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "HOOP_ROOT_FOLDER";

/// Directory name used under the platform config/data directories
const APP_DIR_NAME: &str = "hoop-coach";

/// Root folder resolution, priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable `HOOP_ROOT_FOLDER`
/// 3. `root_folder` key in the module TOML config file
/// 4. OS-dependent compiled default (fallback)
#[derive(Debug, Clone)]
pub struct RootFolderResolver {
    module_name: String,
    cli_arg: Option<PathBuf>,
}

impl RootFolderResolver {
    /// Create resolver for a module (name selects `<module>.toml`)
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            cli_arg: None,
        }
    }

    /// Supply the command-line override, if any
    pub fn with_cli_arg(mut self, cli_arg: Option<PathBuf>) -> Self {
        self.cli_arg = cli_arg;
        self
    }

    /// Resolve the root folder. Never fails: falls back to the compiled default.
    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(config_path) = module_config_path(&self.module_name) {
            if let Ok(content) = std::fs::read_to_string(&config_path) {
                match toml::from_str::<toml::Value>(&content) {
                    Ok(value) => {
                        if let Some(root) = value.get("root_folder").and_then(|v| v.as_str()) {
                            return PathBuf::from(root);
                        }
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %config_path.display(),
                            error = %e,
                            "Ignoring unparseable config file during root folder resolution"
                        );
                    }
                }
            }
        }

        default_root_folder()
    }
}

/// Ensures the resolved root folder exists
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    /// Create the root folder (and parents) if missing
    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            tracing::info!(path = %self.root_folder.display(), "Creating root folder");
            std::fs::create_dir_all(&self.root_folder)?;
        }
        Ok(())
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    /// Path of a file inside the root folder
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.root_folder.join(name)
    }
}

/// Per-module TOML config path: `<config_dir>/hoop-coach/<module>.toml`
pub fn module_config_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join(format!("{module_name}.toml")))
}

/// OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("./hoop_data"))
}

/// Load a TOML config file.
///
/// A missing file is not an error: a warning is logged and `T::default()` is
/// returned. A file that exists but does not parse is a configuration error.
/// Keys absent from the file take their `#[serde(default)]` values.
pub fn load_toml_config<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(T::default());
        }
        Err(e) => return Err(Error::Io(e)),
    };

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
}

/// Write a TOML config file, creating the parent directory if needed
pub fn write_toml_config<T: Serialize>(config: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("serialize {}: {}", path.display(), e)))?;
    std::fs::write(path, content)?;
    Ok(())
}
