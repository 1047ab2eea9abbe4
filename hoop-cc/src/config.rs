//! hoop-cc configuration
//!
//! Loaded from `hoop-cc.toml`; every key is optional.
//!
//! ```toml
//! server_url = "http://127.0.0.1:5731"
//! reset_delay_ms = 5000
//!
//! [recorder]
//! motion_threshold = 30000
//! cooldown_ms = 12000
//!
//! [retry]
//! max_attempts = 3
//! ```

use hoop_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::recorder::RecorderConfig;
use crate::resilience::RetryPolicy;

/// Default Analysis Service address
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5731";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root folder override (lower priority than CLI/env)
    pub root_folder: Option<PathBuf>,
    pub server_url: String,
    pub connect_timeout_ms: u64,
    /// Pause between a terminal failure and the flow resetting
    pub reset_delay_ms: u64,
    pub recorder: RecorderConfig,
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            server_url: DEFAULT_SERVER_URL.to_string(),
            connect_timeout_ms: 5_000,
            reset_delay_ms: 5_000,
            recorder: RecorderConfig::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Load from TOML (missing file → defaults) and validate
    pub fn load(path: &Path) -> Result<Self> {
        let config: ClientConfig = hoop_common::config::load_toml_config(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "server_url must be an http(s) URL, got '{}'",
                self.server_url
            )));
        }
        if self.recorder.sample_interval_ms == 0 {
            return Err(Error::Config(
                "recorder.sample_interval_ms must be positive".to_string(),
            ));
        }
        if self.recorder.recording_duration_ms == 0 {
            return Err(Error::Config(
                "recorder.recording_duration_ms must be positive".to_string(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::Config(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.retry.attempt_timeout_ms == 0 {
            return Err(Error::Config(
                "retry.attempt_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }
}
