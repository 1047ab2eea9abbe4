//! hoop-as configuration
//!
//! Loaded from `hoop-as.toml` (see [`hoop_common::config::module_config_path`]);
//! every key is optional. `GOOGLE_API_KEY` in the environment overrides the
//! file's `gemini.api_key`.

use hoop_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable carrying the vision model API key
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5731;

/// Analysis Service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub bind_address: String,
    pub port: u16,
    /// Origins allowed to call the API from a browser
    pub cors_origins: Vec<String>,
    pub session: SessionPolicy,
    /// Largest accepted clip upload
    pub max_clip_bytes: usize,
    /// Server-side budget for one submission: clip analysis plus, on the
    /// saturating clip, the consolidation summary. Keep it below the capture
    /// client's per-attempt timeout (30 s by default), otherwise the client
    /// gives up on clips the server still commits.
    pub analysis_timeout_secs: u64,
    pub event_bus_capacity: usize,
    pub gemini: GeminiConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            cors_origins: vec!["http://localhost:3000".to_string()],
            session: SessionPolicy::default(),
            max_clip_bytes: 50 * 1024 * 1024,
            analysis_timeout_secs: 25,
            event_bus_capacity: 100,
            gemini: GeminiConfig::default(),
        }
    }
}

/// Accumulation limits for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionPolicy {
    /// Clip count at which a session saturates and is consolidated
    pub saturation_threshold: u32,
    /// Hard cap on clips per session; further submissions are refused
    pub max_clips_per_session: u32,
    /// Cap on tips in the consolidated result
    pub max_consolidated_tips: usize,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            saturation_threshold: 5,
            max_clips_per_session: 6,
            max_consolidated_tips: 5,
        }
    }
}

/// Gemini `generateContent` settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load from TOML (missing file → defaults), apply env overrides, validate
    pub fn load(path: &Path) -> Result<Self> {
        let mut config: ServiceConfig = hoop_common::config::load_toml_config(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.gemini.api_key = Some(key);
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.session.saturation_threshold == 0 {
            return Err(Error::Config(
                "session.saturation_threshold must be at least 1".to_string(),
            ));
        }
        if self.session.max_clips_per_session < self.session.saturation_threshold {
            return Err(Error::Config(format!(
                "session.max_clips_per_session ({}) must be >= saturation_threshold ({})",
                self.session.max_clips_per_session, self.session.saturation_threshold
            )));
        }
        if self.session.max_consolidated_tips == 0 {
            return Err(Error::Config(
                "session.max_consolidated_tips must be at least 1".to_string(),
            ));
        }
        if self.max_clip_bytes == 0 {
            return Err(Error::Config("max_clip_bytes must be positive".to_string()));
        }
        if self.analysis_timeout_secs == 0 {
            return Err(Error::Config(
                "analysis_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis_timeout_secs)
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
