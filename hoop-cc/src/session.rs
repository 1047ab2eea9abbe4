//! Client-side session id storage
//!
//! The progressive session id is the only persisted client state. It lives in
//! `client-state.toml` in the client root folder under
//! `progressive_session_id`.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use hoop_common::config::{load_toml_config, write_toml_config};
use hoop_common::Result;

/// State file name inside the client root folder
pub const STATE_FILE_NAME: &str = "client-state.toml";

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Persisted client state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progressive_session_id: Option<String>,
}

/// `session_<unix-millis>_<9 random base36 chars>`
pub fn generate_session_id<R: Rng + ?Sized>(unix_millis: i64, rng: &mut R) -> String {
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("session_{unix_millis}_{suffix}")
}

/// Owns the stored session id
#[derive(Debug)]
pub struct SessionManager {
    state_path: PathBuf,
    state: ClientState,
}

impl SessionManager {
    /// Load stored state from `state_path` (missing file → no session)
    pub fn open(state_path: impl Into<PathBuf>) -> Result<Self> {
        let state_path = state_path.into();
        let state: ClientState = if state_path.exists() {
            load_toml_config(&state_path)?
        } else {
            ClientState::default()
        };
        Ok(Self { state_path, state })
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// Stored session id, if any
    pub fn current(&self) -> Option<&str> {
        self.state.progressive_session_id.as_deref()
    }

    /// Reuse the stored id, or create and store one
    pub fn resume_or_create(&mut self) -> Result<String> {
        if let Some(id) = self.current() {
            tracing::info!(session_id = %id, "Resuming stored session");
            return Ok(id.to_string());
        }
        self.start_new()
    }

    /// Always create and store a fresh id
    pub fn start_new(&mut self) -> Result<String> {
        let id = generate_session_id(Utc::now().timestamp_millis(), &mut rand::thread_rng());
        self.state.progressive_session_id = Some(id.clone());
        self.save()?;
        tracing::info!(session_id = %id, "Started new session");
        Ok(id)
    }

    /// Forget the stored id
    pub fn clear(&mut self) -> Result<()> {
        if let Some(id) = self.state.progressive_session_id.take() {
            tracing::info!(session_id = %id, "Cleared stored session");
        }
        self.save()
    }

    fn save(&self) -> Result<()> {
        write_toml_config(&self.state, &self.state_path)
    }
}
