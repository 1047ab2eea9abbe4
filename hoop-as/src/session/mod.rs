//! Progressive sessions

pub mod record;
pub mod service;
pub mod store;

pub use record::SessionRecord;
pub use service::{ClipSubmission, ProgressiveAnalysisService, ProgressiveError};
pub use store::{SessionHandle, SessionLookup, SessionStore};

/// Longest accepted session id
pub const MAX_SESSION_ID_LEN: usize = 128;

/// Session ids are opaque to the service but must be non-empty, bounded, and
/// limited to `[A-Za-z0-9_-]`.
pub fn validate_session_id(session_id: &str) -> Result<(), String> {
    if session_id.is_empty() {
        return Err("sessionId must not be empty".to_string());
    }
    if session_id.len() > MAX_SESSION_ID_LEN {
        return Err(format!(
            "sessionId longer than {MAX_SESSION_ID_LEN} characters"
        ));
    }
    if !session_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err("sessionId may only contain letters, digits, '_' and '-'".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_client_generated_ids() {
        assert!(validate_session_id("session_1712345678901_k3j9x0a2b").is_ok());
        assert!(validate_session_id("abc-123").is_ok());
    }

    #[test]
    fn test_rejects_bad_ids() {
        assert!(validate_session_id("").is_err());
        assert!(validate_session_id("has space").is_err());
        assert!(validate_session_id("../etc").is_err());
        assert!(validate_session_id(&"a".repeat(MAX_SESSION_ID_LEN + 1)).is_err());
        assert!(validate_session_id(&"a".repeat(MAX_SESSION_ID_LEN)).is_ok());
    }
}
