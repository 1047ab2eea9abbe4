//! Error types for hoop-cc

use std::time::Duration;
use thiserror::Error;

/// Capture device errors
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Device missing or access denied
    #[error("Capture device unavailable: {0}")]
    Unavailable(String),

    /// Device was open but failed while capturing
    #[error("Capture failed: {0}")]
    Failed(String),
}

/// Failure of one clip submission
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Request never produced an HTTP response (connection refused, reset, DNS)
    #[error("Could not reach the analysis service: {0}")]
    Transport(String),

    /// No response within the per-attempt deadline
    #[error("Analysis service did not answer within {} s", .0.as_secs())]
    Timeout(Duration),

    /// Service answered with an error status
    #[error("Analysis service rejected the request ({status}): {message}")]
    Application { status: u16, message: String },

    /// Service answered 2xx with a body that fails validation
    #[error("Malformed response from analysis service: {0}")]
    Malformed(String),
}

impl SubmitError {
    /// Only transport failures are worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, SubmitError::Transport(_))
    }

    /// The server will never accept another clip for this session id:
    /// 409 (clip cap reached) or 410 (session deleted)
    pub fn ends_session(&self) -> bool {
        matches!(
            self,
            SubmitError::Application {
                status: 409 | 410,
                ..
            }
        )
    }
}

/// Assessment flow errors
#[derive(Debug, Error)]
pub enum FlowError {
    /// Camera missing or permission denied; not retried
    #[error("{0}. Check that a camera is connected and that this program may use it, then start again.")]
    CaptureUnavailable(String),

    #[error(transparent)]
    Submit(#[from] SubmitError),

    /// Session id storage failed or no session is active
    #[error("Session error: {0}")]
    Session(#[from] hoop_common::Error),
}

impl From<CaptureError> for FlowError {
    fn from(err: CaptureError) -> Self {
        match err {
            CaptureError::Unavailable(reason) => FlowError::CaptureUnavailable(reason),
            CaptureError::Failed(reason) => {
                FlowError::CaptureUnavailable(format!("camera stopped responding ({reason})"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_or_deleted_session_ends_session() {
        let app = |status| SubmitError::Application {
            status,
            message: String::new(),
        };
        assert!(app(409).ends_session());
        assert!(app(410).ends_session());
        assert!(!app(502).ends_session());
        assert!(!app(400).ends_session());
        assert!(!SubmitError::Transport("reset".into()).ends_session());
        assert!(!SubmitError::Timeout(Duration::from_secs(30)).ends_session());
    }

    #[test]
    fn test_only_transport_is_retryable() {
        assert!(SubmitError::Transport("refused".into()).is_retryable());
        assert!(!SubmitError::Timeout(Duration::from_secs(30)).is_retryable());
        assert!(!SubmitError::Application {
            status: 409,
            message: "full".into()
        }
        .is_retryable());
        assert!(!SubmitError::Malformed("bad".into()).is_retryable());
    }

    #[test]
    fn test_capture_errors_map_to_unavailable() {
        let err: FlowError = CaptureError::Unavailable("permission denied".into()).into();
        assert!(matches!(err, FlowError::CaptureUnavailable(_)));
        assert!(err.to_string().contains("permission denied"));
    }
}
