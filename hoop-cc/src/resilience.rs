//! Bounded retry around clip submission
//!
//! **Policy:**
//! 1. Each attempt is bounded by `attempt_timeout`; running out of time is
//!    terminal (the server may still be analyzing, so a retry could double
//!    the work)
//! 2. Transport failures retry after `retry_delay`, up to `max_attempts`
//! 3. Application and malformed-response errors are terminal
//!
//! Every attempt sends the same `clipId`, so a retry after a lost response
//! is answered from the server's committed state instead of being counted
//! again.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use hoop_common::api::AnalysisOutcome;

use crate::client::{AnalysisApi, ClipUpload};
use crate::error::SubmitError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    pub attempt_timeout_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay_ms: 2_000,
            attempt_timeout_ms: 30_000,
        }
    }
}

impl RetryPolicy {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }
}

/// Submit one clip under `policy`
pub async fn submit_with_retry(
    api: &dyn AnalysisApi,
    upload: &ClipUpload,
    policy: &RetryPolicy,
) -> Result<AnalysisOutcome, SubmitError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;

        if attempt > 1 {
            tracing::debug!(
                session_id = %upload.session_id,
                clip_id = %upload.clip_id,
                attempt,
                "Retrying clip submission"
            );
        }

        let result = match tokio::time::timeout(policy.attempt_timeout(), api.submit_clip(upload)).await {
            Ok(result) => result,
            Err(_) => Err(SubmitError::Timeout(policy.attempt_timeout())),
        };

        match result {
            Ok(outcome) => {
                if attempt > 1 {
                    tracing::info!(
                        session_id = %upload.session_id,
                        clip_number = outcome.clip_number(),
                        attempt,
                        "Clip submission succeeded after retry"
                    );
                }
                return Ok(outcome);
            }
            Err(err) if err.is_retryable() && attempt < max_attempts => {
                tracing::warn!(
                    session_id = %upload.session_id,
                    attempt,
                    max_attempts,
                    error = %err,
                    "Clip submission failed, will retry"
                );
                tokio::time::sleep(policy.retry_delay()).await;
            }
            Err(err) => {
                tracing::error!(
                    session_id = %upload.session_id,
                    attempt,
                    error = %err,
                    "Clip submission failed"
                );
                return Err(err);
            }
        }
    }
}
