//! Assessment flow
//!
//! Owns the user-facing status and serializes clip submissions for the
//! active session. A submission is split into [`AssessmentFlow::prepare`]
//! and [`AssessmentFlow::complete`] so the capture loop can keep sampling
//! while the request is in flight.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use hoop_common::api::{AnalysisOutcome, ConsolidatedFeedback, Theme};

use crate::client::{AnalysisApi, ClipUpload};
use crate::error::{FlowError, SubmitError};
use crate::resilience::{submit_with_retry, RetryPolicy};
use crate::session::SessionManager;

/// What the user is told
#[derive(Debug, Clone, PartialEq)]
pub enum FlowStatus {
    /// No assessment running
    Idle,
    /// Watching for motion
    Listening { session_id: String, clips_analyzed: u32 },
    Recording { session_id: String },
    Analyzing { session_id: String },
    /// Final assessment available
    Complete {
        session_id: String,
        consolidated: ConsolidatedFeedback,
    },
    /// Terminal failure; the flow resets after the reset delay
    Failed { message: String },
}

impl FlowStatus {
    /// One-line status message
    pub fn message(&self) -> String {
        match self {
            FlowStatus::Idle => "Ready. Start an assessment to begin.".to_string(),
            FlowStatus::Listening { clips_analyzed: 0, .. } => {
                "Waiting for motion. Start dribbling!".to_string()
            }
            FlowStatus::Listening { clips_analyzed, .. } => {
                format!("{clips_analyzed} clip(s) analyzed. Keep dribbling for the next clip.")
            }
            FlowStatus::Recording { .. } => "Recording...".to_string(),
            FlowStatus::Analyzing { .. } => "Analyzing clip...".to_string(),
            FlowStatus::Complete { consolidated, .. } => format!(
                "Assessment complete: {} ({}). Suggested drill: {}",
                consolidated.technique, consolidated.skill_level, consolidated.drill_suggestion
            ),
            FlowStatus::Failed { message } => format!("Error: {message}"),
        }
    }
}

/// A submission detached from the flow, ready to run on its own
pub struct PendingSubmission {
    api: Arc<dyn AnalysisApi>,
    upload: ClipUpload,
    policy: RetryPolicy,
}

impl PendingSubmission {
    pub fn upload(&self) -> &ClipUpload {
        &self.upload
    }

    /// Run the submission with retries
    pub fn run(self) -> impl Future<Output = Result<AnalysisOutcome, SubmitError>> + Send + 'static {
        async move { submit_with_retry(self.api.as_ref(), &self.upload, &self.policy).await }
    }
}

pub struct AssessmentFlow {
    api: Arc<dyn AnalysisApi>,
    sessions: SessionManager,
    policy: RetryPolicy,
    reset_delay: Duration,
    status: FlowStatus,
    last_outcome: Option<AnalysisOutcome>,
}

impl AssessmentFlow {
    pub fn new(
        api: Arc<dyn AnalysisApi>,
        sessions: SessionManager,
        policy: RetryPolicy,
        reset_delay: Duration,
    ) -> Self {
        Self {
            api,
            sessions,
            policy,
            reset_delay,
            status: FlowStatus::Idle,
            last_outcome: None,
        }
    }

    pub fn status(&self) -> &FlowStatus {
        &self.status
    }

    pub fn reset_delay(&self) -> Duration {
        self.reset_delay
    }

    pub fn session_id(&self) -> Option<&str> {
        self.sessions.current()
    }

    pub fn last_outcome(&self) -> Option<&AnalysisOutcome> {
        self.last_outcome.as_ref()
    }

    /// Enter the flow, resuming the stored session if there is one
    pub fn enter(&mut self) -> Result<String, FlowError> {
        let session_id = self.sessions.resume_or_create()?;
        self.listen(session_id.clone());
        Ok(session_id)
    }

    /// Start a new assessment with a fresh session id
    pub fn start_new(&mut self) -> Result<String, FlowError> {
        let session_id = self.sessions.start_new()?;
        self.last_outcome = None;
        self.listen(session_id.clone());
        Ok(session_id)
    }

    pub fn recording_started(&mut self) {
        if let Some(session_id) = self.sessions.current() {
            self.set_status(FlowStatus::Recording {
                session_id: session_id.to_string(),
            });
        }
    }

    /// Tag a finished clip for the active session and mark the flow busy
    pub fn prepare(&mut self, bytes: Vec<u8>) -> Result<PendingSubmission, FlowError> {
        let session_id = self.active_session()?;
        let upload = ClipUpload {
            session_id: session_id.clone(),
            clip_id: uuid::Uuid::new_v4().to_string(),
            bytes,
            file_name: "clip.webm".to_string(),
        };

        tracing::info!(
            session_id = %session_id,
            clip_id = %upload.clip_id,
            bytes = upload.bytes.len(),
            "Submitting clip"
        );
        self.set_status(FlowStatus::Analyzing { session_id });

        Ok(PendingSubmission {
            api: Arc::clone(&self.api),
            upload,
            policy: self.policy,
        })
    }

    /// Apply the result of a submission started with [`Self::prepare`]
    pub fn complete(
        &mut self,
        result: Result<AnalysisOutcome, SubmitError>,
    ) -> Result<AnalysisOutcome, FlowError> {
        let session_id = self.active_session()?;

        match result {
            Ok(outcome) => {
                tracing::info!(
                    session_id = %session_id,
                    clip_number = outcome.clip_number(),
                    saturated = outcome.is_saturated(),
                    key_themes = ?outcome.key_themes(),
                    "Clip analyzed"
                );
                let status = match outcome.consolidated() {
                    Some(consolidated) => FlowStatus::Complete {
                        session_id,
                        consolidated: consolidated.clone(),
                    },
                    None => FlowStatus::Listening {
                        session_id,
                        clips_analyzed: outcome.clip_number(),
                    },
                };
                self.set_status(status);
                self.last_outcome = Some(outcome.clone());
                Ok(outcome)
            }
            Err(err) => {
                if err.ends_session() {
                    // Resuming this id can only fail again
                    tracing::warn!(session_id = %session_id, error = %err, "Session closed by server, forgetting it");
                    self.sessions.clear()?;
                    self.last_outcome = None;
                }
                let err = FlowError::from(err);
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Prepare, run and complete one submission
    pub async fn submit_clip(&mut self, bytes: Vec<u8>) -> Result<AnalysisOutcome, FlowError> {
        let pending = self.prepare(bytes)?;
        let result = pending.run().await;
        self.complete(result)
    }

    /// Discard the session on the server, then forget it locally
    pub async fn delete_session(&mut self) -> Result<bool, FlowError> {
        let Some(session_id) = self.sessions.current().map(str::to_owned) else {
            return Ok(false);
        };

        let response = self.api.delete_session(&session_id).await?;
        self.sessions.clear()?;
        self.last_outcome = None;
        self.set_status(FlowStatus::Idle);
        Ok(response.deleted)
    }

    /// Move to the terminal error status
    pub fn fail(&mut self, err: &FlowError) {
        tracing::error!(error = %err, "Assessment flow failed");
        self.set_status(FlowStatus::Failed {
            message: err.to_string(),
        });
    }

    /// Back to the initial state. The stored session id is kept, so the next
    /// [`Self::enter`] continues where the server left off, unless the server
    /// closed the session (full or deleted), in which case it was already
    /// cleared and the next `enter` starts a fresh one.
    pub fn reset(&mut self) {
        self.last_outcome = None;
        self.set_status(FlowStatus::Idle);
    }

    /// Themes from the latest outcome
    pub fn key_themes(&self) -> &[Theme] {
        self.last_outcome
            .as_ref()
            .map(AnalysisOutcome::key_themes)
            .unwrap_or(&[])
    }

    fn listen(&mut self, session_id: String) {
        let clips_analyzed = self
            .last_outcome
            .as_ref()
            .map(AnalysisOutcome::clip_number)
            .unwrap_or(0);
        self.set_status(FlowStatus::Listening {
            session_id,
            clips_analyzed,
        });
    }

    fn active_session(&self) -> Result<String, FlowError> {
        self.sessions
            .current()
            .map(str::to_owned)
            .ok_or_else(|| {
                FlowError::Session(hoop_common::Error::InvalidInput(
                    "no active session; start an assessment first".to_string(),
                ))
            })
    }

    fn set_status(&mut self, status: FlowStatus) {
        if self.status != status {
            tracing::info!(status = %status.message(), "Status");
            self.status = status;
        }
    }
}
