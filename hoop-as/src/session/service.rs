//! Progressive analysis service
//!
//! Accepts one clip at a time for a session, asks the analysis collaborator
//! for feedback, appends it, and consolidates exactly once when the session
//! saturates.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tokio::time::Instant;

use hoop_common::api::ProgressiveAnalysisResponse;
use hoop_common::events::{EventBus, HoopEvent};

use super::store::{SessionLookup, SessionStore};
use super::validate_session_id;
use crate::analysis::{consolidate, prompts, AnalysisError, Analyzer, ClipPayload};
use crate::config::SessionPolicy;

/// Progressive submission errors
#[derive(Debug, Error)]
pub enum ProgressiveError {
    #[error("Invalid session id: {0}")]
    InvalidSessionId(String),

    #[error("Session {0} was deleted")]
    SessionDeleted(String),

    #[error("Session {session_id} already holds {max_clips} clips")]
    SessionFull { session_id: String, max_clips: u32 },

    #[error("Analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Analysis timed out after {0:?}")]
    AnalysisTimeout(Duration),
}

/// One clip submitted to a progressive session
#[derive(Debug, Clone)]
pub struct ClipSubmission {
    pub session_id: String,
    /// Per-clip idempotency token; retries of the same clip reuse it
    pub clip_id: Option<String>,
    pub clip: ClipPayload,
}

pub struct ProgressiveAnalysisService {
    store: SessionStore,
    analyzer: Arc<dyn Analyzer>,
    policy: SessionPolicy,
    analysis_timeout: Duration,
    event_bus: EventBus,
}

impl ProgressiveAnalysisService {
    pub fn new(
        analyzer: Arc<dyn Analyzer>,
        policy: SessionPolicy,
        analysis_timeout: Duration,
        event_bus: EventBus,
    ) -> Self {
        Self {
            store: SessionStore::new(),
            analyzer,
            policy,
            analysis_timeout,
            event_bus,
        }
    }

    pub fn policy(&self) -> SessionPolicy {
        self.policy
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Submit one clip.
    ///
    /// The session lock is held from lookup through append and consolidation,
    /// so concurrent submissions for one session get distinct, contiguous
    /// numbers and exactly one of them triggers consolidation. A repeated
    /// `clip_id` returns the committed state without analyzing again.
    ///
    /// Clip analysis and the consolidation summary share one
    /// `analysis_timeout` budget. A session deleted while its clip is being
    /// analyzed rejects the clip instead of appending it.
    pub async fn submit(
        &self,
        submission: ClipSubmission,
    ) -> Result<ProgressiveAnalysisResponse, ProgressiveError> {
        validate_session_id(&submission.session_id).map_err(ProgressiveError::InvalidSessionId)?;
        let session_id = submission.session_id.as_str();

        let handle = match self.store.get_or_create(session_id).await {
            SessionLookup::Active(handle) => handle,
            SessionLookup::Deleted => {
                tracing::warn!(session_id = %session_id, "Submission for deleted session rejected");
                return Err(ProgressiveError::SessionDeleted(session_id.to_string()));
            }
        };
        let mut record = handle.lock().await;

        if let Some(clip_id) = submission.clip_id.as_deref() {
            if let Some(clip_number) = record.committed_clip(clip_id) {
                tracing::info!(
                    session_id = %session_id,
                    clip_id = %clip_id,
                    clip_number,
                    "Duplicate clip submission, returning committed state"
                );
                return Ok(record.to_response(clip_number));
            }
        }

        if record.clip_count() >= self.policy.max_clips_per_session {
            return Err(ProgressiveError::SessionFull {
                session_id: session_id.to_string(),
                max_clips: self.policy.max_clips_per_session,
            });
        }

        let clip_number = record.next_clip_number();
        let prompt = prompts::progressive_clip_prompt(clip_number, &record.themes());

        tracing::info!(
            session_id = %session_id,
            clip_number,
            bytes = submission.clip.bytes.len(),
            analyzer = self.analyzer.name(),
            "Analyzing clip"
        );

        let deadline = Instant::now() + self.analysis_timeout;
        let feedback = tokio::time::timeout_at(
            deadline,
            self.analyzer.analyze_clip(&submission.clip, &prompt),
        )
        .await
        .map_err(|_| ProgressiveError::AnalysisTimeout(self.analysis_timeout))??;

        let clip_id = submission.clip_id.clone();
        let committed = self
            .store
            .commit_if_live(session_id, &handle, || {
                let appended = record.append(feedback, clip_id);
                debug_assert_eq!(appended.clip_number, clip_number);
                let key_areas = appended.key_areas.clone();
                self.event_bus.emit_lossy(HoopEvent::ClipAnalyzed {
                    session_id: session_id.to_string(),
                    clip_number,
                    key_areas: key_areas.clone(),
                    timestamp: Utc::now(),
                });
                key_areas
            })
            .await;

        let Some(key_areas) = committed else {
            tracing::warn!(
                session_id = %session_id,
                clip_number,
                "Session deleted during analysis, clip discarded"
            );
            return Err(ProgressiveError::SessionDeleted(session_id.to_string()));
        };

        tracing::info!(
            session_id = %session_id,
            clip_number,
            key_areas = ?key_areas,
            "Clip feedback recorded"
        );

        if record.clip_count() >= self.policy.saturation_threshold && !record.is_saturated() {
            let consolidated = consolidate(
                record.clips(),
                self.analyzer.as_ref(),
                self.policy.max_consolidated_tips,
                deadline.saturating_duration_since(Instant::now()),
            )
            .await;
            let drill_suggestion = consolidated.drill_suggestion.clone();
            let clip_count = record.clip_count();

            let stored = self
                .store
                .commit_if_live(session_id, &handle, || {
                    record.set_consolidated(consolidated);
                    self.event_bus.emit_lossy(HoopEvent::SessionSaturated {
                        session_id: session_id.to_string(),
                        clip_count,
                        drill_suggestion: drill_suggestion.clone(),
                        timestamp: Utc::now(),
                    });
                })
                .await;
            if stored.is_none() {
                tracing::warn!(session_id = %session_id, "Session deleted during consolidation");
                return Err(ProgressiveError::SessionDeleted(session_id.to_string()));
            }

            tracing::info!(
                session_id = %session_id,
                clip_count,
                drill = %drill_suggestion,
                "Session saturated and consolidated"
            );
        }

        Ok(record.to_response(clip_number))
    }

    /// Current state of a session, if it exists
    pub async fn snapshot(&self, session_id: &str) -> Option<ProgressiveAnalysisResponse> {
        let handle = self.store.get(session_id).await?;
        let record = handle.lock().await;
        if record.clip_count() == 0 {
            return None;
        }
        Some(record.to_response(record.clip_count()))
    }

    /// Discard a session. Idempotent; returns whether a record existed.
    pub async fn delete(&self, session_id: &str) -> bool {
        let existed = self.store.delete(session_id).await;
        tracing::info!(session_id = %session_id, existed, "Session deleted");
        self.event_bus.emit_lossy(HoopEvent::SessionDeleted {
            session_id: session_id.to_string(),
            timestamp: Utc::now(),
        });
        existed
    }
}
