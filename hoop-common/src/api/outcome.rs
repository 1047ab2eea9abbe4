//! Tagged progressive-analysis outcome
//!
//! The wire payload carries a `saturated` flag next to an optional
//! consolidated result. Consumers should not have to re-check that the two
//! agree, so the payload is converted once at the boundary into
//! [`AnalysisOutcome`], and inconsistent payloads are rejected there.

use super::types::{ClipFeedback, ConsolidatedFeedback, ProgressiveAnalysisResponse, Theme};
use thiserror::Error;

/// Reasons a progressive response payload is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutcomeError {
    #[error("feedback list is empty")]
    EmptyFeedbackList,

    #[error("feedback list numbering is not contiguous: expected clip {expected}, found {found}")]
    NonContiguousNumbering { expected: u32, found: u32 },

    #[error("clip number {clip_number} is outside the feedback list (1..={len})")]
    ClipNumberOutOfRange { clip_number: u32, len: usize },

    #[error("response marked saturated but carries no consolidated feedback")]
    SaturatedWithoutConsolidation,

    #[error("response carries consolidated feedback but is not marked saturated")]
    ConsolidationWithoutSaturation,
}

/// Validated progressive response
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// Session still accumulating evidence
    Progress {
        clip_number: u32,
        feedback_list: Vec<ClipFeedback>,
        key_themes: Vec<Theme>,
    },
    /// Saturation reached; consolidated result is final for the session
    Saturated {
        clip_number: u32,
        feedback_list: Vec<ClipFeedback>,
        key_themes: Vec<Theme>,
        consolidated: ConsolidatedFeedback,
    },
}

impl AnalysisOutcome {
    pub fn clip_number(&self) -> u32 {
        match self {
            AnalysisOutcome::Progress { clip_number, .. }
            | AnalysisOutcome::Saturated { clip_number, .. } => *clip_number,
        }
    }

    pub fn feedback_list(&self) -> &[ClipFeedback] {
        match self {
            AnalysisOutcome::Progress { feedback_list, .. }
            | AnalysisOutcome::Saturated { feedback_list, .. } => feedback_list,
        }
    }

    pub fn key_themes(&self) -> &[Theme] {
        match self {
            AnalysisOutcome::Progress { key_themes, .. }
            | AnalysisOutcome::Saturated { key_themes, .. } => key_themes,
        }
    }

    pub fn is_saturated(&self) -> bool {
        matches!(self, AnalysisOutcome::Saturated { .. })
    }

    pub fn consolidated(&self) -> Option<&ConsolidatedFeedback> {
        match self {
            AnalysisOutcome::Progress { .. } => None,
            AnalysisOutcome::Saturated { consolidated, .. } => Some(consolidated),
        }
    }
}

impl TryFrom<ProgressiveAnalysisResponse> for AnalysisOutcome {
    type Error = OutcomeError;

    fn try_from(response: ProgressiveAnalysisResponse) -> Result<Self, Self::Error> {
        if response.feedback_list.is_empty() {
            return Err(OutcomeError::EmptyFeedbackList);
        }

        for (index, clip) in response.feedback_list.iter().enumerate() {
            let expected = index as u32 + 1;
            if clip.clip_number != expected {
                return Err(OutcomeError::NonContiguousNumbering {
                    expected,
                    found: clip.clip_number,
                });
            }
        }

        let len = response.feedback_list.len();
        if response.clip_number == 0 || response.clip_number as usize > len {
            return Err(OutcomeError::ClipNumberOutOfRange {
                clip_number: response.clip_number,
                len,
            });
        }

        match (response.saturated, response.consolidated_feedback) {
            (true, Some(consolidated)) => Ok(AnalysisOutcome::Saturated {
                clip_number: response.clip_number,
                feedback_list: response.feedback_list,
                key_themes: response.key_themes,
                consolidated,
            }),
            (false, None) => Ok(AnalysisOutcome::Progress {
                clip_number: response.clip_number,
                feedback_list: response.feedback_list,
                key_themes: response.key_themes,
            }),
            (true, None) => Err(OutcomeError::SaturatedWithoutConsolidation),
            (false, Some(_)) => Err(OutcomeError::ConsolidationWithoutSaturation),
        }
    }
}
