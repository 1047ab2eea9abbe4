//! Per-session accumulation record

use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};

use hoop_common::api::{ClipFeedback, ConsolidatedFeedback, ProgressiveAnalysisResponse, Theme};

use crate::analysis::parsing::extract_tips;
use crate::analysis::rules::detect_themes;

/// Accumulated state of one progressive session
///
/// Clips only ever grow, numbered 1..K in append order. The consolidated
/// result can be set once and is never replaced.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    session_id: String,
    clips: Vec<ClipFeedback>,
    themes: BTreeSet<Theme>,
    /// Idempotency token → clip number it committed
    clip_ids: HashMap<String, u32>,
    consolidated: Option<ConsolidatedFeedback>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            clips: Vec::new(),
            themes: BTreeSet::new(),
            clip_ids: HashMap::new(),
            consolidated: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn clips(&self) -> &[ClipFeedback] {
        &self.clips
    }

    pub fn clip_count(&self) -> u32 {
        self.clips.len() as u32
    }

    pub fn next_clip_number(&self) -> u32 {
        self.clip_count() + 1
    }

    /// Accumulated themes in rule order
    pub fn themes(&self) -> Vec<Theme> {
        self.themes.iter().copied().collect()
    }

    pub fn consolidated(&self) -> Option<&ConsolidatedFeedback> {
        self.consolidated.as_ref()
    }

    pub fn is_saturated(&self) -> bool {
        self.consolidated.is_some()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Clip number previously committed under `clip_id`, if any
    pub fn committed_clip(&self, clip_id: &str) -> Option<u32> {
        self.clip_ids.get(clip_id).copied()
    }

    /// Append feedback for the next clip, tagging themes and tips from its text
    pub fn append(&mut self, feedback: String, clip_id: Option<String>) -> &ClipFeedback {
        let clip_number = self.next_clip_number();
        let key_areas = detect_themes(&feedback);
        let tips = extract_tips(&feedback);

        self.themes.extend(key_areas.iter().copied());
        if let Some(clip_id) = clip_id {
            self.clip_ids.insert(clip_id, clip_number);
        }

        let now = Utc::now();
        self.updated_at = now;
        self.clips.push(ClipFeedback {
            clip_number,
            feedback,
            key_areas,
            tips,
            timestamp: now,
        });

        &self.clips[self.clips.len() - 1]
    }

    /// Store the consolidated result. Returns false (and keeps the existing
    /// result) if the session was already consolidated.
    pub fn set_consolidated(&mut self, consolidated: ConsolidatedFeedback) -> bool {
        if self.consolidated.is_some() {
            return false;
        }
        self.consolidated = Some(consolidated);
        self.updated_at = Utc::now();
        true
    }

    /// Response payload answering the submission that produced `clip_number`
    pub fn to_response(&self, clip_number: u32) -> ProgressiveAnalysisResponse {
        ProgressiveAnalysisResponse {
            clip_number,
            saturated: self.is_saturated(),
            feedback_list: self.clips.clone(),
            key_themes: self.themes(),
            consolidated_feedback: self.consolidated.clone(),
        }
    }
}
