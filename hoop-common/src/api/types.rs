//! Wire-level request/response types
//!
//! Field names follow the JSON contract consumed by the browser client
//! (camelCase), so every struct here is `rename_all = "camelCase"`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ========================================
// Vocabulary
// ========================================

/// Coarse technique category detected in feedback text
///
/// Serialized with its display label ("Ball Control", ...) because that is
/// what the progressive display shows verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Theme {
    #[serde(rename = "Ball Control")]
    BallControl,
    #[serde(rename = "Rhythm & Timing")]
    RhythmTiming,
    #[serde(rename = "Body Position")]
    BodyPosition,
    #[serde(rename = "Dribble Height")]
    DribbleHeight,
    #[serde(rename = "Hand Technique")]
    HandTechnique,
    #[serde(rename = "Court Awareness")]
    CourtAwareness,
}

impl Theme {
    /// All themes in rule-table order
    pub const ALL: [Theme; 6] = [
        Theme::BallControl,
        Theme::RhythmTiming,
        Theme::BodyPosition,
        Theme::DribbleHeight,
        Theme::HandTechnique,
        Theme::CourtAwareness,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Theme::BallControl => "Ball Control",
            Theme::RhythmTiming => "Rhythm & Timing",
            Theme::BodyPosition => "Body Position",
            Theme::DribbleHeight => "Dribble Height",
            Theme::HandTechnique => "Hand Technique",
            Theme::CourtAwareness => "Court Awareness",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inferred skill level of the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkillLevel::Beginner => write!(f, "beginner"),
            SkillLevel::Intermediate => write!(f, "intermediate"),
            SkillLevel::Advanced => write!(f, "advanced"),
        }
    }
}

// ========================================
// Progressive analysis
// ========================================

/// Feedback for one submitted clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipFeedback {
    /// 1-based, contiguous within a session
    pub clip_number: u32,
    /// Raw text returned by the analysis collaborator
    pub feedback: String,
    /// Themes detected in this clip's text
    #[serde(default)]
    pub key_areas: Vec<Theme>,
    /// Actionable tips extracted from this clip's text
    #[serde(default)]
    pub tips: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// One-time synthesis of all clip feedback in a saturated session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedFeedback {
    /// Summary text
    pub feedback: String,
    /// Primary technique focus (dominant theme label)
    pub technique: String,
    pub skill_level: SkillLevel,
    /// Deduplicated, capped improvement tips
    pub tips: Vec<String>,
    /// Single recommended follow-up drill
    pub drill_suggestion: String,
}

/// POST /progressive_analysis response
///
/// This is the loose wire shape. Callers that act on it should convert it to
/// [`crate::api::AnalysisOutcome`], which rejects inconsistent payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressiveAnalysisResponse {
    /// Number assigned to the clip this response answers
    pub clip_number: u32,
    pub saturated: bool,
    /// Full per-clip history for progressive display
    pub feedback_list: Vec<ClipFeedback>,
    /// Running union of detected themes
    pub key_themes: Vec<Theme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consolidated_feedback: Option<ConsolidatedFeedback>,
}

// ========================================
// Single-clip analysis
// ========================================

/// POST /analyze_sequence response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachingResponse {
    pub feedback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drill_suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technique: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<Vec<String>>,
}

// ========================================
// Session and static content
// ========================================

/// DELETE /session/{sessionId} response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSessionResponse {
    pub session_id: String,
    /// false when the id was unknown (delete is idempotent)
    pub deleted: bool,
}

/// GET /drill/{name} response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillInfo {
    pub name: String,
    pub description: String,
    pub level: SkillLevel,
    pub focus_areas: Vec<Theme>,
    pub steps: Vec<String>,
}

/// GET /health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    /// Seconds since the service started
    #[serde(default)]
    pub uptime_seconds: u64,
}

// ========================================
// Errors
// ========================================

/// JSON error envelope: `{"error": {"code": ..., "message": ...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_serializes_as_label() {
        let json = serde_json::to_string(&Theme::RhythmTiming).unwrap();
        assert_eq!(json, "\"Rhythm & Timing\"");

        let parsed: Theme = serde_json::from_str("\"Court Awareness\"").unwrap();
        assert_eq!(parsed, Theme::CourtAwareness);
    }

    #[test]
    fn test_progressive_response_omits_missing_consolidation() {
        let response = ProgressiveAnalysisResponse {
            clip_number: 1,
            saturated: false,
            feedback_list: vec![],
            key_themes: vec![Theme::BallControl],
            consolidated_feedback: None,
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["clipNumber"], 1);
        assert_eq!(value["saturated"], false);
        assert_eq!(value["keyThemes"][0], "Ball Control");
        assert!(value.get("consolidatedFeedback").is_none());
    }

    #[test]
    fn test_consolidated_feedback_uses_camel_case() {
        let consolidated = ConsolidatedFeedback {
            feedback: "Solid base".to_string(),
            technique: "Ball Control".to_string(),
            skill_level: SkillLevel::Intermediate,
            tips: vec!["Keep your eyes up".to_string()],
            drill_suggestion: "Two-Ball Dribble".to_string(),
        };

        let value = serde_json::to_value(&consolidated).unwrap();
        assert_eq!(value["drillSuggestion"], "Two-Ball Dribble");
        assert_eq!(value["skillLevel"], "intermediate");
    }
}
