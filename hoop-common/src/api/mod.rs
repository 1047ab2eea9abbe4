//! Shared HTTP API types
//!
//! The analysis service serializes these types and the capture client
//! deserializes them, so both sides agree on a single definition of the
//! wire format.
//!
//! - [`types`]: JSON payloads exactly as they cross the wire (camelCase)
//! - [`outcome`]: tagged view of a progressive response, validated at the
//!   client boundary

pub mod outcome;
pub mod types;

pub use outcome::{AnalysisOutcome, OutcomeError};
pub use types::{
    ClipFeedback, CoachingResponse, ConsolidatedFeedback, DeleteSessionResponse, DrillInfo,
    ErrorBody, ErrorDetail, HealthResponse, ProgressiveAnalysisResponse, SkillLevel, Theme,
};

/// Multipart field carrying the clip bytes
pub const FIELD_VIDEO: &str = "video";
/// Multipart field carrying the session id
pub const FIELD_SESSION_ID: &str = "sessionId";
/// Multipart field carrying the per-clip idempotency token
pub const FIELD_CLIP_ID: &str = "clipId";
/// Multipart field carrying the drill label for single-clip analysis
pub const FIELD_DRILL: &str = "drill";
