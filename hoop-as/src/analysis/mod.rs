//! Clip analysis
//!
//! The vision model that scores a clip is an external collaborator: clip
//! bytes in, free-text feedback out, possibly slow, possibly failing. It sits
//! behind the [`Analyzer`] trait. Everything derived from that text (themes,
//! tips, skill level, drill choice, consolidation) is local and lives in the
//! submodules here.

pub mod consolidation;
pub mod gemini;
pub mod parsing;
pub mod prompts;
pub mod rules;
pub mod static_analyzer;

pub use consolidation::{consolidate, derive_consolidation};
pub use gemini::GeminiAnalyzer;
pub use static_analyzer::StaticAnalyzer;

use axum::body::Bytes;
use thiserror::Error;

/// Analysis collaborator errors
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Could not reach the model endpoint
    #[error("Network error: {0}")]
    Network(String),

    /// Model endpoint answered with an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Model returned no usable text
    #[error("Model returned an empty response")]
    EmptyResponse,

    /// Model response could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),
}

/// One uploaded clip, already validated
#[derive(Debug, Clone)]
pub struct ClipPayload {
    pub bytes: Bytes,
    /// Sniffed container MIME type, e.g. `video/webm`
    pub mime_type: String,
}

/// External analysis collaborator
#[async_trait::async_trait]
pub trait Analyzer: Send + Sync {
    /// Collaborator name for logging
    fn name(&self) -> &'static str;

    /// Produce free-text coaching feedback for one clip
    async fn analyze_clip(&self, clip: &ClipPayload, prompt: &str) -> Result<String, AnalysisError>;

    /// Produce a free-text summary from a text-only prompt
    async fn summarize(&self, prompt: &str) -> Result<String, AnalysisError>;
}
