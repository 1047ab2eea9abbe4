//! Offline analyzer used when no model API key is configured
//!
//! Returns canned coaching text so the service and the capture client can be
//! exercised end-to-end on a machine without model access.

use super::{AnalysisError, Analyzer, ClipPayload};

const CANNED_FEEDBACK: &[&str] = &[
    "Your ball control is steady but the dribble rises above the waist at times.\n\
     Tip: Keep the bounce height at or below your hip\n\
     Tip: Use your fingertips rather than your palm",
    "Rhythm is improving; the timing between dribbles is more even.\n\
     Tip: Practice the pound dribble to a steady count\n\
     Tip: Keep your eyes up instead of watching the ball",
    "Stance is a little upright. A lower position protects the ball.\n\
     Tip: Bend your knees and stay in an athletic stance\n\
     Tip: Work on keeping your off hand up for protection",
];

#[derive(Debug, Default)]
pub struct StaticAnalyzer;

impl StaticAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl Analyzer for StaticAnalyzer {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn analyze_clip(&self, clip: &ClipPayload, _prompt: &str) -> Result<String, AnalysisError> {
        let index = clip.bytes.len() % CANNED_FEEDBACK.len();
        Ok(CANNED_FEEDBACK[index].to_string())
    }

    async fn summarize(&self, _prompt: &str) -> Result<String, AnalysisError> {
        Err(AnalysisError::EmptyResponse)
    }
}
