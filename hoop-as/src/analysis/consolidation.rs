//! One-time consolidation of a saturated session
//!
//! [`derive_consolidation`] is a pure function of the accumulated clips:
//! the same clips always produce the same result. [`consolidate`] layers an
//! optional model-written summary on top and falls back to the derived
//! summary when the collaborator fails.

use std::time::Duration;

use hoop_common::api::{ClipFeedback, ConsolidatedFeedback, Theme};

use super::parsing::{dedupe_tips, extract_tips};
use super::prompts::consolidation_prompt;
use super::rules::{detect_themes, dominant_theme, infer_skill_level, recommend_drill};
use super::Analyzer;

/// Deterministic consolidation of all clip feedback
///
/// - concatenates all feedback and re-scans it for themes and skill level
/// - dominant theme decides the technique label and, with the skill level,
///   the recommended drill
/// - tips are the per-clip tips, deduplicated and capped at `max_tips`
pub fn derive_consolidation(clips: &[ClipFeedback], max_tips: usize) -> ConsolidatedFeedback {
    let all_feedback = concatenated_feedback(clips);
    let themes = detect_themes(&all_feedback);
    let skill_level = infer_skill_level(&all_feedback);
    let dominant = dominant_theme(clips).or_else(|| themes.first().copied());

    let technique = dominant.unwrap_or(Theme::BallControl).label().to_string();
    let drill_suggestion = recommend_drill(skill_level, dominant).to_string();
    let tips = dedupe_tips(clips.iter().flat_map(|c| c.tips.iter().cloned()), max_tips);

    ConsolidatedFeedback {
        feedback: fallback_summary(clips.len(), &themes),
        technique,
        skill_level,
        tips,
        drill_suggestion,
    }
}

/// Consolidate, preferring a model-written summary.
///
/// The label, skill level and drill always come from
/// [`derive_consolidation`]. When the collaborator produces a summary, it
/// replaces the derived summary text and its own tips are ranked ahead of the
/// per-clip tips.
pub async fn consolidate(
    clips: &[ClipFeedback],
    analyzer: &dyn Analyzer,
    max_tips: usize,
    timeout: Duration,
) -> ConsolidatedFeedback {
    let mut result = derive_consolidation(clips, max_tips);
    let themes = detect_themes(&concatenated_feedback(clips));
    let prompt = consolidation_prompt(clips, &themes);

    match tokio::time::timeout(timeout, analyzer.summarize(&prompt)).await {
        Ok(Ok(summary)) if !summary.trim().is_empty() => {
            let summary_tips = extract_tips(&summary);
            result.tips = dedupe_tips(
                summary_tips.into_iter().chain(result.tips.into_iter()),
                max_tips,
            );
            result.feedback = summary.trim().to_string();
        }
        Ok(Ok(_)) => {
            tracing::warn!(analyzer = analyzer.name(), "Empty consolidation summary, using derived summary");
        }
        Ok(Err(e)) => {
            tracing::warn!(analyzer = analyzer.name(), error = %e, "Consolidation summary failed, using derived summary");
        }
        Err(_) => {
            tracing::warn!(
                analyzer = analyzer.name(),
                timeout_secs = timeout.as_secs(),
                "Consolidation summary timed out, using derived summary"
            );
        }
    }

    result
}

fn concatenated_feedback(clips: &[ClipFeedback]) -> String {
    clips
        .iter()
        .map(|c| c.feedback.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn fallback_summary(clip_count: usize, themes: &[Theme]) -> String {
    if themes.is_empty() {
        return format!(
            "Based on {clip_count} clips, keep building consistent fundamentals."
        );
    }
    let labels: Vec<&str> = themes.iter().take(3).map(Theme::label).collect();
    format!("Based on {clip_count} clips, focus on {}.", labels.join(", "))
}
