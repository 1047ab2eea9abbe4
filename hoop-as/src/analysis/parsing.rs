//! Tip extraction from free-text model feedback

use std::collections::HashSet;

/// Maximum tips kept per clip
pub const MAX_TIPS_PER_CLIP: usize = 3;

/// Line markers that introduce an actionable tip
const TIP_STARTERS: &[&str] = &["tip:", "try", "focus on", "practice", "work on", "remember"];

/// Sentence words that make a sentence usable as a fallback tip
const ADVICE_WORDS: &[&str] = &["should", "try", "focus", "keep", "maintain", "improve"];

/// Bullet and numbering characters stripped from the start of a tip line
const BULLET_CHARS: &str = "\u{2022}-*123456789. ";

/// Extract up to [`MAX_TIPS_PER_CLIP`] actionable tips.
///
/// First pass: lines containing a tip starter, stripped of bullets/numbering,
/// longer than 10 chars. If that finds nothing, fall back to sentences that
/// contain advice words and are longer than 15 chars.
pub fn extract_tips(feedback_text: &str) -> Vec<String> {
    let mut tips: Vec<String> = feedback_text
        .lines()
        .map(str::trim)
        .filter(|line| {
            let lower = line.to_lowercase();
            TIP_STARTERS.iter().any(|s| lower.contains(s))
        })
        .map(|line| {
            line.trim_start_matches(|c| BULLET_CHARS.contains(c))
                .trim()
                .to_string()
        })
        .filter(|tip| tip.chars().count() > 10)
        .collect();

    if tips.is_empty() {
        tips = feedback_text
            .split('.')
            .filter(|sentence| {
                let lower = sentence.to_lowercase();
                ADVICE_WORDS.iter().any(|w| lower.contains(w))
            })
            .map(|sentence| sentence.trim().to_string())
            .filter(|sentence| sentence.chars().count() > 15)
            .collect();
    }

    tips.truncate(MAX_TIPS_PER_CLIP);
    tips
}

/// Deduplicate tips case-insensitively, preserving first-seen order, capped at `max`
pub fn dedupe_tips<I>(tips: I, max: usize) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    tips.into_iter()
        .filter(|tip| !tip.trim().is_empty())
        .filter(|tip| seen.insert(tip.trim().to_lowercase()))
        .take(max)
        .collect()
}
