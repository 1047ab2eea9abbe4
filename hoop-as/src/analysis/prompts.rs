//! Prompt text sent to the analysis collaborator

use hoop_common::api::{ClipFeedback, Theme};

/// Prompt for one clip of a progressive session.
///
/// Earlier themes are passed back so the model can comment on whether the
/// same issues persist.
pub fn progressive_clip_prompt(clip_number: u32, themes_so_far: &[Theme]) -> String {
    let mut prompt = format!(
        "This is clip {clip_number} of a progressive basketball dribbling assessment. \
         Analyze the player's dribbling form in this short video and provide concise feedback \
         covering ball control, rhythm and timing, body position, dribble height, \
         hand technique and court awareness."
    );

    if !themes_so_far.is_empty() {
        let labels: Vec<&str> = themes_so_far.iter().map(Theme::label).collect();
        prompt.push_str(&format!(
            " Earlier clips highlighted: {}. Note whether these areas improved.",
            labels.join(", ")
        ));
    }

    prompt.push_str(
        " Finish with two or three actionable tips, each on its own line starting with \"Tip:\".",
    );
    prompt
}

/// Prompt for single-clip analysis of a named drill
pub fn sequence_prompt(drill: &str) -> String {
    format!(
        "The player is performing the \"{drill}\" basketball dribbling drill. \
         Analyze this video for dribbling form and execution of the drill, \
         describe the player's skill level, and provide concise feedback. \
         Finish with two or three actionable tips, each on its own line starting with \"Tip:\"."
    )
}

/// Prompt asking the model to consolidate all clip feedback of a session
pub fn consolidation_prompt(clips: &[ClipFeedback], themes: &[Theme]) -> String {
    let all_feedback: Vec<&str> = clips.iter().map(|c| c.feedback.as_str()).collect();
    let labels: Vec<&str> = themes.iter().map(Theme::label).collect();

    format!(
        "Based on {} basketball dribbling video clips, provide a comprehensive assessment.\n\n\
         Accumulated feedback: {}\n\n\
         Key areas identified: {}\n\n\
         Please consolidate this into:\n\
         1. A comprehensive assessment highlighting the main patterns\n\
         2. The top 3 most important areas to focus on\n\
         3. A primary technique focus area\n\
         Write each actionable recommendation on its own line starting with \"Tip:\".",
        clips.len(),
        all_feedback.join(" "),
        labels.join(", ")
    )
}
