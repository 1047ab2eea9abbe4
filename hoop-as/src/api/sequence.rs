//! Single-clip drill analysis
//!
//! POST /analyze_sequence is stateless: one clip in, one coaching response
//! out, nothing accumulated.

use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};

use hoop_common::api::{CoachingResponse, FIELD_DRILL};

use super::upload::UploadForm;
use crate::analysis::parsing::extract_tips;
use crate::analysis::prompts::sequence_prompt;
use crate::analysis::rules::{detect_themes, infer_skill_level, recommend_drill};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

const DEFAULT_DRILL: &str = "general dribbling";

/// Shape raw model feedback into a coaching response
pub fn coaching_response(feedback: String) -> CoachingResponse {
    let themes = detect_themes(&feedback);
    let skill_level = infer_skill_level(&feedback);
    let tips = extract_tips(&feedback);
    let dominant = themes.first().copied();

    CoachingResponse {
        drill_suggestion: Some(recommend_drill(skill_level, dominant).to_string()),
        technique: dominant.map(|t| t.label().to_string()),
        tips: (!tips.is_empty()).then_some(tips),
        feedback,
    }
}

/// POST /analyze_sequence
///
/// Multipart fields: `video`, optional `drill`.
pub async fn analyze_sequence(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<CoachingResponse>> {
    let mut form = UploadForm::read(multipart).await?;
    let drill = form.text(FIELD_DRILL).unwrap_or(DEFAULT_DRILL).to_string();
    let clip = form.clip(state.max_clip_bytes)?;

    tracing::info!(drill = %drill, bytes = clip.bytes.len(), "Analyzing single clip");

    let prompt = sequence_prompt(&drill);
    let feedback = tokio::time::timeout(
        state.analysis_timeout,
        state.analyzer.analyze_clip(&clip, &prompt),
    )
    .await
    .map_err(|_| {
        ApiError::GatewayTimeout(format!(
            "no analysis result after {} s",
            state.analysis_timeout.as_secs()
        ))
    })?
    .map_err(|e| ApiError::BadGateway(e.to_string()))?;

    Ok(Json(coaching_response(feedback)))
}

/// Build single-clip analysis routes
pub fn sequence_routes() -> Router<AppState> {
    Router::new().route("/analyze_sequence", post(analyze_sequence))
}
