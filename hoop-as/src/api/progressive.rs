//! Progressive analysis endpoints
//!
//! POST /progressive_analysis, GET /session/{sessionId}, DELETE /session/{sessionId}

use axum::{
    extract::{Multipart, Path, State},
    routing::{get, post},
    Json, Router,
};

use hoop_common::api::{
    DeleteSessionResponse, ProgressiveAnalysisResponse, FIELD_CLIP_ID, FIELD_SESSION_ID,
};

use super::upload::UploadForm;
use crate::error::{ApiError, ApiResult};
use crate::session::{validate_session_id, ClipSubmission};
use crate::AppState;

/// POST /progressive_analysis
///
/// Multipart fields: `video`, `sessionId`, optional `clipId`.
pub async fn progressive_analysis(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<ProgressiveAnalysisResponse>> {
    let mut form = UploadForm::read(multipart).await?;
    let session_id = form.require_text(FIELD_SESSION_ID)?.to_string();
    let clip_id = form.text(FIELD_CLIP_ID).map(str::to_owned);
    let clip = form.clip(state.max_clip_bytes)?;

    let response = state
        .progressive
        .submit(ClipSubmission {
            session_id,
            clip_id,
            clip,
        })
        .await?;

    Ok(Json(response))
}

/// GET /session/{sessionId}
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<ProgressiveAnalysisResponse>> {
    state
        .progressive
        .snapshot(&session_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Session {session_id}")))
}

/// DELETE /session/{sessionId}
///
/// Idempotent: deleting an unknown id reports `deleted: false`.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<DeleteSessionResponse>> {
    validate_session_id(&session_id).map_err(ApiError::BadRequest)?;
    let deleted = state.progressive.delete(&session_id).await;
    Ok(Json(DeleteSessionResponse {
        session_id,
        deleted,
    }))
}

/// Build progressive analysis routes
pub fn progressive_routes() -> Router<AppState> {
    Router::new()
        .route("/progressive_analysis", post(progressive_analysis))
        .route("/session/:session_id", get(get_session).delete(delete_session))
}
