//! Drill metadata endpoint

use axum::{extract::Path, routing::get, Json, Router};

use hoop_common::api::DrillInfo;

use crate::drills::find_drill;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// GET /drill/{name}
pub async fn get_drill(Path(name): Path<String>) -> ApiResult<Json<DrillInfo>> {
    find_drill(&name)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Drill '{name}'")))
}

/// Build drill routes
pub fn drill_routes() -> Router<AppState> {
    Router::new().route("/drill/:name", get(get_drill))
}
