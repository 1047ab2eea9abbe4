//! Server-Sent Events for analysis progress

use axum::{
    extract::State,
    response::sse::{Event, Sse},
    routing::get,
    Router,
};
use futures::stream::Stream;
use std::convert::Infallible;

use crate::AppState;

/// GET /events
///
/// Streams `ClipAnalyzed`, `SessionSaturated` and `SessionDeleted`.
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    hoop_common::sse::create_event_sse_stream("hoop-as", &state.event_bus)
}

/// Build SSE routes
pub fn event_routes() -> Router<AppState> {
    Router::new().route("/events", get(event_stream))
}
