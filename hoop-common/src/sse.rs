//! Server-Sent Events (SSE) utilities

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::events::EventBus;

/// Heartbeat interval for all SSE streams
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

/// Create an SSE stream forwarding every [`crate::events::HoopEvent`] on the bus
///
/// Sends a `ConnectionStatus` event first, then one SSE event per bus event
/// (event name = variant name, data = JSON). A lagging client is told how many
/// events it missed rather than being disconnected.
///
/// # Example
/// ```rust,ignore
/// pub async fn event_stream(
///     State(state): State<AppState>,
/// ) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
///     hoop_common::sse::create_event_sse_stream("hoop-as", &state.event_bus)
/// }
/// ```
pub fn create_event_sse_stream(
    service_name: &'static str,
    event_bus: &EventBus,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("New SSE client connected to {} events", service_name);
    let mut rx = event_bus.subscribe();

    let stream = async_stream::stream! {
        yield Ok(Event::default()
            .event("ConnectionStatus")
            .data("connected"));

        loop {
            match rx.recv().await {
                Ok(event) => {
                    match serde_json::to_string(&event) {
                        Ok(data) => {
                            debug!(event_type = event.event_type(), "SSE: forwarding event");
                            yield Ok(Event::default().event(event.event_type()).data(data));
                        }
                        Err(e) => warn!(error = %e, "SSE: failed to serialize event"),
                    }
                }
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "SSE: client lagged behind event bus");
                    yield Ok(Event::default().event("Lagged").data(missed.to_string()));
                }
                Err(RecvError::Closed) => {
                    info!("SSE: {} event bus closed, ending stream", service_name);
                    break;
                }
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(HEARTBEAT_INTERVAL)
            .text("heartbeat"),
    )
}
