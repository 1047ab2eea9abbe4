//! Event types and EventBus
//!
//! The analysis service emits an event whenever session state changes so that
//! a progressive display can follow along over SSE without polling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::api::Theme;

/// Hoop Coach event types
///
/// Serialized with an internal `type` tag for SSE transmission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HoopEvent {
    /// A clip was analyzed and appended to a session
    ClipAnalyzed {
        session_id: String,
        clip_number: u32,
        /// Themes detected in this clip
        key_areas: Vec<Theme>,
        timestamp: DateTime<Utc>,
    },

    /// A session reached saturation and its consolidated result was computed
    SessionSaturated {
        session_id: String,
        clip_count: u32,
        drill_suggestion: String,
        timestamp: DateTime<Utc>,
    },

    /// A session's accumulation record was discarded
    SessionDeleted {
        session_id: String,
        timestamp: DateTime<Utc>,
    },
}

impl HoopEvent {
    /// SSE event name
    pub fn event_type(&self) -> &'static str {
        match self {
            HoopEvent::ClipAnalyzed { .. } => "ClipAnalyzed",
            HoopEvent::SessionSaturated { .. } => "SessionSaturated",
            HoopEvent::SessionDeleted { .. } => "SessionDeleted",
        }
    }
}

/// Central event distribution bus
///
/// Wraps `tokio::broadcast`: publishing never blocks, slow subscribers see
/// `Lagged` instead of stalling producers, and receivers clean up on drop.
///
/// # Examples
///
/// ```
/// use hoop_common::events::{EventBus, HoopEvent};
///
/// let event_bus = EventBus::new(100);
/// let mut rx = event_bus.subscribe();
///
/// event_bus.emit_lossy(HoopEvent::SessionDeleted {
///     session_id: "session_1".to_string(),
///     timestamp: chrono::Utc::now(),
/// });
///
/// assert!(rx.try_recv().is_ok());
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<HoopEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<HoopEvent> {
        self.tx.subscribe()
    }

    /// Emit an event. Returns `Err` if no subscriber is listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: HoopEvent,
    ) -> Result<usize, broadcast::error::SendError<HoopEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring the absence of subscribers
    pub fn emit_lossy(&self, event: HoopEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
