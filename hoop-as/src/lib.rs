//! hoop-as library interface
//!
//! Exposes the router and application state so integration tests can drive
//! the service in-process.

pub mod analysis;
pub mod api;
pub mod config;
pub mod drills;
pub mod error;
pub mod session;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::Router;
use chrono::{DateTime, Utc};
use hoop_common::events::EventBus;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::analysis::Analyzer;
use crate::config::ServiceConfig;
use crate::session::ProgressiveAnalysisService;

/// Multipart framing allowance on top of the clip size limit
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub progressive: Arc<ProgressiveAnalysisService>,
    /// Collaborator used directly by single-clip analysis
    pub analyzer: Arc<dyn Analyzer>,
    pub event_bus: EventBus,
    pub max_clip_bytes: usize,
    pub analysis_timeout: Duration,
    pub cors_origins: Arc<Vec<String>>,
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: &ServiceConfig, analyzer: Arc<dyn Analyzer>) -> Self {
        let event_bus = EventBus::new(config.event_bus_capacity);
        let progressive = ProgressiveAnalysisService::new(
            Arc::clone(&analyzer),
            config.session,
            config.analysis_timeout(),
            event_bus.clone(),
        );

        Self {
            progressive: Arc::new(progressive),
            analyzer,
            event_bus,
            max_clip_bytes: config.max_clip_bytes,
            analysis_timeout: config.analysis_timeout(),
            cors_origins: Arc::new(config.cors_origins.clone()),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_clip_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES);
    let cors = cors_layer(&state.cors_origins);

    Router::new()
        .merge(api::progressive_routes())
        .merge(api::sequence_routes())
        .merge(api::drill_routes())
        .merge(api::event_routes())
        .merge(api::health_routes())
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// CORS for the configured browser origins; `*` allows any origin
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(allowed)
}
