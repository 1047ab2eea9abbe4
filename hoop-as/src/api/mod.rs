//! HTTP API handlers for hoop-as

pub mod drill;
pub mod health;
pub mod progressive;
pub mod sequence;
pub mod sse;
pub mod upload;

pub use drill::drill_routes;
pub use health::health_routes;
pub use progressive::progressive_routes;
pub use sequence::sequence_routes;
pub use sse::event_routes;
