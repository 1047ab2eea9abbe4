//! # Hoop Coach Common Library
//!
//! Shared code for the Hoop Coach analysis service and capture client:
//! - Progressive analysis wire types and their boundary validation
//! - Event types (HoopEvent enum) and the EventBus
//! - Configuration loading and root folder resolution
//! - SSE helpers

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod sse;

pub use error::{Error, Result};
