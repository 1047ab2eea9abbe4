//! hoop-cc library interface
//!
//! Capture-side half of Hoop Coach: motion-triggered recording, the
//! persisted session id, resilient clip submission and the assessment flow
//! that ties them together.
//!
//! The `hoop-cc` binary submits clips that were already recorded to disk.
//! Live capture is embedded by the host application: it implements
//! [`recorder::FrameSource`] and [`recorder::CaptureDevice`] for its camera
//! and drives a [`capture_loop::CaptureLoop`] with them.

pub mod capture_loop;
pub mod client;
pub mod config;
pub mod error;
pub mod flow;
pub mod motion;
pub mod recorder;
pub mod resilience;
pub mod session;

pub use crate::error::{CaptureError, FlowError, SubmitError};
