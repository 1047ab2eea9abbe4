//! Motion-triggered recorder
//!
//! `Idle → Armed → Recording → Cooldown → Armed`. Time is passed in on every
//! tick, so the machine is deterministic under test.
//!
//! Motion only matters in `Armed`. A recording starts when the frame
//! difference exceeds the threshold, the cooldown since the previous
//! recording has elapsed, and the caller allows it (no submission in flight).
//! It stops itself after the configured duration and yields the clip.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::error::CaptureError;
use crate::motion::{Frame, MotionDetector};

/// Recorder timing and sensitivity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    pub sample_interval_ms: u64,
    /// Channel-sum difference above which a frame counts as motion
    pub motion_threshold: u64,
    pub recording_duration_ms: u64,
    pub cooldown_ms: u64,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: 200,
            motion_threshold: 30_000,
            recording_duration_ms: 5_000,
            cooldown_ms: 12_000,
        }
    }
}

impl RecorderConfig {
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn recording_duration(&self) -> Duration {
        Duration::from_millis(self.recording_duration_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

/// Video capture device
///
/// Capture runs continuously elsewhere; the recorder only marks where a
/// segment begins and ends.
pub trait CaptureDevice: Send {
    fn begin_segment(&mut self) -> Result<(), CaptureError>;

    /// Finish the current segment and return its encoded bytes
    fn end_segment(&mut self) -> Result<Vec<u8>, CaptureError>;
}

/// Source of sampled frames
pub trait FrameSource: Send {
    /// Latest frame, or `None` if no new frame is ready this tick
    fn next_frame(&mut self) -> Result<Option<Frame>, CaptureError>;
}

/// A finished recording
#[derive(Debug, Clone)]
pub struct RecordedClip {
    pub bytes: Vec<u8>,
    pub recorded_at: DateTime<Utc>,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Armed,
    Recording { started_at: Instant },
    Cooldown { until: Instant },
}

/// Result of one tick
#[derive(Debug)]
pub enum TickOutcome {
    Idle,
    /// Watching for motion; `metric` is `None` while no comparison was possible
    Armed { metric: Option<u64> },
    /// Motion triggered a new recording
    Started,
    Recording,
    Finished(RecordedClip),
    CoolingDown,
}

pub struct MotionRecorder<D: CaptureDevice> {
    config: RecorderConfig,
    device: D,
    detector: MotionDetector,
    state: RecorderState,
    last_recording_end: Option<Instant>,
    recording_started_wall: Option<DateTime<Utc>>,
}

impl<D: CaptureDevice> MotionRecorder<D> {
    pub fn new(config: RecorderConfig, device: D) -> Self {
        Self {
            config,
            device,
            detector: MotionDetector::new(),
            state: RecorderState::Idle,
            last_recording_end: None,
            recording_started_wall: None,
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Start watching for motion. No effect unless idle.
    pub fn arm(&mut self) {
        if self.state == RecorderState::Idle {
            self.detector.reset();
            self.state = RecorderState::Armed;
            tracing::debug!("Recorder armed");
        }
    }

    /// Stop watching. A recording in progress is discarded.
    pub fn disarm(&mut self) {
        if let RecorderState::Recording { .. } = self.state {
            match self.device.end_segment() {
                Ok(bytes) => {
                    tracing::info!(bytes = bytes.len(), "Discarded in-progress recording")
                }
                Err(e) => tracing::warn!(error = %e, "Failed to stop recording while disarming"),
            }
            self.recording_started_wall = None;
        }
        self.detector.reset();
        self.state = RecorderState::Idle;
    }

    /// Advance the machine to `now`.
    ///
    /// `frame` is the sample taken at this tick, if any. `allow_start` gates
    /// starting a new recording; it does not affect one already running.
    pub fn tick(
        &mut self,
        now: Instant,
        frame: Option<Frame>,
        allow_start: bool,
    ) -> Result<TickOutcome, CaptureError> {
        match self.state {
            RecorderState::Idle => Ok(TickOutcome::Idle),

            RecorderState::Recording { started_at } => {
                self.update_baseline(frame);
                if now.saturating_duration_since(started_at) < self.config.recording_duration() {
                    return Ok(TickOutcome::Recording);
                }
                self.finish_recording(now, started_at)
            }

            RecorderState::Cooldown { until } => {
                if now < until {
                    self.update_baseline(frame);
                    return Ok(TickOutcome::CoolingDown);
                }
                self.state = RecorderState::Armed;
                tracing::debug!("Cooldown over, recorder armed");
                self.evaluate_motion(now, frame, allow_start)
            }

            RecorderState::Armed => self.evaluate_motion(now, frame, allow_start),
        }
    }

    fn update_baseline(&mut self, frame: Option<Frame>) {
        if let Some(frame) = frame {
            self.detector.observe(frame);
        }
    }

    fn cooldown_elapsed(&self, now: Instant) -> bool {
        self.last_recording_end
            .map_or(true, |end| now.saturating_duration_since(end) >= self.config.cooldown())
    }

    fn evaluate_motion(
        &mut self,
        now: Instant,
        frame: Option<Frame>,
        allow_start: bool,
    ) -> Result<TickOutcome, CaptureError> {
        let metric = frame.and_then(|frame| self.detector.observe(frame));

        let triggered = metric.is_some_and(|m| m > self.config.motion_threshold);
        if !triggered || !allow_start || !self.cooldown_elapsed(now) {
            return Ok(TickOutcome::Armed { metric });
        }

        self.device.begin_segment()?;
        self.state = RecorderState::Recording { started_at: now };
        self.recording_started_wall = Some(Utc::now());
        tracing::info!(metric = metric.unwrap_or_default(), "Motion detected, recording started");
        Ok(TickOutcome::Started)
    }

    fn finish_recording(
        &mut self,
        now: Instant,
        started_at: Instant,
    ) -> Result<TickOutcome, CaptureError> {
        let result = self.device.end_segment();

        self.last_recording_end = Some(now);
        self.state = RecorderState::Cooldown {
            until: now + self.config.cooldown(),
        };
        let recorded_at = self.recording_started_wall.take().unwrap_or_else(Utc::now);

        let bytes = result?;
        let duration = now.saturating_duration_since(started_at);
        tracing::info!(bytes = bytes.len(), duration_ms = duration.as_millis() as u64, "Recording finished");

        Ok(TickOutcome::Finished(RecordedClip {
            bytes,
            recorded_at,
            duration,
        }))
    }
}
