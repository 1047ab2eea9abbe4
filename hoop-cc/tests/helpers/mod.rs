//! Shared test helpers for hoop-cc integration tests
//!
//! The Analysis Service runs in-process: [`InProcessApi`] feeds uploads
//! straight into the service's progressive session logic, with scripted
//! transport faults in front of it.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;

use hoop_as::analysis::{Analyzer, ClipPayload, StaticAnalyzer};
use hoop_as::config::SessionPolicy;
use hoop_as::session::{ClipSubmission, ProgressiveAnalysisService, ProgressiveError};
use hoop_cc::client::{AnalysisApi, ClipUpload};
use hoop_cc::flow::AssessmentFlow;
use hoop_cc::motion::Frame;
use hoop_cc::recorder::{CaptureDevice, FrameSource, RecorderConfig};
use hoop_cc::resilience::RetryPolicy;
use hoop_cc::session::{SessionManager, STATE_FILE_NAME};
use hoop_cc::{CaptureError, SubmitError};
use hoop_common::api::{AnalysisOutcome, DeleteSessionResponse};
use hoop_common::events::EventBus;

/// Scripted network failure for one call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Connection fails before the service sees the request
    BeforeDelivery,
    /// Service commits the clip, then the response is lost
    AfterCommit,
}

pub fn service() -> Arc<ProgressiveAnalysisService> {
    service_with(Arc::new(StaticAnalyzer::new()))
}

pub fn service_with(analyzer: Arc<dyn Analyzer>) -> Arc<ProgressiveAnalysisService> {
    Arc::new(ProgressiveAnalysisService::new(
        analyzer,
        SessionPolicy::default(),
        Duration::from_secs(60),
        EventBus::new(100),
    ))
}

/// Clips the service holds for `session_id`
pub async fn server_clip_count(service: &ProgressiveAnalysisService, session_id: &str) -> usize {
    service
        .snapshot(session_id)
        .await
        .map(|response| response.feedback_list.len())
        .unwrap_or(0)
}

/// [`AnalysisApi`] backed by an in-process service
pub struct InProcessApi {
    service: Arc<ProgressiveAnalysisService>,
    faults: Mutex<VecDeque<Fault>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: Arc<AtomicUsize>,
}

impl InProcessApi {
    pub fn new(service: Arc<ProgressiveAnalysisService>) -> Self {
        Self {
            service,
            faults: Mutex::new(VecDeque::new()),
            delay: None,
            calls: AtomicUsize::new(0),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Queue faults for the next calls, in order
    pub fn with_faults(self, faults: &[Fault]) -> Self {
        self.faults.lock().unwrap().extend(faults.iter().copied());
        self
    }

    /// Every call takes `delay` before reaching the service
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Counter of calls currently running
    pub fn in_flight(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.in_flight)
    }

    fn next_fault(&self) -> Option<Fault> {
        self.faults.lock().unwrap().pop_front()
    }
}

struct InFlightGuard(Arc<AtomicUsize>);

impl InFlightGuard {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl AnalysisApi for InProcessApi {
    async fn submit_clip(&self, upload: &ClipUpload) -> Result<AnalysisOutcome, SubmitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _guard = InFlightGuard::enter(&self.in_flight);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let fault = self.next_fault();
        if fault == Some(Fault::BeforeDelivery) {
            return Err(SubmitError::Transport("connection refused".to_string()));
        }

        let response = self
            .service
            .submit(ClipSubmission {
                session_id: upload.session_id.clone(),
                clip_id: Some(upload.clip_id.clone()),
                clip: ClipPayload {
                    bytes: Bytes::from(upload.bytes.clone()),
                    mime_type: "video/mp4".to_string(),
                },
            })
            .await
            .map_err(application_error)?;

        if fault == Some(Fault::AfterCommit) {
            return Err(SubmitError::Transport("connection reset by peer".to_string()));
        }

        AnalysisOutcome::try_from(response).map_err(|e| SubmitError::Malformed(e.to_string()))
    }

    async fn delete_session(&self, session_id: &str) -> Result<DeleteSessionResponse, SubmitError> {
        let deleted = self.service.delete(session_id).await;
        Ok(DeleteSessionResponse {
            session_id: session_id.to_string(),
            deleted,
        })
    }
}

fn application_error(err: ProgressiveError) -> SubmitError {
    let status = match &err {
        ProgressiveError::InvalidSessionId(_) => 400,
        ProgressiveError::SessionFull { .. } => 409,
        ProgressiveError::SessionDeleted(_) => 410,
        ProgressiveError::Analysis(_) => 502,
        ProgressiveError::AnalysisTimeout(_) => 504,
    };
    SubmitError::Application {
        status,
        message: err.to_string(),
    }
}

/// Retry policy with the default timings
pub fn retry_policy() -> RetryPolicy {
    RetryPolicy::default()
}

pub const RESET_DELAY: Duration = Duration::from_secs(2);

pub fn open_sessions(dir: &Path) -> SessionManager {
    SessionManager::open(dir.join(STATE_FILE_NAME)).unwrap()
}

pub fn flow(api: Arc<InProcessApi>, dir: &Path) -> AssessmentFlow {
    AssessmentFlow::new(api, open_sessions(dir), retry_policy(), RESET_DELAY)
}

/// Minimal MP4 header that content sniffing recognises as video
pub fn mp4_clip(len: usize) -> Vec<u8> {
    let mut data = vec![0x00, 0x00, 0x00, 0x18];
    data.extend_from_slice(b"ftypisom");
    data.extend_from_slice(&[0x00, 0x00, 0x02, 0x00]);
    data.extend_from_slice(b"isomiso2avc1mp41");
    data.resize(len.max(data.len()), 0);
    data
}

/// Short timings so a full session fits in a few simulated seconds
pub fn fast_recorder() -> RecorderConfig {
    RecorderConfig {
        sample_interval_ms: 100,
        motion_threshold: 30_000,
        recording_duration_ms: 500,
        cooldown_ms: 1_000,
    }
}

/// Frame source that flickers between dark and bright, so every sample
/// after the first shows motion
pub struct FlickerFrames {
    bright: bool,
    unavailable: bool,
}

impl FlickerFrames {
    pub fn new() -> Self {
        Self {
            bright: false,
            unavailable: false,
        }
    }

    /// Source whose camera permission was denied
    pub fn unavailable() -> Self {
        Self {
            bright: false,
            unavailable: true,
        }
    }
}

impl FrameSource for FlickerFrames {
    fn next_frame(&mut self) -> Result<Option<Frame>, CaptureError> {
        if self.unavailable {
            return Err(CaptureError::Unavailable("camera permission denied".to_string()));
        }
        self.bright = !self.bright;
        let level = if self.bright { 255 } else { 0 };
        Ok(Some(Frame::solid(8, 8, [level, level, level, 255])))
    }
}

/// What the fake camera saw
#[derive(Default)]
pub struct CameraLog {
    pub segments_started: AtomicUsize,
    /// Segments started while a submission was running
    pub started_while_busy: AtomicUsize,
}

impl CameraLog {
    pub fn started(&self) -> usize {
        self.segments_started.load(Ordering::SeqCst)
    }

    pub fn started_while_busy(&self) -> usize {
        self.started_while_busy.load(Ordering::SeqCst)
    }
}

/// Capture device producing a small MP4 per segment
pub struct FakeCamera {
    log: Arc<CameraLog>,
    busy: Arc<AtomicUsize>,
}

impl FakeCamera {
    pub fn new(busy: Arc<AtomicUsize>) -> (Self, Arc<CameraLog>) {
        let log = Arc::new(CameraLog::default());
        (
            Self {
                log: Arc::clone(&log),
                busy,
            },
            log,
        )
    }
}

impl CaptureDevice for FakeCamera {
    fn begin_segment(&mut self) -> Result<(), CaptureError> {
        self.log.segments_started.fetch_add(1, Ordering::SeqCst);
        if self.busy.load(Ordering::SeqCst) > 0 {
            self.log.started_while_busy.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    fn end_segment(&mut self) -> Result<Vec<u8>, CaptureError> {
        Ok(mp4_clip(4096))
    }
}
