//! Shared test helpers for hoop-as integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, Response};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;

use hoop_as::analysis::{AnalysisError, Analyzer, ClipPayload};
use hoop_as::config::ServiceConfig;
use hoop_as::AppState;

pub const BOUNDARY: &str = "hoop-test-boundary";

/// Analyzer with scripted behaviour that counts its calls
pub struct ScriptedAnalyzer {
    feedback: String,
    summary: Option<String>,
    /// Number of leading `analyze_clip` calls that fail
    fail_first: usize,
    delay: Option<Duration>,
    summary_delay: Option<Duration>,
    clip_calls: AtomicUsize,
    summary_calls: AtomicUsize,
}

impl ScriptedAnalyzer {
    pub fn new(feedback: &str) -> Self {
        Self {
            feedback: feedback.to_string(),
            summary: None,
            fail_first: 0,
            delay: None,
            summary_delay: None,
            clip_calls: AtomicUsize::new(0),
            summary_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary = Some(summary.to_string());
        self
    }

    pub fn failing_first(mut self, count: usize) -> Self {
        self.fail_first = count;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// `summarize` takes `delay` before answering
    pub fn with_summary_delay(mut self, delay: Duration) -> Self {
        self.summary_delay = Some(delay);
        self
    }

    pub fn clip_calls(&self) -> usize {
        self.clip_calls.load(Ordering::SeqCst)
    }

    pub fn summary_calls(&self) -> usize {
        self.summary_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Analyzer for ScriptedAnalyzer {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn analyze_clip(&self, _clip: &ClipPayload, _prompt: &str) -> Result<String, AnalysisError> {
        let call = self.clip_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if call < self.fail_first {
            return Err(AnalysisError::Api {
                status: 503,
                message: "model overloaded".to_string(),
            });
        }
        Ok(self.feedback.clone())
    }

    async fn summarize(&self, _prompt: &str) -> Result<String, AnalysisError> {
        self.summary_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.summary_delay {
            tokio::time::sleep(delay).await;
        }
        self.summary.clone().ok_or(AnalysisError::EmptyResponse)
    }
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

/// Multipart form body
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"clip.mp4\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, uri: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}

/// Progressive submission request
pub fn progressive_request(session_id: &str, clip_id: Option<&str>) -> Request<Body> {
    let mut form = MultipartBody::new().text("sessionId", session_id);
    if let Some(clip_id) = clip_id {
        form = form.text("clipId", clip_id);
    }
    form.file("video", &mp4_clip(512))
        .into_request("/progressive_analysis")
}

/// App state around `analyzer` with the given config
pub fn app_state(config: &ServiceConfig, analyzer: Arc<ScriptedAnalyzer>) -> AppState {
    AppState::new(config, analyzer)
}

/// Collect and decode a JSON response body
pub async fn json_body<T: DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
