//! Analysis Service HTTP client

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use std::time::Duration;

use hoop_common::api::{
    AnalysisOutcome, DeleteSessionResponse, ErrorBody, ProgressiveAnalysisResponse, FIELD_CLIP_ID,
    FIELD_SESSION_ID, FIELD_VIDEO,
};

use crate::error::SubmitError;

const USER_AGENT: &str = concat!("hoop-cc/", env!("CARGO_PKG_VERSION"));

/// One clip ready to send
#[derive(Debug, Clone)]
pub struct ClipUpload {
    pub session_id: String,
    /// Idempotency token; identical on every attempt for this clip
    pub clip_id: String,
    pub bytes: Vec<u8>,
    pub file_name: String,
}

/// Calls the client makes on the Analysis Service
#[async_trait::async_trait]
pub trait AnalysisApi: Send + Sync {
    /// POST /progressive_analysis
    async fn submit_clip(&self, upload: &ClipUpload) -> Result<AnalysisOutcome, SubmitError>;

    /// DELETE /session/{sessionId}
    async fn delete_session(&self, session_id: &str) -> Result<DeleteSessionResponse, SubmitError>;
}

/// reqwest implementation of [`AnalysisApi`]
pub struct AnalysisClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl AnalysisClient {
    /// Per-attempt deadlines are applied by the caller; only connecting is
    /// bounded here.
    pub fn new(base_url: &str, connect_timeout: Duration) -> Result<Self, SubmitError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait::async_trait]
impl AnalysisApi for AnalysisClient {
    async fn submit_clip(&self, upload: &ClipUpload) -> Result<AnalysisOutcome, SubmitError> {
        let video = Part::bytes(upload.bytes.clone()).file_name(upload.file_name.clone());
        let form = Form::new()
            .part(FIELD_VIDEO, video)
            .text(FIELD_SESSION_ID, upload.session_id.clone())
            .text(FIELD_CLIP_ID, upload.clip_id.clone());

        tracing::debug!(
            session_id = %upload.session_id,
            clip_id = %upload.clip_id,
            bytes = upload.bytes.len(),
            "Submitting clip"
        );

        let response = self
            .http_client
            .post(self.url("/progressive_analysis"))
            .multipart(form)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(application_error(status, response).await);
        }

        let payload: ProgressiveAnalysisResponse = read_json(response).await?;

        AnalysisOutcome::try_from(payload).map_err(|e| SubmitError::Malformed(e.to_string()))
    }

    async fn delete_session(&self, session_id: &str) -> Result<DeleteSessionResponse, SubmitError> {
        let response = self
            .http_client
            .delete(self.url(&format!("/session/{session_id}")))
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(application_error(status, response).await);
        }

        read_json(response).await
    }
}

/// A body cut short is a transport failure; a complete body that does not
/// parse is malformed.
async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, SubmitError> {
    let body = response
        .bytes()
        .await
        .map_err(|e| SubmitError::Transport(e.to_string()))?;
    serde_json::from_slice(&body).map_err(|e| SubmitError::Malformed(e.to_string()))
}

fn classify_send_error(err: reqwest::Error) -> SubmitError {
    SubmitError::Transport(err.to_string())
}

/// Error status → `Application`, using the JSON error envelope when present
async fn application_error(status: StatusCode, response: reqwest::Response) -> SubmitError {
    let body = response.text().await.unwrap_or_default();
    SubmitError::Application {
        status: status.as_u16(),
        message: error_message(status, &body),
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorBody>(body) {
        return envelope.error.message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_from_envelope() {
        let body = r#"{"error":{"code":"SESSION_FULL","message":"Session s1 already holds 6 clips"}}"#;
        assert_eq!(
            error_message(StatusCode::CONFLICT, body),
            "Session s1 already holds 6 clips"
        );
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "upstream exploded\n"),
            "upstream exploded"
        );
        assert_eq!(error_message(StatusCode::GONE, ""), "Gone");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = AnalysisClient::new("http://127.0.0.1:5731/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:5731");
        assert_eq!(
            client.url("/progressive_analysis"),
            "http://127.0.0.1:5731/progressive_analysis"
        );
    }

    fn upload() -> ClipUpload {
        ClipUpload {
            session_id: "s1".to_string(),
            clip_id: "c1".to_string(),
            bytes: vec![0; 8],
            file_name: "clip.webm".to_string(),
        }
    }

    /// One-shot HTTP server: reads the whole multipart request, writes `reply`
    /// verbatim and closes the connection.
    async fn serve_once(reply: &'static [u8]) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            while !(request.ends_with(b"--\r\n") || request.ends_with(b"0\r\n\r\n")) {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(reply).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_truncated_body_is_transport_error() {
        let url = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 500\r\n\r\n{\"clip",
        )
        .await;
        let client = AnalysisClient::new(&url, Duration::from_secs(1)).unwrap();

        let err = client.submit_clip(&upload()).await.unwrap_err();

        assert!(matches!(err, SubmitError::Transport(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_complete_invalid_body_is_malformed() {
        let url = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 9\r\nConnection: close\r\n\r\nnot json!",
        )
        .await;
        let client = AnalysisClient::new(&url, Duration::from_secs(1)).unwrap();

        let err = client.submit_clip(&upload()).await.unwrap_err();

        assert!(matches!(err, SubmitError::Malformed(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // Port 9 (discard) on localhost is closed in test environments
        let client = AnalysisClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let err = client.submit_clip(&upload()).await.unwrap_err();
        assert!(matches!(err, SubmitError::Transport(_)));
    }
}
