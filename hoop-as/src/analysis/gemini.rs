//! Gemini `generateContent` client
//!
//! Sends the clip inline (base64) alongside the prompt and returns the
//! concatenated text parts of the first candidate.

use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{AnalysisError, Analyzer, ClipPayload};
use crate::config::GeminiConfig;

const USER_AGENT: &str = concat!("hoop-coach/", env!("CARGO_PKG_VERSION"));

/// generateContent request body
#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

/// generateContent response body (only the fields we read)
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Result<String, AnalysisError> {
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            Err(AnalysisError::EmptyResponse)
        } else {
            Ok(text)
        }
    }
}

/// Gemini API client
pub struct GeminiAnalyzer {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiAnalyzer {
    pub fn new(config: &GeminiConfig, api_key: String, timeout: Duration) -> Result<Self, AnalysisError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );

        Ok(Self {
            http_client,
            endpoint,
            api_key,
        })
    }

    async fn generate(&self, parts: Vec<RequestPart<'_>>) -> Result<String, AnalysisError> {
        let body = GenerateContentRequest {
            contents: vec![Content { parts }],
        };

        let response = self
            .http_client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::Parse(e.to_string()))?;

        parsed.into_text()
    }
}

#[async_trait::async_trait]
impl Analyzer for GeminiAnalyzer {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn analyze_clip(&self, clip: &ClipPayload, prompt: &str) -> Result<String, AnalysisError> {
        tracing::debug!(
            bytes = clip.bytes.len(),
            mime_type = %clip.mime_type,
            "Sending clip to Gemini"
        );

        let data = base64::engine::general_purpose::STANDARD.encode(&clip.bytes);
        self.generate(vec![
            RequestPart::Text { text: prompt },
            RequestPart::InlineData {
                inline_data: InlineData {
                    mime_type: &clip.mime_type,
                    data,
                },
            },
        ])
        .await
    }

    async fn summarize(&self, prompt: &str) -> Result<String, AnalysisError> {
        self.generate(vec![RequestPart::Text { text: prompt }]).await
    }
}
