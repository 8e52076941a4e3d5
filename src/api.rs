//! Generative-text API interaction.
//!
//! The pipeline only needs "prompt in, text out", expressed by the
//! [`AskAsync`] trait so tests can substitute a deterministic fake.
//! [`GeminiClient`] implements it against the Gemini `generateContent` REST
//! endpoint. Each prompt is sent exactly once; the caller decides what a
//! failure means.

use crate::config::SummarizerConfig;
use crate::error::{NewsletterError, Result};
use crate::utils::truncate_for_log;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Trait for async LLM interaction.
///
/// Implementors send a prompt to a text generator and return its completion.
pub trait AskAsync {
    /// The type of response returned by the LLM.
    type Response;

    /// Send `text` as a prompt and wait for the completion.
    async fn ask(&self, text: &str) -> Result<Self::Response>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
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

impl GenerateResponse {
    /// Text of the first candidate, parts concatenated and trimmed.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

/// Gemini `generateContent` client.
pub struct GeminiClient {
    http: Client,
    api_key: Option<String>,
    config: SummarizerConfig,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, config: SummarizerConfig) -> Self {
        Self {
            http: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            config,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.config.model)
            .field("temperature", &self.config.temperature)
            .field("has_api_key", &self.api_key.is_some())
            .finish()
    }
}

impl AskAsync for GeminiClient {
    type Response = String;

    #[instrument(level = "info", skip_all, fields(model = %self.config.model))]
    async fn ask(&self, text: &str) -> Result<Self::Response> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(NewsletterError::MissingApiKey("GEMINI_API_KEY"))?;

        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
            },
        };

        let t0 = Instant::now();
        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, elapsed_ms = t0.elapsed().as_millis() as u64, "API call failed");
            return Err(NewsletterError::Api {
                status: status.as_u16(),
                body: truncate_for_log(&body, 300),
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        debug!(elapsed_ms = t0.elapsed().as_millis() as u64, "API call succeeded");
        parsed.into_text().ok_or(NewsletterError::EmptyResponse)
    }
}
