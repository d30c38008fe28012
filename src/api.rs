//! Content requester: sends the daily prompt to Gemini and returns the raw
//! text it produces.
//!
//! # Architecture
//!
//! - [`AskAsync`]: the seam between prompt construction and transport, so
//!   tests can substitute a canned responder for the network.
//! - [`GeminiClient`]: `reqwest` implementation against the Generative
//!   Language `generateContent` endpoint.
//! - [`request_article`]: builds the prompt for a date and asks once.
//!
//! One attempt per run and no client timeout; failures surface to the
//! caller untouched.

use crate::config::{ConfigError, GeminiConfig, API_KEY_HEADER};
use crate::prompt::build_prompt;
use crate::utils::truncate_for_log;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("request to Gemini failed: {0}")]
    Transport(reqwest::Error),
    #[error("failed to read captured response {}: {source}", path.display())]
    Captured {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Gemini API error ({status}): {message}")]
    Service { status: u16, message: String },
    #[error("Gemini returned no content")]
    Empty,
}

/// Trait for async text generation.
///
/// Implementors take a prompt and return whatever text the model produced.
pub trait AskAsync {
    async fn ask(&self, prompt: &str) -> Result<String, ApiError>;
}

#[derive(Deserialize, Debug)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize, Debug)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Debug)]
struct GeminiRequest<'a> {
    contents: [GeminiRequestContent<'a>; 1],
}

#[derive(Serialize, Debug)]
struct GeminiRequestContent<'a> {
    parts: [GeminiRequestPart<'a>; 1],
}

#[derive(Serialize, Debug)]
struct GeminiRequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize, Debug)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize, Debug)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiErrorBody>,
}

#[derive(Deserialize, Debug)]
struct GeminiErrorBody {
    #[serde(default)]
    code: u16,
    message: String,
}

impl<'a> GeminiRequest<'a> {
    fn new(prompt: &'a str) -> Self {
        Self {
            contents: [GeminiRequestContent {
                parts: [GeminiRequestPart { text: prompt }],
            }],
        }
    }
}

impl GeminiResponse {
    /// Text of the first candidate, all parts concatenated.
    fn into_text(self, status: u16) -> Result<String, ApiError> {
        if let Some(err) = self.error {
            let status = if err.code == 0 { status } else { err.code };
            return Err(ApiError::Service {
                status,
                message: err.message,
            });
        }
        let text: String = self
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(ApiError::Empty);
        }
        Ok(text)
    }
}

/// `reqwest`-backed Gemini client.
#[derive(Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

impl AskAsync for GeminiClient {
    #[instrument(level = "info", skip_all, fields(model = %self.config.model))]
    async fn ask(&self, prompt: &str) -> Result<String, ApiError> {
        let t0 = Instant::now();
        let url = self.config.endpoint()?;

        let res = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&GeminiRequest::new(prompt))
            .send()
            .await
            .map_err(transport)?;
        let status = res.status();
        let body = res.text().await.map_err(transport)?;
        let dt = t0.elapsed();

        let parsed = match serde_json::from_str::<GeminiResponse>(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(
                    status = status.as_u16(),
                    error = %e,
                    body_preview = %truncate_for_log(&body, 300),
                    "Unreadable Gemini response"
                );
                return Err(ApiError::Service {
                    status: status.as_u16(),
                    message: truncate_for_log(&body, 300),
                });
            }
        };

        let result = parsed.into_text(status.as_u16()).and_then(|text| {
            if status.is_success() {
                Ok(text)
            } else {
                Err(ApiError::Service {
                    status: status.as_u16(),
                    message: truncate_for_log(&text, 300),
                })
            }
        });
        match &result {
            Ok(text) => info!(
                elapsed_ms = dt.as_millis() as u64,
                bytes = text.len(),
                "Gemini call succeeded"
            ),
            Err(e) => warn!(elapsed_ms = dt.as_millis() as u64, error = %e, "Gemini call failed"),
        }
        result
    }
}

fn transport(e: reqwest::Error) -> ApiError {
    ApiError::Transport(e.without_url())
}

/// Read a previously captured raw model response in place of a live call.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub async fn load_captured_response(path: impl AsRef<Path>) -> Result<String, ApiError> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ApiError::Captured {
            path: path.to_path_buf(),
            source,
        })?;
    info!(bytes = raw.len(), "Loaded captured response");
    Ok(raw)
}

/// Ask for the article of `date` and return the model's raw text.
#[instrument(level = "info", skip_all, fields(%date))]
pub async fn request_article<A: AskAsync>(asker: &A, date: NaiveDate) -> Result<String, ApiError> {
    let prompt = build_prompt(date);
    info!(prompt_bytes = prompt.len(), "Requesting article");
    let res = asker.ask(&prompt).await;
    if let Err(e) = &res {
        error!(error = %e, "Article request failed");
    }
    res
}
