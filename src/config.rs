//! Explicit configuration for the Gemini client.
//!
//! The credential is never read from the environment here; [`crate::cli::Cli`]
//! resolves it and hands it over in a [`GeminiConfig`], which keeps the
//! requester testable with arbitrary values.

use crate::cli::Cli;
use thiserror::Error;
use url::Url;

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid API base URL `{base}`: {source}")]
    InvalidBase {
        base: String,
        #[source]
        source: url::ParseError,
    },
}

/// Connection settings for the Generative Language API.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key sent in the [`API_KEY_HEADER`] header. May be empty.
    pub api_key: String,
    /// Model identifier, e.g. `gemini-1.5-flash`.
    pub model: String,
    /// Base URL ending in the API version, e.g. `.../v1beta/`.
    pub api_base: Url,
}

impl GeminiConfig {
    pub fn new(api_key: String, model: String, api_base: &str) -> Result<Self, ConfigError> {
        // Url::join drops the last path segment unless the base ends in '/'.
        let normalized = if api_base.ends_with('/') {
            api_base.to_string()
        } else {
            format!("{api_base}/")
        };
        let api_base = Url::parse(&normalized).map_err(|source| ConfigError::InvalidBase {
            base: api_base.to_string(),
            source,
        })?;
        Ok(Self {
            api_key,
            model,
            api_base,
        })
    }

    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        Self::new(
            cli.api_key.clone().unwrap_or_default(),
            cli.model.clone(),
            &cli.api_base,
        )
    }

    /// `{api_base}models/{model}:generateContent`
    ///
    /// The key is sent in the [`API_KEY_HEADER`] header and never appears in
    /// the URL.
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let path = format!("models/{}:generateContent", self.model);
        self.api_base
            .join(&path)
            .map_err(|source| ConfigError::InvalidBase {
                base: self.api_base.to_string(),
                source,
            })
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("model", &self.model)
            .field("api_base", &self.api_base.as_str())
            .field("api_key_set", &!self.api_key.is_empty())
            .finish()
    }
}
