//! The generated article and the normalize-then-decode pipeline that turns
//! raw model output into one.
//!
//! Decoding is split in two stages so each can be exercised on its own:
//!
//! 1. [`normalize_response`] trims whitespace and strips an optional
//!    markdown code fence (with or without a language tag).
//! 2. [`decode_article`] parses the remaining text as a JSON object and
//!    checks that all nine [`REQUIRED_KEYS`] are present and string-typed.
//!
//! Both stages are pure; no file is touched until an [`Article`] exists.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Keys the model is asked to return, in prompt order.
pub const REQUIRED_KEYS: [&str; 9] = [
    "kicker",
    "headline",
    "subhead",
    "lede_first_letter",
    "lede_rest",
    "body_html",
    "source_url",
    "source_name",
    "source_description",
];

/// One generated news article. Lives for a single run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Article {
    /// Short category label shown above the headline, e.g. `AI · POLICY`.
    pub kicker: String,
    pub headline: String,
    pub subhead: String,
    /// Rendered as the drop capital of the lede paragraph.
    pub lede_first_letter: String,
    /// Appended directly after the drop capital, no separator.
    pub lede_rest: String,
    /// Trusted markup fragment, inserted verbatim.
    pub body_html: String,
    pub source_url: String,
    pub source_name: String,
    pub source_description: String,
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("response JSON is not an object")]
    NotAnObject,
    #[error("response is missing required key `{0}`")]
    MissingKey(&'static str),
    #[error("required key `{0}` is not a string")]
    NotAString(&'static str),
}

static OPENING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```[A-Za-z0-9_+-]*[ \t]*\r?\n?").unwrap());
static CLOSING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n?```$").unwrap());

/// Trim the response and strip a surrounding code fence if there is one.
///
/// Only the plain fenced/unfenced cases are handled; nested or unbalanced
/// fences are left for the decoder to reject.
pub fn normalize_response(raw: &str) -> &str {
    let text = raw.trim();
    if !text.starts_with("```") {
        return text;
    }
    let opening = OPENING_FENCE.find(text).map_or(0, |m| m.end());
    let inner = &text[opening..];
    let closing = CLOSING_FENCE.find(inner).map_or(inner.len(), |m| m.start());
    debug!(opening, closing, "Stripped code fence from response");
    inner[..closing].trim()
}

/// Decode normalized response text into an [`Article`].
pub fn decode_article(text: &str) -> Result<Article, DecodeError> {
    let value: Value = serde_json::from_str(text)?;
    let object = value.as_object().ok_or(DecodeError::NotAnObject)?;

    for key in REQUIRED_KEYS {
        match object.get(key) {
            None => return Err(DecodeError::MissingKey(key)),
            Some(Value::String(_)) => {}
            Some(_) => return Err(DecodeError::NotAString(key)),
        }
    }

    let article: Article = serde_json::from_value(value)?;
    if article.lede_first_letter.chars().count() != 1 {
        warn!(
            lede_first_letter = %article.lede_first_letter,
            "lede_first_letter is not a single character; using it as given"
        );
    }
    Ok(article)
}

/// [`normalize_response`] followed by [`decode_article`].
pub fn parse_response(raw: &str) -> Result<Article, DecodeError> {
    decode_article(normalize_response(raw))
}
