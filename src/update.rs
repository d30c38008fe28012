//! Document updater: decode the model response, splice it into the HTML
//! file and write the file back.
//!
//! The response is fully decoded before the document is opened, so a
//! malformed response can never leave the file half-rewritten. The write is
//! a plain overwrite with no backup or atomic rename.

use crate::article::{parse_response, Article, DecodeError};
use crate::document::{render_document, Region};
use crate::utils::{looks_truncated, truncate_for_log};
use chrono::NaiveDate;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{error, info, instrument};

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Outcome of one document update.
#[derive(Debug)]
pub struct Updated {
    pub article: Article,
    /// The rewritten document text.
    pub html: String,
    /// Regions that were not found and therefore kept their old content.
    pub missed: Vec<Region>,
    /// `false` on a dry run.
    pub written: bool,
}

impl Updated {
    /// Completion line printed once the run has finished.
    pub fn summary_line(&self) -> String {
        if self.written {
            format!("✓ Article updated: {}", self.article.headline)
        } else {
            format!("✓ Dry run, document not written: {}", self.article.headline)
        }
    }
}

/// Decode `raw`, splice it into the document at `path`, and persist it.
///
/// With `dry_run` set the rewritten text is returned but the file is left
/// as it was.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display(), %date, raw_bytes = raw.len()))]
pub async fn update_document(
    path: impl AsRef<Path>,
    raw: &str,
    date: NaiveDate,
    dry_run: bool,
) -> Result<Updated, UpdateError> {
    let path = path.as_ref();

    let article = match parse_response(raw) {
        Ok(article) => article,
        Err(e) => {
            let truncated = matches!(&e, DecodeError::InvalidJson(inner) if looks_truncated(inner));
            error!(
                error = %e,
                truncated,
                response_preview = %truncate_for_log(raw, 300),
                "Model returned non-conforming JSON; document left untouched"
            );
            return Err(e.into());
        }
    };
    info!(headline = %article.headline, "Decoded article");

    let html = fs::read_to_string(path)
        .await
        .map_err(|source| UpdateError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let rendered = render_document(&html, &article, date);

    if dry_run {
        info!("Dry run; not writing document");
    } else {
        fs::write(path, rendered.html.as_bytes())
            .await
            .map_err(|source| UpdateError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        info!(bytes = rendered.html.len(), "Wrote document");
    }

    Ok(Updated {
        article,
        html: rendered.html,
        missed: rendered.missed,
        written: !dry_run,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::tests::sample_json;
    use crate::document::tests::BASELINE;
    use std::fs as stdfs;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 7).unwrap()
    }

    fn baseline_file() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        stdfs::write(&path, BASELINE).unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn test_update_rewrites_file() {
        let (_dir, path) = baseline_file();
        let raw = format!("```json\n{}\n```", sample_json());

        let updated = update_document(&path, &raw, date(), false).await.unwrap();

        let on_disk = stdfs::read_to_string(&path).unwrap();
        assert!(updated.written);
        assert_eq!(
            updated.summary_line(),
            format!("✓ Article updated: {}", updated.article.headline)
        );
        assert!(updated.missed.is_empty());
        assert_eq!(on_disk, updated.html);
        assert!(on_disk.contains(&updated.article.headline));
        assert!(on_disk.contains("December 7, 2025 · 8 min read"));
    }

    #[tokio::test]
    async fn test_invalid_json_leaves_file_untouched() {
        let (_dir, path) = baseline_file();

        let err = update_document(&path, "Sorry, I can't help with that.", date(), false)
            .await
            .unwrap_err();

        assert!(matches!(err, UpdateError::Decode(DecodeError::InvalidJson(_))));
        assert_eq!(stdfs::read_to_string(&path).unwrap(), BASELINE);
    }

    #[tokio::test]
    async fn test_missing_key_leaves_file_untouched() {
        let (_dir, path) = baseline_file();
        let mut value = sample_json();
        value.as_object_mut().unwrap().remove("source_description");

        let err = update_document(&path, &value.to_string(), date(), false)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            UpdateError::Decode(DecodeError::MissingKey("source_description"))
        ));
        assert_eq!(stdfs::read_to_string(&path).unwrap(), BASELINE);
    }

    #[tokio::test]
    async fn test_decode_failure_precedes_file_access() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist.html");

        let err = update_document(&missing, "{", date(), false).await.unwrap_err();

        assert!(matches!(err, UpdateError::Decode(_)));
    }

    #[tokio::test]
    async fn test_missing_document_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist.html");

        let err = update_document(&missing, &sample_json().to_string(), date(), false)
            .await
            .unwrap_err();

        assert!(matches!(err, UpdateError::Read { .. }));
        assert!(!missing.exists());
    }

    #[tokio::test]
    async fn test_dry_run_does_not_write() {
        let (_dir, path) = baseline_file();

        let updated = update_document(&path, &sample_json().to_string(), date(), true)
            .await
            .unwrap();

        assert!(!updated.written);
        assert!(updated.summary_line().starts_with("✓ Dry run, document not written:"));
        assert_ne!(updated.html, BASELINE);
        assert_eq!(stdfs::read_to_string(&path).unwrap(), BASELINE);
    }

    #[tokio::test]
    async fn test_second_update_overwrites_first() {
        let (_dir, path) = baseline_file();
        let mut second = sample_json();
        second["headline"] = serde_json::json!("Second Story Wins");
        second["kicker"] = serde_json::json!("AI · LABS");

        update_document(&path, &sample_json().to_string(), date(), false)
            .await
            .unwrap();
        update_document(&path, &second.to_string(), date(), false)
            .await
            .unwrap();

        let on_disk = stdfs::read_to_string(&path).unwrap();
        assert!(on_disk.contains(r#"<h1 class="article-headline">Second Story Wins</h1>"#));
        assert!(on_disk.contains(r#"<span class="article-kicker">AI · LABS</span>"#));
        assert!(!on_disk.contains("Error-Corrected Qubits Cross a Threshold"));
        assert!(!on_disk.contains("QUANTUM · HARDWARE"));
    }

    #[tokio::test]
    async fn test_captured_response_replays_offline() {
        let (dir, path) = baseline_file();
        let reply = dir.path().join("reply.txt");
        stdfs::write(&reply, format!("```json\n{}\n```\n", sample_json())).unwrap();

        let raw = crate::api::load_captured_response(&reply).await.unwrap();
        let updated = update_document(&path, &raw, date(), false).await.unwrap();

        let on_disk = stdfs::read_to_string(&path).unwrap();
        assert!(on_disk.contains(r#"<h1 class="article-headline">Error-Corrected Qubits Cross a Threshold</h1>"#));
        assert!(updated.missed.is_empty());
    }
}
