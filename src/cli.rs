//! Command-line interface definitions for The Daily Signal generator.
//!
//! Every option has a default or an environment fallback, so the usual
//! scheduled invocation is simply `daily_signal` with no arguments.

use clap::Parser;

/// Command-line arguments for the article generator.
///
/// # Examples
///
/// ```sh
/// # Regular daily run against ./index.html
/// GEMINI_API_KEY=... daily_signal
///
/// # Replay a captured model response without touching the network
/// daily_signal --response-file response.json --dry-run
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// HTML document to rewrite in place
    #[arg(long, default_value = "index.html")]
    pub html_path: String,

    /// Gemini model identifier
    #[arg(long, env = "GEMINI_MODEL", default_value = "gemini-1.5-flash")]
    pub model: String,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the Generative Language API
    #[arg(
        long,
        env = "GEMINI_API_BASE",
        default_value = "https://generativelanguage.googleapis.com/v1beta/"
    )]
    pub api_base: String,

    /// Use a previously captured raw model response instead of calling the API
    #[arg(long)]
    pub response_file: Option<String>,

    /// Print the rewritten document instead of writing it back
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["daily_signal"]);

        assert_eq!(cli.html_path, "index.html");
        assert!(cli.response_file.is_none());
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "daily_signal",
            "--html-path",
            "/srv/site/index.html",
            "--model",
            "gemini-2.0-flash",
            "--api-key",
            "secret",
            "--response-file",
            "captured.txt",
            "--dry-run",
        ]);

        assert_eq!(cli.html_path, "/srv/site/index.html");
        assert_eq!(cli.model, "gemini-2.0-flash");
        assert_eq!(cli.api_key.as_deref(), Some("secret"));
        assert_eq!(cli.response_file.as_deref(), Some("captured.txt"));
        assert!(cli.dry_run);
    }
}
