//! # The Daily Signal
//!
//! Generates the day's lead article for The Daily Signal, a site covering
//! AI, quantum computing and technology policy, and splices it into the
//! site's `index.html`.
//!
//! ## Usage
//!
//! ```sh
//! GEMINI_API_KEY=... daily_signal
//! ```
//!
//! ## Pipeline
//!
//! 1. **Request**: build a dated prompt and ask Gemini for the article as JSON
//! 2. **Decode**: strip an optional code fence and decode the nine article fields
//! 3. **Update**: replace the kicker, headline, subhead, timestamp, body and
//!    sources regions of the document and write it back in place

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod api;
mod article;
mod cli;
mod config;
mod document;
mod prompt;
mod update;
mod utils;

use api::{load_captured_response, request_article, GeminiClient};
use cli::Cli;
use config::GeminiConfig;
use update::update_document;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(html_path = %args.html_path, model = %args.model, dry_run = args.dry_run, "Parsed CLI arguments");

    let config = GeminiConfig::from_cli(&args)?;
    if config.api_key.is_empty() {
        warn!("GEMINI_API_KEY is not set; the API will reject the request");
    }

    let today = Local::now().date_naive();

    // ---- Request ----
    println!("Generating new article...");
    let raw = match &args.response_file {
        Some(path) => {
            info!(path = %path, "Using captured response instead of calling the API");
            load_captured_response(path).await?
        }
        None => {
            let client = GeminiClient::new(config);
            request_article(&client, today).await?
        }
    };

    // ---- Update ----
    println!("Updating {}...", args.html_path);
    let updated = update_document(&args.html_path, &raw, today, args.dry_run).await?;
    if !updated.missed.is_empty() {
        let regions: Vec<String> = updated.missed.iter().map(ToString::to_string).collect();
        warn!(missed = ?regions, "Some regions kept their previous content");
    }
    if args.dry_run {
        println!("{}", updated.html);
    }

    println!("{}", updated.summary_line());
    println!("Done!");

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        written = updated.written,
        "Execution complete"
    );
    Ok(())
}
