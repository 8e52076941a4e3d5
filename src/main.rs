//! # Curated Newsletter
//!
//! Builds an HTML news newsletter from RSS/Atom feeds and a top-headlines
//! API: articles are deduplicated, enriched with scraped body text, scored
//! and categorized by keyword and recency, summarized by a generative-text
//! model and rendered into one of several built-in templates.
//!
//! ## Usage
//!
//! ```sh
//! curated_newsletter                      # batch run, output/newsletter.html
//! curated_newsletter generate --template tech --category AI --top-n 5
//! ```
//!
//! ## Architecture
//!
//! The run is a strictly sequential pipeline:
//! 1. **Gathering**: read every configured feed, then the headlines API
//! 2. **Curation**: drop duplicates, scrape each article page for full text
//! 3. **Scoring**: assign a category and a relevance score, sort
//! 4. **Output**: summarize the top articles and render the chosen template

use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod content;
mod curator;
mod error;
mod generator;
mod models;
mod outputs;
mod pipeline;
mod scoring;
mod sources;
mod summary;
mod utils;

use cli::{Cli, Command};
use config::NewsletterConfig;
use outputs::files::{self, BATCH_FILENAME, GENERATE_FILENAME};
use pipeline::{Pipeline, RunOptions};
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("curated_newsletter starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.config, %args.output_dir, ?args.command, "Parsed CLI arguments");

    // Early check: ensure the output dir is writable
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let config = NewsletterConfig::load(args.config.as_deref()).await?;
    let pipeline = Pipeline::from_config(config, args.newsapi_key, args.gemini_api_key);
    let output_dir = Path::new(&args.output_dir);

    match args.command.unwrap_or(Command::Batch) {
        Command::Batch => {
            let html = pipeline.run(&RunOptions::batch()).await?;
            files::write_newsletter(output_dir, BATCH_FILENAME, &html).await?;
        }
        Command::Generate(generate) => {
            let options = generate.run_options();
            let html = match pipeline.run(&options).await {
                Ok(html) => html,
                Err(e) => {
                    error!(error = %e, template = %options.template, "Newsletter generation failed");
                    return Err(e.into());
                }
            };
            files::write_newsletter(output_dir, GENERATE_FILENAME, &html).await?;
            if let Some(path) = &generate.save_as {
                files::save_copy(path, &html).await?;
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
