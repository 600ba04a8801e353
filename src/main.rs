//! # Headline Digest
//!
//! A two-part batch pipeline that keeps a rolling news digest for informal
//! macro/markets monitoring:
//!
//! 1. **Collector** (`collect`): fetches a fixed set of RSS feeds, drops
//!    entries whose links are already in today's dataset, optionally pulls
//!    full article text, and appends the rest to
//!    `data/articles_<YYYY-MM-DD>.csv`.
//! 2. **Summarizer** (`summarize`): loads the latest dataset (today's,
//!    falling back to yesterday's), batches its headlines under a character
//!    budget, asks an OpenAI-compatible model for one summary per batch and
//!    a final overarching synthesis, and writes it to
//!    `summaries/summary_<YYYY-MM-DD>.txt`.
//!
//! Both jobs are short-lived, sequential, and safe to re-run: collection is
//! idempotent with respect to already-seen links, and summaries are
//! replaced atomically.
//!
//! ## Usage
//!
//! ```sh
//! headline_digest collect
//! headline_digest summarize
//! ```

use clap::Parser;
use std::error::Error;
use tracing::{debug, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod api;
mod cli;
mod collector;
mod config;
mod dataset;
mod feeds;
mod models;
mod scrape;
mod summarizer;
mod utils;

use cli::{Cli, Command};
use config::Config;

#[tokio::main]
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
    info!("headline_digest starting up");

    let args = Cli::parse();
    debug!(?args.config, "Parsed CLI arguments");

    let mut config = Config::load(args.config.as_deref())?;

    match args.command {
        Command::Collect { scrape_content } => {
            if scrape_content {
                config.scrape_content = true;
            }
            collector::run(&config).await?;
        }
        Command::Summarize { max_chunk_chars } => {
            if let Some(budget) = max_chunk_chars {
                config.chunk_max_chars = budget;
            }
            summarizer::run(&config).await?;
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
