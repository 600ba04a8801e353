//! Command-line interface definitions.
//!
//! Two subcommands map to the two batch jobs: `collect` gathers headlines
//! into today's dataset, `summarize` turns the latest dataset into a
//! narrative digest. Each is meant to be run on a schedule, independently.

use clap::{Parser, Subcommand};

/// Command-line arguments for headline_digest.
///
/// # Examples
///
/// ```sh
/// # Collect headlines into data/articles_<today>.csv
/// headline_digest collect
///
/// # Also download full article text for each new entry
/// headline_digest collect --scrape-content
///
/// # Summarize the latest dataset into summaries/summary_<date>.txt
/// headline_digest summarize
///
/// # With a config file
/// headline_digest -c config.yaml collect
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file (built-in defaults otherwise)
    #[arg(short, long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch the configured feeds and append new headlines to today's dataset
    Collect {
        /// Download and extract full article text for each new entry
        #[arg(long)]
        scrape_content: bool,
    },
    /// Summarize the most recent daily dataset into a narrative digest
    Summarize {
        /// Character budget per headline batch sent to the model
        #[arg(long)]
        max_chunk_chars: Option<usize>,
    },
}
