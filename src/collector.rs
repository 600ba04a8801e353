//! The collector batch job.
//!
//! One invocation fetches every configured feed in order, keeps the entries
//! whose links are not already in today's dataset, optionally enriches them
//! with full article text, and rewrites the dataset with the new rows
//! appended. Repeating a run on the same day is additive and
//! non-duplicating: the seen-link set is rebuilt from the file each time.

use crate::config::Config;
use crate::models::ArticleRecord;
use crate::utils::{ensure_writable_dir, USER_AGENT};
use crate::{dataset, feeds, scrape};
use chrono::Local;
use itertools::Itertools;
use std::collections::HashSet;
use std::error::Error;
use std::time::Duration;
use tracing::{info, instrument, warn};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

fn http_client() -> Result<reqwest::Client, Box<dyn Error>> {
    Ok(reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .build()?)
}

/// Run one collection pass for the current day.
#[instrument(level = "info", skip_all)]
pub async fn run(config: &Config) -> Result<(), Box<dyn Error>> {
    ensure_writable_dir(&config.data_dir).await?;

    let today = Local::now().date_naive();
    let path = dataset::dataset_path(&config.data_dir, today);
    let existing = dataset::load_if_exists(&path).await?;
    let mut seen: HashSet<String> = existing.iter().map(|r| r.link.clone()).collect();
    info!(
        path = %path.display(),
        existing_rows = existing.len(),
        "Loaded today's dataset"
    );

    let client = http_client()?;
    let mut fresh: Vec<ArticleRecord> = Vec::new();

    for source in &config.feeds {
        // A source that fails to fetch or parse contributes zero entries;
        // the remaining sources still run.
        let entries = match feeds::fetch_entries(&client, &source.url).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(source = %source.name, error = %e, "Feed fetch failed; skipping source");
                continue;
            }
        };
        let total = entries.len();
        let unseen = feeds::select_unseen(&mut seen, entries);
        info!(source = %source.name, entries = total, new = unseen.len(), "Feed processed");

        for item in unseen {
            let content = if config.scrape_content {
                match scrape::fetch_article_text(&client, &item.link).await {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(
                            link = %item.link,
                            error = %e,
                            "Article fetch failed; keeping record with empty content"
                        );
                        String::new()
                    }
                }
            } else {
                String::new()
            };
            fresh.push(ArticleRecord::from_item(&source.name, item, content, Local::now()));
        }
    }

    if fresh.is_empty() {
        info!("No new articles found");
        return Ok(());
    }

    let by_source = fresh.iter().counts_by(|r| r.source.as_str());
    info!(new_rows = fresh.len(), ?by_source, "Collected new articles");

    let mut combined = existing;
    combined.extend(fresh);
    dataset::write(&path, &combined).await?;
    info!(path = %path.display(), total_rows = combined.len(), "Dataset updated");

    Ok(())
}
