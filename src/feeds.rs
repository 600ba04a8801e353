//! Feed fetching and parsing.
//!
//! Each configured source is fetched over HTTP and handed to `feed-rs`,
//! which copes with both RSS and Atom. A source that fails to fetch or
//! parse yields an error here; the collector turns that into "zero entries
//! for this source" and moves on.

use crate::models::FeedItem;
use std::collections::HashSet;
use std::error::Error;
use tracing::{debug, instrument};
use url::Url;

/// Fetch `feed_url` and parse it into feed entries.
///
/// Entries without a link are skipped: the link is the dedup key and a
/// record without one cannot be tracked. Relative entry links are resolved
/// against the feed URL.
#[instrument(level = "info", skip_all, fields(url = %feed_url))]
pub async fn fetch_entries(
    client: &reqwest::Client,
    feed_url: &str,
) -> Result<Vec<FeedItem>, Box<dyn Error>> {
    let base = Url::parse(feed_url)?;

    let response = client.get(feed_url).send().await?.error_for_status()?;
    let bytes = response.bytes().await?;
    let parsed = feed_rs::parser::parse(&bytes[..])?;

    let mut items = Vec::new();
    for entry in parsed.entries {
        let Some(href) = entry.links.first().map(|l| l.href.clone()) else {
            debug!(entry_id = %entry.id, "Skipping feed entry without a link");
            continue;
        };
        let link = match base.join(&href) {
            Ok(resolved) => resolved.to_string(),
            Err(_) => href,
        };
        let title = entry.title.map(|t| t.content).unwrap_or_default();
        let published = entry.published.map(|d| d.to_rfc2822());

        items.push(FeedItem {
            title,
            link,
            published,
        });
    }

    debug!(count = items.len(), "Parsed feed entries");
    Ok(items)
}

/// Keep only the entries whose link has not been seen, recording each kept
/// link in `seen`.
///
/// The seen-set is scoped to a single collector invocation and threaded
/// through explicitly; it starts out holding every link already in today's
/// dataset. Duplicate links within one feed, across feeds, and against the
/// existing dataset are all filtered by the same insert.
pub fn select_unseen(seen: &mut HashSet<String>, entries: Vec<FeedItem>) -> Vec<FeedItem> {
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.link.clone()))
        .collect()
}
