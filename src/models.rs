//! Data models for feed sources, parsed feed entries, and collected articles.
//!
//! The central type is [`ArticleRecord`], one row of a daily dataset. Its
//! field order matches the CSV header written by the collector:
//! `timestamp, source, title, link, published, content`.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Sentinel stored in the `published` column when a feed entry carries no
/// publish timestamp.
pub const PUBLISHED_NA: &str = "N/A";

/// A named feed origin: human-readable name plus fetch URL.
///
/// Identity is the `name`; it becomes the `source` column of every record
/// the feed produces.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedSource {
    /// Display name, e.g. "MarketWatch Top".
    pub name: String,
    /// RSS/Atom feed URL.
    pub url: String,
}

/// One entry parsed out of a feed, before it becomes a record.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    /// Headline text as provided by the feed.
    pub title: String,
    /// Canonical article URL. This is the deduplication key.
    pub link: String,
    /// Feed-provided publish timestamp, if any.
    pub published: Option<String>,
}

/// One row of a daily dataset.
///
/// All columns are strings; `timestamp` is local wall-clock ISO-8601 to the
/// second, and `link` values are unique within one day's dataset.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// Collection time, second precision, local wall-clock at time of write.
    pub timestamp: String,
    /// Name of the [`FeedSource`] that produced this row.
    pub source: String,
    /// Headline text.
    pub title: String,
    /// Canonical URL; unique within a day's dataset.
    pub link: String,
    /// Feed-provided publish timestamp string, or [`PUBLISHED_NA`].
    pub published: String,
    /// Full article body text when content scraping is enabled, else empty.
    pub content: String,
}

impl ArticleRecord {
    /// Build a record from a feed entry collected at `now`.
    pub fn from_item(source: &str, item: FeedItem, content: String, now: DateTime<Local>) -> Self {
        Self {
            timestamp: now.format("%Y-%m-%dT%H:%M:%S").to_string(),
            source: source.to_string(),
            title: item.title,
            link: item.link,
            published: item.published.unwrap_or_else(|| PUBLISHED_NA.to_string()),
            content,
        }
    }

    /// The headline string the summarizer works with: `"<source>: <title>"`.
    pub fn headline(&self) -> String {
        format!("{}: {}", self.source, self.title)
    }
}
