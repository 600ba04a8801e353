//! Runtime configuration loaded from a YAML file.
//!
//! Every field carries a default, so the binary runs with no config file at
//! all: the built-in feed table covers the usual macro/markets wires, and
//! the API section points at OpenAI with the key taken from
//! `OPENAI_API_KEY`. A partial YAML file overrides only the sections it
//! names.

use crate::models::FeedSource;
use serde::{Deserialize, Serialize};
use std::error::Error;
use tracing::info;
use url::Url;

/// Character budget for one headline batch sent to the LLM.
pub const DEFAULT_CHUNK_MAX_CHARS: usize = 250_000;

/// Top-level configuration for both the collector and the summarizer.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Feed sources, fetched in the order listed.
    pub feeds: Vec<FeedSource>,
    /// Whether the collector downloads full article text for new entries.
    pub scrape_content: bool,
    /// Directory holding the per-day `articles_<date>.csv` datasets.
    pub data_dir: String,
    /// Directory holding the per-day `summary_<date>.txt` artifacts.
    pub summaries_dir: String,
    /// Maximum characters of headline text per summarization batch.
    pub chunk_max_chars: usize,
    /// Text-generation API settings.
    pub api: ApiConfig,
    /// Instructional framings for the two summarization passes.
    pub prompts: PromptConfig,
}

/// Settings for the OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Model identifier passed with every request.
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

/// Prompt templates for the per-batch and synthesis passes.
///
/// These are product content, not logic: overriding them changes the voice
/// of the digest without touching the chunking contract.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Instruction prepended to each batch of headlines.
    pub batch_instructions: String,
    /// Instruction prepended to the concatenated batch summaries.
    pub synthesis_instructions: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feeds: default_feeds(),
            scrape_content: false,
            data_dir: "data".to_string(),
            summaries_dir: "summaries".to_string(),
            chunk_max_chars: DEFAULT_CHUNK_MAX_CHARS,
            api: ApiConfig::default(),
            prompts: PromptConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            batch_instructions: "you are a macro hedge fund analyst; below are news headlines \
                from today. please summarize the main themes. dont mind if you also include \
                some numbers from the headlines; make it quite detailed and comprehensive. \
                also include a description of the current macro/markets regime."
                .to_string(),
            synthesis_instructions: "you are a macro hedge fund analyst; here are a few \
                summaries of different sets of news headlines; please provide an overarching \
                summary. dont mind if you also include some numbers from the summaries; make \
                it quite detailed and comprehensive. also include a description of the \
                current macro/markets regime."
                .to_string(),
        }
    }
}

impl PromptConfig {
    /// Full prompt for one batch of newline-joined headlines.
    pub fn batch_prompt(&self, batch_text: &str) -> String {
        format!("{}\n\n{}\n\nSummarize:", self.batch_instructions, batch_text)
    }

    /// Full prompt for the second-pass synthesis over all batch summaries.
    pub fn synthesis_prompt(&self, combined_summaries: &str) -> String {
        format!(
            "{}\n\n{}\n\nSummary:",
            self.synthesis_instructions, combined_summaries
        )
    }
}

impl Config {
    /// Load configuration from `path`, or fall back to the built-in
    /// defaults when no path is given.
    pub fn load(path: Option<&str>) -> Result<Self, Box<dyn Error>> {
        let config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .map_err(|e| format!("failed to read config file {path}: {e}"))?;
                let config: Config = serde_yaml::from_str(&raw)
                    .map_err(|e| format!("failed to parse config file {path}: {e}"))?;
                info!(path, feeds = config.feeds.len(), "Loaded configuration");
                config
            }
            None => {
                let config = Config::default();
                info!(feeds = config.feeds.len(), "Using built-in configuration");
                config
            }
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.feeds.is_empty() {
            return Err("configuration lists no feed sources".into());
        }
        for feed in &self.feeds {
            Url::parse(&feed.url)
                .map_err(|e| format!("feed \"{}\" has an invalid URL {}: {e}", feed.name, feed.url))?;
        }
        if self.chunk_max_chars == 0 {
            return Err("chunk_max_chars must be greater than zero".into());
        }
        Ok(())
    }
}

/// Google News RSS search scoped to a single publisher's site.
fn google_news_site_feed(site: &str) -> String {
    format!(
        "https://news.google.com/rss/search?q={}&hl=en-US&gl=US&ceid=US:en",
        urlencoding::encode(&format!("site:{site}"))
    )
}

fn default_feeds() -> Vec<FeedSource> {
    let named = |name: &str, url: String| FeedSource {
        name: name.to_string(),
        url,
    };
    vec![
        named(
            "MarketWatch Top",
            "https://www.marketwatch.com/rss/topstories".to_string(),
        ),
        named(
            "CNBC Top News",
            "https://www.cnbc.com/id/100003114/device/rss/rss.html".to_string(),
        ),
        named(
            "Investing.com All News",
            "https://uk.investing.com/rss/news.rss".to_string(),
        ),
        named(
            "Investing.com Bond News",
            "https://uk.investing.com/rss/bonds.rss".to_string(),
        ),
        named("Google News Reuters", google_news_site_feed("reuters.com")),
        named("Google News WSJ", google_news_site_feed("wsj.com")),
        named("Google News FT", google_news_site_feed("ft.com")),
    ]
}
