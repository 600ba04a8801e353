//! The summarizer batch job.
//!
//! Resolves the most recent daily dataset (today's file, falling back to
//! yesterday's), reduces it to `"<source>: <title>"` headline strings,
//! partitions those into character-budgeted batches, asks the model for one
//! summary per batch, then asks once more for an overarching synthesis. The
//! synthesis is the artifact: `summaries/summary_<date>.txt`, dated by the
//! dataset it came from. For k batches the run issues exactly k + 1
//! requests; with no dataset or no headlines it issues none.

use crate::api::{AskAsync, OpenAiChat};
use crate::config::Config;
use crate::models::ArticleRecord;
use crate::utils::{ensure_writable_dir, write_atomic};
use crate::dataset;
use chrono::{Local, NaiveDate};
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Path of the summary artifact for `date` under `summaries_dir`.
pub fn summary_path(summaries_dir: &str, date: NaiveDate) -> PathBuf {
    Path::new(summaries_dir).join(format!("summary_{date}.txt"))
}

/// Headline strings for every dataset row, in row order.
pub fn headlines(records: &[ArticleRecord]) -> Vec<String> {
    records.iter().map(ArticleRecord::headline).collect()
}

/// Partition headlines into newline-joined batches under a character budget.
///
/// The budget counts headline characters only. A batch closes when the next
/// headline would push it past `max_chars`; a single headline longer than
/// the whole budget still gets a batch of its own rather than being split
/// or dropped. Every headline lands in exactly one batch, in input order.
pub fn chunk_headlines(headlines: &[String], max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut total_chars = 0usize;

    for headline in headlines {
        if !current.is_empty() && total_chars + headline.len() > max_chars {
            chunks.push(current.join("\n"));
            current = vec![headline];
            total_chars = headline.len();
        } else {
            current.push(headline);
            total_chars += headline.len();
        }
    }
    if !current.is_empty() {
        chunks.push(current.join("\n"));
    }
    chunks
}

/// Summarize each batch in order, then synthesize the batch summaries into
/// the final digest text.
pub async fn summarize_chunks<A: AskAsync>(
    api: &A,
    chunks: &[String],
    config: &Config,
) -> Result<String, Box<dyn Error>> {
    let total = chunks.len();
    let mut batch_summaries = Vec::with_capacity(total);

    for (i, chunk) in chunks.iter().enumerate() {
        info!(chunk = i + 1, total, "Summarizing chunk");
        let summary = api
            .ask(&config.prompts.batch_prompt(chunk))
            .await
            .map_err(|e| format!("summarization failed for batch {}/{total}: {e}", i + 1))?;
        batch_summaries.push(summary);
    }

    info!(batches = total, "Requesting overarching synthesis");
    let combined = batch_summaries.join("\n\n");
    let digest = api
        .ask(&config.prompts.synthesis_prompt(&combined))
        .await
        .map_err(|e| format!("final synthesis failed: {e}"))?;
    Ok(digest)
}

/// Run one summarization pass.
#[instrument(level = "info", skip_all)]
pub async fn run(config: &Config) -> Result<(), Box<dyn Error>> {
    let today = Local::now().date_naive();
    let Some(resolved) = dataset::resolve_latest(&config.data_dir, today, |p| p.exists()) else {
        info!("No dataset found for today or yesterday; nothing to summarize");
        return Ok(());
    };
    if resolved.date != today {
        info!(date = %resolved.date, "Today's dataset is missing; falling back to yesterday's");
    }

    let records = dataset::load(&resolved.path).await?;
    let headlines = headlines(&records);
    if headlines.is_empty() {
        info!(path = %resolved.path.display(), "No headlines found");
        return Ok(());
    }
    info!(count = headlines.len(), date = %resolved.date, "Loaded headlines");

    let chunks = chunk_headlines(&headlines, config.chunk_max_chars);
    info!(chunks = chunks.len(), budget = config.chunk_max_chars, "Chunked headlines");

    let api = OpenAiChat::from_config(&config.api)?;
    let digest = summarize_chunks(&api, &chunks, config).await?;

    ensure_writable_dir(&config.summaries_dir).await?;
    let path = summary_path(&config.summaries_dir, resolved.date);
    write_atomic(&path, digest.as_bytes()).await?;
    info!(path = %path.display(), bytes = digest.len(), "Summary saved");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeedItem;
    use chrono::TimeZone;
    use std::sync::Mutex;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_summary_path_naming() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        assert_eq!(
            summary_path("summaries", date),
            Path::new("summaries/summary_2026-08-05.txt")
        );
    }

    #[test]
    fn test_headlines_follow_row_order() {
        let now = Local.with_ymd_and_hms(2026, 8, 5, 8, 0, 0).unwrap();
        let records = vec![
            ArticleRecord::from_item(
                "Feed B",
                FeedItem {
                    title: "second headline".to_string(),
                    link: "https://b".to_string(),
                    published: None,
                },
                String::new(),
                now,
            ),
            ArticleRecord::from_item(
                "Feed A",
                FeedItem {
                    title: "first headline".to_string(),
                    link: "https://a".to_string(),
                    published: None,
                },
                String::new(),
                now,
            ),
        ];

        assert_eq!(
            headlines(&records),
            strings(&["Feed B: second headline", "Feed A: first headline"])
        );
    }

    #[test]
    fn test_chunking_respects_budget() {
        let headlines = strings(&["aaaa", "bbbb", "cccc", "dddd"]);
        let chunks = chunk_headlines(&headlines, 8);

        assert_eq!(chunks, strings(&["aaaa\nbbbb", "cccc\ndddd"]));
        for chunk in &chunks {
            let content_chars: usize = chunk.split('\n').map(str::len).sum();
            assert!(content_chars <= 8);
        }
    }

    #[test]
    fn test_chunking_covers_every_headline_in_order() {
        let headlines: Vec<String> = (0..100).map(|i| format!("source {i}: headline {i}")).collect();
        let chunks = chunk_headlines(&headlines, 120);

        let rejoined: Vec<String> = chunks
            .iter()
            .flat_map(|c| c.split('\n'))
            .map(|s| s.to_string())
            .collect();
        assert_eq!(rejoined, headlines);
    }

    #[test]
    fn test_chunking_oversized_headline_rides_alone() {
        let long = "x".repeat(50);
        let headlines = vec!["short one".to_string(), long.clone(), "short two".to_string()];
        let chunks = chunk_headlines(&headlines, 20);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], "short one");
        assert_eq!(chunks[1], long);
        assert_eq!(chunks[2], "short two");
    }

    #[test]
    fn test_chunking_oversized_first_headline() {
        let long = "y".repeat(50);
        let headlines = vec![long.clone(), "short".to_string()];
        let chunks = chunk_headlines(&headlines, 20);

        assert_eq!(chunks, vec![long, "short".to_string()]);
    }

    #[test]
    fn test_chunking_empty_input() {
        assert!(chunk_headlines(&[], 100).is_empty());
    }

    #[test]
    fn test_chunking_single_chunk_under_budget() {
        let headlines = strings(&["a: one", "b: two"]);
        let chunks = chunk_headlines(&headlines, 1000);
        assert_eq!(chunks, strings(&["a: one\nb: two"]));
    }

    /// Records every prompt it is asked, answering with a canned completion.
    struct CountingApi {
        prompts: Mutex<Vec<String>>,
        fail_from_request: Option<usize>,
    }

    impl CountingApi {
        fn new() -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                fail_from_request: None,
            }
        }

        fn failing_from(request: usize) -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                fail_from_request: Some(request),
            }
        }

        fn request_count(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    impl AskAsync for CountingApi {
        async fn ask(&self, prompt: &str) -> Result<String, Box<dyn Error>> {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            if let Some(fail_from) = self.fail_from_request {
                if prompts.len() >= fail_from {
                    return Err("simulated API failure".into());
                }
            }
            Ok(format!("summary #{}", prompts.len()))
        }
    }

    #[tokio::test]
    async fn test_request_count_is_chunks_plus_one() {
        let api = CountingApi::new();
        let config = Config::default();
        let chunks = strings(&["chunk one", "chunk two", "chunk three"]);

        summarize_chunks(&api, &chunks, &config).await.unwrap();
        assert_eq!(api.request_count(), 4);
    }

    #[tokio::test]
    async fn test_synthesis_sees_batch_summaries_in_order() {
        let api = CountingApi::new();
        let config = Config::default();
        let chunks = strings(&["chunk one", "chunk two"]);

        summarize_chunks(&api, &chunks, &config).await.unwrap();

        let prompts = api.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[0].contains("chunk one"));
        assert!(prompts[1].contains("chunk two"));
        assert!(prompts[2].contains("summary #1\n\nsummary #2"));
        assert!(prompts[2].contains("overarching summary"));
    }

    #[tokio::test]
    async fn test_failed_batch_reports_its_index() {
        let api = CountingApi::failing_from(2);
        let config = Config::default();
        let chunks = strings(&["chunk one", "chunk two", "chunk three"]);

        let err = summarize_chunks(&api, &chunks, &config).await.unwrap_err();
        assert!(err.to_string().contains("batch 2/3"));
        // Later batches and the synthesis are never attempted.
        assert_eq!(api.request_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_synthesis_is_distinct() {
        let api = CountingApi::failing_from(2);
        let config = Config::default();
        let chunks = strings(&["only chunk"]);

        let err = summarize_chunks(&api, &chunks, &config).await.unwrap_err();
        assert!(err.to_string().contains("final synthesis failed"));
    }
}
