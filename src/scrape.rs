//! Best-effort full-article text extraction.
//!
//! Given an article URL, downloads the page and assembles the text of its
//! paragraph elements: those inside `<article>` when the page has one,
//! every `<p>` otherwise. Failures are reported to the caller, who logs
//! them and keeps the record with empty content.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::error::Error;
use tracing::{debug, instrument};

static ARTICLE_PARAGRAPHS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("article p").unwrap());
static ANY_PARAGRAPHS: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());
static EXCESS_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());

/// Fetch `url` and extract readable article text.
///
/// Returns an error on network failure, a non-success status, or a page
/// with no extractable paragraphs.
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn fetch_article_text(
    client: &reqwest::Client,
    url: &str,
) -> Result<String, Box<dyn Error>> {
    let body = client.get(url).send().await?.error_for_status()?.text().await?;
    let text = extract_text(&body);
    if text.is_empty() {
        return Err(format!("no article text found at {url}").into());
    }
    debug!(bytes = text.len(), "Extracted article text");
    Ok(text)
}

/// Pull paragraph text out of an HTML document.
///
/// Prefers paragraphs scoped to an `<article>` element; falls back to every
/// paragraph on the page when the document has none.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);

    fn paragraph_text(element: scraper::ElementRef<'_>) -> String {
        let raw = element.text().collect::<Vec<_>>().join(" ");
        SPACE_RUNS.replace_all(raw.trim(), " ").into_owned()
    }

    let mut paragraphs: Vec<String> = document
        .select(&ARTICLE_PARAGRAPHS)
        .map(paragraph_text)
        .filter(|text| !text.is_empty())
        .collect();

    if paragraphs.is_empty() {
        paragraphs = document
            .select(&ANY_PARAGRAPHS)
            .map(paragraph_text)
            .filter(|text| !text.is_empty())
            .collect();
    }

    let joined = paragraphs.join("\n\n");
    EXCESS_BLANK_LINES.replace_all(&joined, "\n\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_prefers_article_paragraphs() {
        let html = r#"
            <html><body>
              <p>navigation cruft</p>
              <article>
                <p>Treasury yields rose on Tuesday.</p>
                <p>The dollar index was little changed.</p>
              </article>
            </body></html>
        "#;

        let text = extract_text(html);
        assert_eq!(
            text,
            "Treasury yields rose on Tuesday.\n\nThe dollar index was little changed."
        );
    }

    #[test]
    fn test_extract_text_falls_back_to_bare_paragraphs() {
        let html = "<html><body><p>Oil slid 2%.</p><p>Gold hit a record.</p></body></html>";

        let text = extract_text(html);
        assert_eq!(text, "Oil slid 2%.\n\nGold hit a record.");
    }

    #[test]
    fn test_extract_text_empty_document() {
        assert_eq!(extract_text("<html><body><div>no paragraphs</div></body></html>"), "");
    }

    #[test]
    fn test_extract_text_collapses_nested_whitespace() {
        let html = "<article><p>  spaced   <b>out</b>  </p><p></p><p>next</p></article>";

        let text = extract_text(html);
        assert_eq!(text, "spaced out\n\nnext");
    }
}
