//! Article body scraping.
//!
//! [`HttpScraper`] downloads a page with browser-like headers and hands the
//! HTML to [`extract_text`], which tries progressively broader strategies:
//!
//! 1. paragraphs inside the first `<article>` element
//! 2. paragraphs inside the first match of a few well-known content containers
//! 3. every paragraph on the page
//!
//! The first two only count when they produce more than 200 characters.
//! Text inside `script`, `style`, `nav`, `footer`, `header`, `aside` and
//! `noscript` is never collected.

use crate::error::Result;
use crate::sources::USER_AGENT;
use crate::utils::truncate_chars;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use scraper::{ElementRef, Html, Node, Selector};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// A block-level strategy must beat this many characters to be accepted.
const MIN_BLOCK_CHARS: usize = 200;
/// Anything shorter than this is treated as "no content".
const MIN_CONTENT_CHARS: usize = 80;
/// Scraped text is cut to this many characters.
const MAX_CONTENT_CHARS: usize = 5000;

const NOISE_TAGS: [&str; 7] = ["script", "style", "nav", "footer", "header", "aside", "noscript"];

const CONTENT_SELECTORS: [&str; 6] = [
    "#content",
    ".post-content",
    ".article-body",
    ".entry-content",
    "#main-content",
    ".story-content",
];

static ARTICLE: Lazy<Selector> = Lazy::new(|| Selector::parse("article").expect("valid selector"));
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("valid selector"));
static CONTAINERS: Lazy<Vec<Selector>> = Lazy::new(|| {
    CONTENT_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).expect("valid selector"))
        .collect()
});
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Turns an article URL into readable body text.
///
/// `None` means "no content available"; callers fall back to the feed summary.
pub trait PageScraper {
    async fn fetch_text(&self, url: &str) -> Option<String>;
}

#[derive(Debug, Clone)]
pub struct HttpScraper {
    client: Client,
}

impl HttpScraper {
    pub fn new(timeout: Duration) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(ACCEPT, HeaderValue::from_static("text/html,application/xhtml+xml"));

        Self {
            client: Client::builder()
                .timeout(timeout)
                .user_agent(USER_AGENT)
                .default_headers(headers)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        Ok(self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?)
    }
}

impl Default for HttpScraper {
    fn default() -> Self {
        Self::new(Duration::from_secs(12))
    }
}

impl PageScraper for HttpScraper {
    #[instrument(level = "info", skip(self))]
    async fn fetch_text(&self, url: &str) -> Option<String> {
        let html = match self.fetch_html(url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(error = %e, "Scrape failed");
                return None;
            }
        };
        let text = finalize(extract_text(&html));
        debug!(chars = text.as_ref().map_or(0, |t| t.chars().count()), "Scraped page");
        text
    }
}

/// Apply the content floor and length cap to extracted text.
pub fn finalize(text: String) -> Option<String> {
    if text.chars().count() < MIN_CONTENT_CHARS {
        return None;
    }
    Some(truncate_chars(&text, MAX_CONTENT_CHARS).to_string())
}

/// Extract the main readable text of an HTML page.
///
/// Returns an empty string when the page has no paragraph text at all.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);

    if let Some(article) = first_visible(&document, &ARTICLE) {
        let text = join_paragraphs(article.select(&PARAGRAPH));
        if text.chars().count() > MIN_BLOCK_CHARS {
            return text;
        }
    }

    for selector in CONTAINERS.iter() {
        if let Some(block) = first_visible(&document, selector) {
            let text = join_paragraphs(block.select(&PARAGRAPH));
            if text.chars().count() > MIN_BLOCK_CHARS {
                return text;
            }
        }
    }

    join_paragraphs(document.select(&PARAGRAPH))
}

/// Plain text of an HTML fragment, whitespace collapsed.
pub fn html_to_text(fragment: &str) -> String {
    if !fragment.contains('<') {
        return collapse_whitespace(fragment);
    }
    let html = Html::parse_fragment(fragment);
    visible_text(html.root_element())
}

fn join_paragraphs<'a>(paragraphs: impl Iterator<Item = ElementRef<'a>>) -> String {
    paragraphs
        .map(visible_text)
        .filter(|t| !t.is_empty())
        .join("\n\n")
}

/// First match of `selector` that is not itself noise or inside noise.
fn first_visible<'a>(document: &'a Html, selector: &Selector) -> Option<ElementRef<'a>> {
    document.select(selector).find(|el| {
        !NOISE_TAGS.contains(&el.value().name()) && !el.ancestors().any(|a| is_noise(a.value()))
    })
}

fn is_noise(node: &Node) -> bool {
    node.as_element().is_some_and(|e| NOISE_TAGS.contains(&e.name()))
}

fn visible_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    for node in element.descendants() {
        if let Node::Text(text) = node.value() {
            if !node.ancestors().any(|a| is_noise(a.value())) {
                raw.push_str(text);
            }
        }
    }
    collapse_whitespace(&raw)
}

fn collapse_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(word: &str, n: usize) -> String {
        vec![word; n].join(" ")
    }

    #[test]
    fn test_article_block_is_preferred() {
        let body = sentence("article", 40);
        let html = format!(
            "<html><body><article><p>{body}</p></article><div id=\"content\"><p>{}</p></div></body></html>",
            sentence("container", 40)
        );
        assert_eq!(extract_text(&html), body);
    }

    #[test]
    fn test_short_article_falls_through_to_selector_list() {
        let long = sentence("selector", 40);
        let html = format!(
            "<html><body><article><p>Too short.</p></article>\
             <div class=\"entry-content\"><p>{long}</p></div></body></html>"
        );
        assert_eq!(extract_text(&html), long);
    }

    #[test]
    fn test_falls_back_to_all_paragraphs() {
        let html = "<html><body><article><p>Short article text.</p></article>\
                    <div class=\"post-content\"><p>Short container text.</p></div>\
                    <p>Loose paragraph.</p></body></html>";
        assert_eq!(
            extract_text(html),
            "Short article text.\n\nShort container text.\n\nLoose paragraph."
        );
    }

    #[test]
    fn test_page_without_paragraphs_yields_nothing() {
        let html = "<html><body><div>Lots of text but no paragraph tags at all, \
                    repeated enough to be long enough for any length check to pass \
                    if it were ever considered by the extractor.</div></body></html>";
        let text = extract_text(html);
        assert!(text.is_empty());
        assert_eq!(finalize(text), None);
    }

    #[test]
    fn test_noise_elements_are_ignored() {
        let html = "<html><body><header><p>Site header</p></header>\
                    <p>Real <b>story</b> text.<script>var x = 1;</script></p>\
                    <footer><p>Copyright</p></footer></body></html>";
        assert_eq!(extract_text(html), "Real story text.");
    }

    #[test]
    fn test_article_inside_header_is_skipped() {
        let main = sentence("main", 60);
        let html = format!(
            "<html><body><header><article><p>Teaser in header</p></article></header>\
             <article><p>{main}</p></article>\
             <div class=\"comments\"><p>Reader comment here</p></div></body></html>"
        );
        assert_eq!(extract_text(&html), main);
    }

    #[test]
    fn test_container_inside_aside_is_skipped() {
        let story = sentence("story", 60);
        let html = format!(
            "<html><body><aside><div id=\"content\"><p>Sidebar blurb</p></div></aside>\
             <div class=\"post-content\"><p>{story}</p></div>\
             <p>Unrelated footer-ish paragraph</p></body></html>"
        );
        assert_eq!(extract_text(&html), story);
    }

    #[test]
    fn test_finalize_floor_and_cap() {
        assert_eq!(finalize("x".repeat(79)), None);
        assert_eq!(finalize("x".repeat(80)), Some("x".repeat(80)));
        assert_eq!(finalize("x".repeat(6000)).map(|t| t.len()), Some(5000));
    }

    #[test]
    fn test_html_to_text() {
        assert_eq!(html_to_text("<p>Hello <em>there</em>\n  world</p>"), "Hello there world");
        assert_eq!(html_to_text("  plain   text "), "plain text");
    }

    #[tokio::test]
    async fn test_unreachable_page_is_empty_signal() {
        let scraper = HttpScraper::new(Duration::from_secs(2));
        assert_eq!(scraper.fetch_text("http://127.0.0.1:9/story").await, None);
    }
}
