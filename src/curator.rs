//! Curation: gather from every source, drop duplicates, scrape bodies.
//!
//! Everything here runs sequentially. Sources and pages are visited one at a
//! time, in order, and a failure in one never stops the others.

use crate::content::PageScraper;
use crate::models::{CuratedArticle, RawArticle};
use crate::sources::ArticleSource;
use crate::utils::truncate_chars;
use itertools::Itertools;
use tracing::{debug, info, instrument};

/// Characters of content used as a title when an article has none.
const TITLE_FALLBACK_CHARS: usize = 60;

/// Collect raw articles from every source, in source order.
#[instrument(level = "info", skip_all, fields(sources = sources.len()))]
pub async fn gather(sources: &[Box<dyn ArticleSource + Send + Sync>]) -> Vec<RawArticle> {
    let mut collected = Vec::new();
    for source in sources {
        let articles = source.fetch().await;
        info!(source = source.name(), count = articles.len(), "Collected articles");
        collected.extend(articles);
    }
    collected
}

/// Keep the first article per dedupe key, stopping at `max_items` survivors.
///
/// The key is the link, or the first 100 characters of the title for
/// articles without a link.
pub fn dedupe(raw: Vec<RawArticle>, max_items: usize) -> Vec<RawArticle> {
    raw.into_iter()
        .unique_by(RawArticle::dedupe_key)
        .take(max_items)
        .collect()
}

/// Deduplicate, then enrich each survivor with scraped body text.
///
/// Content is the scraped text when available, otherwise the feed summary,
/// otherwise empty. `rss_url` and `scraped_url` both carry the article link.
///
/// # Arguments
///
/// * `raw` - Articles in gathering order.
/// * `scraper` - Page scraper used for every surviving link.
/// * `max_items` - Cap on articles kept after deduplication.
///
/// # Returns
///
/// The curated articles, in the order they were first seen. Scrape failures
/// never drop an article.
#[instrument(level = "info", skip_all, fields(raw = raw.len(), max_items = max_items))]
pub async fn curate<S: PageScraper>(
    raw: Vec<RawArticle>,
    scraper: &S,
    max_items: usize,
) -> Vec<CuratedArticle> {
    let kept = dedupe(raw, max_items);
    info!(count = kept.len(), "Articles after deduplication");

    let mut curated = Vec::with_capacity(kept.len());
    for article in kept {
        let scraped = match article.link.as_deref() {
            Some(link) => scraper.fetch_text(link).await,
            None => None,
        };
        debug!(
            link = ?article.link,
            source = %article.origin,
            scraped = scraped.is_some(),
            "Curated article"
        );
        curated.push(enrich(article, scraped));
    }
    curated
}

fn enrich(article: RawArticle, scraped: Option<String>) -> CuratedArticle {
    let content = scraped.unwrap_or_else(|| article.summary.clone());
    let title = match article.title {
        Some(title) => title,
        None => format!("{}...", truncate_chars(&content, TITLE_FALLBACK_CHARS)),
    };

    CuratedArticle {
        title,
        rss_url: article.link.clone(),
        scraped_url: article.link.clone(),
        link: article.link,
        published: article.published,
        summary: article.summary,
        content,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::ArticleOrigin;
    use futures::future::{BoxFuture, FutureExt};
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Scraper returning canned text per URL and recording every call.
    #[derive(Default)]
    pub(crate) struct FakeScraper {
        pub pages: HashMap<String, String>,
        pub calls: RefCell<Vec<String>>,
    }

    impl PageScraper for FakeScraper {
        async fn fetch_text(&self, url: &str) -> Option<String> {
            self.calls.borrow_mut().push(url.to_string());
            self.pages.get(url).cloned()
        }
    }

    /// Source returning a fixed list of articles.
    pub(crate) struct FixedSource(pub Vec<RawArticle>);

    impl ArticleSource for FixedSource {
        fn name(&self) -> &str {
            "fixed"
        }

        fn fetch(&self) -> BoxFuture<'_, Vec<RawArticle>> {
            let articles = self.0.clone();
            async move { articles }.boxed()
        }
    }

    pub(crate) fn raw(title: Option<&str>, link: Option<&str>, summary: &str) -> RawArticle {
        RawArticle {
            title: title.map(str::to_string),
            link: link.map(str::to_string),
            published: None,
            summary: summary.to_string(),
            origin: ArticleOrigin::Headlines,
        }
    }

    #[test]
    fn test_dedupe_by_link_keeps_first() {
        let articles = vec![
            raw(Some("First"), Some("https://example.com/a"), ""),
            raw(Some("Second"), Some("https://example.com/a"), ""),
            raw(Some("Third"), Some("https://example.com/b"), ""),
        ];
        let kept = dedupe(articles, 30);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].title.as_deref(), Some("First"));
        assert_eq!(kept[1].title.as_deref(), Some("Third"));
    }

    #[test]
    fn test_dedupe_by_title_prefix_without_link() {
        let prefix = "t".repeat(100);
        let articles = vec![
            raw(Some(&format!("{prefix} one")), None, "first"),
            raw(Some(&format!("{prefix} two")), None, "second"),
        ];
        let kept = dedupe(articles, 30);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].summary, "first");
    }

    #[test]
    fn test_dedupe_caps_collected_count() {
        let articles = (0..10)
            .map(|i| raw(Some("t"), Some(&format!("https://example.com/{i}")), ""))
            .collect();
        assert_eq!(dedupe(articles, 4).len(), 4);
    }

    #[tokio::test]
    async fn test_gather_preserves_source_order() {
        let sources: Vec<Box<dyn ArticleSource + Send + Sync>> = vec![
            Box::new(FixedSource(vec![raw(Some("feed"), Some("https://f.example"), "")])),
            Box::new(FixedSource(vec![raw(Some("api"), Some("https://a.example"), "")])),
        ];
        let collected = gather(&sources).await;
        let titles: Vec<_> = collected.iter().filter_map(|a| a.title.as_deref()).collect();
        assert_eq!(titles, vec!["feed", "api"]);
    }

    #[tokio::test]
    async fn test_curate_prefers_scraped_text() {
        let scraper = FakeScraper {
            pages: HashMap::from([(
                "https://example.com/a".to_string(),
                "Full scraped body".to_string(),
            )]),
            ..Default::default()
        };
        let curated = curate(
            vec![raw(Some("A"), Some("https://example.com/a"), "feed summary")],
            &scraper,
            30,
        )
        .await;

        assert_eq!(curated[0].content, "Full scraped body");
        assert_eq!(curated[0].summary, "feed summary");
        assert_eq!(curated[0].rss_url.as_deref(), Some("https://example.com/a"));
        assert_eq!(curated[0].scraped_url, curated[0].rss_url);
        assert_eq!(curated[0].link, curated[0].rss_url);
    }

    #[tokio::test]
    async fn test_curate_falls_back_to_summary_then_empty() {
        let scraper = FakeScraper::default();
        let curated = curate(
            vec![
                raw(Some("A"), Some("https://example.com/a"), "feed summary"),
                raw(Some("B"), Some("https://example.com/b"), ""),
            ],
            &scraper,
            30,
        )
        .await;

        assert_eq!(curated[0].content, "feed summary");
        assert_eq!(curated[1].content, "");
    }

    #[tokio::test]
    async fn test_curate_skips_scrape_without_link_and_fills_title() {
        let scraper = FakeScraper::default();
        let summary = "s".repeat(80);
        let curated = curate(vec![raw(None, None, &summary)], &scraper, 30).await;

        assert!(scraper.calls.borrow().is_empty());
        assert_eq!(curated[0].title, format!("{}...", "s".repeat(60)));
        assert_eq!(curated[0].canonical_url(), "#");
    }

    #[tokio::test]
    async fn test_curate_only_scrapes_survivors() {
        let scraper = FakeScraper::default();
        let articles = vec![
            raw(Some("A"), Some("https://example.com/a"), ""),
            raw(Some("A again"), Some("https://example.com/a"), ""),
            raw(Some("B"), Some("https://example.com/b"), ""),
        ];
        curate(articles, &scraper, 1).await;
        assert_eq!(*scraper.calls.borrow(), vec!["https://example.com/a".to_string()]);
    }
}
