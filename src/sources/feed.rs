//! RSS/Atom feed fetcher.
//!
//! Each configured feed URL is downloaded in turn and parsed with `feed-rs`,
//! which handles RSS 0.9x/1.0/2.0, Atom and JSON Feed. Only the first
//! `per_feed_limit` entries of each feed are kept.

use crate::content::html_to_text;
use crate::error::Result;
use crate::models::{ArticleOrigin, RawArticle};
use crate::sources::{ArticleSource, USER_AGENT};
use crate::utils::truncate_chars;
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Characters of entry content used as a summary when the feed has none.
const SUMMARY_FALLBACK_CHARS: usize = 200;

pub struct FeedFetcher {
    client: Client,
    feeds: Vec<String>,
    per_feed_limit: usize,
}

impl FeedFetcher {
    pub fn new(feeds: Vec<String>, per_feed_limit: usize) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            feeds,
            per_feed_limit,
        }
    }

    /// Fetch every feed, one after the other.
    ///
    /// A feed that fails to download or parse is logged and skipped.
    #[instrument(level = "info", skip_all, fields(feeds = self.feeds.len()))]
    pub async fn fetch_feeds(&self) -> Vec<RawArticle> {
        let per_feed: Vec<Vec<RawArticle>> = stream::iter(self.feeds.iter())
            .then(|url| async move {
                match self.fetch_feed(url).await {
                    Ok(items) => {
                        debug!(%url, count = items.len(), "Fetched feed");
                        items
                    }
                    Err(e) => {
                        warn!(%url, error = %e, "Could not fetch feed");
                        Vec::new()
                    }
                }
            })
            .collect()
            .await;

        let articles: Vec<RawArticle> = per_feed.into_iter().flatten().collect();
        info!(count = articles.len(), "Fetched feed articles");
        articles
    }

    #[instrument(level = "info", skip(self))]
    async fn fetch_feed(&self, url: &str) -> Result<Vec<RawArticle>> {
        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        parse_feed(&bytes, url, self.per_feed_limit)
    }
}

impl ArticleSource for FeedFetcher {
    fn name(&self) -> &str {
        "feeds"
    }

    fn fetch(&self) -> BoxFuture<'_, Vec<RawArticle>> {
        self.fetch_feeds().boxed()
    }
}

/// Parse a feed document into at most `limit` raw articles.
///
/// The summary comes from the entry summary/description; when that is empty
/// the first 200 characters of the entry content are used instead.
pub fn parse_feed(bytes: &[u8], feed_url: &str, limit: usize) -> Result<Vec<RawArticle>> {
    let feed = feed_rs::parser::parse(bytes)?;

    let articles = feed
        .entries
        .into_iter()
        .take(limit)
        .map(|entry| {
            let content = entry
                .content
                .and_then(|c| c.body)
                .map(|body| html_to_text(&body))
                .unwrap_or_default();
            let summary = entry
                .summary
                .map(|t| html_to_text(&t.content))
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| truncate_chars(&content, SUMMARY_FALLBACK_CHARS).to_string());

            RawArticle {
                title: entry
                    .title
                    .map(|t| t.content.trim().to_string())
                    .filter(|t| !t.is_empty()),
                link: entry
                    .links
                    .first()
                    .and_then(|l| resolve_link(feed_url, &l.href)),
                published: entry.published.or(entry.updated),
                summary,
                origin: ArticleOrigin::Feed(feed_url.to_string()),
            }
        })
        .collect();

    Ok(articles)
}

/// Absolute form of an entry link. Relative hrefs resolve against the feed URL.
fn resolve_link(feed_url: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    if Url::parse(href).is_ok() {
        return Some(href.to_string());
    }
    match Url::parse(feed_url).and_then(|base| base.join(href)) {
        Ok(resolved) => Some(resolved.into()),
        Err(_) => Some(href.to_string()),
    }
}
