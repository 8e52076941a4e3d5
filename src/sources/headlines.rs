//! Top-headlines API fetcher.
//!
//! Calls the NewsAPI `top-headlines` endpoint with a country and page size.
//! Without an API key the source is skipped entirely.

use crate::config::HeadlinesConfig;
use crate::error::Result;
use crate::models::{ArticleOrigin, RawArticle};
use crate::sources::ArticleSource;
use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, instrument, warn};

const API_KEY_HEADER: &str = "X-Api-Key";

/// Response envelope of the headlines endpoint.
#[derive(Debug, Deserialize)]
struct HeadlinesResponse {
    #[serde(default)]
    articles: Vec<HeadlineArticle>,
}

/// One entry of the `articles` array. Field names follow the API's JSON.
#[allow(non_snake_case)]
#[derive(Debug, Deserialize)]
struct HeadlineArticle {
    title: Option<String>,
    url: Option<String>,
    publishedAt: Option<String>,
    description: Option<String>,
}

pub struct HeadlineFetcher {
    client: Client,
    api_key: Option<String>,
    config: HeadlinesConfig,
}

impl HeadlineFetcher {
    pub fn new(api_key: Option<String>, config: HeadlinesConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(8))
                .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            config,
        }
    }

    /// Fetch the current top headlines.
    ///
    /// Returns an empty list when no API key is configured or the request fails.
    #[instrument(level = "info", skip_all, fields(country = %self.config.country))]
    pub async fn fetch_headlines(&self) -> Vec<RawArticle> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("NEWSAPI_KEY not set; skipping headlines");
            return Vec::new();
        };

        match self.request(api_key).await {
            Ok(articles) => {
                info!(count = articles.len(), "Fetched headlines");
                articles
            }
            Err(e) => {
                warn!(error = %e, "Headlines fetch failed");
                Vec::new()
            }
        }
    }

    /// The API key is sent as a header and never appears in the URL.
    fn build_request(&self, api_key: &str) -> RequestBuilder {
        let page_size = self.config.page_size.to_string();
        self.client
            .get(&self.config.endpoint)
            .header(API_KEY_HEADER, api_key)
            .query(&[
                ("country", self.config.country.as_str()),
                ("pageSize", page_size.as_str()),
            ])
    }

    async fn request(&self, api_key: &str) -> Result<Vec<RawArticle>> {
        let body = self
            .build_request(api_key)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_headlines(&body)
    }
}

impl ArticleSource for HeadlineFetcher {
    fn name(&self) -> &str {
        "headlines"
    }

    fn fetch(&self) -> BoxFuture<'_, Vec<RawArticle>> {
        self.fetch_headlines().boxed()
    }
}

/// Normalize a headlines JSON body into raw articles.
///
/// Unparseable `publishedAt` values are dropped rather than failing the entry.
pub fn parse_headlines(body: &str) -> Result<Vec<RawArticle>> {
    let response: HeadlinesResponse = serde_json::from_str(body)?;

    Ok(response
        .articles
        .into_iter()
        .map(|a| RawArticle {
            title: a.title.filter(|t| !t.trim().is_empty()),
            link: a.url.filter(|u| !u.trim().is_empty()),
            published: a.publishedAt.as_deref().and_then(parse_timestamp),
            summary: a.description.unwrap_or_default(),
            origin: ArticleOrigin::Headlines,
        })
        .collect())
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
