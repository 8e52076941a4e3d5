//! Run configuration loaded from an optional YAML file.
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! stock feed list and settings. API keys never live here; they come from the
//! command line or the environment (see [`crate::cli::Cli`]).
//!
//! ```yaml
//! feeds:
//!   - https://arstechnica.com/feed/
//! max_items: 30
//! per_feed_limit: 8
//! headlines:
//!   country: us
//!   page_size: 10
//! summarizer:
//!   model: gemini-2.5-flash
//!   temperature: 0.4
//! ```

use crate::error::Result;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, instrument};

pub const DEFAULT_FEEDS: [&str; 4] = [
    "https://arstechnica.com/feed/",
    "https://www.wired.com/feed/rss",
    "https://www.theverge.com/rss/index.xml",
    "https://feeds.finance.yahoo.com/rss/2.0/headline?s=yhoo&region=US&lang=en-US",
];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NewsletterConfig {
    pub feeds: Vec<String>,
    /// Upper bound on articles kept after deduplication.
    pub max_items: usize,
    /// Entries taken from each feed.
    pub per_feed_limit: usize,
    pub headlines: HeadlinesConfig,
    pub summarizer: SummarizerConfig,
}

impl Default for NewsletterConfig {
    fn default() -> Self {
        Self {
            feeds: DEFAULT_FEEDS.iter().map(|s| s.to_string()).collect(),
            max_items: 30,
            per_feed_limit: 8,
            headlines: HeadlinesConfig::default(),
            summarizer: SummarizerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeadlinesConfig {
    pub endpoint: String,
    pub country: String,
    pub page_size: u32,
}

impl Default for HeadlinesConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://newsapi.org/v2/top-headlines".to_string(),
            country: "us".to_string(),
            page_size: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.4,
        }
    }
}

impl NewsletterConfig {
    /// Parse a YAML document; missing keys take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from `path` when given, otherwise use the defaults.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let yaml = tokio::fs::read_to_string(path).await?;
        let config = Self::from_yaml(&yaml)?;
        info!(
            feeds = config.feeds.len(),
            max_items = config.max_items,
            "Loaded configuration"
        );
        Ok(config)
    }
}
