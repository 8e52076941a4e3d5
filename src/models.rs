//! Data models for the article records threaded through the pipeline.
//!
//! An article changes shape as it moves forward, and each stage produces the
//! next shape from the previous one:
//! - [`RawArticle`]: what a feed entry or headline looks like right after fetching
//! - [`CuratedArticle`]: deduplicated and enriched with scraped content and URLs
//! - [`ScoredArticle`]: categorized and scored, ready for the newsletter
//!
//! [`Category`], [`Tone`] and [`SummaryLength`] are the closed vocabularies the
//! scorer, summarizer and command line share.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a raw article came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ArticleOrigin {
    /// An RSS/Atom feed, identified by its URL.
    Feed(String),
    /// The top-headlines endpoint.
    Headlines,
}

impl fmt::Display for ArticleOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArticleOrigin::Feed(url) => f.write_str(url),
            ArticleOrigin::Headlines => f.write_str("headlines"),
        }
    }
}

/// An article as produced by a fetcher, before curation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawArticle {
    pub title: Option<String>,
    /// Canonical article URL. Empty strings are stored as `None`.
    pub link: Option<String>,
    pub published: Option<DateTime<Utc>>,
    /// Short description from feed or API metadata.
    pub summary: String,
    pub origin: ArticleOrigin,
}

impl RawArticle {
    /// Key used to drop duplicates: the link, or the first 100 characters
    /// of the title when there is no link.
    pub fn dedupe_key(&self) -> String {
        match &self.link {
            Some(link) => link.clone(),
            None => self
                .title
                .as_deref()
                .unwrap_or_default()
                .chars()
                .take(100)
                .collect(),
        }
    }
}

/// An article after deduplication and content scraping.
///
/// `link`, `rss_url` and `scraped_url` always hold the same value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CuratedArticle {
    pub title: String,
    pub link: Option<String>,
    pub rss_url: Option<String>,
    pub scraped_url: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub summary: String,
    /// Scraped body text, else the feed summary, else empty.
    pub content: String,
}

impl CuratedArticle {
    /// Lowercased `title + " " + content`, the text every keyword scan runs on.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.content).to_lowercase()
    }

    /// Link shown in the newsletter: `rss_url`, else `scraped_url`, else `#`.
    pub fn canonical_url(&self) -> &str {
        self.rss_url
            .as_deref()
            .or(self.scraped_url.as_deref())
            .unwrap_or("#")
    }
}

/// A curated article with its category and relevance score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredArticle {
    pub article: CuratedArticle,
    pub category: Category,
    /// Non-negative, rounded to three decimals.
    pub score: f64,
}

/// The closed set of newsletter sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    AI,
    Tech,
    Finance,
    Business,
    Sports,
    Health,
    General,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::AI,
        Category::Tech,
        Category::Finance,
        Category::Business,
        Category::Sports,
        Category::Health,
        Category::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::AI => "AI",
            Category::Tech => "Tech",
            Category::Finance => "Finance",
            Category::Business => "Business",
            Category::Sports => "Sports",
            Category::Health => "Health",
            Category::General => "General",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

/// Which scored articles make it into the newsletter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("All"),
            CategoryFilter::Only(category) => f.write_str(category.as_str()),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            s.parse().map(CategoryFilter::Only)
        }
    }
}

/// Writing tone requested from the summarizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Friendly,
    Formal,
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Tone::Professional => "professional",
            Tone::Casual => "casual",
            Tone::Friendly => "friendly",
            Tone::Formal => "formal",
        })
    }
}

/// How many bullet points a summary should have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    #[default]
    Short,
    Medium,
    Long,
}

impl SummaryLength {
    /// Prompt instruction for this length tier.
    pub fn instruction(&self) -> &'static str {
        match self {
            SummaryLength::Short => "Write 3 bullet points.",
            SummaryLength::Medium => "Write 5 concise bullet points.",
            SummaryLength::Long => "Write 7 detailed bullet points.",
        }
    }
}

impl fmt::Display for SummaryLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SummaryLength::Short => "short",
            SummaryLength::Medium => "medium",
            SummaryLength::Long => "long",
        })
    }
}
