//! Error type shared by the pipeline stages.
//!
//! Only a few of these ever reach `main`: a missing template, an empty
//! article selection and output I/O. Fetch and scrape failures are logged
//! and absorbed where they happen, and generator failures collapse into an
//! empty summary.

use crate::models::CategoryFilter;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NewsletterError {
    /// The requested template name is not part of the catalogue.
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// Nothing survived scoring and the category filter.
    #[error("no articles found for category: {filter}")]
    NoArticles { filter: CategoryFilter },

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed could not be parsed: {0}")]
    Feed(#[from] feed_rs::parser::ParseFeedError),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config file: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to render newsletter: {0}")]
    Render(#[from] std::fmt::Error),

    #[error("{0} is not configured")]
    MissingApiKey(&'static str),

    #[error("api returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("generator returned no text")]
    EmptyResponse,
}

pub type Result<T> = std::result::Result<T, NewsletterError>;
