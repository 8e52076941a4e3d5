//! Article sources feeding the curator.
//!
//! Every source follows the same contract: fetch, normalize into
//! [`RawArticle`] records, and never fail the run. A source that cannot be
//! reached logs a warning and contributes zero records.
//!
//! | Source | Module | Method |
//! |--------|--------|--------|
//! | RSS/Atom feeds | [`feed`] | `feed-rs` parsing of each configured URL |
//! | Top headlines | [`headlines`] | JSON API, skipped without an API key |

use crate::models::RawArticle;
use futures::future::BoxFuture;

pub mod feed;
pub mod headlines;

/// A place articles come from.
///
/// `fetch` returns a boxed future so heterogeneous sources can live in one
/// `Vec<Box<dyn ArticleSource>>`.
pub trait ArticleSource {
    /// Short label used in logs.
    fn name(&self) -> &str;

    /// Fetch and normalize articles. Failures are logged, not returned.
    fn fetch(&self) -> BoxFuture<'_, Vec<RawArticle>>;
}

/// Browser-ish user agent shared by the fetchers and the page scraper.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
