//! End-to-end run: sources → curation → scoring → newsletter.
//!
//! A [`Pipeline`] owns the sources, the page scraper and the summarizer for
//! one run. [`Pipeline::run`] covers both commands; they differ only in their
//! [`RunOptions`].

use crate::api::{AskAsync, GeminiClient};
use crate::config::NewsletterConfig;
use crate::content::{HttpScraper, PageScraper};
use crate::curator;
use crate::error::{NewsletterError, Result};
use crate::generator::generate_newsletter;
use crate::models::{CategoryFilter, ScoredArticle, SummaryLength, Tone};
use crate::scoring::run_scoring;
use crate::sources::ArticleSource;
use crate::sources::feed::FeedFetcher;
use crate::sources::headlines::HeadlineFetcher;
use crate::summary::Summarizer;
use chrono::Utc;
use tracing::{info, instrument, warn};

/// Newsletter settings for a single run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub template: String,
    pub tone: Tone,
    pub length: SummaryLength,
    pub category: CategoryFilter,
    pub top_n: usize,
    /// Fail with [`NewsletterError::NoArticles`] instead of rendering an
    /// empty newsletter.
    pub require_articles: bool,
}

impl RunOptions {
    /// Fixed settings used by the batch command.
    pub fn batch() -> Self {
        Self {
            template: "professional".to_string(),
            tone: Tone::Professional,
            length: SummaryLength::Short,
            category: CategoryFilter::All,
            top_n: 10,
            require_articles: false,
        }
    }
}

pub struct Pipeline<S, G> {
    config: NewsletterConfig,
    sources: Vec<Box<dyn ArticleSource + Send + Sync>>,
    scraper: S,
    summarizer: Summarizer<G>,
}

impl Pipeline<HttpScraper, GeminiClient> {
    /// Network-backed pipeline: configured feeds, then top headlines.
    pub fn from_config(
        config: NewsletterConfig,
        newsapi_key: Option<String>,
        gemini_api_key: Option<String>,
    ) -> Self {
        let sources: Vec<Box<dyn ArticleSource + Send + Sync>> = vec![
            Box::new(FeedFetcher::new(config.feeds.clone(), config.per_feed_limit)),
            Box::new(HeadlineFetcher::new(newsapi_key, config.headlines.clone())),
        ];
        let generator = GeminiClient::new(gemini_api_key, config.summarizer.clone());
        Self::new(config, sources, HttpScraper::default(), generator)
    }
}

impl<S, G> Pipeline<S, G>
where
    S: PageScraper,
    G: AskAsync<Response = String>,
{
    pub fn new(
        config: NewsletterConfig,
        sources: Vec<Box<dyn ArticleSource + Send + Sync>>,
        scraper: S,
        generator: G,
    ) -> Self {
        Self {
            config,
            sources,
            scraper,
            summarizer: Summarizer::new(generator),
        }
    }

    /// Gather, curate and score, highest score first.
    #[instrument(level = "info", skip_all, fields(sources = self.sources.len()))]
    pub async fn collect_and_score(&self) -> Vec<ScoredArticle> {
        let raw = curator::gather(&self.sources).await;
        info!(count = raw.len(), "Raw articles collected");

        let curated = curator::curate(raw, &self.scraper, self.config.max_items).await;
        info!(count = curated.len(), "Articles curated");

        run_scoring(curated, Utc::now())
    }

    /// Produce the rendered newsletter for `options`.
    ///
    /// Runs the whole pipeline: gather from every source, curate, score,
    /// apply the category filter, then summarize and render the top
    /// articles.
    ///
    /// # Arguments
    ///
    /// * `options` - Template, tone, length, category filter and article count
    ///
    /// # Returns
    ///
    /// The rendered HTML document.
    ///
    /// # Errors
    ///
    /// - [`NewsletterError::NoArticles`] when an `Only` filter matches nothing,
    ///   or when nothing was collected and `options.require_articles` is set
    /// - [`NewsletterError::TemplateNotFound`] for an unknown template name
    #[instrument(level = "info", skip_all, fields(template = %options.template, top_n = options.top_n))]
    pub async fn run(&self, options: &RunOptions) -> Result<String> {
        let scored = self.collect_and_score().await;
        let selected = filter_by_category(scored, options.category)?;
        if selected.is_empty() && options.require_articles {
            warn!("No articles collected");
            return Err(NewsletterError::NoArticles {
                filter: options.category,
            });
        }
        generate_newsletter(
            selected,
            &options.template,
            options.tone,
            options.length,
            options.top_n,
            &self.summarizer,
        )
        .await
    }
}

/// Apply the category filter. An `Only` filter that matches nothing is
/// [`NewsletterError::NoArticles`].
pub fn filter_by_category(
    scored: Vec<ScoredArticle>,
    filter: CategoryFilter,
) -> Result<Vec<ScoredArticle>> {
    let CategoryFilter::Only(category) = filter else {
        return Ok(scored);
    };

    let kept: Vec<ScoredArticle> = scored
        .into_iter()
        .filter(|s| s.category == category)
        .collect();
    if kept.is_empty() {
        warn!(%category, "No articles matched the category filter");
        return Err(NewsletterError::NoArticles { filter });
    }
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curator::tests::{FakeScraper, FixedSource, raw};
    use crate::generator::CTA_LABEL;
    use crate::models::Category;
    use crate::summary::tests::FakeGenerator;

    fn pipeline() -> Pipeline<FakeScraper, FakeGenerator> {
        let articles = vec![
            raw(Some("Bitcoin price and inflation"), Some("https://x.example/1"), ""),
            raw(Some("Cricket tournament final match"), Some("https://x.example/2"), ""),
            raw(Some("Bitcoin price and inflation"), Some("https://x.example/1"), ""),
            raw(Some("Vaccine rollout"), Some("https://x.example/3"), ""),
        ];
        let sources: Vec<Box<dyn ArticleSource + Send + Sync>> =
            vec![Box::new(FixedSource(articles))];
        Pipeline::new(
            NewsletterConfig::default(),
            sources,
            FakeScraper::default(),
            FakeGenerator::replying("- summary point"),
        )
    }

    #[tokio::test]
    async fn test_collect_and_score_dedupes_and_sorts() {
        let scored = pipeline().collect_and_score().await;
        assert_eq!(scored.len(), 3);
        assert!(scored.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(scored[0].category, Category::Sports);
    }

    #[tokio::test]
    async fn test_batch_run_renders_every_article() {
        let html = pipeline().run(&RunOptions::batch()).await.unwrap();
        assert_eq!(html.matches("<article").count(), 3);
        assert_eq!(html.matches(CTA_LABEL).count(), 3);
        assert!(html.contains("template-professional"));
    }

    #[tokio::test]
    async fn test_category_filter_keeps_only_matches() {
        let options = RunOptions {
            category: CategoryFilter::Only(Category::Finance),
            template: "finance".to_string(),
            ..RunOptions::batch()
        };
        let html = pipeline().run(&options).await.unwrap();
        assert_eq!(html.matches("<article").count(), 1);
        assert!(html.contains("Bitcoin price and inflation"));
    }

    #[tokio::test]
    async fn test_category_filter_without_matches_is_an_error() {
        let options = RunOptions {
            category: CategoryFilter::Only(Category::AI),
            ..RunOptions::batch()
        };
        let err = pipeline().run(&options).await.unwrap_err();
        assert!(matches!(
            err,
            NewsletterError::NoArticles {
                filter: CategoryFilter::Only(Category::AI)
            }
        ));
    }

    fn empty_pipeline() -> Pipeline<FakeScraper, FakeGenerator> {
        let sources: Vec<Box<dyn ArticleSource + Send + Sync>> =
            vec![Box::new(FixedSource(Vec::new()))];
        Pipeline::new(
            NewsletterConfig::default(),
            sources,
            FakeScraper::default(),
            FakeGenerator::replying("- unused"),
        )
    }

    #[tokio::test]
    async fn test_empty_run_requiring_articles_is_an_error() {
        let options = RunOptions {
            require_articles: true,
            ..RunOptions::batch()
        };
        let err = empty_pipeline().run(&options).await.unwrap_err();
        assert!(matches!(
            err,
            NewsletterError::NoArticles {
                filter: CategoryFilter::All
            }
        ));
    }

    #[tokio::test]
    async fn test_empty_batch_run_renders_empty_newsletter() {
        let html = empty_pipeline().run(&RunOptions::batch()).await.unwrap();
        assert_eq!(html.matches("<article").count(), 0);
    }

    #[test]
    fn test_filter_all_passes_empty_list() {
        assert!(filter_by_category(Vec::new(), CategoryFilter::All).unwrap().is_empty());
    }
}
