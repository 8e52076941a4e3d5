//! Newsletter assembly: pick the top articles, summarize them, group them
//! into category sections and render the chosen template.

use crate::api::AskAsync;
use crate::error::Result;
use crate::models::{Category, ScoredArticle, SummaryLength, Tone};
use crate::outputs::templates;
use crate::summary::Summarizer;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{info, instrument};

pub const NEWSLETTER_TITLE: &str = "AI-Powered Daily Newsletter";
pub const CTA_LABEL: &str = "Read Full Article →";
pub const MANAGE_LINK: &str = "#";

/// One rendered article.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsletterItem {
    pub title: String,
    /// Bullet-point summary; empty when summarization failed.
    pub summary: String,
    pub url: String,
    pub cta: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub category: Category,
    pub items: Vec<NewsletterItem>,
}

/// Everything a template needs to render a newsletter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsletterContext {
    pub newsletter_title: String,
    pub tone: Tone,
    pub length: SummaryLength,
    pub manage_link: String,
    pub sections: Vec<Section>,
}

/// The `top_n` highest-scoring articles. Ties keep their input order.
pub fn select_top(mut scored: Vec<ScoredArticle>, top_n: usize) -> Vec<ScoredArticle> {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(top_n);
    scored
}

/// Group items into sections, ordered by each category's first appearance.
pub fn group_by_category(items: Vec<(Category, NewsletterItem)>) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    for (category, item) in items {
        match sections.iter_mut().find(|s| s.category == category) {
            Some(section) => section.items.push(item),
            None => sections.push(Section {
                category,
                items: vec![item],
            }),
        }
    }
    sections
}

/// Summarize the top `top_n` articles and render them with `template`.
///
/// The template name is checked before any summary is requested.
///
/// # Arguments
///
/// * `scored` - Articles sorted by descending score.
/// * `template` - Name of a built-in template.
/// * `tone` - Tone passed to every summary prompt.
/// * `length` - Summary length passed to every summary prompt.
/// * `top_n` - How many of the highest-scored articles to include.
/// * `summarizer` - Produces the per-article summaries.
///
/// # Returns
///
/// The rendered HTML document.
///
/// # Errors
///
/// * [`NewsletterError::TemplateNotFound`](crate::error::NewsletterError::TemplateNotFound) if `template` is not in the catalogue.
/// * [`NewsletterError::Render`](crate::error::NewsletterError::Render) if writing the document fails.
#[instrument(level = "info", skip(scored, summarizer), fields(articles = scored.len()))]
pub async fn generate_newsletter<G>(
    scored: Vec<ScoredArticle>,
    template: &str,
    tone: Tone,
    length: SummaryLength,
    top_n: usize,
    summarizer: &Summarizer<G>,
) -> Result<String>
where
    G: AskAsync<Response = String>,
{
    templates::find_template(template)?;

    let top = select_top(scored, top_n);
    info!(selected = top.len(), "Summarizing top articles");

    let items: Vec<(Category, NewsletterItem)> = stream::iter(top)
        .then(|scored| async move {
            let summary = summarizer
                .summarize(&scored.article.title, &scored.article.content, tone, length)
                .await;
            let item = NewsletterItem {
                url: scored.article.canonical_url().to_string(),
                title: scored.article.title,
                summary,
                cta: CTA_LABEL.to_string(),
            };
            (scored.category, item)
        })
        .collect()
        .await;

    let ctx = NewsletterContext {
        newsletter_title: NEWSLETTER_TITLE.to_string(),
        tone,
        length,
        manage_link: MANAGE_LINK.to_string(),
        sections: group_by_category(items),
    };
    templates::render(template, &ctx)
}
