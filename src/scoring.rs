//! Keyword categorization and relevance scoring.
//!
//! Both the category and the score come from one ordered keyword table.
//! Matching is plain substring search over the lowercased title and content,
//! so "ai" also matches inside longer words.
//!
//! score = (number of table keywords present) + recency bonus, where the
//! bonus decays linearly from 2.0 for an article published today to 0.0 at
//! 30 days old.

use crate::models::{Category, CuratedArticle, ScoredArticle};
use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

/// Ordered category table. The first category with a matching keyword wins.
pub const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::AI,
        &[
            "ai",
            "artificial intelligence",
            "machine learning",
            "deep learning",
            "neural network",
            "openai",
            "google ai",
            "chatgpt",
            "llm",
            "model",
        ],
    ),
    (
        Category::Tech,
        &[
            "tech",
            "software",
            "hardware",
            "cloud",
            "startup",
            "developer",
            "programming",
            "gadgets",
            "technology",
        ],
    ),
    (
        Category::Finance,
        &[
            "stock",
            "market",
            "finance",
            "economy",
            "investment",
            "earnings",
            "crypto",
            "bitcoin",
            "inflation",
            "recession",
        ],
    ),
    (
        Category::Business,
        &["acquisition", "merger", "company", "business", "corporate", "startup funding"],
    ),
    (
        Category::Sports,
        &["football", "cricket", "match", "tournament", "fifa", "goal"],
    ),
    (
        Category::Health,
        &["health", "medical", "vaccine", "covid", "disease", "study"],
    ),
];

const RECENCY_WINDOW_DAYS: f64 = 30.0;
const RECENCY_WEIGHT: f64 = 2.0;
const SECONDS_PER_DAY: i64 = 86_400;

/// First category in table order with any keyword in `text`, else `General`.
///
/// `text` is expected to be lowercased already.
pub fn detect_category(text: &str) -> Category {
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| text.contains(*kw)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::General)
}

/// How many table keywords (across all categories) appear in `text`.
pub fn keyword_hits(text: &str) -> usize {
    CATEGORY_KEYWORDS
        .iter()
        .flat_map(|(_, keywords)| keywords.iter())
        .filter(|kw| text.contains(**kw))
        .count()
}

/// Time-decay bonus: `max(0, 1 - age_days / 30) * 2`.
///
/// Age is counted in whole days, floored, so anything published within the
/// last 24 hours gets the full bonus. Future timestamps count as age zero.
pub fn recency_bonus(published: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(published) = published else {
        return 0.0;
    };
    let age_days = (now - published)
        .num_seconds()
        .div_euclid(SECONDS_PER_DAY)
        .max(0) as f64;
    (1.0 - age_days / RECENCY_WINDOW_DAYS).max(0.0) * RECENCY_WEIGHT
}

/// Relevance score of an article, rounded to three decimals.
pub fn compute_score(article: &CuratedArticle, now: DateTime<Utc>) -> f64 {
    let text = article.searchable_text();
    let score = keyword_hits(&text) as f64 + recency_bonus(article.published, now);
    (score * 1000.0).round() / 1000.0
}

pub fn score_article(article: CuratedArticle, now: DateTime<Utc>) -> ScoredArticle {
    let category = detect_category(&article.searchable_text());
    let score = compute_score(&article, now);
    debug!(title = %article.title, %category, score, "Scored article");
    ScoredArticle {
        article,
        category,
        score,
    }
}

/// Score every article and sort by score, highest first.
///
/// The sort is stable: equal scores keep their curated order.
///
/// # Arguments
///
/// * `articles` - Curated articles to classify.
/// * `now` - Reference time for the recency bonus.
///
/// # Returns
///
/// One [`ScoredArticle`] per input, sorted by descending score.
#[instrument(level = "info", skip_all, fields(count = articles.len()))]
pub fn run_scoring(articles: Vec<CuratedArticle>, now: DateTime<Utc>) -> Vec<ScoredArticle> {
    let mut scored: Vec<ScoredArticle> = articles
        .into_iter()
        .map(|article| score_article(article, now))
        .collect();
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    info!(
        top = scored.first().map_or(0.0, |s| s.score),
        "Scoring completed"
    );
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn article(title: &str, content: &str) -> CuratedArticle {
        CuratedArticle {
            title: title.to_string(),
            link: None,
            rss_url: None,
            scraped_url: None,
            published: None,
            summary: String::new(),
            content: content.to_string(),
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-05-06T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_detect_category_first_match_wins() {
        // "stock" (Finance) and "openai" (AI) both match; AI comes first.
        assert_eq!(detect_category("openai stock surges"), Category::AI);
        assert_eq!(detect_category("football match tonight"), Category::Sports);
        assert_eq!(detect_category("new vaccine trial"), Category::Health);
    }

    #[test]
    fn test_detect_category_defaults_to_general() {
        assert_eq!(detect_category(""), Category::General);
        assert_eq!(detect_category("weather is nice"), Category::General);
    }

    #[test]
    fn test_category_is_total() {
        for text in ["", "xyz", "the cloud", "merger talks", "covid", "bitcoin"] {
            assert!(Category::ALL.contains(&detect_category(text)));
        }
    }

    #[test]
    fn test_keyword_hits_counts_across_categories() {
        assert_eq!(keyword_hits("bitcoin inflation"), 2);
        assert_eq!(keyword_hits("football cricket tournament"), 3);
        assert_eq!(keyword_hits("nothing relevant"), 0);
    }

    #[test]
    fn test_adding_keyword_never_lowers_score() {
        let base = compute_score(&article("", "vaccine"), now());
        let more = compute_score(&article("", "vaccine bitcoin"), now());
        assert!(more > base);

        let same = compute_score(&article("", "vaccine vaccine"), now());
        assert_eq!(same, base);
    }

    #[test]
    fn test_recency_bonus_bounds() {
        let now = now();
        assert_eq!(recency_bonus(Some(now), now), 2.0);
        assert_eq!(recency_bonus(Some(now - Duration::hours(23)), now), 2.0);
        assert_eq!(recency_bonus(Some(now - Duration::days(15)), now), 1.0);
        assert_eq!(recency_bonus(Some(now - Duration::days(30)), now), 0.0);
        assert_eq!(recency_bonus(Some(now - Duration::days(400)), now), 0.0);
        assert_eq!(recency_bonus(Some(now + Duration::days(3)), now), 2.0);
        assert_eq!(recency_bonus(None, now), 0.0);
    }

    #[test]
    fn test_score_is_rounded_and_non_negative() {
        let mut a = article("", "vaccine");
        a.published = Some(now() - Duration::days(10));
        // 1 hit + (1 - 10/30) * 2 = 2.333...
        assert_eq!(compute_score(&a, now()), 2.333);
        assert!(compute_score(&article("", ""), now()) >= 0.0);
    }

    #[test]
    fn test_run_scoring_sorts_descending() {
        let articles = vec![
            article("", "football cricket tournament"),
            article("", "vaccine"),
            article("", "bitcoin inflation"),
        ];
        let scored = run_scoring(articles, now());
        let scores: Vec<f64> = scored.iter().map(|s| s.score).collect();
        assert_eq!(scores, vec![3.0, 2.0, 1.0]);
        assert_eq!(scored[0].category, Category::Sports);
        assert_eq!(scored[1].category, Category::Finance);
        assert_eq!(scored[2].category, Category::Health);
    }

    #[test]
    fn test_run_scoring_is_stable_for_ties() {
        let articles = vec![
            article("first", "vaccine"),
            article("second", "covid"),
            article("third", "bitcoin inflation"),
        ];
        let scored = run_scoring(articles, now());
        let titles: Vec<&str> = scored.iter().map(|s| s.article.title.as_str()).collect();
        assert_eq!(titles, vec!["third", "first", "second"]);
    }
}
