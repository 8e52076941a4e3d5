//! Per-article summaries in the requested tone and length.

use crate::api::AskAsync;
use crate::models::{SummaryLength, Tone};
use crate::utils::{truncate_chars, truncate_for_log};
use tracing::{debug, instrument, warn};

/// Characters of article content included in a prompt.
const PROMPT_CONTENT_CHARS: usize = 3000;

/// Build the bullet-point summarization prompt.
pub fn build_prompt(title: &str, content: &str, tone: Tone, length: SummaryLength) -> String {
    format!(
        "You are an expert newsletter writer.\n\
         \n\
         Write a summary in a {tone} tone.\n\
         {instruction}\n\
         \n\
         Title: {title}\n\
         \n\
         Content:\n\
         {content}\n\
         \n\
         Format:\n\
         - Bullet points ONLY\n\
         - No intro text\n\
         - No conclusion\n",
        instruction = length.instruction(),
        content = truncate_chars(content, PROMPT_CONTENT_CHARS),
    )
}

/// Wraps a text generator; a failed call becomes an empty summary.
#[derive(Debug)]
pub struct Summarizer<G> {
    pub(crate) generator: G,
}

impl<G> Summarizer<G>
where
    G: AskAsync<Response = String>,
{
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Summarize one article. Returns `""` when the generator fails.
    #[instrument(level = "info", skip_all, fields(%title, %tone, %length))]
    pub async fn summarize(
        &self,
        title: &str,
        content: &str,
        tone: Tone,
        length: SummaryLength,
    ) -> String {
        let prompt = build_prompt(title, content, tone, length);
        match self.generator.ask(&prompt).await {
            Ok(summary) => {
                debug!(preview = %truncate_for_log(&summary, 120), "Summary generated");
                summary
            }
            Err(e) => {
                warn!(error = %e, "Summarization failed; using empty summary");
                String::new()
            }
        }
    }
}
