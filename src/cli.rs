//! Command-line interface definitions for the newsletter generator.
//!
//! API keys can be given as flags or through the environment. Running without
//! a subcommand is the same as `batch`.

use crate::models::{CategoryFilter, SummaryLength, Tone};
use crate::pipeline::RunOptions;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Batch run with the stock settings
/// curated_newsletter
///
/// # Finance-only newsletter, 15 articles, saved twice
/// curated_newsletter generate --template finance --category Finance \
///     --top-n 15 --save-as ~/Downloads/newsletter.html
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory the rendered newsletter is written to
    #[arg(short, long, default_value = "output")]
    pub output_dir: String,

    /// NewsAPI key for top headlines (headlines are skipped without one)
    #[arg(long, env = "NEWSAPI_KEY", hide_env_values = true)]
    pub newsapi_key: Option<String>,

    /// Gemini API key used for summaries
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Build the newsletter with fixed settings
    Batch,
    /// Build a newsletter with chosen template, tone, length and category
    Generate(GenerateArgs),
}

#[derive(Args, Debug, PartialEq)]
pub struct GenerateArgs {
    /// Template name (default, professional, marketing, clean, tech, finance, corporate, minimal)
    #[arg(long, default_value = "default")]
    pub template: String,

    #[arg(long, value_enum, default_value_t = Tone::Professional)]
    pub tone: Tone,

    #[arg(long, value_enum, default_value_t = SummaryLength::Short)]
    pub length: SummaryLength,

    /// All, AI, Tech, Finance, Business, Health or Sports
    #[arg(long, default_value = "All")]
    pub category: CategoryFilter,

    /// Number of articles to include
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u8).range(5..=20))]
    pub top_n: u8,

    /// Also write a copy of the newsletter to this path
    #[arg(long)]
    pub save_as: Option<PathBuf>,
}

impl GenerateArgs {
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            template: self.template.clone(),
            tone: self.tone,
            length: self.length,
            category: self.category,
            top_n: usize::from(self.top_n),
            require_articles: true,
        }
    }
}
