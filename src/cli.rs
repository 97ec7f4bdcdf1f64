//! Command-line interface definitions.
//!
//! Every option can also be provided through the environment variable named
//! in its help text. Options are global, so they may appear before or after
//! the subcommand.

use crate::config::DEFAULT_USER_AGENT;
use crate::locale::Locale;
use crate::summarizer::SummarizerKind;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Crawl news sites and keep LLM summaries of their articles.
///
/// # Examples
///
/// ```sh
/// # Crawl the built-in sites once
/// news_digest
///
/// # Crawl every 6 hours with an English site list
/// news_digest --sites sites.en.yaml --locale en run --schedule 6
///
/// # Show today's records of one source
/// news_digest query --source 网易
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Directory holding one JSON file per source and day
    #[arg(short, long, global = true, env = "NEWS_OUTPUT_DIR", default_value = "data/output")]
    pub output_dir: PathBuf,

    /// YAML file listing the sites to crawl (defaults to the built-in list)
    #[arg(short, long, global = true, env = "NEWS_SITES")]
    pub sites: Option<PathBuf>,

    /// Summarization provider
    #[arg(long, global = true, env = "NEWS_AI_PROVIDER", value_enum, default_value_t = SummarizerKind::Openai)]
    pub provider: SummarizerKind,

    /// Language of boilerplate patterns, prompt and answer labels
    #[arg(long, global = true, env = "NEWS_LOCALE", value_enum, default_value_t = Locale::Zh)]
    pub locale: Locale,

    /// Label preceding the summary title in model answers (overrides the locale's)
    #[arg(long, global = true, env = "NEWS_TITLE_LABEL")]
    pub title_label: Option<String>,

    /// Label preceding the summary body in model answers (overrides the locale's)
    #[arg(long, global = true, env = "NEWS_CONTENT_LABEL")]
    pub content_label: Option<String>,

    /// Seconds to wait after each page fetch
    #[arg(long, global = true, env = "NEWS_CRAWL_DELAY", default_value_t = 2)]
    pub crawl_delay: u64,

    /// Crawl depth: 1 indexes homepages only, 2 also reads articles
    #[arg(long, global = true, env = "NEWS_MAX_DEPTH", default_value_t = 2)]
    pub max_depth: u32,

    /// Maximum number of articles read per site
    #[arg(long, global = true, env = "NEWS_MAX_ARTICLES", default_value_t = 5)]
    pub max_articles: usize,

    /// Maximum summary title length, in characters
    #[arg(long, global = true, env = "NEWS_TITLE_MAX", default_value_t = 50)]
    pub title_max: usize,

    /// Maximum summary body length, in characters
    #[arg(long, global = true, env = "NEWS_CONTENT_MAX", default_value_t = 500)]
    pub content_max: usize,

    /// HTTP timeout in seconds
    #[arg(long, global = true, env = "NEWS_TIMEOUT", default_value_t = 30)]
    pub timeout: u64,

    /// User-Agent header sent to news sites
    #[arg(long, global = true, env = "NEWS_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Extra attempts for failed summarization calls
    #[arg(long, global = true, env = "NEWS_LLM_RETRIES", default_value_t = 0)]
    pub llm_retries: usize,

    /// API key for the OpenAI-compatible provider
    #[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Model used for summaries
    #[arg(long, global = true, env = "OPENAI_MODEL", default_value = "gpt-3.5-turbo")]
    pub openai_model: String,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, global = true, env = "OPENAI_API_BASE", default_value = "https://api.openai.com/v1")]
    pub openai_api_base: String,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, env = "NEWS_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Also append logs to this file
    #[arg(long, global = true, env = "NEWS_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Crawl, summarize and store (the default)
    Run {
        /// Keep running, crawling every N hours
        #[arg(long, value_name = "HOURS", value_parser = clap::value_parser!(u64).range(1..))]
        schedule: Option<u64>,
    },
    /// Print stored records as JSON
    Query {
        /// Only records of this source
        #[arg(long)]
        source: Option<String>,

        /// Only the collection of this day (YYYY-MM-DD); needs --source
        #[arg(long, requires = "source")]
        date: Option<NaiveDate>,

        /// Exact match on a record field, e.g. `url=https://...` or `summary.title=...`
        #[arg(long = "filter", value_name = "KEY=VALUE", value_parser = parse_filter)]
        filters: Vec<(String, String)>,
    },
}

impl Cli {
    /// The subcommand to execute; a bare invocation runs once.
    pub fn action(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Run { schedule: None })
    }
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got {raw:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_invocation_runs_once() {
        let cli = Cli::parse_from(["news_digest"]);
        assert_eq!(cli.action(), Command::Run { schedule: None });
        assert_eq!(cli.output_dir, PathBuf::from("data/output"));
        assert_eq!(cli.max_articles, 5);
    }

    #[test]
    fn test_schedule_flag() {
        let cli = Cli::parse_from(["news_digest", "run", "--schedule", "6"]);
        assert_eq!(cli.action(), Command::Run { schedule: Some(6) });
        assert!(Cli::try_parse_from(["news_digest", "run", "--schedule", "0"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["news_digest", "run", "-o", "/tmp/out", "--provider", "dummy"]);
        assert_eq!(cli.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(cli.provider, SummarizerKind::Dummy);
    }

    #[test]
    fn test_query_filters() {
        let cli = Cli::parse_from([
            "news_digest",
            "query",
            "--source",
            "网易",
            "--date",
            "2025-05-06",
            "--filter",
            "summary.title=央行降息",
        ]);
        match cli.action() {
            Command::Query {
                source,
                date,
                filters,
            } => {
                assert_eq!(source.as_deref(), Some("网易"));
                assert_eq!(date, NaiveDate::from_ymd_opt(2025, 5, 6));
                assert_eq!(filters, vec![("summary.title".to_string(), "央行降息".to_string())]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_bad_filter_is_rejected() {
        assert!(Cli::try_parse_from(["news_digest", "query", "--filter", "novalue"]).is_err());
        assert!(Cli::try_parse_from(["news_digest", "query", "--date", "2025-05-06"]).is_err());
    }
}
