//! Runtime settings.
//!
//! [`Settings`] is built once from the parsed command line and handed to each
//! component by reference. Nothing reads configuration from global state.
//!
//! A `.env` file, when present, is read into the process environment before
//! the command line is parsed, so every option backed by an environment
//! variable (`OPENAI_API_KEY` included) can be set there. Variables already
//! in the environment win over the file.

use crate::cli::Cli;
use crate::locale::Locale;
use crate::summarizer::{SummarizerKind, SummaryGrammar};
use crate::validator::SummaryLimits;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// How pages are fetched.
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Pause after every page fetch.
    pub delay: Duration,
    /// 1 = homepage only, 2 = homepage and article pages.
    pub max_depth: u32,
    /// Cap on article pages fetched per site.
    pub max_articles_per_site: usize,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(2),
            max_depth: 2,
            max_articles_per_site: 5,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// How the summarization provider is reached.
#[derive(Clone)]
pub struct LlmSettings {
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub max_retries: usize,
    pub timeout: Duration,
}

impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("max_retries", &self.max_retries)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            max_retries: 0,
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub output_dir: PathBuf,
    pub sites_file: Option<PathBuf>,
    pub provider: SummarizerKind,
    pub locale: Locale,
    pub grammar: SummaryGrammar,
    pub limits: SummaryLimits,
    pub crawl: CrawlSettings,
    pub llm: LlmSettings,
}

impl Default for Settings {
    fn default() -> Self {
        let locale = Locale::Zh;
        Self {
            output_dir: PathBuf::from("data/output"),
            sites_file: None,
            provider: SummarizerKind::Openai,
            locale,
            grammar: SummaryGrammar::new(locale.title_label(), locale.content_label()),
            limits: SummaryLimits::default(),
            crawl: CrawlSettings::default(),
            llm: LlmSettings::default(),
        }
    }
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Self {
        let locale = cli.locale;
        let title_label = cli.title_label.as_deref().unwrap_or(locale.title_label());
        let content_label = cli.content_label.as_deref().unwrap_or(locale.content_label());

        Self {
            output_dir: cli.output_dir.clone(),
            sites_file: cli.sites.clone(),
            provider: cli.provider,
            locale,
            grammar: SummaryGrammar::new(title_label, content_label),
            limits: SummaryLimits {
                title_max: cli.title_max,
                content_max: cli.content_max,
            },
            crawl: CrawlSettings {
                delay: Duration::from_secs(cli.crawl_delay),
                max_depth: cli.max_depth,
                max_articles_per_site: cli.max_articles,
                user_agent: cli.user_agent.clone(),
                timeout: Duration::from_secs(cli.timeout),
            },
            llm: LlmSettings {
                api_key: cli.openai_api_key.clone(),
                api_base: cli.openai_api_base.clone(),
                model: cli.openai_model.clone(),
                max_retries: cli.llm_retries,
                timeout: Duration::from_secs(cli.timeout.max(60)),
            },
        }
    }
}

/// Result of looking for a `.env` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvFile {
    Loaded(PathBuf),
    Absent,
}

/// Read a `.env` file into the process environment.
///
/// # Arguments
///
/// * `path` - File to read; `None` searches the current directory and its
///   parents for `.env`
///
/// # Returns
///
/// [`EnvFile::Absent`] when there is no such file, or an error when the file
/// exists but cannot be read or parsed.
pub fn load_env_file(path: Option<&Path>) -> Result<EnvFile, dotenvy::Error> {
    let loaded = match path {
        Some(path) => dotenvy::from_path(path).map(|()| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };
    match loaded {
        Ok(path) => Ok(EnvFile::Loaded(path)),
        Err(e) if e.not_found() => Ok(EnvFile::Absent),
        Err(e) => Err(e),
    }
}
