//! Summarization providers.
//!
//! A provider turns an article's title and cleaned content into a
//! [`SummaryCandidate`]. The provider is picked once at startup from a
//! [`SummarizerKind`] and wrapped in the [`AnySummarizer`] sum type, so the
//! pipeline stays generic over a single [`Summarizer`] implementation.
//!
//! | Kind | Type | Notes |
//! |------|------|-------|
//! | `openai` | [`OpenAiSummarizer`] | Any OpenAI-compatible endpoint; needs an API key |
//! | `dummy` | [`DummySummarizer`] | Offline, derives the summary from the input |

pub mod dummy;
pub mod grammar;
pub mod openai;

use crate::config::Settings;
use crate::errors::SummarizeError;
use crate::models::SummaryCandidate;
use clap::ValueEnum;
use tracing::info;

pub use dummy::DummySummarizer;
pub use grammar::SummaryGrammar;
pub use openai::OpenAiSummarizer;

/// Something that can summarize an article.
pub trait Summarizer {
    fn name(&self) -> &str;

    async fn summarize(&self, title: &str, content: &str) -> Result<SummaryCandidate, SummarizeError>;
}

/// Which provider to use, as selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SummarizerKind {
    Openai,
    Dummy,
}

/// The configured provider.
#[derive(Debug)]
pub enum AnySummarizer {
    OpenAi(OpenAiSummarizer),
    Dummy(DummySummarizer),
}

impl AnySummarizer {
    pub fn from_settings(settings: &Settings) -> Result<Self, reqwest::Error> {
        let summarizer = match settings.provider {
            SummarizerKind::Openai => AnySummarizer::OpenAi(OpenAiSummarizer::from_settings(settings)?),
            SummarizerKind::Dummy => AnySummarizer::Dummy(DummySummarizer::new(settings.locale)),
        };
        info!(provider = summarizer.name(), "Summarizer ready");
        Ok(summarizer)
    }
}

impl Summarizer for AnySummarizer {
    fn name(&self) -> &str {
        match self {
            AnySummarizer::OpenAi(s) => s.name(),
            AnySummarizer::Dummy(s) => s.name(),
        }
    }

    async fn summarize(&self, title: &str, content: &str) -> Result<SummaryCandidate, SummarizeError> {
        match self {
            AnySummarizer::OpenAi(s) => s.summarize(title, content).await,
            AnySummarizer::Dummy(s) => s.summarize(title, content).await,
        }
    }
}
