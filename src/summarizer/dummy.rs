//! Offline provider for development runs without an API key.

use super::Summarizer;
use crate::errors::SummarizeError;
use crate::locale::Locale;
use crate::models::SummaryCandidate;
use crate::utils::truncate_chars;
use tracing::info;

const TITLE_CHARS: usize = 40;
const PREVIEW_CHARS: usize = 200;

/// Builds a "summary" from the first characters of the input.
#[derive(Debug, Clone)]
pub struct DummySummarizer {
    locale: Locale,
}

impl DummySummarizer {
    pub fn new(locale: Locale) -> Self {
        info!("Offline test summarizer initialized");
        Self { locale }
    }
}

impl Summarizer for DummySummarizer {
    fn name(&self) -> &str {
        "dummy"
    }

    async fn summarize(&self, title: &str, content: &str) -> Result<SummaryCandidate, SummarizeError> {
        let title = format!(
            "{} {}",
            self.locale.dummy_title_prefix(),
            truncate_chars(title, TITLE_CHARS)
        );
        let preview = if content.trim().is_empty() {
            self.locale.dummy_empty_content().to_string()
        } else {
            truncate_chars(content, PREVIEW_CHARS)
        };
        Ok(SummaryCandidate {
            title,
            content: format!("{}... {}", preview, self.locale.dummy_notice()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dummy_summary_shape() {
        let summarizer = DummySummarizer::new(Locale::Zh);
        let summary = summarizer
            .summarize(&"题".repeat(60), &"文".repeat(500))
            .await
            .unwrap();
        assert_eq!(summary.title, format!("[摘要] {}", "题".repeat(40)));
        assert!(summary.content.starts_with(&"文".repeat(200)));
        assert!(summary.content.contains("测试AI"));
    }

    #[tokio::test]
    async fn test_dummy_handles_empty_content() {
        let summarizer = DummySummarizer::new(Locale::En);
        let summary = summarizer.summarize("Headline", "").await.unwrap();
        assert_eq!(summary.title, "[Summary] Headline");
        assert!(summary.content.starts_with("No content..."));
    }
}
