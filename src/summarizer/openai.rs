//! Summaries from an OpenAI-compatible chat completion API.

use super::Summarizer;
use super::grammar::SummaryGrammar;
use crate::api::{AskAsync, ChatClient, RetryAsk};
use crate::config::Settings;
use crate::errors::SummarizeError;
use crate::locale::Locale;
use crate::models::SummaryCandidate;
use crate::utils::{truncate_chars, truncate_for_log};
use crate::validator::SummaryLimits;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

/// Characters of article content included in the prompt.
const PROMPT_CONTENT_MAX: usize = 3000;

/// Characters of original content used when the model gives no summary body.
const FALLBACK_CONTENT_CHARS: usize = 100;

#[derive(Debug)]
pub struct OpenAiSummarizer {
    /// `None` when no API key is configured; every call then fails.
    client: Option<RetryAsk<ChatClient>>,
    grammar: SummaryGrammar,
    locale: Locale,
    limits: SummaryLimits,
}

impl OpenAiSummarizer {
    pub fn from_settings(settings: &Settings) -> Result<Self, reqwest::Error> {
        let llm = &settings.llm;
        let client = match llm.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            Some(key) => {
                let http = reqwest::Client::builder().timeout(llm.timeout).build()?;
                let chat = ChatClient::new(
                    http,
                    &llm.api_base,
                    key.to_string(),
                    llm.model.clone(),
                    settings.locale.system_prompt().to_string(),
                );
                info!(model = %chat.model(), api_base = %llm.api_base, "OpenAI summarizer initialized");
                Some(RetryAsk::new(chat, llm.max_retries, Duration::from_secs(1)))
            }
            None => {
                warn!("No OpenAI API key configured; articles cannot be summarized");
                None
            }
        };

        Ok(Self {
            client,
            grammar: settings.grammar.clone(),
            locale: settings.locale,
            limits: settings.limits,
        })
    }

    /// Build the summary from a completion, substituting the original title
    /// or content for whatever the completion does not provide.
    fn candidate_from_response(&self, response: &str, title: &str, content: &str) -> SummaryCandidate {
        let fields = self.grammar.extract(response);
        if fields.title.is_none() || fields.content.is_none() {
            warn!(
                title_found = fields.title.is_some(),
                content_found = fields.content.is_some(),
                response_preview = %truncate_for_log(response, 200),
                "Completion did not follow the requested format; using original text"
            );
        }

        SummaryCandidate {
            title: truncate_chars(
                fields.title.as_deref().unwrap_or(title),
                self.limits.title_max,
            ),
            content: match fields.content {
                Some(summary) => truncate_chars(&summary, self.limits.content_max),
                None => format!("{}...", truncate_chars(content, FALLBACK_CONTENT_CHARS)),
            },
        }
    }
}

impl Summarizer for OpenAiSummarizer {
    fn name(&self) -> &str {
        "openai"
    }

    #[instrument(level = "info", skip_all, fields(title = %truncate_for_log(title, 40)))]
    async fn summarize(&self, title: &str, content: &str) -> Result<SummaryCandidate, SummarizeError> {
        let Some(client) = &self.client else {
            error!("No OpenAI API key configured; cannot summarize");
            return Err(SummarizeError::MissingCredentials);
        };

        let prompt = self.locale.summary_prompt(
            title,
            &truncate_chars(content, PROMPT_CONTENT_MAX),
            self.grammar.title_label(),
            self.grammar.content_label(),
            self.limits.title_max,
            self.limits.content_max,
        );
        let response = client.ask(&prompt).await?;
        let candidate = self.candidate_from_response(&response, title, content);
        info!(summary_title = %candidate.title, "Summary generated");
        Ok(candidate)
    }
}
