//! LLM API interaction with optional exponential backoff.
//!
//! # Architecture
//!
//! - [`AskAsync`]: core trait for sending one prompt and getting text back
//! - [`ChatClient`]: OpenAI-compatible `/chat/completions` client
//! - [`RetryAsk`]: decorator that retries any [`AskAsync`] implementation
//!
//! # Retry Strategy
//!
//! Retries are off by default (`max_retries = 0`): one failed call fails the
//! article. When enabled, the delay doubles from `base_delay` per attempt,
//! is capped at 30 seconds and gets 0-250ms of random jitter.

use crate::errors::SummarizeError;
use rand::{Rng, rng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

/// Trait for async LLM interaction.
pub trait AskAsync {
    /// The type of response returned by the LLM.
    type Response;

    /// Send text to the LLM and receive a response.
    async fn ask(&self, text: &str) -> Result<Self::Response, SummarizeError>;
}

/// Wrapper that adds exponential backoff retry logic to any [`AskAsync`] implementation.
///
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryAsk<T> {
    inner: T,
    max_retries: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> RetryAsk<T>
where
    T: AskAsync,
{
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }
}

impl<T> fmt::Debug for RetryAsk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryAsk")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> AskAsync for RetryAsk<T>
where
    T: AskAsync + fmt::Debug,
{
    type Response = T::Response;

    #[instrument(level = "debug", skip_all)]
    async fn ask(&self, text: &str) -> Result<Self::Response, SummarizeError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.ask(text).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_attempt = attempt_dt.as_millis(),
                            elapsed_ms_total = total_dt.as_millis(),
                            error = %e,
                            "ask() gave up"
                        );
                        return Err(e);
                    }

                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1).min(16));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt = attempt_dt.as_millis(),
                        ?delay,
                        error = %e,
                        "ask() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat completion endpoint.
pub struct ChatClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    system_prompt: String,
    temperature: f32,
    max_tokens: u32,
}

impl fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClient")
            .field("api_base", &self.api_base)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

impl ChatClient {
    pub fn new(
        http: reqwest::Client,
        api_base: &str,
        api_key: String,
        model: String,
        system_prompt: String,
    ) -> Self {
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
            model,
            system_prompt,
            temperature: 0.5,
            max_tokens: 1000,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl AskAsync for ChatClient {
    type Response = String;

    #[instrument(level = "debug", skip_all, fields(model = %self.model))]
    async fn ask(&self, text: &str) -> Result<Self::Response, SummarizeError> {
        let t0 = Instant::now();
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(%status, elapsed_ms = t0.elapsed().as_millis(), "Chat completion failed");
            return Err(SummarizeError::Upstream(format!("{status}: {detail}")));
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(SummarizeError::EmptyResponse)?;

        debug!(elapsed_ms = t0.elapsed().as_millis(), chars = content.chars().count(), "Chat completion received");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug)]
    struct Flaky {
        failures_left: Cell<usize>,
        calls: Cell<usize>,
    }

    impl AskAsync for Flaky {
        type Response = String;

        async fn ask(&self, text: &str) -> Result<String, SummarizeError> {
            self.calls.set(self.calls.get() + 1);
            if self.failures_left.get() > 0 {
                self.failures_left.set(self.failures_left.get() - 1);
                return Err(SummarizeError::Upstream("503".to_string()));
            }
            Ok(format!("echo: {text}"))
        }
    }

    fn flaky(failures: usize) -> Flaky {
        Flaky {
            failures_left: Cell::new(failures),
            calls: Cell::new(0),
        }
    }

    fn client(server_url: &str) -> ChatClient {
        ChatClient::new(
            reqwest::Client::new(),
            server_url,
            "sk-test".to_string(),
            "gpt-test".to_string(),
            "system".to_string(),
        )
    }

    #[tokio::test]
    async fn test_no_retries_fails_on_first_error() {
        let api = RetryAsk::new(flaky(1), 0, StdDuration::from_millis(1));
        assert!(api.ask("hi").await.is_err());
        assert_eq!(api.inner.calls.get(), 1);
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let api = RetryAsk::new(flaky(2), 3, StdDuration::from_millis(1));
        assert_eq!(api.ask("hi").await.unwrap(), "echo: hi");
        assert_eq!(api.inner.calls.get(), 3);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let rendered = format!("{:?}", client("http://localhost"));
        assert!(!rendered.contains("sk-test"));
        assert!(rendered.contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_chat_client_returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"  Title: A\nSummary: B  "}}]}"#)
            .create_async()
            .await;

        let answer = client(&server.url()).ask("prompt").await.unwrap();
        assert_eq!(answer, "Title: A\nSummary: B");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_chat_client_maps_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let err = client(&server.url()).ask("prompt").await.unwrap_err();
        assert!(matches!(err, SummarizeError::Upstream(ref msg) if msg.contains("429")));
    }

    #[tokio::test]
    async fn test_chat_client_rejects_empty_completion() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let err = client(&server.url()).ask("prompt").await.unwrap_err();
        assert!(matches!(err, SummarizeError::EmptyResponse));
    }
}
