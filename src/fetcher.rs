//! Page retrieval.
//!
//! A fetcher owns one HTTP session. The pipeline creates one per site pass and
//! hands it back through [`PageFetcher::close`] when the pass is over, whether
//! or not the pass succeeded.

use crate::config::CrawlSettings;
use crate::errors::FetchError;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Anything that can turn a URL into HTML text.
pub trait PageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;

    /// Release the session.
    fn close(self)
    where
        Self: Sized;
}

/// [`PageFetcher`] backed by a `reqwest` client with a browser User-Agent.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(crawl: &CrawlSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(crawl.user_agent.as_str())
            .timeout(crawl.timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Page request failed");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis(),
            "Fetched page"
        );
        Ok(body)
    }

    fn close(self) {
        debug!("HTTP session closed");
    }
}
