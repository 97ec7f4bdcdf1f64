//! Error types for every stage of the digest pipeline.
//!
//! Each stage returns its own error enum so the orchestrator can decide,
//! per variant, whether to skip an article, skip a site or abort the run.
//! Only [`ConfigError`] is fatal; everything else is logged and skipped.

use thiserror::Error;

/// Problems found while loading settings or the site registry.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read site file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid site file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("site #{index} has an empty name")]
    EmptyName { index: usize },
    #[error("site {site}: invalid base url {url:?}: {reason}")]
    InvalidUrl {
        site: String,
        url: String,
        reason: String,
    },
    #[error("site {site}: invalid {field} selector {selector:?}: {reason}")]
    InvalidSelector {
        site: String,
        field: &'static str,
        selector: String,
        reason: String,
    },
}

/// Failure to retrieve a page.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
}

/// Failure to obtain a summary from the provider.
#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("no API key configured for the summarization provider")]
    MissingCredentials,
    #[error("summarization request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("summarization provider returned an error: {0}")]
    Upstream(String),
    #[error("summarization provider returned an empty completion")]
    EmptyResponse,
}

/// Failure to persist or read back records.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode records: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Why a single article did not make it into the store.
#[derive(Error, Debug)]
pub enum ArticleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("no article content could be extracted")]
    ExtractionEmpty,
    #[error(transparent)]
    Summarize(#[from] SummarizeError),
    #[error("summary rejected: empty title or content")]
    Rejected,
    #[error(transparent)]
    Store(#[from] StoreError),
}
