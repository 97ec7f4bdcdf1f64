//! Data models flowing through the pipeline.
//!
//! - [`LinkCandidate`]: a headline discovered on a site's homepage
//! - [`RawArticle`]: fetched and extracted article text, before summarization
//! - [`SummaryCandidate`]: what the summarizer proposes for an article
//! - [`SummarizedArticle`]: an article paired with its validated summary
//! - [`NewsRecord`]: the persisted unit, stamped by the store
//!
//! Only [`SummaryCandidate`], [`SummarizedArticle`] and [`NewsRecord`] are
//! serialized; they share the snake_case layout of the JSON files on disk.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A (title, absolute URL) pair found on a homepage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCandidate {
    pub title: String,
    pub url: String,
}

/// An article as fetched, before cleaning and summarization.
#[derive(Debug, Clone)]
pub struct RawArticle {
    /// Headline taken from the homepage link.
    pub title: String,
    pub url: String,
    /// Extracted body text.
    pub content: String,
    /// Name of the site the article came from.
    pub source: String,
}

/// A tentative summary. Lengths are bounded only after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryCandidate {
    pub title: String,
    pub content: String,
}

/// An article with cleaned content and a validated summary, ready to store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizedArticle {
    pub title: String,
    pub url: String,
    pub content: String,
    pub source: String,
    pub summary: SummaryCandidate,
}

/// A persisted record. Created once by the store and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsRecord {
    pub title: String,
    pub url: String,
    pub content: String,
    pub source: String,
    pub summary: SummaryCandidate,
    /// When the record was appended to its collection.
    pub saved_at: DateTime<Local>,
}

impl NewsRecord {
    /// Stamp an article with the time it is being saved.
    pub fn stamp(article: SummarizedArticle, saved_at: DateTime<Local>) -> Self {
        Self {
            title: article.title,
            url: article.url,
            content: article.content,
            source: article.source,
            summary: article.summary,
            saved_at,
        }
    }
}
