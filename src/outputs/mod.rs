//! Persistence of finished articles.
//!
//! # Submodules
//!
//! - [`json`]: one pretty-printed JSON array per source and day
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── 开源中国_20250506.json
//! ├── 网易_20250506.json
//! └── 网易_20250507.json
//! ```

pub mod json;

use crate::errors::StoreError;
use crate::models::{NewsRecord, SummarizedArticle};
use chrono::NaiveDate;

pub use json::FileStore;

/// Where summarized articles end up.
pub trait RecordStore {
    /// Add an article to today's collection of its source.
    ///
    /// # Arguments
    ///
    /// * `article` - A summarized article whose summary already passed validation
    ///
    /// # Returns
    ///
    /// The record as written, stamped with its `saved_at` time, or a
    /// [`StoreError`] when the collection cannot be written.
    async fn append(&self, article: SummarizedArticle) -> Result<NewsRecord, StoreError>;

    /// Read back every record matching `query`.
    ///
    /// # Arguments
    ///
    /// * `query` - Source, day and field filters; an empty query matches all
    ///
    /// # Returns
    ///
    /// Matching records, collection by collection in file-name order and in
    /// append order within a collection. Unreadable collections are skipped.
    async fn load(&self, query: &RecordQuery) -> Result<Vec<NewsRecord>, StoreError>;
}

/// Selection criteria for [`RecordStore::load`].
///
/// `fields` are exact matches against the record's JSON form. Keys may be
/// dotted to reach nested values (`summary.title`). String fields compare
/// as-is, other values by their JSON text.
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
    pub source: Option<String>,
    /// Only honored together with `source`.
    pub date: Option<NaiveDate>,
    pub fields: Vec<(String, String)>,
}

impl RecordQuery {
    pub fn for_source(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &NewsRecord) -> bool {
        if self.fields.is_empty() {
            return true;
        }
        let Ok(value) = serde_json::to_value(record) else {
            return false;
        };
        self.fields.iter().all(|(key, expected)| {
            let pointer = format!("/{}", key.replace('.', "/"));
            match value.pointer(&pointer) {
                Some(serde_json::Value::String(s)) => s == expected,
                Some(other) => other.to_string() == *expected,
                None => false,
            }
        })
    }
}
