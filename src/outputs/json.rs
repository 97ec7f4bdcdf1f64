//! JSON file store.
//!
//! Each `(source, day)` pair owns one file holding a JSON array of
//! [`NewsRecord`]s, written as indented UTF-8:
//!
//! ```text
//! {output_dir}/{safe_source}_{YYYYMMDD}.json
//! ```
//!
//! Appending rewrites the whole file. A file that cannot be read or parsed is
//! treated as an empty collection, so one bad write never blocks later runs.
//! There is no locking; a single writer is assumed.

use super::{RecordQuery, RecordStore};
use crate::errors::StoreError;
use crate::models::{NewsRecord, SummarizedArticle};
use crate::utils::safe_file_stem;
use chrono::{Local, NaiveDate};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone)]
pub struct FileStore {
    output_dir: PathBuf,
}

impl FileStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// File holding the collection of `source` for `date`.
    pub fn path_for(&self, source: &str, date: NaiveDate) -> PathBuf {
        self.output_dir.join(format!(
            "{}_{}.json",
            safe_file_stem(source),
            date.format("%Y%m%d")
        ))
    }

    /// Files of the output directory selected by `query`, sorted by name.
    async fn collection_files(&self, query: &RecordQuery) -> Result<Vec<PathBuf>, StoreError> {
        let mut entries = match fs::read_dir(&self.output_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(dir = %self.output_dir.display(), "Output directory does not exist yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let wanted_stem = query.source.as_deref().map(safe_file_stem);
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(file_stem) = name.strip_suffix(".json") else {
                continue;
            };

            if let Some(wanted) = &wanted_stem {
                let Some((stem, date)) = split_collection_name(file_stem) else {
                    continue;
                };
                if stem != wanted {
                    continue;
                }
                if let Some(day) = query.date {
                    if date != day {
                        continue;
                    }
                }
            }
            files.push(path);
        }

        files.sort();
        Ok(files)
    }
}

/// Split `"网易_20250506"` into `("网易", 2025-05-06)`.
fn split_collection_name(file_stem: &str) -> Option<(&str, NaiveDate)> {
    let (stem, date) = file_stem.rsplit_once('_')?;
    if date.len() != 8 || !date.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(date, "%Y%m%d")
        .ok()
        .map(|d| (stem, d))
}

/// Read a collection, degrading to empty on any read or parse failure.
async fn read_collection(path: &Path) -> Vec<NewsRecord> {
    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Unreadable collection; treating as empty");
            return Vec::new();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(records) => records,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Corrupt collection; treating as empty");
            Vec::new()
        }
    }
}

impl RecordStore for FileStore {
    /// Read-modify-write of `{output_dir}/{safe_source}_{YYYYMMDD}.json`.
    ///
    /// The output directory is created when missing. A corrupt collection is
    /// logged and replaced by one holding only the new record.
    #[instrument(level = "info", skip_all, fields(source = %article.source, url = %article.url))]
    async fn append(&self, article: SummarizedArticle) -> Result<NewsRecord, StoreError> {
        let now = Local::now();
        let path = self.path_for(&article.source, now.date_naive());

        fs::create_dir_all(&self.output_dir).await?;
        let mut records = read_collection(&path).await;

        let record = NewsRecord::stamp(article, now);
        records.push(record.clone());

        let json = serde_json::to_string_pretty(&records)?;
        fs::write(&path, json).await?;
        info!(path = %path.display(), total = records.len(), "Saved news record");

        Ok(record)
    }

    /// Scan the output directory for matching collections.
    ///
    /// A missing output directory yields no records rather than an error.
    #[instrument(level = "debug", skip(self))]
    async fn load(&self, query: &RecordQuery) -> Result<Vec<NewsRecord>, StoreError> {
        let mut out = Vec::new();
        for path in self.collection_files(query).await? {
            let records = read_collection(&path).await;
            debug!(path = %path.display(), count = records.len(), "Read collection");
            out.extend(records.into_iter().filter(|r| query.matches(r)));
        }
        Ok(out)
    }
}
