//! Utility functions for string handling and file system checks.
//!
//! - Character-safe truncation (headlines are frequently CJK, so byte slicing
//!   is never used)
//! - Whitespace normalization shared by the extractors and the cleaner
//! - File-name sanitizing for per-source collections
//! - Output directory validation

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

static UNSAFE_FILE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w.\-]").expect("file name pattern"));

/// Keep at most `max` characters of `s`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_chars("新闻摘要系统", 2), "新闻");
/// assert_eq!(truncate_chars("abc", 10), "abc");
/// ```
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and the number
/// of dropped bytes appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let kept = truncate_chars(s, max);
    if kept.len() == s.len() {
        kept
    } else {
        format!("{}…(+{} bytes)", kept, s.len() - kept.len())
    }
}

/// Collapse every run of whitespace into a single space and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Turn a source name into something usable as a file name.
///
/// Every character outside `[\w.-]` becomes `_`. Unicode word characters
/// are kept, so `"开源中国"` stays readable on disk.
pub fn safe_file_stem(source: &str) -> String {
    UNSAFE_FILE_CHARS.replace_all(source, "_").into_owned()
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a scratch file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let scratch_path = path.join("..__write_check__");
    match stdfs::File::create(&scratch_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&scratch_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
