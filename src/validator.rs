//! Length and emptiness checks on summaries.

use crate::models::SummaryCandidate;
use crate::utils::truncate_chars;
use tracing::warn;

/// Upper bounds for summary fields, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryLimits {
    pub title_max: usize,
    pub content_max: usize,
}

impl Default for SummaryLimits {
    fn default() -> Self {
        Self {
            title_max: 50,
            content_max: 500,
        }
    }
}

/// Check a summary candidate, truncating over-long fields in place.
///
/// Returns `false` only when the title or the content is empty (blank counts
/// as empty). Length never causes a rejection: fields are hard-cut to the
/// limit, without regard for word boundaries.
pub fn validate(candidate: &mut SummaryCandidate, limits: &SummaryLimits) -> bool {
    if candidate.title.trim().is_empty() || candidate.content.trim().is_empty() {
        warn!("Summary title or content is empty");
        return false;
    }

    let title_len = candidate.title.chars().count();
    if title_len > limits.title_max {
        warn!(len = title_len, max = limits.title_max, "Summary title too long; truncating");
        candidate.title = truncate_chars(&candidate.title, limits.title_max);
    }

    let content_len = candidate.content.chars().count();
    if content_len > limits.content_max {
        warn!(len = content_len, max = limits.content_max, "Summary content too long; truncating");
        candidate.content = truncate_chars(&candidate.content, limits.content_max);
    }

    true
}
