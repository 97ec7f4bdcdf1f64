//! Article body extraction.

use super::block_text;
use crate::utils::truncate_chars;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;

/// Maximum number of characters kept when falling back to the page body.
pub const BODY_TEXT_MAX: usize = 2000;

/// Common article containers, tried in order when the site's own content
/// selector is missing or matches nothing.
const FALLBACK_CONTENT_SELECTORS: [&str; 8] = [
    "article",
    ".article",
    ".article-content",
    ".content",
    "#content",
    ".post-content",
    ".entry-content",
    ".news-content",
];

static FALLBACK_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    FALLBACK_CONTENT_SELECTORS
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .collect()
});

static BODY_SELECTOR: Lazy<Option<Selector>> = Lazy::new(|| Selector::parse("body").ok());

/// Extract the article text from a document.
///
/// # Arguments
///
/// * `document` - The parsed article page
/// * `content_selector` - The site's content selector, if configured
///
/// # Returns
///
/// The text of the first non-empty match, trying in order the configured
/// selector, the common article containers and finally the page body (capped
/// at [`BODY_TEXT_MAX`] characters). Text nodes are joined with `\n`.
/// Returns an empty string when nothing readable is found; the caller treats
/// that as a failed extraction.
///
/// # Examples
///
/// ```ignore
/// let doc = Html::parse_document(r#"<div class="post_body"><p>One</p><p>Two</p></div>"#);
/// let selector = Selector::parse(".post_body").unwrap();
/// assert_eq!(extract_content(&doc, Some(&selector)), "One\nTwo");
/// ```
pub fn extract_content(document: &Html, content_selector: Option<&Selector>) -> String {
    if let Some(selector) = content_selector {
        if let Some(text) = first_text(document, selector) {
            return text;
        }
        debug!("Configured content selector matched nothing; trying fallbacks");
    }

    for selector in FALLBACK_SELECTORS.iter() {
        if let Some(text) = first_text(document, selector) {
            return text;
        }
    }

    let body = BODY_SELECTOR
        .as_ref()
        .and_then(|s| document.select(s).next())
        .map(block_text)
        .unwrap_or_default();
    debug!(chars = body.chars().count(), "Falling back to page body");
    truncate_chars(&body, BODY_TEXT_MAX)
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(block_text)
        .filter(|text| !text.is_empty())
}
