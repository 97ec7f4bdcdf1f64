//! Headline discovery on a site's homepage.
//!
//! Two modes, chosen by the site's selectors:
//!
//! - **List mode** (`list` selector set): every list node is one headline.
//!   The title comes from the `title` selector inside the node (or the node's
//!   own text), the URL from the `link` selector inside the node (or from the
//!   node that supplied the title).
//! - **Flat mode** (no `list` selector): every element matching `link` is a
//!   headline, its text is the title.
//!
//! Relative hrefs are resolved against the site's base URL. Candidates
//! without a title or URL are dropped; duplicates are kept and document
//! order is preserved. Capping the number of candidates is up to the caller.

use super::inline_text;
use crate::models::LinkCandidate;
use crate::sites::SelectorSet;
use scraper::{ElementRef, Html};
use tracing::{debug, warn};
use url::Url;

/// Extract headline candidates from a homepage document.
///
/// # Arguments
///
/// * `document` - The parsed homepage
/// * `selectors` - The site's compiled selectors; only `list`, `title` and
///   `link` are used
/// * `base` - The site's base URL, used to resolve relative hrefs
///
/// # Returns
///
/// Candidates in document order, each with a non-empty title and an absolute
/// URL. Duplicates are kept. Without `list` and `link` selectors the result
/// is empty.
///
/// # Examples
///
/// ```ignore
/// let doc = Html::parse_document(r#"<a class="story" href="/a/b">Headline</a>"#);
/// let links = extract_links(&doc, &site.selectors, &Url::parse("https://x.com")?);
/// assert_eq!(links[0].url, "https://x.com/a/b");
/// ```
pub fn extract_links(document: &Html, selectors: &SelectorSet, base: &Url) -> Vec<LinkCandidate> {
    let mut candidates = Vec::new();

    match (&selectors.list, &selectors.link) {
        (Some(list), _) => {
            for item in document.select(list) {
                let title_element = selectors
                    .title
                    .as_ref()
                    .and_then(|s| item.select(s).next())
                    .unwrap_or(item);
                let title = inline_text(title_element);

                let link_element = match &selectors.link {
                    Some(link) => item.select(link).next(),
                    None => Some(title_element),
                };
                let url = link_element
                    .and_then(|e| resolve_href(e, base))
                    .unwrap_or_default();

                push_candidate(&mut candidates, title, url);
            }
        }
        (None, Some(link)) => {
            for anchor in document.select(link) {
                let title = inline_text(anchor);
                let url = resolve_href(anchor, base).unwrap_or_default();
                push_candidate(&mut candidates, title, url);
            }
        }
        (None, None) => {
            warn!(base = %base, "Neither list nor link selector configured; no links to extract");
        }
    }

    debug!(count = candidates.len(), base = %base, "Extracted link candidates");
    candidates
}

fn push_candidate(candidates: &mut Vec<LinkCandidate>, title: String, url: String) {
    if title.is_empty() || url.is_empty() {
        debug!(%title, %url, "Dropping incomplete link candidate");
        return;
    }
    candidates.push(LinkCandidate { title, url });
}

fn resolve_href(element: ElementRef<'_>, base: &Url) -> Option<String> {
    let href = element.value().attr("href")?.trim();
    if href.is_empty() {
        return None;
    }
    resolve_url(base, href)
}

/// Resolve `href` against `base`, returning an absolute URL.
pub fn resolve_url(base: &Url, href: &str) -> Option<String> {
    match base.join(href) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            debug!(%href, error = %e, "Unresolvable href");
            None
        }
    }
}
