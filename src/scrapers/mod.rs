//! Selector-driven extraction from fetched pages.
//!
//! Extraction happens in two phases per site, mirroring how a reader browses
//! a news site:
//!
//! 1. **Indexing** ([`links`]): find headline links on the homepage
//! 2. **Reading** ([`content`]): pull the article body out of each article page
//!
//! The raw body then goes through [`cleaner`] before it is summarized.
//!
//! All functions here are synchronous and work on an already parsed
//! [`scraper::Html`] document; fetching is the pipeline's job.

pub mod cleaner;
pub mod content;
pub mod links;

use itertools::Itertools;
use scraper::{ElementRef, Node};

/// Elements whose text never belongs to the readable content.
const SKIPPED_ELEMENTS: [&str; 3] = ["script", "style", "noscript"];

/// Non-empty, trimmed text nodes under `element`, in document order.
pub(crate) fn text_fragments(element: ElementRef<'_>) -> Vec<String> {
    element
        .descendants()
        .filter_map(|node| match node.value() {
            Node::Text(text) => {
                let skipped = node.ancestors().any(|a| {
                    a.value()
                        .as_element()
                        .is_some_and(|e| SKIPPED_ELEMENTS.contains(&e.name()))
                });
                let trimmed = text.trim();
                (!skipped && !trimmed.is_empty()).then(|| trimmed.to_string())
            }
            _ => None,
        })
        .collect()
}

/// Text of an element on a single line, whitespace collapsed.
pub(crate) fn inline_text(element: ElementRef<'_>) -> String {
    text_fragments(element)
        .iter()
        .flat_map(|fragment| fragment.split_whitespace())
        .join(" ")
}

/// Text of an element with one line per text node.
pub(crate) fn block_text(element: ElementRef<'_>) -> String {
    text_fragments(element).join("\n")
}
