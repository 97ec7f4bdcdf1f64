//! Pulling a labeled title and body out of a free-text completion.
//!
//! Models rarely answer in exactly the requested shape, so extraction runs in
//! two passes:
//!
//! 1. a regex over the whole answer (`<label>:` or `<label>：`, the content
//!    running until a blank line or the end)
//! 2. for each field still missing, a scan of line prefixes that tolerates
//!    list numbering (`1.`, `-`) and markdown emphasis (`**Title**:`)

use once_cell::sync::Lazy;
use regex::Regex;

static LINE_DECORATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\s>#*\-]*(?:\d+[.)、]\s*)?[*_]*").expect("decoration pattern"));

#[derive(Debug, Clone)]
pub struct SummaryGrammar {
    title_label: String,
    content_label: String,
    title_pattern: Regex,
    content_pattern: Regex,
}

/// Fields found in a completion; either may be missing.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractedFields {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl SummaryGrammar {
    /// Build a grammar for the given labels. Labels are matched literally.
    pub fn new(title_label: &str, content_label: &str) -> Self {
        let title_pattern = Regex::new(&format!(
            r"{}[ \t]*[:：][ \t]*([^\n]*)",
            regex::escape(title_label)
        ))
        .expect("escaped label forms a valid pattern");
        let content_pattern = Regex::new(&format!(
            r"(?s){}[ \t]*[:：][ \t]*(.*?)(?:\n[ \t]*\n|\z)",
            regex::escape(content_label)
        ))
        .expect("escaped label forms a valid pattern");
        Self {
            title_label: title_label.to_string(),
            content_label: content_label.to_string(),
            title_pattern,
            content_pattern,
        }
    }

    pub fn title_label(&self) -> &str {
        &self.title_label
    }

    pub fn content_label(&self) -> &str {
        &self.content_label
    }

    pub fn extract(&self, response: &str) -> ExtractedFields {
        let mut fields = ExtractedFields {
            title: capture(&self.title_pattern, response),
            content: capture(&self.content_pattern, response),
        };

        if fields.title.is_none() || fields.content.is_none() {
            for line in response.lines() {
                let line = LINE_DECORATION.replace(line, "");
                if fields.title.is_none() {
                    fields.title = labeled_value(&line, &self.title_label);
                }
                if fields.content.is_none() {
                    fields.content = labeled_value(&line, &self.content_label);
                }
            }
        }

        fields
    }
}

fn capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn labeled_value(line: &str, label: &str) -> Option<String> {
    let rest = line.strip_prefix(label)?;
    let rest = rest.trim_start_matches(['*', '_']).trim_start();
    let value = rest
        .strip_prefix(':')
        .or_else(|| rest.strip_prefix('：'))?
        .trim()
        .trim_matches(['*', '_'])
        .trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zh() -> SummaryGrammar {
        SummaryGrammar::new("新标题", "内容摘要")
    }

    fn en() -> SummaryGrammar {
        SummaryGrammar::new("Title", "Summary")
    }

    #[test]
    fn test_primary_pattern_chinese() {
        let fields = zh().extract("1. 新标题：央行宣布降息\n2. 内容摘要：央行今日宣布下调利率。\n市场反应积极。\n\n以上。");
        assert_eq!(fields.title.as_deref(), Some("央行宣布降息"));
        assert_eq!(
            fields.content.as_deref(),
            Some("央行今日宣布下调利率。\n市场反应积极。")
        );
    }

    #[test]
    fn test_primary_pattern_ascii_colon() {
        let fields = en().extract("Title: Rates cut\nSummary: The central bank cut rates.");
        assert_eq!(fields.title.as_deref(), Some("Rates cut"));
        assert_eq!(fields.content.as_deref(), Some("The central bank cut rates."));
    }

    #[test]
    fn test_fallback_handles_markdown_emphasis() {
        let fields = en().extract("**Title**: Rates cut\n**Summary**: The bank cut rates.");
        assert_eq!(fields.title.as_deref(), Some("Rates cut"));
        assert_eq!(fields.content.as_deref(), Some("The bank cut rates."));
    }

    #[test]
    fn test_fallback_fills_only_missing_field() {
        let fields = zh().extract("新标题：股市上涨\n- **内容摘要**： 今日股市普遍上涨。");
        assert_eq!(fields.title.as_deref(), Some("股市上涨"));
        assert_eq!(fields.content.as_deref(), Some("今日股市普遍上涨。"));
    }

    #[test]
    fn test_nothing_found() {
        let fields = en().extract("I cannot summarize this article.");
        assert_eq!(fields, ExtractedFields::default());
    }

    #[test]
    fn test_empty_values_count_as_missing() {
        let fields = en().extract("Title:\nSummary:   ");
        assert_eq!(fields.title, None);
        assert_eq!(fields.content, None);
    }

    #[test]
    fn test_labels_are_escaped() {
        let grammar = SummaryGrammar::new("T(1)", "C+");
        let fields = grammar.extract("T(1): one\nC+: two");
        assert_eq!(fields.title.as_deref(), Some("one"));
        assert_eq!(fields.content.as_deref(), Some("two"));
    }
}
