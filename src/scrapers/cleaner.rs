//! Boilerplate removal and normalization of extracted article text.
//!
//! Cleaning works line by line so that a byline or copyright notice only
//! takes its own line with it:
//!
//! 1. collapse whitespace inside the line
//! 2. cut boilerplate markers (up to the end of the line) until none is left
//! 3. collapse again, drop the line if nothing is left
//!
//! The surviving lines are joined with `\n` and capped at [`CLEAN_TEXT_MAX`]
//! characters. The output is a fixed point: cleaning it again changes nothing.

use crate::locale::Locale;
use crate::utils::{collapse_whitespace, truncate_chars};
use regex::Regex;

/// Maximum length of cleaned article text, in characters.
pub const CLEAN_TEXT_MAX: usize = 5000;

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone)]
pub struct TextCleaner {
    patterns: Vec<Regex>,
    max_chars: usize,
}

impl TextCleaner {
    pub fn new(locale: Locale) -> Self {
        let patterns = locale
            .boilerplate_patterns()
            .iter()
            .map(|p| Regex::new(p).expect("boilerplate pattern"))
            .collect();
        Self {
            patterns,
            max_chars: CLEAN_TEXT_MAX,
        }
    }

    /// Clean extracted article text.
    ///
    /// # Arguments
    ///
    /// * `raw` - Text as produced by the content extractor, one text node per line
    ///
    /// # Returns
    ///
    /// The surviving lines joined with `\n`. Text longer than the limit is cut
    /// and gets `...` appended. The cut is placed so that the last line, with
    /// the ellipsis, is itself clean; when the line at the limit would turn
    /// into boilerplate, the cut moves back far enough that the result is no
    /// longer over the limit.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let cleaner = TextCleaner::new(Locale::Zh);
    /// assert_eq!(cleaner.clean("正文。\n责任编辑：张三"), "正文。");
    /// ```
    pub fn clean(&self, raw: &str) -> String {
        let text = raw
            .lines()
            .filter_map(|line| self.clean_line(line))
            .collect::<Vec<_>>()
            .join("\n");

        let offsets: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .take(self.max_chars + 1)
            .collect();
        if offsets.len() <= self.max_chars {
            return text;
        }

        // Either exactly at the limit, or at least an ellipsis length below it.
        let cut_points = std::iter::once(self.max_chars)
            .chain((0..=self.max_chars.saturating_sub(ELLIPSIS.len())).rev());
        for keep in cut_points {
            let capped = format!("{}{}", &text[..offsets[keep]], ELLIPSIS);
            if self.has_clean_tail(&capped) {
                return capped;
            }
        }
        ELLIPSIS.to_string()
    }

    /// Whether the last line of `text` comes out of [`Self::clean_line`] unchanged.
    fn has_clean_tail(&self, text: &str) -> bool {
        let tail = text.rsplit('\n').next().unwrap_or(text);
        self.clean_line(tail).as_deref() == Some(tail)
    }

    fn clean_line(&self, line: &str) -> Option<String> {
        let mut line = collapse_whitespace(line);
        // A cut can expose another marker at the new end of the line.
        loop {
            let mut next = line.clone();
            for pattern in &self.patterns {
                next = pattern.replace_all(&next, "").into_owned();
            }
            let next = collapse_whitespace(&next);
            if next == line {
                break;
            }
            line = next;
        }
        (!line.is_empty()).then_some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_is_normalized() {
        let cleaner = TextCleaner::new(Locale::En);
        assert_eq!(
            cleaner.clean("  The   quick\tbrown  \n\n\n   fox jumps  "),
            "The quick brown\nfox jumps"
        );
    }

    #[test]
    fn test_chinese_boilerplate_is_removed() {
        let cleaner = TextCleaner::new(Locale::Zh);
        let raw = "今日新闻正文第一段。\n\
                   相关阅读：另一篇文章\n\
                   本文来源：某某网\n\
                   正文第二段。责任编辑：张三\n\
                   © 2025 版权所有 翻版必究\n\
                   最后一段。";
        assert_eq!(cleaner.clean(raw), "今日新闻正文第一段。\n最后一段。");
    }

    #[test]
    fn test_marker_cuts_to_end_of_line_only() {
        let cleaner = TextCleaner::new(Locale::Zh);
        assert_eq!(cleaner.clean("前半句 记者 李四 报道\n下一行"), "前半句\n下一行");
    }

    #[test]
    fn test_english_boilerplate_is_removed() {
        let cleaner = TextCleaner::new(Locale::En);
        let raw = "By Jane Doe\n\
                   The council approved the budget on Monday.\n\
                   Related  articles: Budget talks stall\n\
                   Copyright 2025 Example News. All rights reserved.\n\
                   Source: Wire services\n\
                   Voting resumes next week.";
        assert_eq!(
            cleaner.clean(raw),
            "The council approved the budget on Monday.\nVoting resumes next week."
        );
    }

    #[test]
    fn test_long_text_is_truncated_with_ellipsis() {
        let cleaner = TextCleaner::new(Locale::En);
        let cleaned = cleaner.clean(&"word ".repeat(2000));
        assert!(cleaned.ends_with("..."));
        assert_eq!(cleaned.chars().count(), CLEAN_TEXT_MAX + ELLIPSIS.len());
    }

    #[test]
    fn test_cut_never_turns_a_line_into_boilerplate() {
        let cleaner = TextCleaner::new(Locale::En);
        let raw = format!("{}\nClick herein lies the rest of the story", "a".repeat(4989));
        let cleaned = cleaner.clean(&raw);

        assert!(cleaned.ends_with("\nClick h..."), "got tail {:?}", &cleaned[4980..]);
        assert_eq!(cleaned.chars().count(), CLEAN_TEXT_MAX);
        assert_eq!(cleaner.clean(&cleaned), cleaned);
    }

    #[test]
    fn test_clean_is_idempotent() {
        let inputs = [
            "  spaced   out \n\n text ".to_string(),
            "Related\narticles: split across lines\nbody".to_string(),
            "正文。编辑：王五\n\n  第二段  ".to_string(),
            "a ".repeat(3000),
            "新闻".repeat(2600),
            format!("{}\nClick herein lies the rest of the story", "a".repeat(4989)),
            format!("{}\n{}", "b".repeat(4990), "Read more: ".repeat(5)),
            String::new(),
        ];
        for locale in [Locale::Zh, Locale::En] {
            let cleaner = TextCleaner::new(locale);
            for input in &inputs {
                let once = cleaner.clean(input);
                assert_eq!(cleaner.clean(&once), once, "not idempotent for {input:?}");
            }
        }
    }
}
