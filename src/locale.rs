//! Language-dependent phrasing.
//!
//! Boilerplate markers, the summarization prompt and the labels the model is
//! asked to answer with all depend on the language of the crawled sites.
//! Everything that varies by language lives here.

use clap::ValueEnum;

/// Language of the crawled sites and of the summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Locale {
    /// Simplified Chinese.
    Zh,
    /// English.
    En,
}

/// Markers removed by the text cleaner. Each pattern is applied per line,
/// either from the marker to the end of the line or, when it starts with
/// `.*`, to the whole line. Whole-line patterns come first so a shorter
/// marker cannot break them up.
const ZH_BOILERPLATE: &[&str] = &[
    r".*版权声明.*",
    r".*版权所有.*",
    r".*责任编辑.*",
    r".*文章来源.*",
    r"相关(?:推荐|阅读).*",
    r"本文来源.*",
    r"原标题.*",
    r"编辑.*",
    r"记者.*",
    r"点击查看.*",
];

const EN_BOILERPLATE: &[&str] = &[
    r"Related\s+(?:articles|reading|stories|coverage)\b.*",
    r"Read\s+more\s*:.*",
    r"Click\s+here\b.*",
    r"^\s*By\s+\p{Lu}.*",
    r".*\b(?:Edited|Reported|Written)\s+by\s.*",
    r".*\bCopyright\b.*",
    r".*©.*",
    r".*All\s+rights\s+reserved.*",
    r"^\s*Source\s*:.*",
    r"Originally\s+published\b.*",
];

impl Locale {
    pub fn boilerplate_patterns(&self) -> &'static [&'static str] {
        match self {
            Locale::Zh => ZH_BOILERPLATE,
            Locale::En => EN_BOILERPLATE,
        }
    }

    /// Label the model is asked to put in front of the new headline.
    pub fn title_label(&self) -> &'static str {
        match self {
            Locale::Zh => "新标题",
            Locale::En => "Title",
        }
    }

    /// Label the model is asked to put in front of the summary body.
    pub fn content_label(&self) -> &'static str {
        match self {
            Locale::Zh => "内容摘要",
            Locale::En => "Summary",
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            Locale::Zh => "你是一个专业的新闻编辑，擅长提炼新闻重点并进行简明扼要的总结。",
            Locale::En => {
                "You are a professional news editor who distills the key points of a story into a short, precise summary."
            }
        }
    }

    /// Build the user message sent to the model.
    pub fn summary_prompt(
        &self,
        title: &str,
        content: &str,
        title_label: &str,
        content_label: &str,
        title_max: usize,
        content_max: usize,
    ) -> String {
        match self {
            Locale::Zh => format!(
                "请根据以下新闻内容进行摘要：\n\n\
                 原标题：{title}\n\n\
                 原内容：\n{content}\n\n\
                 请提供以下格式的摘要：\n\
                 1. {title_label}：（不超过{title_max}个字符）\n\
                 2. {content_label}：（不超过{content_max}个字符）\n\n\
                 要求：\n\
                 - 新标题应简洁明了，突出新闻重点\n\
                 - 内容摘要应保留关键信息，用简洁的语言概括新闻内容\n\
                 - 保持客观中立的语气\n"
            ),
            Locale::En => format!(
                "Summarize the following news article.\n\n\
                 Original title: {title}\n\n\
                 Original content:\n{content}\n\n\
                 Answer in exactly this format:\n\
                 1. {title_label}: (at most {title_max} characters)\n\
                 2. {content_label}: (at most {content_max} characters)\n\n\
                 Requirements:\n\
                 - The title is concise and states the news itself\n\
                 - The summary keeps the key facts in plain language\n\
                 - Keep an objective, neutral tone\n"
            ),
        }
    }

    /// Prefix the offline provider puts in front of its titles.
    pub fn dummy_title_prefix(&self) -> &'static str {
        match self {
            Locale::Zh => "[摘要]",
            Locale::En => "[Summary]",
        }
    }

    pub fn dummy_notice(&self) -> &'static str {
        match self {
            Locale::Zh => "(这是一个由测试AI生成的摘要，不反映实际内容质量)",
            Locale::En => "(generated by the offline test provider, not a real summary)",
        }
    }

    pub fn dummy_empty_content(&self) -> &'static str {
        match self {
            Locale::Zh => "无内容",
            Locale::En => "No content",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_boilerplate_patterns_compile() {
        for locale in [Locale::Zh, Locale::En] {
            for pattern in locale.boilerplate_patterns() {
                assert!(Regex::new(pattern).is_ok(), "bad pattern {pattern}");
            }
        }
    }

    #[test]
    fn test_prompt_mentions_labels_and_limits() {
        let prompt = Locale::En.summary_prompt("Headline", "Body", "Title", "Summary", 50, 500);
        assert!(prompt.contains("Original title: Headline"));
        assert!(prompt.contains("1. Title:"));
        assert!(prompt.contains("2. Summary:"));
        assert!(prompt.contains("at most 500 characters"));

        let prompt = Locale::Zh.summary_prompt("标题", "正文", "新标题", "内容摘要", 50, 500);
        assert!(prompt.contains("原标题：标题"));
        assert!(prompt.contains("1. 新标题："));
        assert!(prompt.contains("不超过500个字符"));
    }
}
