use serde::{Deserialize, Serialize};

use super::{strip_tags, TAGS, TAG_BENEFITS, TAG_ESSENCE, TAG_RECOMMENDATION};

/// Sections of a tagged article body. Missing sections are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedContent {
    pub introduction: String,
    pub quotes: Vec<String>,
    pub essence: String,
    pub benefits: Vec<String>,
    pub recommendation: String,
}

impl ParsedContent {
    pub fn is_empty(&self) -> bool {
        self.introduction.is_empty()
            && self.quotes.is_empty()
            && self.essence.is_empty()
            && self.benefits.is_empty()
            && self.recommendation.is_empty()
    }
}

/// Splits tagged text into its sections.
///
/// Everything before the first tag is the introduction, minus lines starting
/// with `>` which are collected as quotes. Each section starts after the first
/// occurrence of its tag and runs until the first occurrence of another tag
/// that follows it, or to the end of the text.
pub fn extract(raw: &str) -> ParsedContent {
    let normalized = raw.replace("\r\n", "\n");
    let text = normalized.trim();

    let intro_end = TAGS
        .iter()
        .filter_map(|tag| text.find(tag))
        .min()
        .unwrap_or(text.len());

    let (quote_lines, intro_lines): (Vec<&str>, Vec<&str>) = text[..intro_end]
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .partition(|line| line.starts_with('>'));

    let quotes = quote_lines
        .into_iter()
        .map(|line| line[1..].trim().to_string())
        .collect();

    ParsedContent {
        introduction: strip_tags(&intro_lines.join("\n")).trim().to_string(),
        quotes,
        essence: section(text, TAG_ESSENCE),
        benefits: split_benefits(&section(text, TAG_BENEFITS)),
        recommendation: section(text, TAG_RECOMMENDATION),
    }
}

fn section(text: &str, tag: &str) -> String {
    let Some(start) = text.find(tag) else {
        return String::new();
    };
    let body = start + tag.len();
    // Only the first copy of a tag opens or closes a section; later copies
    // stay in the text and are stripped.
    let end = TAGS
        .iter()
        .filter(|other| **other != tag)
        .filter_map(|other| text.find(other))
        .filter(|idx| *idx > start)
        .min()
        .unwrap_or(text.len());
    strip_tags(&text[body..end]).trim().to_string()
}

fn split_benefits(block: &str) -> Vec<String> {
    block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .flat_map(|line| -> Vec<&str> {
            if let Some(rest) = line.strip_prefix('-') {
                vec![rest.trim_start_matches('-').trim_start()]
            } else if let Some(rest) = line.strip_prefix('✅') {
                vec![rest.trim_start()]
            } else if line.contains(" - ") {
                line.split(" - ").map(str::trim).collect()
            } else {
                vec![line]
            }
        })
        .map(|item| {
            item.strip_prefix(&['-', '•'][..])
                .unwrap_or(item)
                .trim()
                .to_string()
        })
        .filter(|item| !item.is_empty())
        .collect()
}
