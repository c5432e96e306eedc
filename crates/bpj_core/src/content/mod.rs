//! Tag-delimited article text.
//!
//! Journal posts carry their structure inline: an introduction, optional
//! `>` quote lines, then sections opened by bracketed tags. Older posts store
//! the same content as an object-literal string, which [`decode`] converts into
//! the tagged form before [`extract`] splits it.

use lazy_static::lazy_static;
use regex::Regex;

mod decode;
mod extract;

pub use decode::{decode_alternate_format, decode_fields, looks_like_literal, DecodedFields};
pub use extract::{extract, ParsedContent};

pub const TAG_ESSENCE: &str = "[СУТЬ]";
pub const TAG_BENEFITS: &str = "[ПОЛЬЗА]";
pub const TAG_RECOMMENDATION: &str = "[РЕКОМЕНДАЦИЯ]";

pub const TAGS: [&str; 3] = [TAG_ESSENCE, TAG_BENEFITS, TAG_RECOMMENDATION];

lazy_static! {
    static ref TAG_PATTERN: Regex = Regex::new(r"(?i)\[(СУТЬ|ПОЛЬЗА|РЕКОМЕНДАЦИЯ)\]").unwrap();
    static ref EXCESS_NEWLINES: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// Returns true if the text contains any section tag, in any letter case.
pub fn has_tags(text: &str) -> bool {
    TAG_PATTERN.is_match(text)
}

/// Removes every section tag literal.
pub fn strip_tags(text: &str) -> String {
    TAG_PATTERN.replace_all(text, "").into_owned()
}

/// Tagged text prepared for plain markdown display: tags removed and runs of
/// blank lines collapsed.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let stripped = strip_tags(text);
    EXCESS_NEWLINES
        .replace_all(&stripped, "\n\n")
        .trim()
        .to_string()
}
