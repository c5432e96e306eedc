use std::iter::Peekable;
use std::str::Chars;

use lazy_static::lazy_static;
use regex::Regex;

use super::{TAG_ESSENCE, TAG_RECOMMENDATION};

const INTRODUCTION: &str = "introduction";
const ESSENCE: &str = "essence";
const CONCLUSION: &str = "conclusion";

lazy_static! {
    static ref KEY_BOUNDARY: Regex =
        Regex::new(r#"(?i),\s*['"](introduction|essence|conclusion)['"]\s*:"#).unwrap();
    static ref KEY_PATTERNS: [(&'static str, Regex); 3] = [INTRODUCTION, ESSENCE, CONCLUSION]
        .map(|key| (key, Regex::new(&format!(r#"(?i)['"]{key}['"]\s*:\s*"#)).unwrap()));
}

/// The three fields of an object-literal article body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedFields {
    pub introduction: String,
    pub essence: String,
    pub conclusion: String,
}

impl DecodedFields {
    pub fn is_empty(&self) -> bool {
        self.introduction.is_empty() && self.essence.is_empty() && self.conclusion.is_empty()
    }

    /// Reassembles the fields into tagged text. The conclusion becomes the
    /// recommendation section.
    pub fn to_tagged(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        if !self.introduction.is_empty() {
            parts.push(self.introduction.clone());
        }
        if !self.essence.is_empty() {
            parts.push(format!("{}\n{}", TAG_ESSENCE, self.essence));
        }
        if !self.conclusion.is_empty() {
            parts.push(format!("{}\n{}", TAG_RECOMMENDATION, self.conclusion));
        }
        parts.join("\n\n").trim().to_string()
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut String> {
        if key.eq_ignore_ascii_case(INTRODUCTION) {
            Some(&mut self.introduction)
        } else if key.eq_ignore_ascii_case(ESSENCE) {
            Some(&mut self.essence)
        } else if key.eq_ignore_ascii_case(CONCLUSION) {
            Some(&mut self.conclusion)
        } else {
            None
        }
    }
}

/// Returns true if the text looks like a serialized `{'introduction': ...}`
/// literal rather than prose.
pub fn looks_like_literal(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.starts_with('{') && trimmed.contains(INTRODUCTION)
}

/// Extracts the fields of an object-literal body, or `None` if the text is
/// prose or none of the fields are present.
pub fn decode_fields(text: &str) -> Option<DecodedFields> {
    if !looks_like_literal(text) {
        return None;
    }
    let trimmed = text.trim();
    let fields = scan_literal(trimmed).unwrap_or_else(|| {
        tracing::debug!("object literal did not scan cleanly, using boundary extraction");
        boundary_fields(trimmed)
    });
    (!fields.is_empty()).then_some(fields)
}

/// Converts an object-literal body into tagged text. Anything else, including
/// a literal with none of the known fields, is returned unchanged.
pub fn decode_alternate_format(text: &str) -> String {
    match decode_fields(text) {
        Some(fields) => fields.to_tagged(),
        None => text.to_string(),
    }
}

struct Scanner<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.chars.peek().copied()
    }

    fn expect(&mut self, expected: char) -> Option<()> {
        self.skip_whitespace();
        (self.chars.next()? == expected).then_some(())
    }

    fn quoted(&mut self) -> Option<String> {
        self.skip_whitespace();
        let quote = self.chars.next().filter(|c| *c == '\'' || *c == '"')?;
        let mut out = String::new();
        loop {
            match self.chars.next()? {
                c if c == quote => return Some(out),
                '\\' => match self.chars.next()? {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    'x' => out.push(self.hex_escape(2)?),
                    'u' => out.push(self.hex_escape(4)?),
                    'U' => out.push(self.hex_escape(8)?),
                    c @ ('\\' | '\'' | '"' | '/') => out.push(c),
                    other => {
                        out.push('\\');
                        out.push(other);
                    }
                },
                c => out.push(c),
            }
        }
    }

    fn hex_escape(&mut self, digits: usize) -> Option<char> {
        let hex: String = (0..digits).filter_map(|_| self.chars.next()).collect();
        u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
    }

    fn value(&mut self) -> Option<String> {
        match self.peek()? {
            '\'' | '"' => self.quoted(),
            _ => {
                let mut word = String::new();
                while let Some(c) = self.chars.next_if(|c| c.is_alphanumeric()) {
                    word.push(c);
                }
                match word.as_str() {
                    "None" | "null" => Some(String::new()),
                    _ => None,
                }
            }
        }
    }
}

/// Strict pass: single- or double-quoted keys and string values with escapes.
/// Rejects anything it does not fully understand.
fn scan_literal(text: &str) -> Option<DecodedFields> {
    let mut scanner = Scanner::new(text);
    let mut fields = DecodedFields::default();
    let mut seen: Vec<String> = Vec::new();

    scanner.expect('{')?;
    loop {
        if scanner.peek()? == '}' {
            scanner.chars.next();
            break;
        }
        let key = scanner.quoted()?;
        scanner.expect(':')?;
        let value = scanner.value()?;

        let lowered = key.to_ascii_lowercase();
        if !seen.contains(&lowered) {
            if let Some(slot) = fields.slot_mut(&key) {
                *slot = value.trim().to_string();
            }
            seen.push(lowered);
        }

        match scanner.peek()? {
            ',' => {
                scanner.chars.next();
            }
            '}' => {
                scanner.chars.next();
                break;
            }
            _ => return None,
        }
    }

    scanner.peek().is_none().then_some(fields)
}

/// Lenient pass: a value runs from its key up to the next known key or the
/// closing brace.
fn boundary_fields(text: &str) -> DecodedFields {
    let mut fields = DecodedFields::default();
    for (key, pattern) in KEY_PATTERNS.iter() {
        if let Some(slot) = fields.slot_mut(key) {
            *slot = boundary_field(text, pattern);
        }
    }
    fields
}

fn boundary_field(text: &str, pattern: &Regex) -> String {
    let Some(found) = pattern.find(text) else {
        return String::new();
    };
    let rest = &text[found.end()..];
    let next_key = KEY_BOUNDARY.find(rest).map(|m| m.start());
    let closing = rest.ends_with('}').then(|| rest.len() - 1);
    let end = match (next_key, closing) {
        (Some(a), Some(b)) => a.min(b),
        (Some(a), None) | (None, Some(a)) => a,
        (None, None) => return String::new(),
    };

    let raw = rest[..end].trim();
    let raw = raw.strip_suffix(',').unwrap_or(raw);
    strip_quotes(raw).trim().to_string()
}

fn strip_quotes(raw: &str) -> &str {
    for quote in ['\'', '"'] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            return &raw[1..raw.len() - 1];
        }
    }
    raw
}
