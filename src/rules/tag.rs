//! Tag and attribute scanning over raw markup.
//!
//! - `tag_pattern()` - quote-aware regex for one start tag (`<img ...>`)
//! - `attributes()` - attribute spans inside a matched tag
//! - `find()` - case-insensitive attribute lookup

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// `<img ...>` start tags.
pub static IMG_TAG: LazyLock<Regex> = LazyLock::new(|| tag_pattern("img"));

/// Any start tag (`<div ...>`, `<section ...>`), quote-aware like [`tag_pattern`].
pub static START_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<[a-z][a-z0-9-]*(?:[^>"']|"[^"]*"|'[^']*')*>"#).unwrap()
});

/// Build a case-insensitive pattern for a start tag named `name`.
///
/// Quoted attribute values may contain `>`; the tag only ends at a `>` outside
/// quotes.
pub fn tag_pattern(name: &str) -> Regex {
    Regex::new(&format!(
        r#"(?i)<{}\b(?:[^>"']|"[^"]*"|'[^']*')*>"#,
        regex::escape(name)
    ))
    .unwrap()
}

/// One attribute inside a tag. Spans index into the tag text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr<'a> {
    pub name: &'a str,
    /// Unquoted value, `None` for bare attributes (`<img hidden>`).
    pub value: Option<&'a str>,
    /// Whole attribute including its value and closing quote.
    pub span: Range<usize>,
    /// Value without quotes.
    pub value_span: Option<Range<usize>>,
}

/// Scan the attributes of a start tag such as `<img src="a.png" alt=x>`.
pub fn attributes(tag: &str) -> Vec<Attr<'_>> {
    let bytes = tag.as_bytes();
    let end = tag.len() - usize::from(tag.ends_with('>'));

    // Skip `<name`
    let mut i = bytes
        .iter()
        .position(u8::is_ascii_whitespace)
        .unwrap_or(end)
        .min(end);
    let mut attrs = Vec::new();

    while i < end {
        let b = bytes[i];
        if b.is_ascii_whitespace() || b == b'/' {
            i += 1;
            continue;
        }

        // Read attribute name
        let start = i;
        while i < end && !bytes[i].is_ascii_whitespace() && !matches!(bytes[i], b'=' | b'/') {
            i += 1;
        }
        let name = &tag[start..i];

        // Check for value
        let mut j = skip_whitespace(bytes, i, end);
        let mut value = None;
        let mut value_span = None;
        if j < end && bytes[j] == b'=' {
            j = skip_whitespace(bytes, j + 1, end);
            if j < end && matches!(bytes[j], b'"' | b'\'') {
                let quote = bytes[j];
                let value_start = j + 1;
                let value_end = bytes[value_start..end]
                    .iter()
                    .position(|&c| c == quote)
                    .map_or(end, |p| value_start + p);
                i = (value_end + 1).min(end);
                value = Some(&tag[value_start..value_end]);
                value_span = Some(value_start..value_end);
            } else {
                // Unquoted value (read until whitespace or a closing `/>`)
                let value_start = j;
                while j < end && !bytes[j].is_ascii_whitespace() && !(bytes[j] == b'/' && j + 1 == end)
                {
                    j += 1;
                }
                i = j;
                value = Some(&tag[value_start..j]);
                value_span = Some(value_start..j);
            }
        }

        if name.is_empty() {
            // Stray `=value` without a name
            continue;
        }
        attrs.push(Attr {
            name,
            value,
            span: start..i,
            value_span,
        });
    }

    attrs
}

fn skip_whitespace(bytes: &[u8], mut i: usize, end: usize) -> usize {
    while i < end && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

/// Find an attribute by name, ignoring ASCII case.
pub fn find<'t, 'a>(attrs: &'t [Attr<'a>], name: &str) -> Option<&'t Attr<'a>> {
    attrs.iter().find(|a| a.name.eq_ignore_ascii_case(name))
}

/// Whether `value` starts with `prefix`, ignoring ASCII case.
pub fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Leading indentation of the line containing `pos`, if only whitespace precedes it.
pub fn line_indent(text: &str, pos: usize) -> &str {
    let line_start = text[..pos].rfind('\n').map_or(0, |i| i + 1);
    let prefix = &text[line_start..pos];
    if prefix.chars().all(|c| c == ' ' || c == '\t') {
        prefix
    } else {
        ""
    }
}
