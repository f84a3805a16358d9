//! Inline `background-image` URL remap.

use regex::Regex;
use std::sync::LazyLock;

use super::tag::{self, START_TAG};
use super::{Rewrite, Rule, RuleKind, rewrite_matches};

/// One `background-image` declaration, up to the next `;` outside entities
/// (`&quot;`) and quoted strings.
static BACKGROUND_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(?:^|;)\s*background-image\s*:(?:&#?[a-z0-9]+;|"[^"]*"|'[^']*'|[^;])*"#,
    )
    .unwrap()
});

/// Opening of a css `url(`, including an optional quote.
static CSS_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\burl\(\s*(?:&quot;|"|')?"#).unwrap());

/// Point `background-image: url(...)` inside inline styles at the optimized directory.
///
/// Other declarations in the same attribute, including other `url(...)` values,
/// stay as they are.
#[derive(Debug, Clone)]
pub struct BackgroundUrl {
    source: String,
    optimized: String,
}

impl BackgroundUrl {
    pub fn new(source: impl Into<String>, optimized: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            optimized: optimized.into(),
        }
    }

    /// Rewrite the urls of every `background-image` declaration in a style value.
    fn remap_style(&self, style: &str, count: &mut usize) -> Option<String> {
        let before = *count;
        let rewrite = rewrite_matches(&BACKGROUND_IMAGE, style, |caps| {
            let declaration = caps.get(0)?.as_str();
            self.remap_urls(declaration, count)
        });
        (*count > before).then(|| rewrite.text.into_owned())
    }

    fn remap_urls(&self, declaration: &str, count: &mut usize) -> Option<String> {
        let mut out = String::new();
        let mut last = 0;

        for url in CSS_URL.find_iter(declaration) {
            if !declaration[url.end()..].starts_with(self.source.as_str()) {
                continue;
            }
            out.push_str(&declaration[last..url.end()]);
            out.push_str(&self.optimized);
            last = url.end() + self.source.len();
            *count += 1;
        }

        if last == 0 {
            return None;
        }
        out.push_str(&declaration[last..]);
        Some(out)
    }
}

impl Rule for BackgroundUrl {
    fn kind(&self) -> RuleKind {
        RuleKind::BackgroundUrl
    }

    fn apply<'a>(&self, text: &'a str) -> Rewrite<'a> {
        if !text.contains(self.source.as_str()) {
            return Rewrite::unchanged(text);
        }

        let mut urls = 0;
        let mut rewrite = rewrite_matches(&START_TAG, text, |caps| {
            let tag = caps.get(0)?.as_str();
            let attrs = tag::attributes(tag);
            let span = tag::find(&attrs, "style")?.value_span.clone()?;
            let style = self.remap_style(&tag[span.clone()], &mut urls)?;
            Some(format!("{}{style}{}", &tag[..span.start], &tag[span.end..]))
        });
        rewrite.count = urls;
        rewrite
    }
}
