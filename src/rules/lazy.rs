//! Lazy-loading injection for `<img>` tags.

use super::tag::{self, Attr, IMG_TAG};
use super::{Rewrite, Rule, RuleKind, rewrite_matches};

pub(crate) const LAZY_ATTR: &str = r#"loading="lazy""#;

/// Add `loading="lazy"` to every `<img>` that has no `loading` attribute.
///
/// Inline `data:` images are left alone. With `skip_external`, images served
/// from another origin are left alone too.
#[derive(Debug, Clone, Default)]
pub struct LazyLoading {
    skip_external: bool,
}

impl LazyLoading {
    pub const fn new() -> Self {
        Self {
            skip_external: false,
        }
    }

    /// Also skip `http(s)://` and protocol-relative sources.
    pub const fn skip_external(mut self, skip: bool) -> Self {
        self.skip_external = skip;
        self
    }

    fn is_excluded(&self, attrs: &[Attr<'_>]) -> bool {
        ["src", "srcset"]
            .iter()
            .filter_map(|name| tag::find(attrs, name).and_then(|a| a.value))
            .map(str::trim_start)
            .any(|value| {
                tag::starts_with_ignore_case(value, "data:")
                    || (self.skip_external && is_external(value))
            })
    }
}

impl Rule for LazyLoading {
    fn kind(&self) -> RuleKind {
        RuleKind::LazyLoading
    }

    fn apply<'a>(&self, text: &'a str) -> Rewrite<'a> {
        rewrite_matches(&IMG_TAG, text, |caps| {
            let tag = caps.get(0)?.as_str();
            let attrs = tag::attributes(tag);
            if tag::find(&attrs, "loading").is_some() || self.is_excluded(&attrs) {
                return None;
            }
            Some(inject_lazy(tag, tag::find(&attrs, "src")))
        })
    }
}

/// Insert `loading="lazy"` after `src`, or before the tag close when there is none.
pub(crate) fn inject_lazy(tag: &str, src: Option<&Attr<'_>>) -> String {
    if let Some(src) = src {
        let at = src.span.end;
        return format!("{} {LAZY_ATTR}{}", &tag[..at], &tag[at..]);
    }

    let body = tag.strip_suffix('>').unwrap_or(tag);
    let (body, close) = match body.strip_suffix('/') {
        Some(body) => (body.trim_end(), " />"),
        None => (body.trim_end(), ">"),
    };
    format!("{body} {LAZY_ATTR}{close}")
}

fn is_external(value: &str) -> bool {
    tag::starts_with_ignore_case(value, "http://")
        || tag::starts_with_ignore_case(value, "https://")
        || value.starts_with("//")
}
