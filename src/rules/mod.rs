//! Pattern rules rewriting raw HTML text.
//!
//! Each rule is a pure function over the whole document text that returns the
//! rewritten text together with the number of spans it touched. Rules never
//! parse a DOM: they match tags with quote-aware patterns and rely on guards to
//! recognize their own earlier output, so re-applying a rule is a no-op.
//!
//! | Rule              | Kind             | Rewrites                                    |
//! |-------------------|------------------|---------------------------------------------|
//! | [`PathRemap`]     | `path-remap`     | `assets/img/` -> `assets/img-optimized/`    |
//! | [`LazyLoading`]   | `lazy-loading`   | `<img>` without `loading` gets `lazy`       |
//! | [`MinifiedAsset`] | `minify-css/js`  | exact stylesheet/script reference -> `.min` |
//! | [`PictureMarkup`] | `picture`        | `<img>` -> `<picture>` with WebP source     |
//! | [`BackgroundUrl`] | `background-url` | `background-image: url(...)` directory      |

mod background;
mod lazy;
mod minify;
mod picture;
mod remap;
mod tag;

pub use background::BackgroundUrl;
pub use lazy::LazyLoading;
pub use minify::MinifiedAsset;
pub use picture::PictureMarkup;
pub use remap::PathRemap;

use regex::{Captures, Regex};
use std::borrow::Cow;

// =============================================================================
// Types
// =============================================================================

/// Identity of a rule, used as the statistics key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    PathRemap,
    LazyLoading,
    MinifyCss,
    MinifyJs,
    Picture,
    BackgroundUrl,
}

impl RuleKind {
    /// Short kebab-case name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::PathRemap => "path-remap",
            Self::LazyLoading => "lazy-loading",
            Self::MinifyCss => "minify-css",
            Self::MinifyJs => "minify-js",
            Self::Picture => "picture",
            Self::BackgroundUrl => "background-url",
        }
    }

    /// Human readable label for the run report.
    pub const fn label(self) -> &'static str {
        match self {
            Self::PathRemap => "image paths remapped",
            Self::LazyLoading => "lazy loading added",
            Self::MinifyCss => "stylesheets minified",
            Self::MinifyJs => "scripts minified",
            Self::Picture => "pictures created",
            Self::BackgroundUrl => "background urls remapped",
        }
    }
}

/// Result of applying one rule.
#[derive(Debug)]
pub struct Rewrite<'a> {
    pub text: Cow<'a, str>,
    /// Number of spans the rule touched (0 = text is borrowed, unchanged).
    pub count: usize,
}

impl<'a> Rewrite<'a> {
    pub const fn unchanged(text: &'a str) -> Self {
        Self {
            text: Cow::Borrowed(text),
            count: 0,
        }
    }

    pub const fn changed(text: String, count: usize) -> Self {
        Self {
            text: Cow::Owned(text),
            count,
        }
    }
}

/// A text-rewrite policy.
pub trait Rule {
    fn kind(&self) -> RuleKind;

    /// Rewrite every match in `text` in a single pass.
    fn apply<'a>(&self, text: &'a str) -> Rewrite<'a>;
}

// =============================================================================
// Helpers
// =============================================================================

/// Replace each match of `re` for which `replace` returns `Some`.
///
/// Unmatched text and declined matches are copied through verbatim. The
/// output is only allocated once the first replacement happens.
pub(crate) fn rewrite_matches<'a, F>(re: &Regex, text: &'a str, mut replace: F) -> Rewrite<'a>
where
    F: FnMut(&Captures<'_>) -> Option<String>,
{
    let mut out = String::new();
    let mut last = 0;
    let mut count = 0;

    for caps in re.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let Some(replacement) = replace(&caps) else {
            continue;
        };
        if count == 0 {
            out.reserve(text.len() + replacement.len());
        }
        out.push_str(&text[last..whole.start()]);
        out.push_str(&replacement);
        last = whole.end();
        count += 1;
    }

    if count == 0 {
        return Rewrite::unchanged(text);
    }
    out.push_str(&text[last..]);
    Rewrite::changed(out, count)
}

/// Whether a path token starting at `pos` is not glued to a neighbouring name.
///
/// `myassets/img/` must not count as an occurrence of `assets/img/`, nor
/// `assets/imgs/` as one of `assets/img`. Ends that are a separator (`/img/`)
/// delimit themselves.
pub(crate) fn at_path_boundary(text: &str, pos: usize, token: &str) -> bool {
    let glued = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.');
    let open =
        !token.starts_with(glued) || text[..pos].chars().next_back().is_none_or(|c| !glued(c));
    let close = !token.ends_with(glued)
        || text[pos + token.len()..].chars().next().is_none_or(|c| !glued(c));
    open && close
}
