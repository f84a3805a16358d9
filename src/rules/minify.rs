//! Minified stylesheet/script substitution.

use regex::Regex;
use std::sync::LazyLock;

use super::tag::{self, tag_pattern};
use super::{Rewrite, Rule, RuleKind, rewrite_matches};

static LINK_TAG: LazyLock<Regex> = LazyLock::new(|| tag_pattern("link"));
static SCRIPT_TAG: LazyLock<Regex> = LazyLock::new(|| tag_pattern("script"));

/// Point a `<link href>` or `<script src>` at the minified file.
///
/// Only a reference whose value is exactly `from` is rewritten, so
/// `style.min.css` or `print-style.css` never match `style.css`.
#[derive(Debug, Clone)]
pub struct MinifiedAsset {
    kind: RuleKind,
    from: String,
    to: String,
}

impl MinifiedAsset {
    /// `<link href="{from}">` -> `<link href="{to}">`
    pub fn stylesheet(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::MinifyCss,
            from: from.into(),
            to: to.into(),
        }
    }

    /// `<script src="{from}">` -> `<script src="{to}">`
    pub fn script(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::MinifyJs,
            from: from.into(),
            to: to.into(),
        }
    }

    fn target(&self) -> (&'static Regex, &'static str) {
        match self.kind {
            RuleKind::MinifyJs => (&*SCRIPT_TAG, "src"),
            _ => (&*LINK_TAG, "href"),
        }
    }
}

impl Rule for MinifiedAsset {
    fn kind(&self) -> RuleKind {
        self.kind
    }

    fn apply<'a>(&self, text: &'a str) -> Rewrite<'a> {
        if !text.contains(self.from.as_str()) {
            return Rewrite::unchanged(text);
        }

        let (pattern, attr_name) = self.target();
        rewrite_matches(pattern, text, |caps| {
            let tag = caps.get(0)?.as_str();
            let attrs = tag::attributes(tag);
            let attr = tag::find(&attrs, attr_name)?;
            if attr.value? != self.from {
                return None;
            }
            let span = attr.value_span.clone()?;
            Some(format!("{}{}{}", &tag[..span.start], self.to, &tag[span.end..]))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn css() -> MinifiedAsset {
        MinifiedAsset::stylesheet("assets/css/style.css", "assets/css/style.min.css")
    }

    fn js() -> MinifiedAsset {
        MinifiedAsset::script("assets/js/main.js", "assets/js/main.min.js")
    }

    #[test]
    fn test_stylesheet_href_only() {
        let rewrite = css().apply(r#"<link href="assets/css/style.css" rel="stylesheet">"#);
        assert_eq!(
            rewrite.text,
            r#"<link href="assets/css/style.min.css" rel="stylesheet">"#
        );
        assert_eq!(rewrite.count, 1);
    }

    #[test]
    fn test_script_src() {
        let rewrite = js().apply(r#"<script defer src='assets/js/main.js'></script>"#);
        assert_eq!(
            rewrite.text,
            r#"<script defer src='assets/js/main.min.js'></script>"#
        );
        assert_eq!(rewrite.count, 1);
        assert_eq!(js().kind(), RuleKind::MinifyJs);
    }

    #[test]
    fn test_exact_filename_only() {
        for html in [
            r#"<link rel="stylesheet" href="assets/css/style.min.css">"#,
            r#"<link rel="stylesheet" href="assets/css/print-style.css">"#,
            r#"<link rel="stylesheet" href="vendor/assets/css/style.css">"#,
            r#"<a href="assets/css/style.css">source</a>"#,
            r#"<script src="assets/css/style.css"></script>"#,
        ] {
            let rewrite = css().apply(html);
            assert_eq!(rewrite.count, 0, "{html}");
            assert_eq!(rewrite.text, html);
        }
    }

    #[test]
    fn test_idempotent() {
        let once = js()
            .apply(r#"<script src="assets/js/main.js"></script>"#)
            .text
            .into_owned();
        assert_eq!(js().apply(&once).count, 0);
    }

    #[test]
    fn test_kind() {
        assert_eq!(css().kind(), RuleKind::MinifyCss);
    }
}
