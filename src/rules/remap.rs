//! Image directory remap.

use super::{Rewrite, Rule, RuleKind, at_path_boundary};

/// Replace every boundary-delimited occurrence of `from` with `to`.
///
/// `to` must not contain `from` (checked by the `[images]` config), so the
/// rewritten text holds no occurrence to match again.
#[derive(Debug, Clone)]
pub struct PathRemap {
    from: String,
    to: String,
}

impl PathRemap {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl Rule for PathRemap {
    fn kind(&self) -> RuleKind {
        RuleKind::PathRemap
    }

    fn apply<'a>(&self, text: &'a str) -> Rewrite<'a> {
        if self.from.is_empty() {
            return Rewrite::unchanged(text);
        }

        let mut out = String::new();
        let mut last = 0;
        let mut count = 0;

        for (pos, _) in text.match_indices(self.from.as_str()) {
            if !at_path_boundary(text, pos, &self.from) {
                continue;
            }
            if count == 0 {
                out.reserve(text.len() + self.to.len());
            }
            out.push_str(&text[last..pos]);
            out.push_str(&self.to);
            last = pos + self.from.len();
            count += 1;
        }

        if count == 0 {
            return Rewrite::unchanged(text);
        }
        out.push_str(&text[last..]);
        Rewrite::changed(out, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remap() -> PathRemap {
        PathRemap::new("assets/img/", "assets/img-optimized/")
    }

    #[test]
    fn test_remap_occurrences() {
        let html = r#"<img src="assets/img/photo.png"><a href="assets/img/big/b.jpg">"#;
        let rewrite = remap().apply(html);
        assert_eq!(
            rewrite.text,
            r#"<img src="assets/img-optimized/photo.png"><a href="assets/img-optimized/big/b.jpg">"#
        );
        assert_eq!(rewrite.count, 2);
    }

    #[test]
    fn test_remap_adversarial_boundaries() {
        let html = concat!(
            r#"<img src="myassets/img/a.png">"#,
            r#"<img src="assets/img-old/b.png">"#,
            r#"<img src="assets/imgs/c.png">"#,
            r#"<img src="static.assets/img/d.png">"#,
            r#"<img src="./assets/img/e.png">"#,
            r#"<img src="/assets/img/f.png">"#,
        );
        let rewrite = remap().apply(html);
        assert_eq!(rewrite.count, 2);
        assert_eq!(
            rewrite.text,
            concat!(
                r#"<img src="myassets/img/a.png">"#,
                r#"<img src="assets/img-old/b.png">"#,
                r#"<img src="assets/imgs/c.png">"#,
                r#"<img src="static.assets/img/d.png">"#,
                r#"<img src="./assets/img-optimized/e.png">"#,
                r#"<img src="/assets/img-optimized/f.png">"#,
            )
        );
    }

    #[test]
    fn test_remap_token_without_trailing_slash() {
        let html = concat!(
            r#"<img src="assets/imgs/x.png">"#,
            r#"<img src="assets/img-old/y.png">"#,
            r#"<img src="assets/img/z.png">"#,
        );
        let rewrite = PathRemap::new("assets/img", "assets/optimized").apply(html);
        assert_eq!(rewrite.count, 1);
        assert_eq!(
            rewrite.text,
            concat!(
                r#"<img src="assets/imgs/x.png">"#,
                r#"<img src="assets/img-old/y.png">"#,
                r#"<img src="assets/optimized/z.png">"#,
            )
        );
    }

    #[test]
    fn test_remap_idempotent() {
        let once = remap()
            .apply(r#"<div style="background: url(assets/img/bg.jpg)">"#)
            .text
            .into_owned();
        let twice = remap().apply(&once);
        assert_eq!(twice.count, 0);
        assert_eq!(twice.text, once);
    }

    #[test]
    fn test_remap_no_match_borrows() {
        let rewrite = remap().apply("<p>plain text</p>");
        assert_eq!(rewrite.count, 0);
        assert!(matches!(rewrite.text, std::borrow::Cow::Borrowed(_)));
    }
}
