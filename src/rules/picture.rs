//! `<img>` to `<picture>` conversion with a WebP source.
//!
//! ```html
//! <img src="assets/img/team/a.jpg" alt="A">
//! ```
//!
//! becomes
//!
//! ```html
//! <picture>
//!   <source srcset="assets/img-optimized/team/a.webp" type="image/webp">
//!   <img src="assets/img-optimized/team/a.jpg" loading="lazy" alt="A">
//! </picture>
//! ```

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

use super::lazy::inject_lazy;
use super::tag::{self, IMG_TAG};
use super::{Rewrite, Rule, RuleKind, rewrite_matches};

/// Existing `<picture>...</picture>` blocks.
static PICTURE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<picture\b.*?</picture\s*>").unwrap());

/// Extensions the image transcoder emits a WebP variant for.
const RASTER_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Wrap source-directory raster images in a `<picture>` block.
#[derive(Debug, Clone)]
pub struct PictureMarkup {
    source: String,
    optimized: String,
}

impl PictureMarkup {
    pub fn new(source: impl Into<String>, optimized: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            optimized: optimized.into(),
        }
    }

    /// Build the replacement block for one tag, or `None` to keep it.
    fn convert(&self, tag: &str, indent: &str) -> Option<String> {
        let attrs = tag::attributes(tag);
        let loading = tag::find(&attrs, "loading");
        if loading
            .and_then(|a| a.value)
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("lazy"))
        {
            return None;
        }

        let src = tag::find(&attrs, "src")?;
        let rest = src.value?.strip_prefix(self.source.as_str())?;
        let webp = webp_variant(rest)?;
        let span = src.value_span.clone()?;

        let img = format!(
            "{}{}{rest}{}",
            &tag[..span.start],
            self.optimized,
            &tag[span.end..]
        );
        let img = if loading.is_none() {
            let attrs = tag::attributes(&img);
            inject_lazy(&img, tag::find(&attrs, "src"))
        } else {
            img
        };

        Some(format!(
            "<picture>\n{indent}  <source srcset=\"{}{webp}\" type=\"image/webp\">\n{indent}  {img}\n{indent}</picture>",
            self.optimized
        ))
    }
}

impl Rule for PictureMarkup {
    fn kind(&self) -> RuleKind {
        RuleKind::Picture
    }

    fn apply<'a>(&self, text: &'a str) -> Rewrite<'a> {
        if !text.contains(self.source.as_str()) {
            return Rewrite::unchanged(text);
        }

        let blocks: Vec<Range<usize>> = PICTURE_BLOCK.find_iter(text).map(|m| m.range()).collect();
        rewrite_matches(&IMG_TAG, text, |caps| {
            let whole = caps.get(0)?;
            if blocks.iter().any(|block| block.contains(&whole.start())) {
                return None;
            }
            self.convert(whole.as_str(), tag::line_indent(text, whole.start()))
        })
    }
}

/// `team/a.jpg` -> `team/a.webp`; `None` for non-raster or unsafe paths.
fn webp_variant(path: &str) -> Option<String> {
    if path.contains(['"', '<', '>']) {
        return None;
    }
    let file_start = path.rfind('/').map_or(0, |i| i + 1);
    let (stem, ext) = path[file_start..].rsplit_once('.')?;
    if stem.is_empty()
        || !RASTER_EXTENSIONS
            .iter()
            .any(|raster| ext.eq_ignore_ascii_case(raster))
    {
        return None;
    }
    Some(format!("{}{stem}.webp", &path[..file_start]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picture() -> PictureMarkup {
        PictureMarkup::new("assets/img/", "assets/img-optimized/")
    }

    #[test]
    fn test_convert_with_indent() {
        let html = "<div>\n    <img src=\"assets/img/team/a.JPG\" alt=\"A\">\n</div>";
        let rewrite = picture().apply(html);
        assert_eq!(rewrite.count, 1);
        assert_eq!(
            rewrite.text,
            concat!(
                "<div>\n",
                "    <picture>\n",
                "      <source srcset=\"assets/img-optimized/team/a.webp\" type=\"image/webp\">\n",
                "      <img src=\"assets/img-optimized/team/a.JPG\" loading=\"lazy\" alt=\"A\">\n",
                "    </picture>\n",
                "</div>",
            )
        );
    }

    #[test]
    fn test_inline_tag_has_no_indent() {
        let rewrite = picture().apply(r#"<p><img src="assets/img/a.png"></p>"#);
        assert_eq!(
            rewrite.text,
            concat!(
                "<p><picture>\n",
                "  <source srcset=\"assets/img-optimized/a.webp\" type=\"image/webp\">\n",
                "  <img src=\"assets/img-optimized/a.png\" loading=\"lazy\">\n",
                "</picture></p>",
            )
        );
    }

    #[test]
    fn test_keeps_existing_non_lazy_loading() {
        let rewrite = picture().apply(r#"<img loading="eager" src="assets/img/a.png">"#);
        assert_eq!(rewrite.count, 1);
        assert!(
            rewrite
                .text
                .contains(r#"<img loading="eager" src="assets/img-optimized/a.png">"#)
        );
    }

    #[test]
    fn test_skips_lazy_and_existing_picture() {
        for html in [
            r#"<img src="assets/img/a.png" loading="LAZY">"#,
            concat!(
                "<picture>\n",
                "  <source srcset=\"assets/img/a.avif\" type=\"image/avif\">\n",
                "  <img src=\"assets/img/a.png\">\n",
                "</picture>",
            ),
        ] {
            let rewrite = picture().apply(html);
            assert_eq!(rewrite.count, 0, "{html}");
            assert_eq!(rewrite.text, html);
        }
    }

    #[test]
    fn test_skips_non_raster_and_other_dirs() {
        for html in [
            r#"<img src="assets/img/logo.svg">"#,
            r#"<img src="assets/img/anim.gif">"#,
            r#"<img src="other/img/a.png">"#,
            r#"<img src="assets/img-optimized/a.png">"#,
        ] {
            assert_eq!(picture().apply(html).count, 0, "{html}");
        }
    }

    #[test]
    fn test_idempotent() {
        let html = "<section>\n  <img src=\"assets/img/a.png\">\n  <img src=\"assets/img/b.jpeg\" alt=\"\">\n</section>";
        let once = picture().apply(html).text.into_owned();
        let twice = picture().apply(&once);
        assert_eq!(twice.count, 0);
        assert_eq!(twice.text, once);
    }

    #[test]
    fn test_webp_variant() {
        assert_eq!(webp_variant("a.png").as_deref(), Some("a.webp"));
        assert_eq!(webp_variant("x/y.z/b.jpeg").as_deref(), Some("x/y.z/b.webp"));
        assert_eq!(webp_variant("a.png?v=2"), None);
        assert_eq!(webp_variant("noext"), None);
        assert_eq!(webp_variant("dir.png/"), None);
    }
}
