//! Transform engine.
//!
//! Applies an ordered [`RuleSet`] to a document's text. The rule order is
//! fixed per [`Profile`]:
//!
//! ```text
//! optimize:  path-remap -> lazy-loading -> minify-css -> minify-js
//! picture:   picture -> background-url -> lazy-loading
//! ```
//!
//! Path remap runs before lazy-loading so the latter sees final attributes.
//! In the picture profile lazy-loading runs last: `picture` skips images that
//! are already lazy, so running it first would suppress every conversion.

mod profile;

pub use profile::Profile;

use std::borrow::Cow;

use crate::config::{SiteConfig, minified_name};
use crate::debug;
use crate::rules::{
    BackgroundUrl, LazyLoading, MinifiedAsset, PathRemap, PictureMarkup, Rule, RuleKind,
};

// =============================================================================
// Types
// =============================================================================

/// Output of one engine pass over a document.
#[derive(Debug)]
pub struct Transformed {
    /// Rewritten text (equal to the input when nothing matched).
    pub text: String,
    /// Per-rule span counts, in application order.
    pub counts: Vec<(RuleKind, usize)>,
    /// Whether any rule touched the text.
    pub modified: bool,
}

impl Transformed {
    /// Total spans touched by all rules.
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }
}

/// Ordered list of rules.
pub struct RuleSet {
    profile: Profile,
    rules: Vec<Box<dyn Rule>>,
}

impl RuleSet {
    pub fn new(profile: Profile, rules: Vec<Box<dyn Rule>>) -> Self {
        Self { profile, rules }
    }

    /// Build the rule list of `profile` from configuration.
    pub fn for_profile(profile: Profile, config: &SiteConfig) -> Self {
        let images = &config.images;
        let rules: Vec<Box<dyn Rule>> = match profile {
            Profile::Optimize => {
                let mut rules: Vec<Box<dyn Rule>> = vec![
                    Box::new(PathRemap::new(&images.source, &images.optimized)),
                    Box::new(LazyLoading::new()),
                ];
                let minify = &config.minify;
                if let Some(min) = minified_name(&minify.stylesheet) {
                    rules.push(Box::new(MinifiedAsset::stylesheet(&minify.stylesheet, min)));
                }
                if let Some(min) = minified_name(&minify.script) {
                    rules.push(Box::new(MinifiedAsset::script(&minify.script, min)));
                }
                rules
            }
            Profile::Picture => vec![
                Box::new(PictureMarkup::new(&images.source, &images.optimized)),
                Box::new(BackgroundUrl::new(&images.source, &images.optimized)),
                Box::new(LazyLoading::new().skip_external(true)),
            ],
        };
        Self::new(profile, rules)
    }

    pub const fn profile(&self) -> Profile {
        self.profile
    }

    /// Rule kinds in application order.
    pub fn kinds(&self) -> impl Iterator<Item = RuleKind> + '_ {
        self.rules.iter().map(|rule| rule.kind())
    }

    /// Apply every rule in order.
    ///
    /// Deterministic: the same text and rule set always give the same output.
    pub fn apply(&self, text: &str) -> Transformed {
        let mut current: Cow<'_, str> = Cow::Borrowed(text);
        let mut counts = Vec::with_capacity(self.rules.len());

        for rule in &self.rules {
            let (next, count) = {
                let rewrite = rule.apply(&current);
                match rewrite.text {
                    Cow::Owned(text) if rewrite.count > 0 => (Some(text), rewrite.count),
                    _ => (None, 0),
                }
            };
            debug!("rules"; "{}: {}", rule.kind().name(), count);
            if let Some(next) = next {
                current = Cow::Owned(next);
            }
            counts.push((rule.kind(), count));
        }

        let modified = counts.iter().any(|(_, n)| *n > 0);
        Transformed {
            text: current.into_owned(),
            counts,
            modified,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html lang="hu">
<head>
  <link rel="stylesheet" href="assets/css/style.css">
  <link rel="icon" href="assets/img/favicon.png">
</head>
<body>
  <header style="background-image: url('assets/img/hero.jpg'); min-height: 60vh">
    <img src="assets/img/logo.png" alt="Logo">
  </header>
  <main>
    <img src="assets/img/campus.jpg" alt="Campus" loading="eager">
    <img src="data:image/gif;base64,R0lGODlhAQABAAAAACw=" alt="">
    <img src="https://cdn.example.com/partner.png" alt="Partner">
    <picture>
      <source srcset="assets/img/events.avif" type="image/avif">
      <img src="assets/img/events.jpg" alt="Events">
    </picture>
  </main>
  <script src="assets/js/main.js" defer></script>
</body>
</html>
"#;

    fn rule_set(profile: Profile) -> RuleSet {
        RuleSet::for_profile(profile, &SiteConfig::default())
    }

    fn count(result: &Transformed, kind: RuleKind) -> usize {
        result
            .counts
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(0, |(_, n)| *n)
    }

    #[test]
    fn test_img_scenario() {
        let result = rule_set(Profile::Optimize).apply(r#"<img src="assets/img/a.png">"#);
        assert_eq!(
            result.text,
            r#"<img src="assets/img-optimized/a.png" loading="lazy">"#
        );
        assert!(result.modified);
        assert_eq!(count(&result, RuleKind::PathRemap), 1);
        assert_eq!(count(&result, RuleKind::LazyLoading), 1);
    }

    #[test]
    fn test_stylesheet_scenario() {
        let result =
            rule_set(Profile::Optimize).apply(r#"<link href="assets/css/style.css" rel="stylesheet">"#);
        assert_eq!(
            result.text,
            r#"<link href="assets/css/style.min.css" rel="stylesheet">"#
        );
        assert_eq!(result.total(), 1);
    }

    #[test]
    fn test_optimize_page_counts() {
        let result = rule_set(Profile::Optimize).apply(PAGE);
        // favicon, hero, logo, campus, avif source, events
        assert_eq!(count(&result, RuleKind::PathRemap), 6);
        // logo, partner, events
        assert_eq!(count(&result, RuleKind::LazyLoading), 3);
        assert_eq!(count(&result, RuleKind::MinifyCss), 1);
        assert_eq!(count(&result, RuleKind::MinifyJs), 1);
        assert!(result.text.contains(r#"<script src="assets/js/main.min.js" defer>"#));
        assert!(!result.text.contains("assets/img/"));
    }

    #[test]
    fn test_picture_page_counts() {
        let result = rule_set(Profile::Picture).apply(PAGE);
        // logo, campus (eager is not lazy); events is already inside <picture>
        assert_eq!(count(&result, RuleKind::Picture), 2);
        assert_eq!(count(&result, RuleKind::BackgroundUrl), 1);
        // events only: data uri and external partner are skipped
        assert_eq!(count(&result, RuleKind::LazyLoading), 1);
        assert!(result.text.contains(
            r#"<source srcset="assets/img-optimized/logo.webp" type="image/webp">"#
        ));
        assert!(result.text.contains("url('assets/img-optimized/hero.jpg'); min-height: 60vh"));
        // minified references belong to the optimize profile
        assert!(result.text.contains(r#"href="assets/css/style.css""#));
    }

    #[test]
    fn test_idempotent_both_profiles() {
        for profile in [Profile::Optimize, Profile::Picture] {
            let rules = rule_set(profile);
            let once = rules.apply(PAGE);
            let twice = rules.apply(&once.text);
            assert!(!twice.modified, "{profile:?}");
            assert_eq!(twice.total(), 0);
            assert_eq!(twice.text, once.text);
        }
    }

    #[test]
    fn test_irrelevant_input_unchanged() {
        let html = "<html><body><h1>Ösztöndíj</h1><p>assets are great</p></body></html>";
        for profile in [Profile::Optimize, Profile::Picture] {
            let result = rule_set(profile).apply(html);
            assert_eq!(result.text, html);
            assert_eq!(result.total(), 0);
            assert!(!result.modified);
        }
    }

    #[test]
    fn test_deterministic() {
        let rules = rule_set(Profile::Optimize);
        assert_eq!(rules.apply(PAGE).text, rules.apply(PAGE).text);
    }

    #[test]
    fn test_kinds_in_order() {
        let kinds: Vec<_> = rule_set(Profile::Optimize).kinds().collect();
        assert_eq!(
            kinds,
            vec![
                RuleKind::PathRemap,
                RuleKind::LazyLoading,
                RuleKind::MinifyCss,
                RuleKind::MinifyJs
            ]
        );
        let kinds: Vec<_> = rule_set(Profile::Picture).kinds().collect();
        assert_eq!(
            kinds,
            vec![RuleKind::Picture, RuleKind::BackgroundUrl, RuleKind::LazyLoading]
        );
    }
}
