//! `[images]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [images]
//! source = "assets/img/"               # Directory token referenced by the html
//! optimized = "assets/img-optimized/"  # Directory token of the transcoded images
//! ```

use crate::config::ConfigError;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Source image directory as written in the html.
    pub source: String,
    /// Optimized image directory replacing `source`.
    pub optimized: String,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            source: "assets/img/".into(),
            optimized: "assets/img-optimized/".into(),
        }
    }
}

impl ImagesConfig {
    /// Reject token pairs that would make the path remap re-match its own output.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (source, optimized) = (self.source.as_str(), self.optimized.as_str());

        if source.is_empty() || optimized.is_empty() {
            return Err(ConfigError::Validation(
                "[images] source and optimized must not be empty".into(),
            ));
        }
        if let Some(token) = [source, optimized].into_iter().find(|t| !t.ends_with('/')) {
            return Err(ConfigError::Validation(format!(
                "[images] `{token}` must end with `/`"
            )));
        }
        if source == optimized {
            return Err(ConfigError::Validation(format!(
                "[images] source and optimized are both `{source}`"
            )));
        }
        if optimized.contains(source) || source.contains(optimized) {
            return Err(ConfigError::Validation(format!(
                "[images] `{source}` and `{optimized}` must not contain one another"
            )));
        }
        if suffix_overlaps_prefix(optimized, source) {
            return Err(ConfigError::Validation(format!(
                "[images] `{optimized}` ends with the start of `{source}`"
            )));
        }
        Ok(())
    }
}

/// Whether a proper suffix of `tail` is a prefix of `head`.
///
/// When it is, a replacement could join with the following text into a fresh
/// occurrence of `head`.
fn suffix_overlaps_prefix(tail: &str, head: &str) -> bool {
    head.char_indices()
        .skip(1)
        .map(|(i, _)| &head[..i])
        .any(|prefix| tail.ends_with(prefix))
}
