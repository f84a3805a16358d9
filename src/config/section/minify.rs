//! `[minify]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [minify]
//! stylesheet = "assets/css/style.css"   # Rewritten to assets/css/style.min.css
//! script = "assets/js/main.js"          # Rewritten to assets/js/main.min.js
//! ```

use crate::config::ConfigError;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MinifyConfig {
    /// Stylesheet reference swapped for its minified variant.
    pub stylesheet: String,
    /// Script reference swapped for its minified variant.
    pub script: String,
}

impl Default for MinifyConfig {
    fn default() -> Self {
        Self {
            stylesheet: "assets/css/style.css".into(),
            script: "assets/js/main.js".into(),
        }
    }
}

impl MinifyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("stylesheet", &self.stylesheet), ("script", &self.script)] {
            if minified_name(value).is_none() {
                return Err(ConfigError::Validation(format!(
                    "[minify] {field} `{value}` needs a file extension and must not be minified already"
                )));
            }
        }
        Ok(())
    }
}

/// Insert `.min` before the extension: `assets/css/style.css` -> `assets/css/style.min.css`.
///
/// Returns `None` for names without an extension or already ending in `.min.<ext>`.
pub fn minified_name(path: &str) -> Option<String> {
    let file_start = path.rfind('/').map_or(0, |i| i + 1);
    let (stem, ext) = path[file_start..].rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || stem.ends_with(".min") {
        return None;
    }
    Some(format!("{}{stem}.min.{ext}", &path[..file_start]))
}
