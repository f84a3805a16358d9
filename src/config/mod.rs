//! Run configuration from `siteopt.toml` and the command line.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [images] and [minify]
//! ├── error          # ConfigError
//! ├── util           # config discovery, path resolution
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! # Example
//!
//! ```toml
//! html_files = ["index.html", "index_en.html"]
//! backup_dir = ".backup"
//! dry_run = false
//!
//! [images]
//! source = "assets/img/"
//! optimized = "assets/img-optimized/"
//!
//! [minify]
//! stylesheet = "assets/css/style.css"
//! script = "assets/js/main.js"
//! ```
//!
//! Relative paths resolve against the directory holding the config file.
//! Without a config file the current directory is the project root.

mod error;
pub mod section;
mod util;

pub use error::ConfigError;
pub use section::{ImagesConfig, MinifyConfig, minified_name};

use crate::{cli::Cli, log};
use anyhow::{Context, Result, bail};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};
use util::{find_config_file, resolve};

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_NAME: &str = "siteopt.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing siteopt.toml
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Absolute path to the config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Project root directory (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Target html files, processed in this order.
    pub html_files: Vec<PathBuf>,

    /// Directory receiving `<name>.backup` copies.
    pub backup_dir: PathBuf,

    /// Run every rule and report, but never write a target file.
    pub dry_run: bool,

    /// Image directory tokens.
    pub images: ImagesConfig,

    /// Stylesheet/script references to swap for minified variants.
    pub minify: MinifyConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            config_path: None,
            root: PathBuf::new(),
            html_files: vec!["index.html".into(), "index_en.html".into()],
            backup_dir: ".backup".into(),
            dry_run: false,
            images: ImagesConfig::default(),
            minify: MinifyConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from CLI arguments.
    ///
    /// An explicit `--config` must exist. Otherwise `siteopt.toml` is searched
    /// upward from cwd and defaults apply when none is found.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let config_path = match &cli.config {
            Some(path) => match find_config_file(path) {
                Some(found) => Some(found),
                None => bail!("Config file '{}' not found", path.display()),
            },
            None => find_config_file(Path::new(DEFAULT_CONFIG_NAME)),
        };

        let mut config = match &config_path {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };

        let root = config_path
            .as_deref()
            .and_then(Path::parent)
            .map_or_else(|| cwd.clone(), Path::to_path_buf);
        config.config_path = config_path;

        config.apply_cli(cli, &cwd);
        config.finalize(&root);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    /// Apply command line overrides.
    ///
    /// Files named on the command line are relative to `cwd`, not the root.
    fn apply_cli(&mut self, cli: &Cli, cwd: &Path) {
        self.dry_run |= cli.dry_run;
        if let Some(dir) = &cli.backup_dir {
            self.backup_dir = dir.clone();
        }
        let files = cli.command.files();
        if !files.is_empty() {
            self.html_files = files.iter().map(|file| resolve(cwd, file)).collect();
        }
    }

    /// Anchor every relative path at `root`.
    pub fn finalize(&mut self, root: &Path) {
        self.root = root.to_path_buf();
        self.backup_dir = resolve(root, &self.backup_dir);
        for file in &mut self.html_files {
            *file = resolve(root, file);
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.html_files.is_empty() {
            return Err(ConfigError::Validation("html_files is empty".into()));
        }
        if let Some(file) = self.html_files.iter().find(|f| f.file_name().is_none()) {
            return Err(ConfigError::Validation(format!(
                "html file `{}` has no file name",
                file.display()
            )));
        }
        self.check_backup_names()?;
        self.images.validate()?;
        self.minify.validate()
    }

    /// Backups are keyed by file name, so two targets sharing one would
    /// overwrite each other's backup.
    fn check_backup_names(&self) -> Result<(), ConfigError> {
        let mut seen: FxHashMap<&OsStr, &Path> = FxHashMap::default();
        for file in &self.html_files {
            let Some(name) = file.file_name() else {
                continue;
            };
            if let Some(first) = seen.insert(name, file) {
                return Err(ConfigError::Validation(format!(
                    "html files `{}` and `{}` share the backup name `{}`",
                    first.display(),
                    file.display(),
                    name.to_string_lossy()
                )));
            }
        }
        Ok(())
    }

    /// Get path relative to the project root, for display.
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }
}

// ============================================================================
// tests
// ============================================================================
