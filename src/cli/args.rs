//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Rewrite site html to use optimized images, lazy loading and minified assets
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: siteopt.toml, searched upward from cwd)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Simulate only: run every rule and report, never write target files
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,

    /// Backup directory (relative to project root)
    #[arg(short = 'B', long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub backup_dir: Option<PathBuf>,

    /// Print per-rule details for every file
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Remap image paths, add lazy loading, use minified css/js
    #[command(visible_alias = "o")]
    Optimize {
        #[command(flatten)]
        targets: TargetArgs,
    },

    /// Wrap images in <picture> with a WebP source, remap background urls, add lazy loading
    #[command(visible_alias = "p")]
    Picture {
        #[command(flatten)]
        targets: TargetArgs,
    },

    /// Copy backups back over the target files
    #[command(visible_alias = "r")]
    Restore {
        #[command(flatten)]
        targets: TargetArgs,
    },
}

impl Commands {
    /// Target files given on the command line (empty = use config).
    pub fn files(&self) -> &[PathBuf] {
        match self {
            Self::Optimize { targets } | Self::Picture { targets } | Self::Restore { targets } => {
                &targets.files
            }
        }
    }
}

/// Target file override shared by all subcommands.
#[derive(clap::Args, Debug, Clone)]
pub struct TargetArgs {
    /// HTML files to process instead of the configured `html_files`
    #[arg(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub files: Vec<PathBuf>,
}
