//! siteopt - rewrite static site html for optimized images and minified assets.

mod backup;
mod cli;
mod config;
mod logger;
mod pipeline;
mod report;
mod rules;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;
use pipeline::Profile;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = SiteConfig::load(&cli)?;
    if let Some(path) = &config.config_path {
        debug!("config"; "loaded {}", path.display());
    }

    match &cli.command {
        Commands::Optimize { .. } => cli::run::run_profile(&config, Profile::Optimize).map(|_| ()),
        Commands::Picture { .. } => cli::run::run_profile(&config, Profile::Picture).map(|_| ()),
        Commands::Restore { .. } => cli::restore::restore_files(&config).map(|_| ()),
    }
}
