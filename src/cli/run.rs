//! `optimize` / `picture` commands: back up, transform and write each target.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::backup::{self, Backup};
use crate::config::SiteConfig;
use crate::pipeline::{Profile, RuleSet, Transformed};
use crate::report::{FileOutcome, RunStats, print_report};
use crate::{debug, log};

/// Run `profile` over every configured target and print the summary.
pub fn run_profile(config: &SiteConfig, profile: Profile) -> Result<RunStats> {
    let rules = RuleSet::for_profile(profile, config);
    let stats = process_files(config, &rules)?;
    print_report(&stats, &rules, &config.backup_dir, config.dry_run);
    Ok(stats)
}

/// Process targets strictly one after another, in configured order.
pub fn process_files(config: &SiteConfig, rules: &RuleSet) -> Result<RunStats> {
    let module = rules.profile().name();
    log!(module; "{} file(s), images {} -> {}",
        config.html_files.len(), config.images.source, config.images.optimized);
    if config.dry_run {
        log!(module; "dry run, targets will not be written");
    }

    let mut stats = RunStats::new();
    for file in &config.html_files {
        let outcome = process_file(file, config, rules, &mut stats)?;
        stats.record_outcome(outcome);
    }
    Ok(stats)
}

/// Back up, transform and (unless dry run) write one target.
///
/// Missing targets and failed backups are reported and skipped. Errors after
/// a successful backup (non-UTF-8 content, failed write) are returned.
fn process_file(
    path: &Path,
    config: &SiteConfig,
    rules: &RuleSet,
    stats: &mut RunStats,
) -> Result<FileOutcome> {
    let module = rules.profile().name();
    let display = config.root_relative(path);

    if !path.is_file() {
        log!("warning"; "not found: {}", path.display());
        return Ok(FileOutcome::Missing);
    }
    log!(module; "{}", display.display());

    let backup = match backup::create_backup(path, &config.backup_dir) {
        Ok(backup) => backup,
        Err(err) => {
            log!("error"; "{}: {:#}", display.display(), anyhow::Error::from(err));
            return Ok(FileOutcome::BackupFailed);
        }
    };
    debug!("backup"; "{} ({} bytes)", backup.path.display(), backup.bytes);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read `{}`", path.display()))?;
    let transformed = rules.apply(&content);
    stats.record_transform(&transformed);

    for &(kind, count) in &transformed.counts {
        if count > 0 {
            log!(module; "  {}: {}", kind.label(), count);
        }
    }

    if !transformed.modified {
        log!(module; "  no changes");
        return Ok(FileOutcome::Unchanged);
    }
    if config.dry_run {
        log!(module; "  dry run, not saved");
    } else {
        persist(&backup, &transformed)?;
        log!(module; "  saved ({} changes)", transformed.total());
    }
    Ok(FileOutcome::Modified)
}

/// Write the rewritten text over the backed-up target.
fn persist(backup: &Backup, transformed: &Transformed) -> Result<()> {
    fs::write(&backup.target, &transformed.text)
        .with_context(|| format!("Failed to write `{}`", backup.target.display()))
}

// ============================================================================
// Tests
// ============================================================================
