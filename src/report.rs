//! Run statistics and the closing summary.
//!
//! [`RunStats`] is an explicit accumulator owned by the driver: it is updated
//! once per finished file and printed once at the end.

use std::path::Path;

use rustc_hash::FxHashMap;

use crate::log;
use crate::pipeline::{RuleSet, Transformed};
use crate::rules::RuleKind;

/// Final state of one target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileOutcome {
    /// Rules fired (and the file was written unless dry run).
    Modified,
    /// No rule fired.
    Unchanged,
    /// Target does not exist.
    Missing,
    /// Backup could not be made; the file was not touched.
    BackupFailed,
}

impl FileOutcome {
    const ALL: [Self; 4] = [
        Self::Modified,
        Self::Unchanged,
        Self::Missing,
        Self::BackupFailed,
    ];

    const fn label(self) -> &'static str {
        match self {
            Self::Modified => "modified",
            Self::Unchanged => "unchanged",
            Self::Missing => "missing",
            Self::BackupFailed => "backup failed",
        }
    }
}

/// Per-rule totals and per-outcome file counts for one run.
#[derive(Debug, Default)]
pub struct RunStats {
    rules: FxHashMap<RuleKind, usize>,
    files: FxHashMap<FileOutcome, usize>,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the rule counts of one processed file.
    pub fn record_transform(&mut self, transformed: &Transformed) {
        for &(kind, count) in &transformed.counts {
            *self.rules.entry(kind).or_default() += count;
        }
    }

    pub fn record_outcome(&mut self, outcome: FileOutcome) {
        *self.files.entry(outcome).or_default() += 1;
    }

    /// Total spans rewritten by `kind`.
    pub fn rule_total(&self, kind: RuleKind) -> usize {
        self.rules.get(&kind).copied().unwrap_or(0)
    }

    /// Number of files that ended in `outcome`.
    pub fn outcome_count(&self, outcome: FileOutcome) -> usize {
        self.files.get(&outcome).copied().unwrap_or(0)
    }

    /// Sum over all rules.
    pub fn total(&self) -> usize {
        self.rules.values().sum()
    }

    /// Render `modified 1, unchanged 1` for non-zero outcomes.
    fn outcome_summary(&self) -> String {
        let parts: Vec<_> = FileOutcome::ALL
            .iter()
            .filter_map(|&outcome| {
                let n = self.outcome_count(outcome);
                (n > 0).then(|| format!("{} {n}", outcome.label()))
            })
            .collect();
        if parts.is_empty() {
            "none".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Print the closing summary.
pub fn print_report(stats: &RunStats, rules: &RuleSet, backup_dir: &Path, dry_run: bool) {
    let width = rules.kinds().map(|k| k.label().len()).max().unwrap_or(0);

    for kind in rules.kinds() {
        log!("summary"; "{:<width$}  {}", kind.label(), stats.rule_total(kind));
    }
    log!("summary"; "{:<width$}  {}", "total", stats.total());
    log!("summary"; "files: {}", stats.outcome_summary());
    log!("summary"; "backups in {}", backup_dir.display());

    if dry_run {
        log!("summary"; "dry run, no file was written");
    } else if stats.outcome_count(FileOutcome::Modified) > 0 {
        log!("summary"; "undo with `siteopt restore`");
    }
}
