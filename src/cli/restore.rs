//! `restore` command: copy backups back over the target files.

use anyhow::Result;

use crate::backup::{self, Restored};
use crate::config::SiteConfig;
use crate::log;

/// Restore every configured target from its backup.
///
/// Returns the number of restored files. Missing backups are reported and
/// skipped.
pub fn restore_files(config: &SiteConfig) -> Result<usize> {
    let mut restored = 0;

    for file in &config.html_files {
        let display = config.root_relative(file);

        if config.dry_run {
            let backup = backup::backup_path(file, &config.backup_dir)?;
            if backup.is_file() {
                log!("restore"; "{} (dry run, not copied)", display.display());
                restored += 1;
            } else {
                log!("warning"; "no backup for {}", display.display());
            }
            continue;
        }

        match backup::restore_backup(file, &config.backup_dir)? {
            Restored::Copied { backup, bytes } => {
                log!("restore"; "{} <- {} ({} bytes)",
                    display.display(), config.root_relative(&backup).display(), bytes);
                restored += 1;
            }
            Restored::Missing { backup } => {
                log!("warning"; "no backup for {} at {}",
                    display.display(), config.root_relative(&backup).display());
            }
        }
    }

    log!("summary"; "restored {} of {} file(s) from {}",
        restored, config.html_files.len(), config.backup_dir.display());
    Ok(restored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::create_backup;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_restore_files() {
        let dir = TempDir::new().unwrap();
        let mut config = SiteConfig::default();
        config.finalize(dir.path());

        let index = dir.path().join("index.html");
        fs::write(&index, "<img src=\"assets/img/a.png\">").unwrap();
        create_backup(&index, &config.backup_dir).unwrap();
        fs::write(&index, "<img src=\"assets/img-optimized/a.png\" loading=\"lazy\">").unwrap();

        // index_en.html has no backup
        assert_eq!(restore_files(&config).unwrap(), 1);
        assert_eq!(
            fs::read_to_string(&index).unwrap(),
            "<img src=\"assets/img/a.png\">"
        );
    }

    #[test]
    fn test_restore_dry_run() {
        let dir = TempDir::new().unwrap();
        let mut config = SiteConfig::default();
        config.finalize(dir.path());
        config.dry_run = true;

        let index = dir.path().join("index.html");
        fs::write(&index, "old").unwrap();
        create_backup(&index, &config.backup_dir).unwrap();
        fs::write(&index, "new").unwrap();

        assert_eq!(restore_files(&config).unwrap(), 1);
        assert_eq!(fs::read_to_string(&index).unwrap(), "new");
    }
}
