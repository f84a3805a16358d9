//! Point-in-time backups of target files.
//!
//! A backup lives at `<backup_dir>/<file name>.backup` and is overwritten on
//! every run. Writing a rewritten target requires the [`Backup`] returned by
//! [`create_backup`], so a target can only change after its copy exists.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Suffix appended to the target's file name.
pub const BACKUP_SUFFIX: &str = ".backup";

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("`{0}` has no file name")]
    InvalidTarget(PathBuf),

    #[error("failed to create backup directory `{0}`")]
    CreateDir(PathBuf, #[source] io::Error),

    #[error("failed to copy `{0}` to `{1}`")]
    Copy(PathBuf, PathBuf, #[source] io::Error),
}

/// Proof that `target` was copied to `path` in this run.
#[derive(Debug)]
pub struct Backup {
    pub target: PathBuf,
    pub path: PathBuf,
    pub bytes: u64,
}

/// Outcome of restoring one target.
#[derive(Debug, PartialEq, Eq)]
pub enum Restored {
    /// Backup copied over the target.
    Copied { backup: PathBuf, bytes: u64 },
    /// No backup exists for the target.
    Missing { backup: PathBuf },
}

/// `<backup_dir>/<file name>.backup`
pub fn backup_path(target: &Path, backup_dir: &Path) -> Result<PathBuf, BackupError> {
    let name = target
        .file_name()
        .ok_or_else(|| BackupError::InvalidTarget(target.to_path_buf()))?;
    let mut file_name = name.to_os_string();
    file_name.push(BACKUP_SUFFIX);
    Ok(backup_dir.join(file_name))
}

/// Copy `target` into `backup_dir`, creating the directory if needed.
pub fn create_backup(target: &Path, backup_dir: &Path) -> Result<Backup, BackupError> {
    let path = backup_path(target, backup_dir)?;
    fs::create_dir_all(backup_dir)
        .map_err(|err| BackupError::CreateDir(backup_dir.to_path_buf(), err))?;
    let bytes = fs::copy(target, &path)
        .map_err(|err| BackupError::Copy(target.to_path_buf(), path.clone(), err))?;

    Ok(Backup {
        target: target.to_path_buf(),
        path,
        bytes,
    })
}

/// Copy the backup of `target` back over it.
pub fn restore_backup(target: &Path, backup_dir: &Path) -> Result<Restored, BackupError> {
    let backup = backup_path(target, backup_dir)?;
    if !backup.is_file() {
        return Ok(Restored::Missing { backup });
    }
    let bytes = fs::copy(&backup, target)
        .map_err(|err| BackupError::Copy(backup.clone(), target.to_path_buf(), err))?;
    Ok(Restored::Copied { backup, bytes })
}
