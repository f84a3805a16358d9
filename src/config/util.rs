//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from the current directory
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_file_from(&cwd, config_name)
}

/// Find config file by searching upward from `start`
///
/// Walks up parent directories until finding `config_name`
///
/// # Example
/// ```text
/// /home/user/site/scripts/   ← start
/// /home/user/site/siteopt.toml  ← found!
/// ```
pub fn find_config_file_from(start: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.is_file() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

/// Resolve `path` against the project root unless it is already absolute.
pub fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

// ============================================================================
// tests
// ============================================================================
