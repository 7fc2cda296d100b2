//! File and directory deletion primitives.
//!
//! Both primitives are idempotent: matching nothing and removing an
//! already-absent directory are successes, so cleanup targets can run
//! on a fresh tree.

use std::path::Path;

use glob::Pattern;
use tracing::debug;
use walkdir::WalkDir;

use crate::execute::types::ActionError;

/// Delete every file under `base_dir` whose relative path matches the
/// glob `pattern` (e.g. `**/*.pyc`). Directories are never removed.
///
/// Returns the number of files deleted; zero matches is not an error,
/// nor is a missing `base_dir`.
///
/// # Errors
///
/// Returns an error if the pattern is malformed or a matched file
/// cannot be removed.
pub fn delete_files(pattern: &str, base_dir: &Path) -> Result<usize, ActionError> {
  let matcher = Pattern::new(pattern)?;

  if !base_dir.exists() {
    return Ok(0);
  }

  let mut removed = 0;
  for entry in WalkDir::new(base_dir) {
    let entry = entry.map_err(|source| ActionError::Filesystem {
      action: "delete-files",
      path: base_dir.to_path_buf(),
      source: source.into(),
    })?;

    if !entry.file_type().is_file() {
      continue;
    }

    let relative = entry.path().strip_prefix(base_dir).unwrap_or(entry.path());
    if !matcher.matches_path(relative) {
      continue;
    }

    std::fs::remove_file(entry.path()).map_err(|source| ActionError::Filesystem {
      action: "delete-files",
      path: entry.path().to_path_buf(),
      source,
    })?;
    removed += 1;
  }

  debug!(pattern = %pattern, base_dir = %base_dir.display(), removed, "deleted files");
  Ok(removed)
}

/// Recursively delete a directory and its contents.
///
/// Returns true if the directory existed and was removed, false if it
/// was already absent.
///
/// # Errors
///
/// Returns an error on any unexpected removal failure (e.g. missing
/// permissions).
pub fn delete_dir(path: &Path) -> Result<bool, ActionError> {
  if !path.exists() {
    debug!(path = %path.display(), "directory already absent");
    return Ok(false);
  }

  std::fs::remove_dir_all(path).map_err(|source| ActionError::Filesystem {
    action: "delete-dir",
    path: path.to_path_buf(),
    source,
  })?;

  debug!(path = %path.display(), "deleted directory");
  Ok(true)
}
