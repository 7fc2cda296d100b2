//! Compile-check action: syntax-only validation of source files.
//!
//! The concrete compiler/interpreter is an external collaborator behind
//! the [`SyntaxChecker`] trait. The engine walks the source tree,
//! checks every source file, and aggregates failures instead of
//! stopping at the first one, so a single run reports every broken
//! file.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::execute::types::{ActionError, CheckFailure};

/// Default checker command when the configuration names none.
pub const DEFAULT_CHECK_COMMAND: &str = "python3 -m py_compile";

/// Default source file extension when the configuration names none.
pub const DEFAULT_SOURCE_EXTENSION: &str = "py";

/// External syntax-check collaborator.
pub trait SyntaxChecker {
  /// Whether this checker handles the given file at all.
  fn is_source(&self, path: &Path) -> bool;

  /// Check one file, with `context` as the directory intra-source
  /// references resolve against. `Ok(None)` means the file passed.
  ///
  /// # Errors
  ///
  /// Returns an error only when the checker itself cannot run; a file
  /// failing its check is an `Ok(Some(_))` result, not an error.
  fn check(&self, file: &Path, context: &Path) -> Result<Option<CheckFailure>, ActionError>;
}

/// Checker that spawns an external command per source file.
///
/// The command (e.g. `python3 -m py_compile`) receives the file path as
/// its final argument and runs with the context directory as its
/// working directory. A non-zero exit marks the file as failed, with
/// the process's stderr as the detail.
#[derive(Debug, Clone)]
pub struct CommandChecker {
  program: String,
  args: Vec<String>,
  extension: String,
}

impl CommandChecker {
  /// Build a checker from a whitespace-separated command line.
  pub fn new(command: &str) -> Self {
    let mut parts = command.split_whitespace().map(str::to_string);
    let program = parts.next().unwrap_or_else(|| "python3".to_string());
    Self {
      program,
      args: parts.collect(),
      extension: DEFAULT_SOURCE_EXTENSION.to_string(),
    }
  }

  /// Override the source file extension this checker handles.
  pub fn with_extension(mut self, extension: &str) -> Self {
    self.extension = extension.trim_start_matches('.').to_string();
    self
  }
}

impl Default for CommandChecker {
  fn default() -> Self {
    Self::new(DEFAULT_CHECK_COMMAND)
  }
}

impl SyntaxChecker for CommandChecker {
  fn is_source(&self, path: &Path) -> bool {
    path
      .extension()
      .is_some_and(|ext| ext.eq_ignore_ascii_case(self.extension.as_str()))
  }

  fn check(&self, file: &Path, context: &Path) -> Result<Option<CheckFailure>, ActionError> {
    let output = Command::new(&self.program)
      .args(&self.args)
      .arg(file)
      .current_dir(context)
      .output()
      .map_err(|source| ActionError::Checker {
        file: file.to_path_buf(),
        source,
      })?;

    if output.status.success() {
      return Ok(None);
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let detail = if !stderr.trim().is_empty() {
      stderr.trim().to_string()
    } else if !stdout.trim().is_empty() {
      stdout.trim().to_string()
    } else {
      format!("checker exited with {}", output.status)
    };

    Ok(Some(CheckFailure {
      file: file.to_path_buf(),
      detail,
    }))
  }
}

/// Syntax-check every source file under `dir`.
///
/// Files are visited in a deterministic (name-sorted) order. All
/// failures are collected; the caller decides that a non-empty set
/// aborts the owning target.
///
/// # Errors
///
/// Returns an error if the tree cannot be walked or the checker
/// cannot be spawned; per-file check failures are part of the `Ok`
/// result.
pub fn compile_check(
  dir: &Path,
  context: &Path,
  checker: &dyn SyntaxChecker,
) -> Result<Vec<CheckFailure>, ActionError> {
  let mut sources: Vec<PathBuf> = Vec::new();
  for entry in walkdir::WalkDir::new(dir).sort_by_file_name() {
    let entry = entry.map_err(|source| ActionError::Filesystem {
      action: "compile-check",
      path: dir.to_path_buf(),
      source: source.into(),
    })?;
    if entry.file_type().is_file() && checker.is_source(entry.path()) {
      sources.push(entry.path().to_path_buf());
    }
  }

  info!(dir = %dir.display(), files = sources.len(), "checking syntax");

  let mut failures = Vec::new();
  for file in &sources {
    match checker.check(file, context)? {
      None => debug!(file = %file.display(), "syntax ok"),
      Some(failure) => {
        debug!(file = %file.display(), "syntax check failed");
        failures.push(failure);
      }
    }
  }

  Ok(failures)
}
