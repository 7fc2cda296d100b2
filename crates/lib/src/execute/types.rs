//! Types for plan resolution and target execution.
//!
//! This module defines the error taxonomy for the execution layer, the
//! resolved plan handed from the resolver to the executor, and the
//! report an executor run produces.

use std::path::PathBuf;

use thiserror::Error;

use crate::property::PropertyError;

/// One source file that failed a syntax check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckFailure {
  /// The failing source file.
  pub file: PathBuf,
  /// Checker diagnostic for that file.
  pub detail: String,
}

impl std::fmt::Display for CheckFailure {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}: {}", self.file.display(), self.detail)
  }
}

/// Errors raised by a single action.
///
/// Actions report errors without target context; the executor wraps
/// them into [`ExecuteError::Action`] with the owning target's name.
#[derive(Debug, Error)]
pub enum ActionError {
  /// A `${name}` reference could not be expanded.
  #[error("property error: {0}")]
  Property(#[from] PropertyError),

  /// A delete-files glob pattern is malformed.
  #[error("invalid glob pattern: {0}")]
  Pattern(#[from] glob::PatternError),

  /// A deletion or directory removal hit an unexpected error.
  #[error("{action} failed for {}: {source}", path.display())]
  Filesystem {
    action: &'static str,
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// One or more source files failed a syntax check.
  #[error("syntax check failed for {} file(s)", failures.len())]
  CompileCheck { failures: Vec<CheckFailure> },

  /// The syntax checker itself could not be run.
  #[error("syntax checker failed to run on {}: {source}", file.display())]
  Checker {
    file: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// I/O error outside a specific filesystem action (e.g. sink write).
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// Errors raised while resolving or running a plan.
#[derive(Debug, Error)]
pub enum ExecuteError {
  /// A requested or referenced target does not exist.
  #[error("unknown target: {0}")]
  UnknownTarget(String),

  /// Two targets share a name.
  #[error("duplicate target name: {0}")]
  DuplicateTarget(String),

  /// The dependency graph has a cycle reachable from the request.
  #[error("dependency cycle detected: {}", cycle.join(" -> "))]
  CyclicDependency { cycle: Vec<String> },

  /// An action failed while running the named target.
  #[error("target '{target}': {source}")]
  Action {
    target: String,
    #[source]
    source: ActionError,
  },
}

/// Ordered, deduplicated sequence of target names to execute.
///
/// Derived by the resolver for one invocation; every dependency of a
/// target appears strictly before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlan {
  targets: Vec<String>,
}

impl ResolvedPlan {
  pub(crate) fn new(targets: Vec<String>) -> Self {
    Self { targets }
  }

  /// Target names in execution order.
  pub fn targets(&self) -> &[String] {
    &self.targets
  }

  pub fn len(&self) -> usize {
    self.targets.len()
  }

  pub fn is_empty(&self) -> bool {
    self.targets.is_empty()
  }
}

/// Outcome of running a plan to completion.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
  /// Targets whose action bodies ran.
  pub executed: Vec<String>,

  /// Targets skipped because their guard evaluated false.
  pub skipped: Vec<String>,
}

impl RunReport {
  /// Total number of targets the plan visited.
  pub fn total(&self) -> usize {
    self.executed.len() + self.skipped.len()
  }
}
