//! Build description types.
//!
//! The manifest is the static configuration an invocation runs against:
//! a property table, a set of named targets with dependency lists, and
//! each target's ordered action list. It is deserialized from a TOML
//! build description file and treated as immutable for the lifetime of
//! the invocation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::condition::Condition;

/// The complete build description.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
  /// Target to run when the caller names none.
  #[serde(default)]
  pub default: Option<String>,

  /// Named configuration values, seeding the property store.
  #[serde(default)]
  pub properties: BTreeMap<String, String>,

  /// All targets, in declaration order.
  #[serde(default)]
  pub targets: Vec<TargetDef>,
}

/// A named unit of work.
///
/// Dependencies execute before the target itself; the optional guard
/// decides at execution time whether the action body runs at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetDef {
  /// Unique name, the handle callers and `depends` lists use.
  pub name: String,

  /// Human-readable summary shown by target listings.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,

  /// Direct dependencies, first-listed resolved first.
  #[serde(default)]
  pub depends: Vec<String>,

  /// Optional run guard; absent means always run.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub guard: Option<Condition>,

  /// Ordered action body.
  #[serde(default)]
  pub actions: Vec<Action>,
}

/// An action a target can perform.
///
/// The vocabulary is closed: an unsupported action kind is a
/// deserialization error, not a runtime surprise. String fields may
/// contain `${property}` references, expanded at execution time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Action {
  /// Delete every file under `base_dir` matching the glob `pattern`
  /// (recursive, e.g. `**/*.pyc`). Zero matches is not an error.
  DeleteFiles { pattern: String, base_dir: String },

  /// Recursively delete a directory. Missing directory is not an error.
  DeleteDir { path: String },

  /// Syntax-check every source file under `dir`, with `path_context`
  /// as the working directory for intra-source resolution.
  CompileCheck { dir: String, path_context: String },

  /// Record the current wall-clock time into the `dstamp`, `tstamp`
  /// and `today` properties.
  Timestamp,

  /// Emit an informational line to the output sink.
  Message { text: String },

  /// Evaluate `condition`; if true, set property `name` to `"true"`.
  SetProperty { name: String, condition: Condition },
}

impl Action {
  /// Short action kind name, used in logs and error messages.
  pub fn kind(&self) -> &'static str {
    match self {
      Action::DeleteFiles { .. } => "delete-files",
      Action::DeleteDir { .. } => "delete-dir",
      Action::CompileCheck { .. } => "compile-check",
      Action::Timestamp => "timestamp",
      Action::Message { .. } => "message",
      Action::SetProperty { .. } => "set-property",
    }
  }
}
