//! Action dispatch.
//!
//! Each target's body is an ordered list of actions; this module maps
//! each action variant onto its primitive, expanding `${property}`
//! references first so values written by earlier targets take effect.

pub mod compile;
pub mod delete;

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::debug;

use crate::condition;
use crate::manifest::Action;
use crate::property::PropertyStore;

use super::sink::Sink;
use super::types::ActionError;

pub use compile::{CommandChecker, SyntaxChecker, compile_check};
pub use delete::{delete_dir, delete_files};

/// Shared state one action executes against.
pub struct ActionContext<'a> {
  /// Property store; `timestamp` and `set-property` write into it.
  pub props: &'a mut PropertyStore,

  /// Directory relative paths resolve against (the build file's home).
  pub base_dir: &'a Path,

  /// Syntax-check collaborator.
  pub checker: &'a dyn SyntaxChecker,

  /// Informational output collaborator.
  pub sink: &'a mut dyn Sink,
}

impl ActionContext<'_> {
  /// Expand a path field and anchor it at the base directory.
  fn resolve_path(&self, raw: &str) -> Result<PathBuf, ActionError> {
    Ok(self.base_dir.join(self.props.expand(raw)?))
  }
}

/// Execute a single action.
///
/// Synchronous; the first failure aborts the owning target. A
/// compile-check reports every failing file to the sink before the
/// aggregated error is returned.
///
/// # Errors
///
/// Returns an error on property expansion failure, filesystem failure,
/// or a non-empty compile-check failure set.
pub fn execute_action(action: &Action, ctx: &mut ActionContext<'_>) -> Result<(), ActionError> {
  match action {
    Action::DeleteFiles { pattern, base_dir } => {
      let pattern = ctx.props.expand(pattern)?;
      let base_dir = ctx.resolve_path(base_dir)?;
      delete_files(&pattern, &base_dir)?;
      Ok(())
    }

    Action::DeleteDir { path } => {
      let path = ctx.resolve_path(path)?;
      delete_dir(&path)?;
      Ok(())
    }

    Action::CompileCheck { dir, path_context } => {
      let dir = ctx.resolve_path(dir)?;
      let context = ctx.resolve_path(path_context)?;
      let failures = compile_check(&dir, &context, ctx.checker)?;

      for failure in &failures {
        ctx.sink.write_line(&failure.to_string())?;
      }

      if failures.is_empty() {
        Ok(())
      } else {
        Err(ActionError::CompileCheck { failures })
      }
    }

    Action::Timestamp => {
      let now = Local::now();
      ctx.props.set("dstamp", &now.format("%Y%m%d").to_string());
      ctx.props.set("tstamp", &now.format("%H%M").to_string());
      ctx.props.set("today", &now.format("%B %d %Y").to_string());
      debug!(dstamp = %now.format("%Y%m%d"), "recorded timestamp properties");
      Ok(())
    }

    Action::Message { text } => {
      let text = ctx.props.expand(text)?;
      ctx.sink.write_line(&text)?;
      Ok(())
    }

    Action::SetProperty { name, condition } => {
      if condition::evaluate(condition, ctx.props, ctx.base_dir)? {
        ctx.props.set(name, "true");
        debug!(property = %name, "condition satisfied, property set");
      } else {
        debug!(property = %name, "condition unsatisfied, property left unset");
      }
      Ok(())
    }
  }
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;
  use crate::condition::Condition;
  use crate::execute::sink::CollectSink;

  fn run(action: &Action, props: &mut PropertyStore, base_dir: &Path) -> (Vec<String>, Result<(), ActionError>) {
    let mut sink = CollectSink::new();
    let checker = CommandChecker::default();
    let result = execute_action(
      action,
      &mut ActionContext {
        props,
        base_dir,
        checker: &checker,
        sink: &mut sink,
      },
    );
    (sink.lines, result)
  }

  #[test]
  fn message_expands_properties_into_the_sink() {
    let temp = TempDir::new().unwrap();
    let mut props = PropertyStore::new();
    props.set("name", "anvil");

    let action = Action::Message {
      text: "building ${name}".to_string(),
    };
    let (lines, result) = run(&action, &mut props, temp.path());

    result.unwrap();
    assert_eq!(lines, vec!["building anvil"]);
  }

  #[test]
  fn message_with_undefined_property_fails() {
    let temp = TempDir::new().unwrap();
    let mut props = PropertyStore::new();

    let action = Action::Message {
      text: "${who}".to_string(),
    };
    let (lines, result) = run(&action, &mut props, temp.path());

    assert!(matches!(result, Err(ActionError::Property(_))));
    assert!(lines.is_empty());
  }

  #[test]
  fn timestamp_sets_the_stamp_properties() {
    let temp = TempDir::new().unwrap();
    let mut props = PropertyStore::new();

    let (_, result) = run(&Action::Timestamp, &mut props, temp.path());

    result.unwrap();
    assert!(props.is_set("dstamp"));
    assert!(props.is_set("tstamp"));
    assert!(props.is_set("today"));
    assert_eq!(props.get("dstamp").unwrap().len(), 8);
  }

  #[test]
  fn set_property_writes_only_when_condition_holds() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir(temp.path().join("eggs")).unwrap();
    let mut props = PropertyStore::new();

    let hit = Action::SetProperty {
      name: "have-eggs".to_string(),
      condition: Condition::DirExists {
        path: "eggs".to_string(),
      },
    };
    let miss = Action::SetProperty {
      name: "have-spam".to_string(),
      condition: Condition::DirExists {
        path: "spam".to_string(),
      },
    };

    run(&hit, &mut props, temp.path()).1.unwrap();
    run(&miss, &mut props, temp.path()).1.unwrap();

    assert_eq!(props.get("have-eggs"), Some("true"));
    assert!(!props.is_set("have-spam"));
  }

  #[test]
  fn delete_actions_resolve_relative_to_base_dir() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir(temp.path().join("build")).unwrap();
    std::fs::write(temp.path().join("build/a.pyc"), "x").unwrap();
    let mut props = PropertyStore::new();
    props.set("build-dir", "build");

    let action = Action::DeleteFiles {
      pattern: "*.pyc".to_string(),
      base_dir: "${build-dir}".to_string(),
    };
    run(&action, &mut props, temp.path()).1.unwrap();

    assert!(!temp.path().join("build/a.pyc").exists());
  }

  #[test]
  fn compile_check_reports_failures_to_the_sink_and_aborts() {
    struct AlwaysFails;
    impl SyntaxChecker for AlwaysFails {
      fn is_source(&self, path: &Path) -> bool {
        path.extension().is_some_and(|e| e == "py")
      }
      fn check(&self, file: &Path, _context: &Path) -> Result<Option<crate::execute::types::CheckFailure>, ActionError> {
        Ok(Some(crate::execute::types::CheckFailure {
          file: file.to_path_buf(),
          detail: "boom".to_string(),
        }))
      }
    }

    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("mod.py"), "x").unwrap();
    let mut props = PropertyStore::new();
    let mut sink = CollectSink::new();

    let action = Action::CompileCheck {
      dir: ".".to_string(),
      path_context: ".".to_string(),
    };
    let result = execute_action(
      &action,
      &mut ActionContext {
        props: &mut props,
        base_dir: temp.path(),
        checker: &AlwaysFails,
        sink: &mut sink,
      },
    );

    assert!(matches!(
      result,
      Err(ActionError::CompileCheck { failures }) if failures.len() == 1
    ));
    assert_eq!(sink.lines.len(), 1);
    assert!(sink.lines[0].contains("boom"));
  }
}
