//! Guard conditions gating target execution.
//!
//! A target may declare a guard; if it evaluates false at execution time
//! the target's actions are skipped. Conditions are evaluated fresh each
//! time against the current filesystem and property state, never cached.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::property::{PropertyError, PropertyStore};

/// A predicate over filesystem and property state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Condition {
  /// True iff `path` exists and is a regular file.
  FileExists { path: String },

  /// True iff `path` exists and is a directory.
  DirExists { path: String },

  /// True iff the property is set to a non-empty value.
  PropertySet { name: String },

  /// Inverts the inner condition.
  Not { condition: Box<Condition> },
}

/// Evaluate a condition against the current snapshot.
///
/// Pure with respect to filesystem and property state: no side effects.
/// Paths are property-expanded first; relative paths resolve against
/// `base_dir`.
///
/// # Errors
///
/// Returns an error if a path contains a malformed or undefined
/// property reference.
pub fn evaluate(
  condition: &Condition,
  props: &PropertyStore,
  base_dir: &Path,
) -> Result<bool, PropertyError> {
  match condition {
    Condition::FileExists { path } => {
      let path = base_dir.join(props.expand(path)?);
      Ok(path.is_file())
    }
    Condition::DirExists { path } => {
      let path = base_dir.join(props.expand(path)?);
      Ok(path.is_dir())
    }
    Condition::PropertySet { name } => Ok(props.is_set(name)),
    Condition::Not { condition } => Ok(!evaluate(condition, props, base_dir)?),
  }
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;

  fn not(condition: Condition) -> Condition {
    Condition::Not {
      condition: Box::new(condition),
    }
  }

  #[test]
  fn file_exists_distinguishes_files_from_dirs() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("setup.py"), "").unwrap();
    std::fs::create_dir(temp.path().join("eggs")).unwrap();

    let props = PropertyStore::new();
    let file = Condition::FileExists {
      path: "setup.py".to_string(),
    };
    let dir_as_file = Condition::FileExists {
      path: "eggs".to_string(),
    };

    assert!(evaluate(&file, &props, temp.path()).unwrap());
    assert!(!evaluate(&dir_as_file, &props, temp.path()).unwrap());
  }

  #[test]
  fn dir_exists_checks_directories() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir(temp.path().join("eggs")).unwrap();

    let props = PropertyStore::new();
    let present = Condition::DirExists {
      path: "eggs".to_string(),
    };
    let absent = Condition::DirExists {
      path: "missing".to_string(),
    };

    assert!(evaluate(&present, &props, temp.path()).unwrap());
    assert!(!evaluate(&absent, &props, temp.path()).unwrap());
  }

  #[test]
  fn paths_are_property_expanded() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir(temp.path().join("build")).unwrap();

    let mut props = PropertyStore::new();
    props.set("build-dir", "build");
    let cond = Condition::DirExists {
      path: "${build-dir}".to_string(),
    };

    assert!(evaluate(&cond, &props, temp.path()).unwrap());
  }

  #[test]
  fn property_set_follows_store_state() {
    let temp = TempDir::new().unwrap();
    let mut props = PropertyStore::new();
    let cond = Condition::PropertySet {
      name: "have-eggs".to_string(),
    };

    assert!(!evaluate(&cond, &props, temp.path()).unwrap());
    props.set("have-eggs", "true");
    assert!(evaluate(&cond, &props, temp.path()).unwrap());
  }

  #[test]
  fn not_inverts() {
    let temp = TempDir::new().unwrap();
    let props = PropertyStore::new();
    let cond = not(Condition::PropertySet {
      name: "unset".to_string(),
    });

    assert!(evaluate(&cond, &props, temp.path()).unwrap());
  }

  #[test]
  fn undefined_property_in_path_is_an_error() {
    let temp = TempDir::new().unwrap();
    let props = PropertyStore::new();
    let cond = Condition::FileExists {
      path: "${nowhere}/x".to_string(),
    };

    assert!(evaluate(&cond, &props, temp.path()).is_err());
  }

  #[test]
  fn condition_deserializes_from_toml() {
    let cond: Condition = toml::from_str(
      r#"
        kind = "not"

        [condition]
        kind = "dir-exists"
        path = "eggs"
      "#,
    )
    .unwrap();

    assert_eq!(
      cond,
      not(Condition::DirExists {
        path: "eggs".to_string()
      })
    );
  }
}
