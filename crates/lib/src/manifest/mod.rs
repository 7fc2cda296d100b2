//! Build description loading and validation.
//!
//! The manifest is loaded once at process start from a TOML build
//! description file and validated before any resolution or execution:
//! every referenced target must exist and names must be unique.

mod types;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use types::*;

/// Errors raised while loading or validating a build description.
#[derive(Debug, Error)]
pub enum ManifestError {
  #[error("failed to read build file {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse build file {}: {source}", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },

  #[error("duplicate target name: {0}")]
  DuplicateTarget(String),

  #[error("target '{target}' depends on unknown target '{dependency}'")]
  UnknownDependency { target: String, dependency: String },

  #[error("default target '{0}' is not defined")]
  UnknownDefault(String),
}

impl Manifest {
  /// Load and validate a build description file.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read, is not valid TOML,
  /// or fails validation (duplicate targets, dangling references).
  pub fn load(path: &Path) -> Result<Self, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    let manifest: Manifest = toml::from_str(&content).map_err(|source| ManifestError::Parse {
      path: path.to_path_buf(),
      source,
    })?;

    manifest.validate()?;
    Ok(manifest)
  }

  /// Check referential integrity of the target set.
  ///
  /// # Errors
  ///
  /// Returns an error on duplicate target names, on a `depends` entry
  /// naming an undefined target, or on an undefined `default`.
  pub fn validate(&self) -> Result<(), ManifestError> {
    let mut seen = std::collections::HashSet::new();
    for target in &self.targets {
      if !seen.insert(target.name.as_str()) {
        return Err(ManifestError::DuplicateTarget(target.name.clone()));
      }
    }

    for target in &self.targets {
      for dependency in &target.depends {
        if !seen.contains(dependency.as_str()) {
          return Err(ManifestError::UnknownDependency {
            target: target.name.clone(),
            dependency: dependency.clone(),
          });
        }
      }
    }

    if let Some(default) = &self.default
      && !seen.contains(default.as_str())
    {
      return Err(ManifestError::UnknownDefault(default.clone()));
    }

    Ok(())
  }

  /// The configured default target name, if any.
  pub fn default_target(&self) -> Option<&str> {
    self.default.as_deref()
  }
}
