//! Target graph and plan resolution.
//!
//! The graph owns all targets from the build description and resolves a
//! requested target name into an ordered, deduplicated execution plan:
//! a depth-first post-order walk in which every dependency appears
//! strictly before its dependents and each target appears at most once,
//! however many paths reach it.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::manifest::{Manifest, TargetDef};

use super::types::{ExecuteError, ResolvedPlan};

/// The immutable set of named targets for one invocation.
#[derive(Debug)]
pub struct TargetGraph {
  targets: Vec<TargetDef>,
  index: HashMap<String, usize>,
}

impl TargetGraph {
  /// Build a graph from a target list.
  ///
  /// # Errors
  ///
  /// Returns `DuplicateTarget` if two targets share a name.
  pub fn new(targets: Vec<TargetDef>) -> Result<Self, ExecuteError> {
    let mut index = HashMap::with_capacity(targets.len());
    for (position, target) in targets.iter().enumerate() {
      if index.insert(target.name.clone(), position).is_some() {
        return Err(ExecuteError::DuplicateTarget(target.name.clone()));
      }
    }
    Ok(Self { targets, index })
  }

  /// Build a graph from a loaded build description.
  pub fn from_manifest(manifest: &Manifest) -> Result<Self, ExecuteError> {
    Self::new(manifest.targets.clone())
  }

  /// Look up a target by name.
  ///
  /// # Errors
  ///
  /// Returns `UnknownTarget` if no target has that name.
  pub fn get(&self, name: &str) -> Result<&TargetDef, ExecuteError> {
    self
      .index
      .get(name)
      .map(|&position| &self.targets[position])
      .ok_or_else(|| ExecuteError::UnknownTarget(name.to_string()))
  }

  /// The direct dependency names declared on a target (not transitive).
  pub fn dependencies(&self, name: &str) -> Result<&[String], ExecuteError> {
    Ok(&self.get(name)?.depends)
  }

  /// All target names, in declaration order.
  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.targets.iter().map(|t| t.name.as_str())
  }

  /// Number of targets in the graph.
  pub fn len(&self) -> usize {
    self.targets.len()
  }

  pub fn is_empty(&self) -> bool {
    self.targets.is_empty()
  }

  /// Resolve a target into its execution plan.
  ///
  /// Depth-first expansion: each dependency's own subtree resolves (in
  /// declared order) before the dependency is appended, and the
  /// requested target is appended last. The order is deterministic for
  /// a fixed graph.
  ///
  /// # Errors
  ///
  /// Returns `UnknownTarget` for a name the graph does not hold and
  /// `CyclicDependency` (with the offending path) when the walk meets
  /// a target that is still in progress.
  pub fn resolve(&self, name: &str) -> Result<ResolvedPlan, ExecuteError> {
    let mut plan = Vec::new();
    let mut done = HashSet::new();
    let mut in_progress = Vec::new();

    self.visit(name, &mut in_progress, &mut done, &mut plan)?;

    debug!(target = %name, steps = plan.len(), "resolved plan");
    Ok(ResolvedPlan::new(plan))
  }

  fn visit(
    &self,
    name: &str,
    in_progress: &mut Vec<String>,
    done: &mut HashSet<String>,
    plan: &mut Vec<String>,
  ) -> Result<(), ExecuteError> {
    if done.contains(name) {
      return Ok(());
    }

    if let Some(position) = in_progress.iter().position(|n| n == name) {
      let mut cycle: Vec<String> = in_progress[position..].to_vec();
      cycle.push(name.to_string());
      return Err(ExecuteError::CyclicDependency { cycle });
    }

    let target = self.get(name)?;

    in_progress.push(name.to_string());
    for dependency in &target.depends {
      self.visit(dependency, in_progress, done, plan)?;
    }
    in_progress.pop();

    done.insert(name.to_string());
    plan.push(name.to_string());
    Ok(())
  }
}
