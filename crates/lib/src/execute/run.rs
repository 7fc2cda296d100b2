//! Plan execution.
//!
//! The executor walks a resolved plan in order. Each target's guard is
//! evaluated fresh against the current property and filesystem state;
//! an unmet guard skips that target's actions without blocking the rest
//! of the plan. Actions run synchronously and fail fast: the first
//! failing action aborts the whole run, with no rollback of earlier
//! effects.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::condition;
use crate::property::PropertyStore;

use super::actions::{ActionContext, SyntaxChecker, execute_action};
use super::dag::TargetGraph;
use super::sink::Sink;
use super::types::{ActionError, ExecuteError, ResolvedPlan, RunReport};

/// Runs resolved plans against one invocation's shared state.
pub struct Executor<'a> {
  graph: &'a TargetGraph,
  props: PropertyStore,
  base_dir: PathBuf,
  checker: &'a dyn SyntaxChecker,
  sink: &'a mut dyn Sink,
}

impl<'a> Executor<'a> {
  pub fn new(
    graph: &'a TargetGraph,
    props: PropertyStore,
    base_dir: &Path,
    checker: &'a dyn SyntaxChecker,
    sink: &'a mut dyn Sink,
  ) -> Self {
    Self {
      graph,
      props,
      base_dir: base_dir.to_path_buf(),
      checker,
      sink,
    }
  }

  /// Current property state (configuration plus anything actions wrote).
  pub fn properties(&self) -> &PropertyStore {
    &self.props
  }

  /// Run every target in the plan, in order.
  ///
  /// # Errors
  ///
  /// Returns the first action failure, wrapped with the owning
  /// target's name. Earlier targets' filesystem effects stay in place.
  pub fn run(&mut self, plan: &ResolvedPlan) -> Result<RunReport, ExecuteError> {
    let mut report = RunReport::default();

    for name in plan.targets() {
      let target = self.graph.get(name)?;

      if let Some(guard) = &target.guard {
        let satisfied = condition::evaluate(guard, &self.props, &self.base_dir)
          .map_err(|source| ExecuteError::Action {
            target: name.clone(),
            source: ActionError::Property(source),
          })?;

        if !satisfied {
          debug!(target = %name, "guard unsatisfied, skipping");
          report.skipped.push(name.clone());
          continue;
        }
      }

      info!(target = %name, actions = target.actions.len(), "executing target");
      self.write_line(name, &format!("{}:", name))?;

      for action in &target.actions {
        debug!(target = %name, action = %action.kind(), "running action");

        let mut ctx = ActionContext {
          props: &mut self.props,
          base_dir: &self.base_dir,
          checker: self.checker,
          sink: &mut *self.sink,
        };
        execute_action(action, &mut ctx).map_err(|source| ExecuteError::Action {
          target: name.clone(),
          source,
        })?;
      }

      report.executed.push(name.clone());
    }

    Ok(report)
  }

  fn write_line(&mut self, target: &str, line: &str) -> Result<(), ExecuteError> {
    self.sink.write_line(line).map_err(|source| ExecuteError::Action {
      target: target.to_string(),
      source: ActionError::Io(source),
    })
  }
}
