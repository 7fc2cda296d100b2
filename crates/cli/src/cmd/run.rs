//! Implementation of the `anvil [TARGET]` invocation.
//!
//! Loads the build description, resolves the requested (or default)
//! target into a plan, and executes it. With `--dry-run` the plan is
//! printed instead of executed.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::info;

use anvil_lib::execute::actions::compile::DEFAULT_CHECK_COMMAND;
use anvil_lib::execute::{CommandChecker, Executor, StdoutSink, TargetGraph};
use anvil_lib::manifest::Manifest;
use anvil_lib::property::PropertyStore;

use crate::output;

/// Execute the run command.
///
/// Resolves `target` (or the build file's default) into a dependency-
/// ordered plan and runs it to completion, printing a summary with the
/// executed and skipped target counts.
pub fn cmd_run(file: &Path, target: Option<&str>, dry_run: bool) -> Result<()> {
  let manifest = Manifest::load(file).context("failed to load build description")?;

  let requested = match target.or(manifest.default_target()) {
    Some(name) => name.to_string(),
    None => bail!("no target given and the build file declares no default"),
  };

  let base_dir = base_dir_of(file);
  let graph = TargetGraph::from_manifest(&manifest)?;
  let plan = graph.resolve(&requested)?;

  if dry_run {
    output::print_info(&format!("plan for '{}' ({} target(s))", requested, plan.len()));
    for (index, name) in plan.targets().iter().enumerate() {
      println!("  {}. {}", index + 1, name);
    }
    return Ok(());
  }

  let props = PropertyStore::from_map(manifest.properties.clone());
  let mut checker = CommandChecker::new(props.get("compiler").unwrap_or(DEFAULT_CHECK_COMMAND));
  if let Some(extension) = props.get("source-extension") {
    checker = checker.with_extension(extension);
  }

  info!(target = %requested, steps = plan.len(), "running plan");

  let started = Instant::now();
  let mut sink = StdoutSink;
  let mut executor = Executor::new(&graph, props, &base_dir, &checker, &mut sink);
  let report = executor.run(&plan)?;

  println!();
  output::print_success(&format!(
    "{} finished in {}",
    requested,
    output::format_duration(started.elapsed())
  ));
  output::print_stat("executed", &report.executed.len().to_string());
  output::print_stat("skipped", &report.skipped.len().to_string());

  Ok(())
}

/// Directory the build file lives in; relative action paths resolve
/// against it.
fn base_dir_of(file: &Path) -> PathBuf {
  match file.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
    _ => PathBuf::from("."),
  }
}
