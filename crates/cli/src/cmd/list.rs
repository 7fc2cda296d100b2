//! Implementation of the `anvil --list` invocation (introspection).
//!
//! Prints every target name with its description, marking the default
//! target; `--format json` emits the same data for scripted use.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use anvil_lib::manifest::Manifest;

use crate::output::{self, OutputFormat};

#[derive(Serialize)]
struct TargetRow<'a> {
  name: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  description: Option<&'a str>,
  depends: &'a [String],
  default: bool,
}

/// Execute the list command.
pub fn cmd_list(file: &Path, format: OutputFormat) -> Result<()> {
  let manifest = Manifest::load(file).context("failed to load build description")?;
  let default = manifest.default_target();

  if format.is_json() {
    let rows: Vec<TargetRow<'_>> = manifest
      .targets
      .iter()
      .map(|target| TargetRow {
        name: &target.name,
        description: target.description.as_deref(),
        depends: &target.depends,
        default: Some(target.name.as_str()) == default,
      })
      .collect();
    return output::print_json(&rows);
  }

  if manifest.targets.is_empty() {
    output::print_warning("build file declares no targets");
    return Ok(());
  }

  output::print_info(&format!("{} target(s)", manifest.targets.len()));
  for target in &manifest.targets {
    let marker = if Some(target.name.as_str()) == default { "*" } else { " " };
    match &target.description {
      Some(description) => println!("  {} {:<16} {}", marker, target.name, description),
      None => println!("  {} {}", marker, target.name),
    }
  }

  Ok(())
}
