//! End-to-end engine tests: build description in, executed plan out.
//!
//! These exercise the whole pipeline (TOML load, graph resolution,
//! guarded execution, action side effects) without going through the
//! CLI binary.

use tempfile::TempDir;

use anvil_lib::execute::{CollectSink, CommandChecker, Executor, TargetGraph};
use anvil_lib::manifest::Manifest;
use anvil_lib::property::PropertyStore;

const BUILD_FILE: &str = r#"
default = "usage"

[properties]
project = "ion"
build-dir = "build"

[[targets]]
name = "usage"
description = "Print available targets"

[[targets.actions]]
kind = "message"
text = "${project} build targets: init, clean, clean-all"

[[targets]]
name = "init"

[[targets.actions]]
kind = "timestamp"

[[targets.actions]]
kind = "set-property"
name = "have-build-dir"

[targets.actions.condition]
kind = "dir-exists"
path = "${build-dir}"

[[targets]]
name = "clean"
depends = ["init"]
description = "Remove compiled artifacts"

[[targets.actions]]
kind = "delete-files"
pattern = "**/*.pyc"
base_dir = "."

[[targets]]
name = "clean-all"
depends = ["init", "clean"]
description = "Also remove the build directory"

[targets.guard]
kind = "property-set"
name = "have-build-dir"

[[targets.actions]]
kind = "delete-dir"
path = "${build-dir}"

[[targets.actions]]
kind = "message"
text = "removed ${build-dir} on ${dstamp}"
"#;

struct Project {
  temp: TempDir,
  manifest: Manifest,
}

impl Project {
  fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("anvil.toml");
    std::fs::write(&path, BUILD_FILE).unwrap();
    let manifest = Manifest::load(&path).unwrap();
    Self { temp, manifest }
  }

  fn touch(&self, relative: &str) {
    let path = self.temp.path().join(relative);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, "x").unwrap();
  }

  fn run(&self, target: &str) -> (anvil_lib::execute::RunReport, Vec<String>) {
    let graph = TargetGraph::from_manifest(&self.manifest).unwrap();
    let plan = graph.resolve(target).unwrap();
    let props = PropertyStore::from_map(self.manifest.properties.clone());
    let checker = CommandChecker::default();
    let mut sink = CollectSink::new();
    let mut executor = Executor::new(&graph, props, self.temp.path(), &checker, &mut sink);
    let report = executor.run(&plan).unwrap();
    (report, sink.lines)
  }

  fn path(&self, relative: &str) -> std::path::PathBuf {
    self.temp.path().join(relative)
  }
}

#[test]
fn default_target_emits_the_usage_message() {
  let project = Project::new();

  let (report, lines) = project.run("usage");

  assert_eq!(report.executed, vec!["usage"]);
  assert!(lines.contains(&"ion build targets: init, clean, clean-all".to_string()));
}

#[test]
fn clean_runs_init_first_and_deletes_artifacts() {
  let project = Project::new();
  project.touch("core/mod.pyc");
  project.touch("core/mod.py");

  let (report, lines) = project.run("clean");

  assert_eq!(report.executed, vec!["init", "clean"]);
  assert_eq!(lines[0], "init:");
  assert!(!project.path("core/mod.pyc").exists());
  assert!(project.path("core/mod.py").exists());
}

#[test]
fn clean_all_skips_when_build_dir_is_absent() {
  let project = Project::new();

  let (report, _) = project.run("clean-all");

  // init and clean still run; the guarded target contributes no work
  assert_eq!(report.executed, vec!["init", "clean"]);
  assert_eq!(report.skipped, vec!["clean-all"]);
}

#[test]
fn clean_all_removes_build_dir_when_present() {
  let project = Project::new();
  std::fs::create_dir(project.path("build")).unwrap();
  project.touch("build/out.o");

  let (report, lines) = project.run("clean-all");

  assert_eq!(report.executed, vec!["init", "clean", "clean-all"]);
  assert!(report.skipped.is_empty());
  assert!(!project.path("build").exists());

  // the timestamp recorded by init is visible in the final message
  let last = lines.last().unwrap();
  assert!(last.starts_with("removed build on "));
  assert_eq!(last.len(), "removed build on ".len() + 8);
}

#[test]
fn shared_init_dependency_runs_once() {
  let project = Project::new();

  let (report, lines) = project.run("clean-all");

  assert_eq!(lines.iter().filter(|l| *l == "init:").count(), 1);
  assert_eq!(report.total(), 3);
}

#[test]
fn resolving_an_undeclared_target_fails() {
  let project = Project::new();
  let graph = TargetGraph::from_manifest(&project.manifest).unwrap();

  let err = graph.resolve("dist").unwrap_err();
  assert_eq!(err.to_string(), "unknown target: dist");
}
