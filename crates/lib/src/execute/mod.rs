//! Target-graph resolution and execution.
//!
//! `dag` owns the target graph and turns a requested name into a
//! [`ResolvedPlan`]; `run` executes a plan against one invocation's
//! property store; `actions` holds the primitive operations; `sink`
//! and the [`SyntaxChecker`] trait are the seams to the output and
//! compiler collaborators.

pub mod actions;
pub mod dag;
pub mod run;
pub mod sink;
pub mod types;

pub use actions::{CommandChecker, SyntaxChecker};
pub use dag::TargetGraph;
pub use run::Executor;
pub use sink::{CollectSink, Sink, StdoutSink};
pub use types::{ActionError, CheckFailure, ExecuteError, ResolvedPlan, RunReport};
