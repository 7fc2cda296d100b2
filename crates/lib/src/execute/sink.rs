//! Output sink for informational build output.
//!
//! Message actions, target headers, and compile-check diagnostics go
//! through a [`Sink`] rather than the logger, so callers decide where
//! build output lands.

use std::io::Write;

/// Line-oriented output collaborator.
pub trait Sink {
  /// Write one informational line.
  fn write_line(&mut self, line: &str) -> std::io::Result<()>;
}

/// Sink writing to the process's standard output.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl Sink for StdoutSink {
  fn write_line(&mut self, line: &str) -> std::io::Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", line)
  }
}

/// Sink buffering lines in memory.
#[derive(Debug, Default)]
pub struct CollectSink {
  pub lines: Vec<String>,
}

impl CollectSink {
  pub fn new() -> Self {
    Self::default()
  }
}

impl Sink for CollectSink {
  fn write_line(&mut self, line: &str) -> std::io::Result<()> {
    self.lines.push(line.to_string());
    Ok(())
  }
}
