use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cmd;
mod output;

use output::OutputFormat;

/// anvil - declarative build-task orchestrator
#[derive(Parser)]
#[command(name = "anvil")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Target to run (defaults to the build file's default target)
  target: Option<String>,

  /// Path to the build description file
  #[arg(short, long, default_value = "anvil.toml")]
  file: PathBuf,

  /// List available targets instead of running
  #[arg(short, long)]
  list: bool,

  /// Output format for --list
  #[arg(long, value_enum, default_value = "text")]
  format: OutputFormat,

  /// Resolve and print the execution plan without running it
  #[arg(long)]
  dry_run: bool,

  /// Enable verbose output
  #[arg(short, long)]
  verbose: bool,
}

fn main() {
  let cli = Cli::parse();

  let default_filter = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
    )
    .without_time()
    .init();

  let result = if cli.list {
    cmd::cmd_list(&cli.file, cli.format)
  } else {
    cmd::cmd_run(&cli.file, cli.target.as_deref(), cli.dry_run)
  };

  if let Err(err) = result {
    output::print_error(&format!("{:#}", err));
    std::process::exit(1);
  }
}
