mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{SourceArgs, cmd_config, cmd_fetch, cmd_resolve};
use output::OutputFormat;

/// pomfetch - Resolve Maven project manifests and download their dependencies
#[derive(Parser)]
#[command(name = "pomfetch")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Path to the config file (default: config.toml in the config directory)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Increase log output (-v for progress, -vv for detail)
  #[arg(short, long, global = true, action = ArgAction::Count)]
  verbose: u8,

  /// Output format
  #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  format: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Resolve a manifest and print its plugins and dependencies
  Resolve {
    #[command(flatten)]
    source: SourceArgs,
  },

  /// Resolve a manifest and download every dependency's artifacts
  Fetch {
    #[command(flatten)]
    source: SourceArgs,

    /// Base URL of the artifact repository
    #[arg(long)]
    repository: Option<String>,

    /// Directory the artifacts are written to
    #[arg(short, long)]
    output: Option<PathBuf>,
  },

  /// Print the effective configuration
  Config,
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let config = cli.config.as_deref();
  match cli.command {
    Commands::Resolve { source } => cmd_resolve(config, &source, cli.verbose > 0, cli.format),
    Commands::Fetch {
      source,
      repository,
      output,
    } => cmd_fetch(config, &source, repository, output, cli.verbose > 0, cli.format),
    Commands::Config => cmd_config(config, cli.format),
  }
}

/// `RUST_LOG` wins over the verbosity flags.
fn init_tracing(verbose: u8) {
  let level = match verbose {
    0 => "warn",
    1 => "info",
    _ => "debug",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}
