mod cmd;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::{cmd_schema, cmd_serve};
use crate::output::print_error;

/// Terraform-style provider managing text files and single-file zip archives
/// inside a base directory.
#[derive(Parser)]
#[command(name = "terraform-provider-localfile")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging on stderr
  #[arg(long, global = true)]
  debug: bool,

  /// Base directory for all file operations. Configures the provider up
  /// front; otherwise the host must send a configure request.
  #[arg(long, global = true, value_name = "PATH")]
  base_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Serve provider requests as JSON lines on stdin/stdout (default)
  Serve,
  /// Print the provider, resource and data source schemas as JSON
  Schema,
}

fn init_tracing(debug: bool) {
  let default_level = if debug { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.debug);

  let result = match cli.command.unwrap_or(Commands::Serve) {
    Commands::Serve => cmd_serve(cli.base_dir.as_deref()),
    Commands::Schema => cmd_schema(),
  };

  if let Err(e) = result {
    print_error(&format!("{:#}", e));
    std::process::exit(1);
  }
}
