//! Streamgate CLI - Command-line interface
//!
//! Runs the addon server and exposes catalog listing and stream resolution
//! for one-off use from a terminal.

mod commands;

use std::path::PathBuf;

use clap::Parser;
use streamgate_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "streamgate")]
#[command(about = "Catalog and stream-resolution addon gateway")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,

    /// Console log level; `RUST_LOG` overrides it
    #[arg(long, value_enum, default_value_t = CliLogLevel::Info, global = true)]
    log_level: CliLogLevel,

    /// Directory for the full-trace log file
    #[arg(long, global = true)]
    logs_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_level.as_tracing_level(), cli.logs_dir.as_deref())?;

    commands::handle_command(cli.command).await
}
