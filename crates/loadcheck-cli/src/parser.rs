//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for the shared library load checker.
#[derive(Parser)]
#[command(name = "loadcheck")]
#[command(about = "Verify that an installed shared library can be loaded by a freshly built program")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output (RUST_LOG takes precedence)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}
