//! `loadcheck` command-line adapter.
//!
//! Parses arguments, resolves run configuration, wires the runtime
//! adapters into the core and formats reports.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;

// Used by the binary only
use anyhow as _;
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::{Commands, RunArgs};
pub use error::CliError;
pub use parser::Cli;
