//! CLI-specific error types and mappings.
//!
//! Maps core and configuration errors to exit codes and user-facing
//! messages.

use loadcheck_core::{ConfigError, LoaderTestError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// The library did not load, or a probe could not be built or deployed.
    #[error("Verification failed: {0}")]
    Verification(String),

    /// Argument error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (temporary directories, report output).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: Verification failure
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 74, 78: see sysexits.h
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Verification(_) => 1,
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
        }
    }
}

impl From<LoaderTestError> for CliError {
    fn from(err: LoaderTestError) -> Self {
        match err {
            LoaderTestError::UnsupportedPlatformConfiguration { .. } => Self::Config(err.to_string()),
            LoaderTestError::InstallPathNotFound(_) => Self::Arguments(err.to_string()),
            LoaderTestError::Workspace { .. } => Self::Io(err.to_string()),
            LoaderTestError::BuildFailure(_)
            | LoaderTestError::DeploymentFailure { .. }
            | LoaderTestError::ProbeExecutionFailure { .. } => Self::Verification(err.to_string()),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Io(format!("Failed to serialize report: {err}"))
    }
}
