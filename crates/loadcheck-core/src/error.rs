//! Error types for loader test cases.
//!
//! Every fatal kind aborts the test case and reaches the caller as a typed
//! value; nothing is retried. Cleanup problems are not errors here, see
//! [`CleanupFailure`](crate::deploy::CleanupFailure).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::deploy::{DeployError, DeploymentStrategy};
use crate::domain::{ExecutionOutcome, ProbeFlavor};
use crate::platform::TargetOs;
use crate::ports::ToolchainError;

/// Why a loader test case did not pass.
#[derive(Debug, Error)]
pub enum LoaderTestError {
    /// The probe flavor cannot be verified on this OS (no applicable
    /// strategies, or the flavor cannot be built there).
    #[error("{flavor} probe is not supported on {os}")]
    UnsupportedPlatformConfiguration { flavor: ProbeFlavor, os: TargetOs },

    /// The installation directory does not exist.
    #[error("Installation directory not found: {0}")]
    InstallPathNotFound(PathBuf),

    /// The temporary probe project could not be prepared.
    #[error("Failed to prepare probe project in {path}: {source}")]
    Workspace {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The toolchain could not build the probe.
    #[error("Probe build failed: {0}")]
    BuildFailure(#[from] ToolchainError),

    /// A strategy's filesystem arrangement could not be set up.
    #[error("Could not deploy {strategy}: {source}")]
    DeploymentFailure {
        strategy: DeploymentStrategy,
        #[source]
        source: DeployError,
    },

    /// The probe did not start or exited unsuccessfully under `strategy`.
    #[error("Probe failed under {strategy}: {}", .outcome.status_summary())]
    ProbeExecutionFailure {
        strategy: DeploymentStrategy,
        outcome: Box<ExecutionOutcome>,
        /// Outcomes of the strategies that passed before this one, in order.
        attempted: Vec<ExecutionOutcome>,
    },
}

impl LoaderTestError {
    /// Strategy that failed, for failures tied to one strategy.
    pub const fn failed_strategy(&self) -> Option<DeploymentStrategy> {
        match self {
            Self::DeploymentFailure { strategy, .. } | Self::ProbeExecutionFailure { strategy, .. } => {
                Some(*strategy)
            }
            _ => None,
        }
    }

    /// Captured output that explains the failure, when available.
    pub fn diagnostic_output(&self) -> Option<String> {
        match self {
            Self::BuildFailure(err) => err.output().map(str::to_string),
            Self::ProbeExecutionFailure { outcome, .. } => Some(outcome.combined_output()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_failure_message_names_strategy() {
        let outcome = ExecutionOutcome::completed(
            DeploymentStrategy::ExtendSearchPathEnvironment,
            Some(1),
            "",
            "Cannot get function initializeFunctionalAPI",
            std::time::Duration::ZERO,
        );
        let err = LoaderTestError::ProbeExecutionFailure {
            strategy: DeploymentStrategy::ExtendSearchPathEnvironment,
            outcome: Box::new(outcome),
            attempted: Vec::new(),
        };
        assert_eq!(
            err.to_string(),
            "Probe failed under ExtendSearchPathEnvironment: exit code 1"
        );
        assert_eq!(
            err.failed_strategy(),
            Some(DeploymentStrategy::ExtendSearchPathEnvironment)
        );
        assert!(err.diagnostic_output().unwrap().contains("Cannot get function"));
    }

    #[test]
    fn test_unsupported_message() {
        let err = LoaderTestError::UnsupportedPlatformConfiguration {
            flavor: ProbeFlavor::StaticLink,
            os: TargetOs::Windows,
        };
        assert_eq!(err.to_string(), "static-link probe is not supported on Windows");
        assert_eq!(err.failed_strategy(), None);
    }
}
