//! Build toolchain port.
//!
//! The core never invokes a compiler itself. It renders a project, hands
//! it to a [`BuildToolchain`], and receives a [`BuiltBinary`] back. The
//! CLI injects the CMake adapter; tests inject fakes.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::{BuildDescriptor, BuiltBinary};
use crate::platform::TargetOs;

/// A rendered probe project on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeProject {
    /// Directory holding the descriptor and sources.
    pub source_dir: PathBuf,
    /// Out-of-source build directory (already created).
    pub build_dir: PathBuf,
    pub descriptor: BuildDescriptor,
    pub os: TargetOs,
}

impl ProbeProject {
    /// Where the toolchain is expected to place the executable.
    pub fn expected_binary_path(&self) -> PathBuf {
        self.build_dir.join(self.descriptor.executable_relative_path())
    }
}

/// Errors returned by a build toolchain.
#[derive(Debug, Error)]
pub enum ToolchainError {
    /// The toolchain program could not be started.
    #[error("Failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// A build step exited unsuccessfully.
    #[error("{step} failed ({status})")]
    StepFailed {
        step: String,
        status: String,
        /// Captured stdout and stderr of the step.
        output: String,
    },

    /// The build reported success but the executable is missing.
    #[error("Build finished but produced no executable at {0}")]
    MissingArtifact(PathBuf),

    /// Toolchain configuration is invalid for this target.
    #[error("Toolchain configuration error: {0}")]
    Configuration(String),
}

impl ToolchainError {
    /// Captured toolchain output, when there is any.
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::StepFailed { output, .. } => Some(output),
            _ => None,
        }
    }
}

/// Builds a probe project into an executable.
pub trait BuildToolchain: Send + Sync {
    fn build(&self, project: &ProbeProject) -> Result<BuiltBinary, ToolchainError>;
}
