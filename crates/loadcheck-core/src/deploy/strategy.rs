//! Deployment strategy variants and the per-platform applicability table.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{DeployError, Deployment};
use crate::domain::{BuiltBinary, ProbeFlavor};
use crate::platform::TargetOs;
use crate::ports::Invocation;

/// One arrangement of binary, library and environment that a real consumer
/// might use to resolve the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStrategy {
    /// Copy the library (and companions) next to the built binary.
    /// Exercises Mach-O `@executable_path` resolution.
    ColocateLibraryWithBinary,
    /// Copy the built binary into the installation directory and run it there.
    /// Exercises "same directory as the dependent" resolution.
    ColocateBinaryWithLibrary,
    /// Prepend the installation directory to the child's search-path variable.
    ExtendSearchPathEnvironment,
    /// Run the binary from its build location without copying anything.
    RunInPlace,
    /// Run the binary unmodified with the installation directory as working
    /// directory (static-link probes).
    RunFromInstallDirectory,
    /// Hand the probe script to the configured interpreter, with the
    /// installation directory as working directory.
    RunWithInterpreter,
}

/// Which strategies run, in order, for each flavor and OS.
///
/// This is the single place platform loader knowledge lives. A pair with
/// no entry (or an empty list) is unsupported.
const APPLICABILITY: &[(ProbeFlavor, TargetOs, &[DeploymentStrategy])] = &[
    (
        ProbeFlavor::DelayedLoad,
        TargetOs::Linux,
        &[DeploymentStrategy::RunInPlace],
    ),
    (
        ProbeFlavor::DelayedLoad,
        TargetOs::MacOs,
        &[
            DeploymentStrategy::ColocateLibraryWithBinary,
            DeploymentStrategy::ColocateBinaryWithLibrary,
        ],
    ),
    (
        ProbeFlavor::DelayedLoad,
        TargetOs::Windows,
        &[
            DeploymentStrategy::ExtendSearchPathEnvironment,
            DeploymentStrategy::ColocateBinaryWithLibrary,
        ],
    ),
    (
        ProbeFlavor::StaticLink,
        TargetOs::Linux,
        &[DeploymentStrategy::RunFromInstallDirectory],
    ),
    (
        ProbeFlavor::StaticLink,
        TargetOs::MacOs,
        &[DeploymentStrategy::RunFromInstallDirectory],
    ),
    (ProbeFlavor::StaticLink, TargetOs::Windows, &[]),
    (
        ProbeFlavor::Python,
        TargetOs::Linux,
        &[DeploymentStrategy::RunWithInterpreter],
    ),
    // The embedded runtime is found through `@executable_path`, which is
    // the interpreter's directory here.
    (ProbeFlavor::Python, TargetOs::MacOs, &[]),
    (
        ProbeFlavor::Python,
        TargetOs::Windows,
        &[DeploymentStrategy::RunWithInterpreter],
    ),
];

/// Strategies to attempt for `flavor` on `os`, in their fixed order.
pub fn applicable_strategies(flavor: ProbeFlavor, os: TargetOs) -> &'static [DeploymentStrategy] {
    for (f, o, strategies) in APPLICABILITY {
        if *f == flavor && *o == os {
            return *strategies;
        }
    }
    &[]
}

/// Inputs a strategy needs to arrange its deployment.
#[derive(Debug, Clone)]
pub struct DeploymentContext<'a> {
    pub os: TargetOs,
    pub binary: &'a BuiltBinary,
    pub install_dir: &'a Path,
    /// File names (relative to `install_dir`) that travel with the library.
    pub library_files: &'a [String],
    /// Current value of the search-path variable, inherited by the child.
    pub inherited_search_path: Option<OsString>,
    /// Interpreter for script probes.
    pub interpreter: &'a Path,
}

impl DeploymentStrategy {
    /// Every variant, for reporting and parsing.
    pub const ALL: [Self; 6] = [
        Self::ColocateLibraryWithBinary,
        Self::ColocateBinaryWithLibrary,
        Self::ExtendSearchPathEnvironment,
        Self::RunInPlace,
        Self::RunFromInstallDirectory,
        Self::RunWithInterpreter,
    ];

    /// Stable `snake_case` identifier.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ColocateLibraryWithBinary => "colocate_library_with_binary",
            Self::ColocateBinaryWithLibrary => "colocate_binary_with_library",
            Self::ExtendSearchPathEnvironment => "extend_search_path_environment",
            Self::RunInPlace => "run_in_place",
            Self::RunFromInstallDirectory => "run_from_install_directory",
            Self::RunWithInterpreter => "run_with_interpreter",
        }
    }

    /// Arrange the filesystem for this strategy.
    ///
    /// The returned [`Deployment`] owns every file created here and removes
    /// them when released or dropped. If an arrangement step fails, files
    /// already copied are removed before the error is returned.
    pub fn deploy(self, ctx: &DeploymentContext<'_>) -> Result<Deployment, DeployError> {
        let binary_dir = ctx
            .binary
            .path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| DeployError::InvalidBinaryPath(ctx.binary.path.clone()))?;

        let deployment = match self {
            Self::ColocateLibraryWithBinary => {
                let mut deployment = Deployment::new(Invocation::new(self, &ctx.binary.path));
                let files: Vec<(PathBuf, PathBuf)> = ctx
                    .library_files
                    .iter()
                    .map(|name| (ctx.install_dir.join(name), binary_dir.join(name)))
                    .collect();
                deployment.copy_all(&files)?;
                deployment
            }
            Self::ColocateBinaryWithLibrary => {
                let file_name = ctx
                    .binary
                    .path
                    .file_name()
                    .ok_or_else(|| DeployError::InvalidBinaryPath(ctx.binary.path.clone()))?;
                let target = ctx.install_dir.join(file_name);
                let mut deployment = Deployment::new(
                    Invocation::new(self, &target).with_working_dir(ctx.install_dir),
                );
                deployment.copy_all(&[(ctx.binary.path.clone(), target)])?;
                deployment
            }
            Self::ExtendSearchPathEnvironment => {
                let variable = ctx.os.search_path_variable();
                let value = ctx.os.prepend_search_path(
                    ctx.install_dir.as_os_str(),
                    ctx.inherited_search_path.as_deref(),
                );
                Deployment::new(Invocation::new(self, &ctx.binary.path).with_env(variable, value))
            }
            Self::RunInPlace => Deployment::new(
                Invocation::new(self, &ctx.binary.path).with_working_dir(&binary_dir),
            ),
            Self::RunFromInstallDirectory => Deployment::new(
                Invocation::new(self, &ctx.binary.path).with_working_dir(ctx.install_dir),
            ),
            Self::RunWithInterpreter => Deployment::new(
                Invocation::new(self, ctx.interpreter)
                    .with_arg(&ctx.binary.path)
                    .with_working_dir(ctx.install_dir),
            ),
        };

        debug!(
            strategy = %self,
            program = %deployment.invocation().program.display(),
            copies = deployment.created().len(),
            "Deployment arranged"
        );
        Ok(deployment)
    }
}

impl fmt::Display for DeploymentStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ColocateLibraryWithBinary => "ColocateLibraryWithBinary",
            Self::ColocateBinaryWithLibrary => "ColocateBinaryWithLibrary",
            Self::ExtendSearchPathEnvironment => "ExtendSearchPathEnvironment",
            Self::RunInPlace => "RunInPlace",
            Self::RunFromInstallDirectory => "RunFromInstallDirectory",
            Self::RunWithInterpreter => "RunWithInterpreter",
        };
        f.pad(name)
    }
}
