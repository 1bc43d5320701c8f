//! Probe runner trait definition.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::deploy::DeploymentStrategy;
use crate::domain::ExecutionOutcome;

/// How to start the probe under one deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Strategy this invocation belongs to, echoed in the outcome.
    pub strategy: DeploymentStrategy,
    pub program: PathBuf,
    pub args: Vec<OsString>,
    /// Working directory of the child; inherits the parent's when `None`.
    pub working_dir: Option<PathBuf>,
    /// Environment overrides applied to the child only.
    pub env: Vec<(OsString, OsString)>,
}

impl Invocation {
    pub fn new(strategy: DeploymentStrategy, program: impl Into<PathBuf>) -> Self {
        Self {
            strategy,
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            env: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

/// Executes a built probe and reports how it ended.
///
/// Implementations block until the child exits and never impose a timeout.
/// Failure to start is reported as an unsuccessful outcome, not an error,
/// so every attempt produces exactly one [`ExecutionOutcome`].
pub trait ProbeRunner: Send + Sync {
    fn execute(&self, invocation: &Invocation) -> ExecutionOutcome;
}
