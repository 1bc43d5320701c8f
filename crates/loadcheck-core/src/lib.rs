//! Core of `loadcheck`: verifies that an installed shared library can be
//! loaded at run time by a freshly built consumer program.
//!
//! The crate renders probe programs, arranges deployments and sequences
//! loader test cases. Building and running processes happens behind the
//! [`BuildToolchain`] and [`ProbeRunner`] ports, implemented in
//! `loadcheck-runtime`.
#![deny(unused_crate_dependencies)]

pub mod config;
pub mod deploy;
pub mod domain;
pub mod error;
pub mod platform;
pub mod ports;
pub mod render;
pub mod services;

pub use config::{
    Bitness, ConfigError, DEFAULT_MSVC_VERSION, MsvcVersion, ProbeSelection, RunConfiguration,
};
pub use deploy::{
    CleanupFailure, DeployError, Deployment, DeploymentContext, DeploymentStrategy,
    applicable_strategies,
};
pub use domain::{
    BuildDescriptor, BuiltBinary, DEFAULT_TARGET_NAME, ENERGYPLUS_COMPANIONS, ENERGYPLUS_ENTRY_SYMBOL,
    ENERGYPLUS_LIBRARY_STEM, ENERGYPLUS_PYTHON_MODULE, ExecutionOutcome, Language, LinkDirective,
    ProbeFlavor, ProbeSpecification, ScriptBinding, TestCaseResult,
};
pub use error::LoaderTestError;
pub use platform::{TargetOs, UnknownOs};
pub use ports::{BuildToolchain, Invocation, ProbeProject, ProbeRunner, ToolchainError};
pub use render::{ProbeRenderer, RenderedProbe};
pub use services::LoaderTestCase;

#[cfg(test)]
use mockall as _;
