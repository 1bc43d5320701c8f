//! CLI bootstrap - the composition root.
//!
//! This module is the only place where concrete adapters are chosen:
//! - `CmakeToolchain` (via loadcheck-runtime) builds the probes
//! - `ProcessProbeRunner` (via loadcheck-runtime) runs them
//!
//! Handlers receive a [`CliContext`] and create loader test cases from it.

use std::path::PathBuf;
use std::sync::Arc;

use loadcheck_core::{
    BuildToolchain, ENERGYPLUS_COMPANIONS, ENERGYPLUS_LIBRARY_STEM, LoaderTestCase, MsvcVersion, ProbeFlavor,
    ProbeRunner, ProbeSelection, ProbeSpecification, RunConfiguration, ScriptBinding, TargetOs,
};
use loadcheck_runtime::{CmakeConfig, CmakeToolchain, ProcessProbeRunner};
use tracing::{debug, warn};

use crate::commands::RunArgs;
use crate::error::CliError;

/// Resolved configuration for a `run` invocation.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub install_dir: PathBuf,
    pub run_config: RunConfiguration,
    /// Operating system of this machine; drives every test case.
    pub host_os: TargetOs,
    pub msvc: Option<MsvcVersion>,
    pub cmake: CmakeConfig,
    /// Interpreter for the Python probe; the platform default when `None`.
    pub python: Option<PathBuf>,
    pub library: String,
    pub symbol: String,
    pub companions: Vec<String>,
    pub selection: ProbeSelection,
    pub keep_build_dirs: bool,
    pub scratch_dir: Option<PathBuf>,
    pub json: bool,
}

impl CliConfig {
    /// Resolve `args` against the current host.
    pub fn from_args(args: &RunArgs) -> Result<Self, CliError> {
        let host_os = TargetOs::host()
            .ok_or_else(|| CliError::Config("This operating system is not supported".to_string()))?;
        Self::resolve(args, host_os)
    }

    /// Resolve `args` as if running on `host_os`.
    pub fn resolve(args: &RunArgs, host_os: TargetOs) -> Result<Self, CliError> {
        let run_config = RunConfiguration::find(&args.run_config)?;
        let mut msvc = run_config.msvc_version(args.msvc_version.as_deref())?;

        if run_config.os != host_os {
            warn!(
                "Run configuration {} targets {} but this host is {}; testing as {}",
                run_config.key, run_config.os, host_os, host_os
            );
        }
        // Probes are always built with a multi-config Visual Studio generator on Windows.
        if host_os == TargetOs::Windows && msvc.is_none() {
            msvc = Some(MsvcVersion::DEFAULT);
        }

        let mut cmake = CmakeConfig::for_target(host_os, run_config.bitness, msvc)
            .with_program(&args.cmake);
        if let Some(prefix) = &args.tool_path {
            cmake = cmake.with_path_prefix(Some(prefix.clone()));
        }

        let companions = args.companions.clone().unwrap_or_else(|| {
            if args.library == ENERGYPLUS_LIBRARY_STEM {
                ENERGYPLUS_COMPANIONS.iter().map(ToString::to_string).collect()
            } else {
                Vec::new()
            }
        });

        let config = Self {
            install_dir: args.install_dir.clone(),
            run_config,
            host_os,
            msvc,
            cmake,
            python: args.python.clone(),
            library: args.library.clone(),
            symbol: args.symbol.clone(),
            companions,
            selection: args.probes,
            keep_build_dirs: args.keep_build_dirs,
            scratch_dir: args.scratch_dir.clone(),
            json: args.json,
        };
        debug!("Resolved configuration: {:?}", config);
        Ok(config)
    }

    /// Probe description for `flavor`.
    ///
    /// The EnergyPlus library is reached from Python through its bundled
    /// package; any other library through `ctypes`.
    pub fn probe_spec(&self, flavor: ProbeFlavor) -> ProbeSpecification {
        let binding = if self.library == ENERGYPLUS_LIBRARY_STEM {
            ScriptBinding::PyEnergyPlus
        } else {
            ScriptBinding::Ctypes
        };
        ProbeSpecification::new(flavor, &self.library, &self.symbol)
            .with_companions(self.companions.iter().cloned())
            .with_script_binding(binding)
    }
}

/// Composed context for CLI commands.
pub struct CliContext {
    pub config: CliConfig,
    pub toolchain: Arc<dyn BuildToolchain>,
    pub runner: Arc<dyn ProbeRunner>,
}

impl CliContext {
    /// Loader test case for `flavor` on the host.
    pub fn test_case(&self, flavor: ProbeFlavor) -> LoaderTestCase {
        let mut case = LoaderTestCase::new(
            self.config.probe_spec(flavor),
            self.config.host_os,
            Arc::clone(&self.toolchain),
            Arc::clone(&self.runner),
        )
        .keep_build_dir(self.config.keep_build_dirs);
        if let Some(dir) = &self.config.scratch_dir {
            case = case.with_scratch_root(dir);
        }
        if let Some(python) = &self.config.python {
            case = case.with_interpreter(python);
        }
        case
    }
}

/// Wire the process-backed adapters into a [`CliContext`].
pub fn bootstrap(config: CliConfig) -> CliContext {
    let toolchain = Arc::new(CmakeToolchain::new(config.cmake.clone()));
    CliContext {
        config,
        toolchain,
        runner: Arc::new(ProcessProbeRunner::new()),
    }
}
