//! Subcommands and their arguments.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use loadcheck_core::{ENERGYPLUS_ENTRY_SYMBOL, ENERGYPLUS_LIBRARY_STEM, ProbeSelection};
use loadcheck_runtime::DEFAULT_CMAKE_PROGRAM;

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Build probe programs against an installation and run them under
    /// every deployment strategy that applies to this platform
    Run(RunArgs),

    /// List the known run configurations
    Configs,
}

/// Arguments of the `run` command.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Installation directory containing the shared library
    #[arg(env = "LOADCHECK_INSTALL_DIR")]
    pub install_dir: PathBuf,

    /// Run configuration the installation was packaged for (e.g. ubuntu2004, mac11, win64)
    #[arg(short = 'c', long = "run-config", env = "LOADCHECK_RUN_CONFIG")]
    pub run_config: String,

    /// Visual Studio major version (Windows configurations only, default 16)
    #[arg(long = "msvc-version", env = "LOADCHECK_MSVC_VERSION")]
    pub msvc_version: Option<String>,

    /// CMake program used to build the probes
    #[arg(long, env = "LOADCHECK_CMAKE", default_value = DEFAULT_CMAKE_PROGRAM)]
    pub cmake: PathBuf,

    /// Python interpreter for the script probe (defaults to python3, or python on Windows)
    #[arg(long, env = "LOADCHECK_PYTHON")]
    pub python: Option<PathBuf>,

    /// Directory prepended to PATH while building (defaults to /usr/local/bin on macOS)
    #[arg(long = "tool-path", env = "LOADCHECK_TOOL_PATH")]
    pub tool_path: Option<PathBuf>,

    /// Library name without platform prefix or extension
    #[arg(long, env = "LOADCHECK_LIBRARY", default_value = ENERGYPLUS_LIBRARY_STEM)]
    pub library: String,

    /// Symbol the probes resolve and call
    #[arg(long, env = "LOADCHECK_SYMBOL", default_value = ENERGYPLUS_ENTRY_SYMBOL)]
    pub symbol: String,

    /// File that must travel with the library when it is copied (repeatable)
    #[arg(long = "companion", env = "LOADCHECK_COMPANIONS", value_delimiter = ',')]
    pub companions: Option<Vec<String>>,

    /// Which probes to run: all, static, delayed or python
    #[arg(long, env = "LOADCHECK_PROBES", default_value = "all")]
    pub probes: ProbeSelection,

    /// Keep temporary probe projects for inspection
    #[arg(long = "keep-build-dirs")]
    pub keep_build_dirs: bool,

    /// Create temporary probe projects under this directory
    #[arg(long = "scratch-dir", env = "LOADCHECK_SCRATCH_DIR")]
    pub scratch_dir: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}
