//! Probe specification and build artifacts.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::platform::TargetOs;

/// Library stem of the EnergyPlus C API.
pub const ENERGYPLUS_LIBRARY_STEM: &str = "energyplusapi";

/// Entry symbol exported by the EnergyPlus C API.
pub const ENERGYPLUS_ENTRY_SYMBOL: &str = "initializeFunctionalAPI";

/// Executable target name used for probes unless overridden.
pub const DEFAULT_TARGET_NAME: &str = "TestCAPIAccess";

/// Files that travel with the EnergyPlus API library on macOS.
pub const ENERGYPLUS_COMPANIONS: &[&str] = &["Python"];

/// Python package shipped in the EnergyPlus installation root.
pub const ENERGYPLUS_PYTHON_MODULE: &str = "pyenergyplus.api";

/// How the probe reaches the library under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeFlavor {
    /// Linked against the library at build time; the OS loader resolves it
    /// at process start.
    StaticLink,
    /// Opens the library by path at runtime and resolves the entry symbol.
    DelayedLoad,
    /// A Python script reaching the library through `ctypes` or the
    /// installation's own binding package. Needs no build.
    Python,
}

impl ProbeFlavor {
    /// Every flavor, in the order a full suite runs them.
    pub const ALL: [Self; 3] = [Self::StaticLink, Self::DelayedLoad, Self::Python];

    /// Source language of the generated probe.
    pub const fn language(self) -> Language {
        match self {
            Self::StaticLink => Language::C,
            Self::DelayedLoad => Language::Cpp,
            Self::Python => Language::Python,
        }
    }
}

impl fmt::Display for ProbeFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::StaticLink => "static-link",
            Self::DelayedLoad => "delayed-load",
            Self::Python => "python",
        })
    }
}

/// Probe source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    C,
    Cpp,
    Python,
}

impl Language {
    /// Extension of the generated source file.
    pub const fn source_extension(self) -> &'static str {
        match self {
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::Python => "py",
        }
    }
}

/// How a Python probe reaches the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptBinding {
    /// Load the library by absolute path with `ctypes` and call the entry symbol.
    #[default]
    Ctypes,
    /// Import `pyenergyplus.api` from the installation root and evaluate
    /// glycol properties through the functional API.
    PyEnergyPlus,
}

/// What to build and which symbol proves the library is usable.
///
/// Immutable once constructed; one per test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeSpecification {
    flavor: ProbeFlavor,
    library_stem: String,
    entry_symbol: String,
    target_name: String,
    companions: Vec<String>,
    script_binding: ScriptBinding,
}

impl ProbeSpecification {
    /// Create a specification for `library_stem` exporting `entry_symbol`.
    pub fn new(
        flavor: ProbeFlavor,
        library_stem: impl Into<String>,
        entry_symbol: impl Into<String>,
    ) -> Self {
        Self {
            flavor,
            library_stem: library_stem.into(),
            entry_symbol: entry_symbol.into(),
            target_name: DEFAULT_TARGET_NAME.to_string(),
            companions: Vec::new(),
            script_binding: ScriptBinding::default(),
        }
    }

    /// Specification for the EnergyPlus C API.
    ///
    /// On macOS the API library resolves its embedded Python runtime via
    /// `@executable_path/Python`, so `Python` travels with the library.
    /// Python probes go through the bundled `pyenergyplus` package.
    pub fn energyplus(flavor: ProbeFlavor) -> Self {
        Self::new(flavor, ENERGYPLUS_LIBRARY_STEM, ENERGYPLUS_ENTRY_SYMBOL)
            .with_companions(ENERGYPLUS_COMPANIONS.iter().copied())
            .with_script_binding(ScriptBinding::PyEnergyPlus)
    }

    /// Override the executable target name.
    #[must_use]
    pub fn with_target_name(mut self, target_name: impl Into<String>) -> Self {
        self.target_name = target_name.into();
        self
    }

    /// Files that must sit next to the library's loading executable.
    #[must_use]
    pub fn with_companions<I, S>(mut self, companions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.companions = companions.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn with_script_binding(mut self, binding: ScriptBinding) -> Self {
        self.script_binding = binding;
        self
    }

    pub const fn flavor(&self) -> ProbeFlavor {
        self.flavor
    }

    pub const fn language(&self) -> Language {
        self.flavor.language()
    }

    pub fn library_stem(&self) -> &str {
        &self.library_stem
    }

    pub fn entry_symbol(&self) -> &str {
        &self.entry_symbol
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    pub fn companions(&self) -> &[String] {
        &self.companions
    }

    pub const fn script_binding(&self) -> ScriptBinding {
        self.script_binding
    }

    /// Shared library file name on `os`.
    pub fn library_file_name(&self, os: TargetOs) -> String {
        os.shared_library_file_name(&self.library_stem)
    }

    /// Name of the generated source file (`func.c`, `func.cpp`, `func.py`).
    pub fn source_file_name(&self) -> String {
        format!("func.{}", self.language().source_extension())
    }
}

/// How the probe executable is tied to the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkDirective {
    /// Link against this artifact (escaped for the descriptor) at build time.
    Static { library: String },
    /// Link only the platform's dynamic-loading support library.
    RuntimeLoad,
    /// Nothing to build; the source runs under an interpreter.
    Interpreted,
}

/// Toolchain-independent description of the probe project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildDescriptor {
    pub project_name: String,
    pub source_file_name: String,
    pub link: LinkDirective,
    /// Artifacts land in a per-configuration subdirectory (`Release/`).
    pub multi_config: bool,
    /// Executable file name produced for the target OS.
    pub executable_file_name: String,
}

impl BuildDescriptor {
    /// Configuration built by multi-config generators.
    pub const RELEASE_CONFIG: &'static str = "Release";

    /// Whether a toolchain has to produce an executable first.
    pub fn requires_build(&self) -> bool {
        self.link != LinkDirective::Interpreted
    }

    /// Relative path of the executable inside the build directory.
    pub fn executable_relative_path(&self) -> PathBuf {
        if self.multi_config {
            PathBuf::from(Self::RELEASE_CONFIG).join(&self.executable_file_name)
        } else {
            PathBuf::from(&self.executable_file_name)
        }
    }
}

/// Executable produced by the toolchain. Read-only for every strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltBinary {
    pub path: PathBuf,
    pub os: TargetOs,
}

impl BuiltBinary {
    pub fn new(path: impl Into<PathBuf>, os: TargetOs) -> Self {
        Self {
            path: path.into(),
            os,
        }
    }
}
