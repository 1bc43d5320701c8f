//! Target operating system model.
//!
//! Every platform-dependent decision in the workspace is keyed on
//! [`TargetOs`]. Callers detect the host once (see [`TargetOs::host`]) and
//! thread the value through renderers, deployment strategies and adapters
//! instead of re-checking `cfg!` at each call site.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Operating systems with a distinct dynamic-loader model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetOs {
    /// ELF loader (`DT_RPATH`/`DT_RUNPATH`, `LD_LIBRARY_PATH`).
    Linux,
    /// Mach-O loader (`@executable_path`, `DYLD_LIBRARY_PATH`).
    MacOs,
    /// Windows DLL search order (application directory, `PATH`).
    Windows,
}

impl TargetOs {
    /// All supported targets, in a stable order.
    pub const ALL: [Self; 3] = [Self::Linux, Self::MacOs, Self::Windows];

    /// Detect the operating system this process is running on.
    ///
    /// Returns `None` on hosts without a supported loader model.
    pub const fn host() -> Option<Self> {
        if cfg!(target_os = "linux") {
            Some(Self::Linux)
        } else if cfg!(target_os = "macos") {
            Some(Self::MacOs)
        } else if cfg!(target_os = "windows") {
            Some(Self::Windows)
        } else {
            None
        }
    }

    /// Stable identifier used in logs, reports and configuration.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::MacOs => "macos",
            Self::Windows => "windows",
        }
    }

    /// File name of the shared library loaded at runtime.
    ///
    /// `energyplusapi` becomes `libenergyplusapi.so`, `libenergyplusapi.dylib`
    /// or `energyplusapi.dll`.
    pub fn shared_library_file_name(self, stem: &str) -> String {
        match self {
            Self::Linux => format!("lib{stem}.so"),
            Self::MacOs => format!("lib{stem}.dylib"),
            Self::Windows => format!("{stem}.dll"),
        }
    }

    /// File name of the artifact a linker needs to link against the library.
    ///
    /// On Windows this is the import library, which release packages do not
    /// always ship; see [`crate::ProbeFlavor::StaticLink`].
    pub fn link_library_file_name(self, stem: &str) -> String {
        match self {
            Self::Linux | Self::MacOs => self.shared_library_file_name(stem),
            Self::Windows => format!("{stem}.lib"),
        }
    }

    /// File name of an executable target produced by the toolchain.
    pub fn executable_file_name(self, target: &str) -> String {
        match self {
            Self::Linux | Self::MacOs => target.to_string(),
            Self::Windows => format!("{target}.exe"),
        }
    }

    /// Environment variable the loader consults for extra search directories.
    pub const fn search_path_variable(self) -> &'static str {
        match self {
            Self::Linux => "LD_LIBRARY_PATH",
            Self::MacOs => "DYLD_LIBRARY_PATH",
            Self::Windows => "PATH",
        }
    }

    /// Separator between entries of a search-path variable.
    pub const fn path_list_separator(self) -> char {
        match self {
            Self::Linux | Self::MacOs => ':',
            Self::Windows => ';',
        }
    }

    /// Whether CMake generators for this target are multi-config
    /// (artifacts land in a `Release/` subdirectory).
    pub const fn uses_multi_config_generator(self) -> bool {
        matches!(self, Self::Windows)
    }

    /// Python interpreter used for script probes unless configured.
    pub const fn default_python_interpreter(self) -> &'static str {
        match self {
            Self::Linux => "python3",
            Self::MacOs => "/usr/local/bin/python3",
            Self::Windows => "python",
        }
    }

    /// Prepend `dir` to an existing search-path value.
    pub fn prepend_search_path(self, dir: &OsStr, existing: Option<&OsStr>) -> OsString {
        let mut value = OsString::from(dir);
        if let Some(rest) = existing.filter(|rest| !rest.is_empty()) {
            value.push(self.path_list_separator().to_string());
            value.push(rest);
        }
        value
    }
}

impl fmt::Display for TargetOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Linux => "Linux",
            Self::MacOs => "macOS",
            Self::Windows => "Windows",
        };
        f.pad(name)
    }
}

/// Error returned when parsing an unknown OS identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown operating system: {0} (expected linux, macos or windows)")]
pub struct UnknownOs(pub String);

impl FromStr for TargetOs {
    type Err = UnknownOs;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            "macos" | "mac" | "darwin" => Ok(Self::MacOs),
            "windows" | "win" => Ok(Self::Windows),
            other => Err(UnknownOs(other.to_string())),
        }
    }
}
