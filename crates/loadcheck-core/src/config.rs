//! Run configurations and toolchain selection.
//!
//! A run configuration names the packaging target an installation was
//! built for (`ubuntu2004`, `mac11`, `win64`, ...). The host OS always
//! drives the loader tests; the configuration contributes bitness and the
//! Visual Studio generator on Windows.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::ProbeFlavor;
use crate::platform::TargetOs;

/// Default Visual Studio major version when none is given.
pub const DEFAULT_MSVC_VERSION: u32 = 16;

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown run configuration '{0}' (expected one of: {known})", known = RunConfiguration::known_keys())]
    UnknownConfiguration(String),

    #[error("MSVC version can only be set for Windows configurations, not '{0}'")]
    MsvcOnNonWindows(String),

    #[error("MSVC version must be an integer, got '{0}'")]
    MsvcNotInteger(String),

    #[error("Unsupported MSVC version {0} (supported: 15, 16, 17)")]
    UnsupportedMsvc(u32),

    #[error("Unknown probe selection '{0}' (expected all, static, delayed or python)")]
    UnknownProbeSelection(String),
}

/// Pointer width of the packaged build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bitness {
    X86,
    X64,
}

impl Bitness {
    /// Value for CMake's `-A` platform option.
    pub const fn cmake_platform(self) -> &'static str {
        match self {
            Self::X86 => "Win32",
            Self::X64 => "x64",
        }
    }
}

impl fmt::Display for Bitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::X86 => "x86",
            Self::X64 => "x64",
        })
    }
}

/// One known packaging target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunConfiguration {
    pub key: &'static str,
    pub os: TargetOs,
    pub bitness: Bitness,
    pub os_version: &'static str,
}

const CONFIGURATIONS: &[RunConfiguration] = &[
    RunConfiguration {
        key: "ubuntu1804",
        os: TargetOs::Linux,
        bitness: Bitness::X64,
        os_version: "18.04",
    },
    RunConfiguration {
        key: "ubuntu2004",
        os: TargetOs::Linux,
        bitness: Bitness::X64,
        os_version: "20.04",
    },
    RunConfiguration {
        key: "mac1015",
        os: TargetOs::MacOs,
        bitness: Bitness::X64,
        os_version: "10.15",
    },
    RunConfiguration {
        key: "mac11",
        os: TargetOs::MacOs,
        bitness: Bitness::X64,
        os_version: "11",
    },
    RunConfiguration {
        key: "win32",
        os: TargetOs::Windows,
        bitness: Bitness::X86,
        os_version: "10",
    },
    RunConfiguration {
        key: "win64",
        os: TargetOs::Windows,
        bitness: Bitness::X64,
        os_version: "10",
    },
];

impl RunConfiguration {
    pub const fn all() -> &'static [Self] {
        CONFIGURATIONS
    }

    /// Look up a configuration by key (case-insensitive).
    pub fn find(key: &str) -> Result<Self, ConfigError> {
        CONFIGURATIONS
            .iter()
            .find(|c| c.key.eq_ignore_ascii_case(key.trim()))
            .copied()
            .ok_or_else(|| ConfigError::UnknownConfiguration(key.to_string()))
    }

    /// Comma-separated list of every known key.
    pub fn known_keys() -> String {
        CONFIGURATIONS
            .iter()
            .map(|c| c.key)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Resolve the MSVC version for this configuration.
    ///
    /// Non-Windows configurations reject any explicit value. Windows
    /// configurations fall back to [`DEFAULT_MSVC_VERSION`].
    pub fn msvc_version(&self, requested: Option<&str>) -> Result<Option<MsvcVersion>, ConfigError> {
        if self.os != TargetOs::Windows {
            return match requested {
                Some(_) => Err(ConfigError::MsvcOnNonWindows(self.key.to_string())),
                None => Ok(None),
            };
        }
        let version = match requested {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::MsvcNotInteger(raw.to_string()))?,
            None => DEFAULT_MSVC_VERSION,
        };
        MsvcVersion::new(version).map(Some)
    }
}

impl fmt::Display for RunConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {}, {})", self.key, self.os, self.os_version, self.bitness)
    }
}

/// A supported Visual Studio major version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MsvcVersion(u32);

impl MsvcVersion {
    /// [`DEFAULT_MSVC_VERSION`].
    pub const DEFAULT: Self = Self(DEFAULT_MSVC_VERSION);

    pub const fn new(version: u32) -> Result<Self, ConfigError> {
        match version {
            15..=17 => Ok(Self(version)),
            other => Err(ConfigError::UnsupportedMsvc(other)),
        }
    }

    pub const fn major(self) -> u32 {
        self.0
    }

    /// CMake configure arguments selecting the Visual Studio generator.
    pub fn generator_args(self, bitness: Bitness) -> Vec<String> {
        match self.0 {
            15 => {
                let mut generator = "Visual Studio 15 2017".to_string();
                if bitness == Bitness::X64 {
                    generator.push_str(" Win64");
                }
                vec!["-G".to_string(), generator]
            }
            major => {
                let year = if major == 16 { 2019 } else { 2022 };
                vec![
                    "-G".to_string(),
                    format!("Visual Studio {major} {year}"),
                    "-A".to_string(),
                    bitness.cmake_platform().to_string(),
                ]
            }
        }
    }
}

/// Which probes a suite run includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeSelection {
    #[default]
    All,
    Static,
    Delayed,
    Python,
}

impl ProbeSelection {
    /// Flavors to run, in suite order.
    pub fn flavors(self) -> &'static [ProbeFlavor] {
        match self {
            Self::All => &ProbeFlavor::ALL,
            Self::Static => &[ProbeFlavor::StaticLink],
            Self::Delayed => &[ProbeFlavor::DelayedLoad],
            Self::Python => &[ProbeFlavor::Python],
        }
    }
}

impl FromStr for ProbeSelection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "static" | "static-link" => Ok(Self::Static),
            "delayed" | "delayed-load" => Ok(Self::Delayed),
            "python" => Ok(Self::Python),
            _ => Err(ConfigError::UnknownProbeSelection(s.to_string())),
        }
    }
}
