//! Process-backed adapters for the `loadcheck-core` ports.
//!
//! - [`CmakeToolchain`] builds rendered probe projects with `cmake`.
//! - [`ProcessProbeRunner`] launches built probes and captures their output.
#![deny(unsafe_code)]

pub mod cmake;
mod process;

pub use cmake::{CmakeConfig, CmakeToolchain, DEFAULT_CMAKE_PROGRAM, MACOS_TOOL_PREFIX};
pub use process::ProcessProbeRunner;
