//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the core expects from infrastructure. They
//! contain no process or toolchain implementation details; adapters in
//! `loadcheck-runtime` implement them and the CLI injects them.

mod probe_runner;
mod toolchain;

pub use probe_runner::{Invocation, ProbeRunner};
pub use toolchain::{BuildToolchain, ProbeProject, ToolchainError};
