//! Domain types for loader verification.
//!
//! These are pure data types with no process or toolchain dependencies.

mod outcome;
mod probe;

pub use outcome::{ExecutionOutcome, TestCaseResult};
pub use probe::{
    BuildDescriptor, BuiltBinary, DEFAULT_TARGET_NAME, ENERGYPLUS_COMPANIONS, ENERGYPLUS_ENTRY_SYMBOL,
    ENERGYPLUS_LIBRARY_STEM, ENERGYPLUS_PYTHON_MODULE, Language, LinkDirective, ProbeFlavor,
    ProbeSpecification, ScriptBinding,
};
