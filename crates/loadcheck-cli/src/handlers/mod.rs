//! Command handlers.
//!
//! Handlers are thin: they turn resolved configuration into core calls
//! and hand the results to `presentation` for output.

pub mod configs;
pub mod run;
