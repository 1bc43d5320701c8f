//! Deployment strategies.
//!
//! Each [`DeploymentStrategy`] emulates one way a consumer places the
//! library relative to the executable that loads it. Deploying a strategy
//! yields a [`Deployment`] guard; every file it created is removed when the
//! guard is released or dropped, so cleanup happens on all exit paths.
//!
//! Environment changes never touch the current process. They are carried
//! in the [`Invocation`](crate::ports::Invocation) and applied to the child
//! only.

mod guard;
mod strategy;

pub use guard::{CleanupFailure, DeployError, Deployment};
pub use strategy::{DeploymentContext, DeploymentStrategy, applicable_strategies};
