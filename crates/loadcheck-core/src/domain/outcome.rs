//! Execution outcomes and test case results.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::deploy::DeploymentStrategy;
use crate::domain::ProbeFlavor;
use crate::platform::TargetOs;

/// Result of running the probe once under one deployment strategy.
///
/// Pass/fail is decided by the exit status alone; captured output is kept
/// for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub strategy: DeploymentStrategy,
    /// Exit code, `None` if the process never started or was killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    /// Set when the process could not be started at all.
    pub launch_error: Option<String>,
    pub elapsed: Duration,
    pub success: bool,
}

impl ExecutionOutcome {
    /// Outcome of a process that ran to completion.
    pub fn completed(
        strategy: DeploymentStrategy,
        exit_code: Option<i32>,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            strategy,
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
            launch_error: None,
            elapsed,
            success: exit_code == Some(0),
        }
    }

    /// Outcome of a process that could not be started.
    pub fn launch_failed(strategy: DeploymentStrategy, error: impl Into<String>) -> Self {
        Self {
            strategy,
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
            launch_error: Some(error.into()),
            elapsed: Duration::ZERO,
            success: false,
        }
    }

    /// Shorthand for a successful run with the given stdout.
    pub fn passed(strategy: DeploymentStrategy, stdout: impl Into<String>) -> Self {
        Self::completed(strategy, Some(0), stdout, "", Duration::ZERO)
    }

    /// Stdout followed by stderr, for reports.
    pub fn combined_output(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (_, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) => format!("{}\n{}", self.stdout.trim_end(), self.stderr),
        }
    }

    /// Whether either captured stream contains `marker`.
    pub fn output_contains(&self, marker: &str) -> bool {
        self.stdout.contains(marker) || self.stderr.contains(marker)
    }

    /// One-line description of how the process ended.
    pub fn status_summary(&self) -> String {
        if let Some(err) = &self.launch_error {
            return format!("failed to start: {err}");
        }
        match self.exit_code {
            Some(code) => format!("exit code {code}"),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Verdict of one loader test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCaseResult {
    pub os: TargetOs,
    pub flavor: ProbeFlavor,
    pub outcomes: Vec<ExecutionOutcome>,
    pub all_passed: bool,
    /// Build directory, when it was kept for inspection.
    pub build_dir: Option<PathBuf>,
    pub started_at: DateTime<Utc>,
}

impl TestCaseResult {
    pub fn new(
        os: TargetOs,
        flavor: ProbeFlavor,
        outcomes: Vec<ExecutionOutcome>,
        started_at: DateTime<Utc>,
    ) -> Self {
        let all_passed = !outcomes.is_empty() && outcomes.iter().all(|o| o.success);
        Self {
            os,
            flavor,
            outcomes,
            all_passed,
            build_dir: None,
            started_at,
        }
    }

    #[must_use]
    pub fn with_build_dir(mut self, build_dir: PathBuf) -> Self {
        self.build_dir = Some(build_dir);
        self
    }

    /// Strategies that were attempted, in order.
    pub fn strategies(&self) -> Vec<DeploymentStrategy> {
        self.outcomes.iter().map(|o| o.strategy).collect()
    }
}
