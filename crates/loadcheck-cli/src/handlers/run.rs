//! Run command handler.
//!
//! Runs the selected probes one after another against the installation,
//! stopping at the first failing case.

use loadcheck_core::{
    DeploymentStrategy, ExecutionOutcome, LoaderTestError, ProbeFlavor, TargetOs,
    TestCaseResult, applicable_strategies,
};
use serde::Serialize;
use tracing::info;

use crate::bootstrap::CliContext;

/// Result of one probe in the suite.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseReport {
    Passed {
        flavor: ProbeFlavor,
        result: TestCaseResult,
    },
    Skipped {
        flavor: ProbeFlavor,
        reason: String,
    },
    Failed {
        flavor: ProbeFlavor,
        error: String,
        strategy: Option<DeploymentStrategy>,
        /// Outcomes of the strategies that ran, the failing one last.
        outcomes: Vec<ExecutionOutcome>,
        output: Option<String>,
    },
}

impl CaseReport {
    fn failed(flavor: ProbeFlavor, err: &LoaderTestError) -> Self {
        let outcomes = match err {
            LoaderTestError::ProbeExecutionFailure {
                outcome, attempted, ..
            } => attempted
                .iter()
                .cloned()
                .chain(std::iter::once((**outcome).clone()))
                .collect(),
            _ => Vec::new(),
        };
        Self::Failed {
            flavor,
            error: err.to_string(),
            strategy: err.failed_strategy(),
            outcomes,
            output: err.diagnostic_output(),
        }
    }

    pub const fn flavor(&self) -> ProbeFlavor {
        match self {
            Self::Passed { flavor, .. } | Self::Skipped { flavor, .. } | Self::Failed { flavor, .. } => {
                *flavor
            }
        }
    }
}

/// Report of a whole `run` invocation.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub host_os: TargetOs,
    pub run_configuration: String,
    pub library: String,
    pub cases: Vec<CaseReport>,
    pub passed: bool,
}

/// Outcome of the suite: the report plus the error that stopped it.
#[derive(Debug)]
pub struct SuiteRun {
    pub report: SuiteReport,
    pub error: Option<LoaderTestError>,
}

/// Execute the run command.
///
/// Probes without a strategy on this platform (static linking on Windows,
/// Python on macOS) are skipped; every other selected probe runs, in
/// order, until one fails.
pub fn execute(ctx: &CliContext) -> SuiteRun {
    let config = &ctx.config;
    let os = config.host_os;
    let mut cases = Vec::new();
    let mut error = None;

    for &flavor in config.selection.flavors() {
        if applicable_strategies(flavor, os).is_empty() {
            info!("Skipping {} probe: not supported on {}", flavor, os);
            cases.push(CaseReport::Skipped {
                flavor,
                reason: format!("not supported on {os}"),
            });
            continue;
        }

        match ctx.test_case(flavor).run(&config.install_dir) {
            Ok(result) => cases.push(CaseReport::Passed { flavor, result }),
            Err(err) => {
                cases.push(CaseReport::failed(flavor, &err));
                error = Some(err);
                break;
            }
        }
    }

    let passed = error.is_none() && cases.iter().any(|c| matches!(c, CaseReport::Passed { .. }));
    SuiteRun {
        report: SuiteReport {
            host_os: os,
            run_configuration: config.run_config.key.to_string(),
            library: os.shared_library_file_name(&config.library),
            cases,
            passed,
        },
        error,
    }
}
