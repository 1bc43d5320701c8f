//! Report formatting.
//!
//! Format-only: no domain decisions are made here.

use std::fmt::Write as _;
use std::time::Duration;

use loadcheck_core::ExecutionOutcome;

use crate::handlers::run::{CaseReport, SuiteReport};

/// Print a horizontal separator line.
pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

/// Human-readable report, one line per attempted strategy.
pub fn render_text(report: &SuiteReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} on {} (run configuration {})",
        report.library, report.host_os, report.run_configuration
    );

    for case in &report.cases {
        match case {
            CaseReport::Passed { flavor, result } => {
                for outcome in &result.outcomes {
                    let _ = writeln!(out, "  {flavor:<13} PASS  {}", outcome_line(outcome));
                }
                if let Some(dir) = &result.build_dir {
                    let _ = writeln!(out, "  {:<13}       kept {}", "", dir.display());
                }
            }
            CaseReport::Skipped { flavor, reason } => {
                let _ = writeln!(out, "  {flavor:<13} SKIP  {reason}");
            }
            CaseReport::Failed {
                flavor,
                error,
                outcomes,
                output,
                ..
            } => {
                for outcome in outcomes {
                    let status = if outcome.success { "PASS" } else { "FAIL" };
                    let _ = writeln!(out, "  {flavor:<13} {status}  {}", outcome_line(outcome));
                }
                let _ = writeln!(out, "  {flavor:<13} FAIL  {error}");
                if let Some(output) = output.as_deref().map(str::trim).filter(|o| !o.is_empty()) {
                    for line in output.lines() {
                        let _ = writeln!(out, "      {line}");
                    }
                }
            }
        }
    }

    let verdict = if report.passed { "PASSED" } else { "FAILED" };
    let _ = writeln!(out, "Result: {verdict}");
    out
}

/// JSON report.
pub fn render_json(report: &SuiteReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

fn outcome_line(outcome: &ExecutionOutcome) -> String {
    format!(
        "{:<29} {} ({})",
        outcome.strategy,
        outcome.status_summary(),
        format_elapsed(outcome.elapsed)
    )
}

fn format_elapsed(elapsed: Duration) -> String {
    if elapsed.as_secs() >= 1 {
        format!("{:.1}s", elapsed.as_secs_f64())
    } else {
        format!("{}ms", elapsed.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadcheck_core::{DeploymentStrategy, ProbeFlavor, TargetOs, TestCaseResult};

    fn report(cases: Vec<CaseReport>, passed: bool) -> SuiteReport {
        SuiteReport {
            host_os: TargetOs::MacOs,
            run_configuration: "mac11".to_string(),
            library: "libenergyplusapi.dylib".to_string(),
            cases,
            passed,
        }
    }

    fn passed_case() -> CaseReport {
        let started = "2024-01-01T00:00:00Z".parse().unwrap();
        CaseReport::Passed {
            flavor: ProbeFlavor::StaticLink,
            result: TestCaseResult::new(
                TargetOs::MacOs,
                ProbeFlavor::StaticLink,
                vec![ExecutionOutcome::completed(
                    DeploymentStrategy::RunFromInstallDirectory,
                    Some(0),
                    "Hello, world!\n",
                    "",
                    Duration::from_millis(12),
                )],
                started,
            ),
        }
    }

    fn failed_case() -> CaseReport {
        CaseReport::Failed {
            flavor: ProbeFlavor::DelayedLoad,
            error: "Probe failed under ColocateBinaryWithLibrary: exit code 1".to_string(),
            strategy: Some(DeploymentStrategy::ColocateBinaryWithLibrary),
            outcomes: vec![
                ExecutionOutcome::passed(DeploymentStrategy::ColocateLibraryWithBinary, "ok"),
                ExecutionOutcome::completed(
                    DeploymentStrategy::ColocateBinaryWithLibrary,
                    Some(1),
                    "",
                    "Cannot open library: image not found\n",
                    Duration::from_millis(3),
                ),
            ],
            output: Some("Cannot open library: image not found\n".to_string()),
        }
    }

    #[test]
    fn test_text_report_lists_each_strategy() {
        let text = render_text(&report(vec![passed_case(), failed_case()], false));
        assert!(text.starts_with("libenergyplusapi.dylib on macOS (run configuration mac11)\n"));
        assert!(text.contains("static-link   PASS  RunFromInstallDirectory"));
        assert!(text.contains("exit code 0 (12ms)"));
        assert!(text.contains("delayed-load  PASS  ColocateLibraryWithBinary"));
        assert!(text.contains("delayed-load  FAIL  ColocateBinaryWithLibrary"));
        assert!(text.contains("      Cannot open library: image not found"));
        assert!(text.ends_with("Result: FAILED\n"));
    }

    #[test]
    fn test_skipped_case() {
        let text = render_text(&report(
            vec![CaseReport::Skipped {
                flavor: ProbeFlavor::StaticLink,
                reason: "not supported on Windows".to_string(),
            }],
            true,
        ));
        assert!(text.contains("static-link   SKIP  not supported on Windows"));
        assert!(text.ends_with("Result: PASSED\n"));
    }

    #[test]
    fn test_json_report_is_tagged() {
        let json = render_json(&report(vec![passed_case(), failed_case()], false)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["host_os"], "macos");
        assert_eq!(value["passed"], false);
        assert_eq!(value["cases"][0]["status"], "passed");
        assert_eq!(
            value["cases"][0]["result"]["outcomes"][0]["strategy"],
            "run_from_install_directory"
        );
        assert_eq!(value["cases"][1]["status"], "failed");
        assert_eq!(value["cases"][1]["strategy"], "colocate_binary_with_library");
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_millis(250)), "250ms");
        assert_eq!(format_elapsed(Duration::from_millis(1500)), "1.5s");
    }
}
