//! End-to-end loader tests against a real CMake toolchain.
//!
//! These need `cmake`, `cc` and a C++ compiler on `PATH`:
//!
//! ```sh
//! cargo test -p loadcheck-runtime -- --ignored
//! ```

#![cfg(target_os = "linux")]

use std::fs;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;

use loadcheck_core::{
    DeploymentStrategy, LoaderTestCase, LoaderTestError, ProbeFlavor, ProbeSpecification,
    TargetOs,
};
use loadcheck_runtime::{CmakeConfig, CmakeToolchain, ProcessProbeRunner};

/// Compile `source` into `libexample.so` inside `dir`.
fn shared_library(dir: &Path, source: &str) {
    let c_file = dir.join("example.c");
    fs::write(&c_file, source).unwrap();
    let status = Command::new("cc")
        .args(["-shared", "-fPIC", "-o"])
        .arg(dir.join("libexample.so"))
        .arg(&c_file)
        .status()
        .unwrap();
    assert!(status.success(), "failed to compile libexample.so");
}

fn case() -> LoaderTestCase {
    LoaderTestCase::new(
        ProbeSpecification::new(ProbeFlavor::DelayedLoad, "example", "initExample"),
        TargetOs::Linux,
        Arc::new(CmakeToolchain::new(CmakeConfig::default())),
        Arc::new(ProcessProbeRunner::new()),
    )
}

#[test]
#[ignore = "requires cmake and a C/C++ compiler"]
fn test_delayed_probe_loads_exported_symbol() {
    let install = tempfile::tempdir().unwrap();
    shared_library(
        install.path(),
        "#include <stdio.h>\nvoid initExample(void) { puts(\"example ready\"); }\n",
    );

    let result = case().run(install.path()).unwrap();
    assert!(result.all_passed);
    assert_eq!(result.strategies(), [DeploymentStrategy::RunInPlace]);
    assert!(result.outcomes[0].stdout.contains("example ready"));
}

#[test]
#[ignore = "requires cmake and a C/C++ compiler"]
fn test_delayed_probe_reports_missing_symbol() {
    let install = tempfile::tempdir().unwrap();
    shared_library(install.path(), "void somethingElse(void) {}\n");

    let err = case().run(install.path()).unwrap_err();
    assert!(matches!(
        err,
        LoaderTestError::ProbeExecutionFailure {
            strategy: DeploymentStrategy::RunInPlace,
            ..
        }
    ));
    assert!(err.diagnostic_output().unwrap().contains("Cannot load symbol"));
}
