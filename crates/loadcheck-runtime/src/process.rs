//! Runs built probes as child processes.

use std::process::{Command, Stdio};
use std::time::Instant;

use loadcheck_core::{ExecutionOutcome, Invocation, ProbeRunner};
use tracing::debug;

/// [`ProbeRunner`] that spawns the probe and waits for it to exit.
///
/// Working directory and environment overrides apply to the child only.
/// There is no timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessProbeRunner;

impl ProcessProbeRunner {
    pub const fn new() -> Self {
        Self
    }
}

impl ProbeRunner for ProcessProbeRunner {
    fn execute(&self, invocation: &Invocation) -> ExecutionOutcome {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .envs(invocation.env.iter().map(|(k, v)| (k, v)));
        if let Some(dir) = &invocation.working_dir {
            cmd.current_dir(dir);
        }

        debug!(
            strategy = %invocation.strategy,
            program = %invocation.program.display(),
            "Launching probe"
        );
        let started = Instant::now();
        match cmd.output() {
            Ok(output) => ExecutionOutcome::completed(
                invocation.strategy,
                output.status.code(),
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr),
                started.elapsed(),
            ),
            Err(e) => ExecutionOutcome::launch_failed(invocation.strategy, e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadcheck_core::DeploymentStrategy;

    #[test]
    fn test_missing_program_is_launch_failure() {
        let dir = tempfile::tempdir().unwrap();
        let invocation =
            Invocation::new(DeploymentStrategy::RunInPlace, dir.path().join("missing-probe"));
        let outcome = ProcessProbeRunner::new().execute(&invocation);
        assert!(!outcome.success);
        assert!(outcome.launch_error.is_some());
        assert_eq!(outcome.exit_code, None);
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use std::path::{Path, PathBuf};

        fn probe(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("probe.sh");
            fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[test]
        fn test_captures_exit_code_and_streams() {
            let dir = tempfile::tempdir().unwrap();
            let program = probe(
                dir.path(),
                "echo 'Opening shared library...'\necho 'Cannot load symbol initExample' >&2\nexit 1",
            );
            let outcome = ProcessProbeRunner::new()
                .execute(&Invocation::new(DeploymentStrategy::RunInPlace, program));
            assert!(!outcome.success);
            assert_eq!(outcome.exit_code, Some(1));
            assert_eq!(outcome.stdout, "Opening shared library...\n");
            assert!(outcome.output_contains("Cannot load symbol"));
        }

        #[test]
        fn test_passes_arguments() {
            let dir = tempfile::tempdir().unwrap();
            let program = probe(dir.path(), "echo \"script=$1\"");
            let invocation = Invocation::new(DeploymentStrategy::RunWithInterpreter, program)
                .with_arg(dir.path().join("func.py"));

            let outcome = ProcessProbeRunner::new().execute(&invocation);
            assert!(outcome.success);
            assert_eq!(
                outcome.stdout.trim_end(),
                format!("script={}", dir.path().join("func.py").display())
            );
        }

        #[test]
        fn test_applies_working_dir_and_env_to_child() {
            let dir = tempfile::tempdir().unwrap();
            let cwd = tempfile::tempdir().unwrap();
            let program = probe(dir.path(), "pwd\necho \"$LOADCHECK_PROBE_MARK\"");
            let invocation = Invocation::new(DeploymentStrategy::RunFromInstallDirectory, program)
                .with_working_dir(cwd.path())
                .with_env("LOADCHECK_PROBE_MARK", "child-only");

            let outcome = ProcessProbeRunner::new().execute(&invocation);
            assert!(outcome.success);
            let canonical = fs::canonicalize(cwd.path()).unwrap();
            let mut lines = outcome.stdout.lines();
            assert_eq!(
                fs::canonicalize(lines.next().unwrap()).unwrap(),
                canonical
            );
            assert_eq!(lines.next(), Some("child-only"));
            assert!(std::env::var_os("LOADCHECK_PROBE_MARK").is_none());
        }
    }
}
