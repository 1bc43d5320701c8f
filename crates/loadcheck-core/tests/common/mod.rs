//! Shared fixtures for loader test case integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use loadcheck_core::{
    BuildToolchain, BuiltBinary, DeploymentStrategy, ExecutionOutcome, Invocation, ProbeProject,
    ProbeRunner, ToolchainError,
};

/// Every file under `dir` with its contents, keyed by relative path.
pub fn snapshot(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    let mut files = BTreeMap::new();
    collect(dir, dir, &mut files);
    files
}

fn collect(root: &Path, dir: &Path, files: &mut BTreeMap<PathBuf, Vec<u8>>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(root, &path, files);
        } else {
            let relative = path.strip_prefix(root).unwrap().to_path_buf();
            files.insert(relative, fs::read(&path).unwrap());
        }
    }
}

/// An installation directory populated with the given files.
pub fn install_dir(files: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for name in files {
        fs::write(dir.path().join(name), format!("contents of {name}")).unwrap();
    }
    dir
}

/// Toolchain that writes a placeholder executable where the real build
/// would, and records the probe source it was asked to build.
#[derive(Default)]
pub struct FakeToolchain {
    pub fail_with: Option<String>,
    pub calls: AtomicUsize,
    pub source: Mutex<Option<String>>,
}

impl FakeToolchain {
    pub fn failing(output: &str) -> Self {
        Self {
            fail_with: Some(output.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn source(&self) -> String {
        self.source.lock().unwrap().clone().unwrap_or_default()
    }
}

impl BuildToolchain for FakeToolchain {
    fn build(&self, project: &ProbeProject) -> Result<BuiltBinary, ToolchainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let source = fs::read_to_string(
            project
                .source_dir
                .join(&project.descriptor.source_file_name),
        )
        .unwrap();
        *self.source.lock().unwrap() = Some(source);

        if let Some(output) = &self.fail_with {
            return Err(ToolchainError::StepFailed {
                step: "cmake --build".to_string(),
                status: "exit status: 2".to_string(),
                output: output.clone(),
            });
        }

        let binary = project.expected_binary_path();
        fs::create_dir_all(binary.parent().unwrap()).unwrap();
        fs::write(&binary, b"probe").unwrap();
        Ok(BuiltBinary::new(binary, project.os))
    }
}

/// Runner answering per strategy and recording every invocation.
///
/// Strategies without a scripted answer pass. `check` runs while the
/// deployment is still in place, so tests can inspect the filesystem.
#[derive(Default)]
pub struct ScriptedRunner {
    pub answers: HashMap<DeploymentStrategy, ExecutionOutcome>,
    pub invocations: Mutex<Vec<Invocation>>,
    pub check: Option<Box<dyn Fn(&Invocation) + Send + Sync>>,
}

impl ScriptedRunner {
    pub fn answer(mut self, outcome: ExecutionOutcome) -> Self {
        self.answers.insert(outcome.strategy, outcome);
        self
    }

    pub fn check(mut self, check: impl Fn(&Invocation) + Send + Sync + 'static) -> Self {
        self.check = Some(Box::new(check));
        self
    }

    pub fn invoked(&self) -> Vec<DeploymentStrategy> {
        self.invocations
            .lock()
            .unwrap()
            .iter()
            .map(|i| i.strategy)
            .collect()
    }
}

impl ProbeRunner for ScriptedRunner {
    fn execute(&self, invocation: &Invocation) -> ExecutionOutcome {
        if let Some(check) = &self.check {
            check(invocation);
        }
        self.invocations.lock().unwrap().push(invocation.clone());
        self.answers
            .get(&invocation.strategy)
            .cloned()
            .unwrap_or_else(|| ExecutionOutcome::passed(invocation.strategy, "ok"))
    }
}
