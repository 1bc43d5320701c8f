//! Scoped ownership of deployment side effects.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

use crate::ports::Invocation;

use super::DeploymentStrategy;

/// Errors raised while arranging a deployment.
#[derive(Debug, Error)]
pub enum DeployError {
    /// A file that must be copied is not present.
    #[error("Required file is missing: {0}")]
    SourceMissing(PathBuf),

    /// The destination already exists; deployments never overwrite files.
    #[error("Refusing to overwrite existing file: {0}")]
    DestinationExists(PathBuf),

    /// The built binary path has no parent directory or file name.
    #[error("Built binary path is not usable: {0}")]
    InvalidBinaryPath(PathBuf),

    /// Copying a file failed.
    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Reverting a deployment left files behind.
///
/// Never fatal: callers log it and keep the verdict of the run.
#[derive(Debug, Error)]
#[error("Cleanup after {strategy} failed for {}: {source}", .path.display())]
pub struct CleanupFailure {
    pub strategy: DeploymentStrategy,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// A deployed strategy: the invocation to run plus every file it created.
///
/// Created files are removed exactly once, either by [`Deployment::release`]
/// or, on any other exit path, when the guard is dropped.
#[derive(Debug)]
#[must_use = "dropping a Deployment immediately reverts it"]
pub struct Deployment {
    invocation: Invocation,
    created: Vec<PathBuf>,
    released: bool,
}

impl Deployment {
    pub(super) const fn new(invocation: Invocation) -> Self {
        Self {
            invocation,
            created: Vec::new(),
            released: false,
        }
    }

    pub const fn strategy(&self) -> DeploymentStrategy {
        self.invocation.strategy
    }

    /// How to run the probe under this deployment.
    pub const fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    /// Files this deployment created and will remove.
    pub fn created(&self) -> &[PathBuf] {
        &self.created
    }

    /// Copy each `(from, to)` pair, recording destinations for cleanup.
    ///
    /// All sources and destinations are checked before the first copy.
    pub(super) fn copy_all(&mut self, pairs: &[(PathBuf, PathBuf)]) -> Result<(), DeployError> {
        for (from, to) in pairs {
            if !from.is_file() {
                return Err(DeployError::SourceMissing(from.clone()));
            }
            if to.exists() {
                return Err(DeployError::DestinationExists(to.clone()));
            }
        }
        for (from, to) in pairs {
            fs::copy(from, to).map_err(|source| DeployError::Copy {
                from: from.clone(),
                to: to.clone(),
                source,
            })?;
            self.created.push(to.clone());
        }
        Ok(())
    }

    /// Revert the deployment, reporting every file that could not be removed.
    pub fn release(mut self) -> Result<(), Vec<CleanupFailure>> {
        let failures = self.revert();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(failures)
        }
    }

    fn revert(&mut self) -> Vec<CleanupFailure> {
        if self.released {
            return Vec::new();
        }
        self.released = true;

        let strategy = self.strategy();
        self.created
            .drain(..)
            .rev()
            .filter_map(|path| {
                remove_created(&path)
                    .err()
                    .map(|source| CleanupFailure {
                        strategy,
                        path,
                        source,
                    })
            })
            .collect()
    }
}

impl Drop for Deployment {
    fn drop(&mut self) {
        for failure in self.revert() {
            warn!("{failure}");
        }
    }
}

fn remove_created(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn copy_fixture() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("libexample.so");
        let to = dir.path().join("copy.so");
        fs::write(&from, b"elf").unwrap();
        (dir, from, to)
    }

    #[test]
    fn test_release_removes_copies_once() {
        let (_dir, from, to) = copy_fixture();
        let mut deployment =
            Deployment::new(Invocation::new(DeploymentStrategy::RunInPlace, "/bin/true"));
        deployment.copy_all(&[(from.clone(), to.clone())]).unwrap();
        assert!(to.is_file());

        assert!(deployment.revert().is_empty());
        assert!(!to.exists());

        // A second revert is a no-op even if the path reappears.
        fs::write(&to, b"new").unwrap();
        assert!(deployment.revert().is_empty());
        assert!(to.exists());
        drop(deployment);
        assert!(to.exists());
        assert!(from.exists());
    }

    #[test]
    fn test_drop_reverts() {
        let (_dir, from, to) = copy_fixture();
        {
            let mut deployment =
                Deployment::new(Invocation::new(DeploymentStrategy::RunInPlace, "/bin/true"));
            deployment.copy_all(&[(from, to.clone())]).unwrap();
            assert!(to.is_file());
        }
        assert!(!to.exists());
    }

    #[test]
    fn test_already_removed_copy_is_not_a_failure() {
        let (_dir, from, to) = copy_fixture();
        let mut deployment =
            Deployment::new(Invocation::new(DeploymentStrategy::RunInPlace, "/bin/true"));
        deployment.copy_all(&[(from, to.clone())]).unwrap();
        fs::remove_file(&to).unwrap();
        assert!(deployment.release().is_ok());
    }

    #[test]
    fn test_unremovable_copy_is_reported() {
        let (_dir, from, to) = copy_fixture();
        let mut deployment =
            Deployment::new(Invocation::new(DeploymentStrategy::RunInPlace, "/bin/true"));
        deployment.copy_all(&[(from, to.clone())]).unwrap();
        fs::remove_file(&to).unwrap();
        fs::create_dir(&to).unwrap();
        fs::write(to.join("held"), b"x").unwrap();

        let failures = deployment.release().unwrap_err();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].path, to);
        assert_eq!(failures[0].strategy, DeploymentStrategy::RunInPlace);
    }
}
