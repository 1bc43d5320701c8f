//! CMake adapter for the build toolchain port.
//!
//! Builds a rendered probe project out of source: `cmake ..` inside the
//! project's `build/` directory, then `cmake --build .` (with
//! `--config Release` for multi-config generators).

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use loadcheck_core::{
    Bitness, BuildDescriptor, BuildToolchain, BuiltBinary, MsvcVersion, ProbeProject, TargetOs,
    ToolchainError,
};
use tracing::{debug, info};

/// Default CMake program, resolved through `PATH`.
pub const DEFAULT_CMAKE_PROGRAM: &str = "cmake";

/// Directory prepended to `PATH` for CMake on macOS, where Homebrew
/// installs the toolchain.
pub const MACOS_TOOL_PREFIX: &str = "/usr/local/bin";

/// How to invoke CMake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmakeConfig {
    pub program: PathBuf,
    /// Extra configure arguments (generator selection).
    pub generator_args: Vec<String>,
    /// Directory prepended to `PATH` for every CMake step.
    pub path_prefix: Option<PathBuf>,
}

impl Default for CmakeConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_CMAKE_PROGRAM),
            generator_args: Vec::new(),
            path_prefix: None,
        }
    }
}

impl CmakeConfig {
    /// Defaults for building on `os`.
    ///
    /// Windows always selects a Visual Studio generator (`msvc`, else
    /// [`MsvcVersion::DEFAULT`]) so artifacts land in `Release/`; macOS
    /// prepends [`MACOS_TOOL_PREFIX`] to `PATH`.
    pub fn for_target(os: TargetOs, bitness: Bitness, msvc: Option<MsvcVersion>) -> Self {
        let mut config = Self::default();
        match os {
            TargetOs::Windows => {
                config.generator_args = msvc.unwrap_or(MsvcVersion::DEFAULT).generator_args(bitness);
            }
            TargetOs::MacOs => config.path_prefix = Some(PathBuf::from(MACOS_TOOL_PREFIX)),
            TargetOs::Linux => {}
        }
        config
    }

    #[must_use]
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    #[must_use]
    pub fn with_path_prefix(mut self, prefix: Option<PathBuf>) -> Self {
        self.path_prefix = prefix;
        self
    }
}

/// [`BuildToolchain`] backed by the `cmake` command line.
#[derive(Debug, Clone, Default)]
pub struct CmakeToolchain {
    config: CmakeConfig,
}

impl CmakeToolchain {
    pub const fn new(config: CmakeConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &CmakeConfig {
        &self.config
    }

    /// Arguments for the configure step, run from the build directory.
    pub fn configure_args(&self) -> Vec<OsString> {
        self.config
            .generator_args
            .iter()
            .map(OsString::from)
            .chain(std::iter::once(OsString::from("..")))
            .collect()
    }

    /// Arguments for the build step, run from the build directory.
    pub fn build_args(descriptor: &BuildDescriptor) -> Vec<OsString> {
        let mut args = vec![OsString::from("--build"), OsString::from(".")];
        if descriptor.multi_config {
            args.push(OsString::from("--config"));
            args.push(OsString::from(BuildDescriptor::RELEASE_CONFIG));
        }
        args
    }

    fn command(&self, build_dir: &Path) -> Result<Command, ToolchainError> {
        let mut cmd = Command::new(&self.config.program);
        cmd.current_dir(build_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(prefix) = &self.config.path_prefix {
            let existing = env::var_os("PATH").unwrap_or_default();
            let joined = env::join_paths(
                std::iter::once(prefix.clone()).chain(env::split_paths(&existing)),
            )
            .map_err(|e| ToolchainError::Configuration(format!("Invalid PATH prefix: {e}")))?;
            cmd.env("PATH", joined);
        }
        Ok(cmd)
    }

    fn run_step(&self, step: &str, args: &[OsString], build_dir: &Path) -> Result<(), ToolchainError> {
        debug!("Running {} {:?} in {}", self.config.program.display(), args, build_dir.display());
        let output = self
            .command(build_dir)?
            .args(args)
            .output()
            .map_err(|source| ToolchainError::Launch {
                program: self.config.program.display().to_string(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stdout.lines().chain(stderr.lines()) {
            debug!(step, "{}", line);
        }

        if output.status.success() {
            Ok(())
        } else {
            Err(ToolchainError::StepFailed {
                step: step.to_string(),
                status: output.status.to_string(),
                output: format!("{stdout}{stderr}"),
            })
        }
    }
}

impl BuildToolchain for CmakeToolchain {
    fn build(&self, project: &ProbeProject) -> Result<BuiltBinary, ToolchainError> {
        info!("Configuring probe project {}", project.source_dir.display());
        self.run_step("cmake configure", &self.configure_args(), &project.build_dir)?;

        info!("Building probe {}", project.descriptor.project_name);
        self.run_step("cmake build", &Self::build_args(&project.descriptor), &project.build_dir)?;

        let binary = project.expected_binary_path();
        if !binary.is_file() {
            return Err(ToolchainError::MissingArtifact(binary));
        }
        Ok(BuiltBinary::new(binary, project.os))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadcheck_core::LinkDirective;

    fn descriptor(multi_config: bool) -> BuildDescriptor {
        BuildDescriptor {
            project_name: "TestCAPIAccess".to_string(),
            source_file_name: "func.cpp".to_string(),
            link: LinkDirective::RuntimeLoad,
            multi_config,
            executable_file_name: "TestCAPIAccess".to_string(),
        }
    }

    #[test]
    fn test_build_args_add_release_config_for_multi_config() {
        assert_eq!(CmakeToolchain::build_args(&descriptor(false)), ["--build", "."]);
        assert_eq!(
            CmakeToolchain::build_args(&descriptor(true)),
            ["--build", ".", "--config", "Release"]
        );
    }

    #[test]
    fn test_windows_configure_selects_generator() {
        let msvc = MsvcVersion::new(16).unwrap();
        let toolchain =
            CmakeToolchain::new(CmakeConfig::for_target(TargetOs::Windows, Bitness::X64, Some(msvc)));
        assert_eq!(
            toolchain.configure_args(),
            ["-G", "Visual Studio 16 2019", "-A", "x64", ".."]
        );
    }

    #[test]
    fn test_windows_without_msvc_uses_default_generator() {
        let config = CmakeConfig::for_target(TargetOs::Windows, Bitness::X86, None);
        assert_eq!(
            config.generator_args,
            ["-G", "Visual Studio 16 2019", "-A", "Win32"]
        );
    }

    #[test]
    fn test_platform_defaults() {
        let linux = CmakeConfig::for_target(TargetOs::Linux, Bitness::X64, None);
        assert_eq!(linux, CmakeConfig::default());
        assert_eq!(CmakeToolchain::new(linux).configure_args(), [".."]);

        let mac = CmakeConfig::for_target(TargetOs::MacOs, Bitness::X64, None);
        assert_eq!(mac.path_prefix, Some(PathBuf::from(MACOS_TOOL_PREFIX)));
        assert!(mac.generator_args.is_empty());
    }

    #[test]
    fn test_missing_program_is_launch_error() {
        let dir = tempfile::tempdir().unwrap();
        let project = ProbeProject {
            source_dir: dir.path().to_path_buf(),
            build_dir: dir.path().to_path_buf(),
            descriptor: descriptor(false),
            os: TargetOs::Linux,
        };
        let toolchain = CmakeToolchain::new(
            CmakeConfig::default().with_program(dir.path().join("no-such-cmake")),
        );
        let err = toolchain.build(&project).unwrap_err();
        assert!(matches!(err, ToolchainError::Launch { .. }));
    }

    #[cfg(unix)]
    mod fake_cmake {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        fn script(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("cmake");
            fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn project(root: &Path) -> ProbeProject {
            let build_dir = root.join("project").join("build");
            fs::create_dir_all(&build_dir).unwrap();
            ProbeProject {
                source_dir: root.join("project"),
                build_dir,
                descriptor: descriptor(false),
                os: TargetOs::Linux,
            }
        }

        #[test]
        fn test_failed_step_captures_output() {
            let dir = tempfile::tempdir().unwrap();
            let cmake = script(dir.path(), "echo 'CMake Error: no compiler' >&2\nexit 1");
            let err = CmakeToolchain::new(CmakeConfig::default().with_program(cmake))
                .build(&project(dir.path()))
                .unwrap_err();
            match err {
                ToolchainError::StepFailed { step, output, .. } => {
                    assert_eq!(step, "cmake configure");
                    assert!(output.contains("CMake Error: no compiler"));
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[test]
        fn test_successful_build_without_binary_is_missing_artifact() {
            let dir = tempfile::tempdir().unwrap();
            let cmake = script(dir.path(), "exit 0");
            let err = CmakeToolchain::new(CmakeConfig::default().with_program(cmake))
                .build(&project(dir.path()))
                .unwrap_err();
            assert!(matches!(err, ToolchainError::MissingArtifact(_)));
        }

        #[test]
        fn test_build_step_produces_binary() {
            let dir = tempfile::tempdir().unwrap();
            let cmake = script(
                dir.path(),
                r#"if [ "$1" = "--build" ]; then touch TestCAPIAccess; fi
exit 0"#,
            );
            let project = project(dir.path());
            let binary = CmakeToolchain::new(CmakeConfig::default().with_program(cmake))
                .build(&project)
                .unwrap();
            assert_eq!(binary.path, project.build_dir.join("TestCAPIAccess"));
            assert_eq!(binary.os, TargetOs::Linux);
        }
    }
}
