//! Probe program rendering.
//!
//! [`ProbeRenderer`] turns a [`ProbeSpecification`] into the text of a
//! minimal native program plus the CMake project that builds it, or into a
//! Python script for interpreted probes. Rendering
//! is pure: the same inputs always produce byte-identical output, and
//! nothing touches the filesystem until [`RenderedProbe::write_to`].

mod templates;

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::domain::{
    BuildDescriptor, ENERGYPLUS_PYTHON_MODULE, LinkDirective, ProbeFlavor, ProbeSpecification,
    ScriptBinding,
};
use crate::error::LoaderTestError;
use crate::platform::TargetOs;

pub use templates::{FUNCTION_FAILURE_MARKER, OPEN_FAILURE_MARKER, SYMBOL_FAILURE_MARKER};

use templates::fill;

/// File name of the build descriptor.
pub const DESCRIPTOR_FILE_NAME: &str = "CMakeLists.txt";

/// File name of the macOS install-name fixup script.
pub const FIXUP_FILE_NAME: &str = "fixup.cmake";

/// A file of the rendered probe project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFile {
    pub name: String,
    pub contents: String,
}

/// Everything needed to build one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedProbe {
    pub source: ProjectFile,
    /// `CMakeLists.txt` contents; empty for interpreted probes.
    pub descriptor_text: String,
    pub descriptor: BuildDescriptor,
    /// Extra files the descriptor refers to (e.g. `fixup.cmake`).
    pub auxiliary: Vec<ProjectFile>,
}

impl RenderedProbe {
    /// Persist source, descriptor and auxiliary files into `dir`.
    pub fn write_to(&self, dir: &Path) -> io::Result<()> {
        fs::write(dir.join(&self.source.name), &self.source.contents)?;
        if self.descriptor.requires_build() {
            fs::write(dir.join(DESCRIPTOR_FILE_NAME), &self.descriptor_text)?;
        }
        for file in &self.auxiliary {
            fs::write(dir.join(&file.name), &file.contents)?;
        }
        debug!(dir = %dir.display(), "Probe project written");
        Ok(())
    }
}

/// Renders probe programs for one specification.
#[derive(Debug, Clone)]
pub struct ProbeRenderer {
    spec: ProbeSpecification,
}

impl ProbeRenderer {
    pub const fn new(spec: ProbeSpecification) -> Self {
        Self { spec }
    }

    pub const fn spec(&self) -> &ProbeSpecification {
        &self.spec
    }

    /// Render the probe for `install_path` on `os`.
    ///
    /// Fails with `UnsupportedPlatformConfiguration` when the flavor cannot
    /// be built on `os` (static linking on Windows needs an import library
    /// that release packages do not ship).
    pub fn render(&self, install_path: &Path, os: TargetOs) -> Result<RenderedProbe, LoaderTestError> {
        match self.spec.flavor() {
            ProbeFlavor::StaticLink => self.render_static(install_path, os),
            ProbeFlavor::DelayedLoad => Ok(self.render_delayed(install_path, os)),
            ProbeFlavor::Python => Ok(self.render_script(install_path, os)),
        }
    }

    fn render_static(&self, install_path: &Path, os: TargetOs) -> Result<RenderedProbe, LoaderTestError> {
        if os == TargetOs::Windows {
            return Err(LoaderTestError::UnsupportedPlatformConfiguration {
                flavor: ProbeFlavor::StaticLink,
                os,
            });
        }

        let install_dir = escaped_install_dir(install_path, os);
        let link_library = join_for(os, &install_dir, &os.link_library_file_name(self.spec.library_stem()));
        let descriptor = self.descriptor(
            os,
            LinkDirective::Static {
                library: link_library.clone(),
            },
        );

        let substitutions = [
            ("TARGET_NAME", self.spec.target_name()),
            ("SOURCE_FILE", descriptor.source_file_name.as_str()),
            ("INSTALL_DIR", install_dir.as_str()),
            ("LINK_LIBRARY", link_library.as_str()),
            ("ENTRY_SYMBOL", self.spec.entry_symbol()),
            ("LIBRARY_STEM", self.spec.library_stem()),
        ];

        let mut descriptor_text = fill(templates::STATIC_LINK_CMAKELISTS, &substitutions);
        let mut auxiliary = Vec::new();
        if os == TargetOs::MacOs {
            descriptor_text.push_str(&fill(templates::MACOS_FIXUP_HOOK, &substitutions));
            auxiliary.push(ProjectFile {
                name: FIXUP_FILE_NAME.to_string(),
                contents: fill(templates::MACOS_FIXUP_SCRIPT, &substitutions),
            });
        }

        Ok(RenderedProbe {
            source: ProjectFile {
                name: descriptor.source_file_name.clone(),
                contents: fill(templates::STATIC_LINK_SOURCE, &substitutions),
            },
            descriptor_text,
            descriptor,
            auxiliary,
        })
    }

    fn render_delayed(&self, install_path: &Path, os: TargetOs) -> RenderedProbe {
        let install_dir = escaped_install_dir(install_path, os);
        let library_path = join_for(os, &install_dir, &self.spec.library_file_name(os));
        let descriptor = self.descriptor(os, LinkDirective::RuntimeLoad);

        let substitutions = [
            ("TARGET_NAME", self.spec.target_name()),
            ("SOURCE_FILE", descriptor.source_file_name.as_str()),
            ("LIBRARY_PATH", library_path.as_str()),
            ("ENTRY_SYMBOL", self.spec.entry_symbol()),
        ];

        let source_template = match os {
            TargetOs::Linux | TargetOs::MacOs => templates::DELAYED_LOAD_SOURCE_POSIX,
            TargetOs::Windows => templates::DELAYED_LOAD_SOURCE_WINDOWS,
        };

        RenderedProbe {
            source: ProjectFile {
                name: descriptor.source_file_name.clone(),
                contents: fill(source_template, &substitutions),
            },
            descriptor_text: fill(templates::DELAYED_LOAD_CMAKELISTS, &substitutions),
            descriptor,
            auxiliary: Vec::new(),
        }
    }

    fn render_script(&self, install_path: &Path, os: TargetOs) -> RenderedProbe {
        let install_dir = escaped_install_dir(install_path, os);
        let library_path = join_for(os, &install_dir, &self.spec.library_file_name(os));
        let source_file_name = self.spec.source_file_name();

        let substitutions = [
            ("INSTALL_DIR", install_dir.as_str()),
            ("LIBRARY_PATH", library_path.as_str()),
            ("ENTRY_SYMBOL", self.spec.entry_symbol()),
            ("PYTHON_MODULE", ENERGYPLUS_PYTHON_MODULE),
        ];
        let template = match self.spec.script_binding() {
            ScriptBinding::Ctypes => templates::PYTHON_CTYPES_SCRIPT,
            ScriptBinding::PyEnergyPlus => templates::PYTHON_ENERGYPLUS_SCRIPT,
        };

        RenderedProbe {
            source: ProjectFile {
                name: source_file_name.clone(),
                contents: fill(template, &substitutions),
            },
            descriptor_text: String::new(),
            descriptor: BuildDescriptor {
                project_name: self.spec.target_name().to_string(),
                executable_file_name: source_file_name.clone(),
                source_file_name,
                link: LinkDirective::Interpreted,
                multi_config: false,
            },
            auxiliary: Vec::new(),
        }
    }

    fn descriptor(&self, os: TargetOs, link: LinkDirective) -> BuildDescriptor {
        BuildDescriptor {
            project_name: self.spec.target_name().to_string(),
            source_file_name: self.spec.source_file_name(),
            link,
            multi_config: os.uses_multi_config_generator(),
            executable_file_name: os.executable_file_name(self.spec.target_name()),
        }
    }
}

/// Install path as it must appear inside generated string literals.
fn escaped_install_dir(install_path: &Path, os: TargetOs) -> String {
    let raw = install_path.to_string_lossy();
    let trimmed = match os {
        TargetOs::Windows => raw.trim_end_matches(['/', '\\']),
        TargetOs::Linux | TargetOs::MacOs => raw.trim_end_matches('/'),
    };
    escape_string_literal(trimmed)
}

/// Escape `value` for C/C++, CMake and Python double-quoted strings.
///
/// Backslashes and quotes are escaped on every OS; `\` is an ordinary
/// file name character outside Windows.
pub fn escape_string_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Join an already-escaped directory and a file name with the target's separator.
fn join_for(os: TargetOs, escaped_dir: &str, file_name: &str) -> String {
    match os {
        TargetOs::Windows => format!("{escaped_dir}\\\\{file_name}"),
        TargetOs::Linux | TargetOs::MacOs => format!("{escaped_dir}/{file_name}"),
    }
}
