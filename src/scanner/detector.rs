//! Version detector trait definition

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::scanner::go_mod::GoModDetector;
use crate::scanner::language::Language;
use crate::scanner::package_json::PackageJsonDetector;
use crate::scanner::python::PythonDetector;

/// Trait for reading a runtime version out of a project's manifest files
pub trait VersionDetector {
    /// Human-readable ecosystem name used in messages (e.g. "Go")
    fn ecosystem(&self) -> &'static str;

    /// endoflife.date product the detected version belongs to
    fn product(&self) -> &'static str;

    /// Detect the runtime version required by the project in `project_dir`
    fn detect(&self, project_dir: &Path) -> Result<String, DetectError>;
}

/// Error type for version detection
#[derive(Debug, Error)]
pub enum DetectError {
    /// The manifest is absent or doesn't declare a version
    #[error("{ecosystem} version not found in {path:?}")]
    VersionNotFound {
        ecosystem: &'static str,
        path: PathBuf,
    },

    /// The manifest exists but couldn't be read
    #[error("failed to read {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },

    /// The manifest is malformed
    #[error("failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Detector for the given language, if its version can be detected
pub fn detector_for(language: Language) -> Option<Box<dyn VersionDetector>> {
    match language {
        Language::Go => Some(Box::new(GoModDetector::new())),
        Language::Python => Some(Box::new(PythonDetector::new())),
        Language::JavaScript | Language::TypeScript => Some(Box::new(PackageJsonDetector::new())),
        Language::Java | Language::Unknown => None,
    }
}

/// Read a manifest, mapping a missing file to `VersionNotFound`
pub(crate) fn read_manifest(path: &Path, ecosystem: &'static str) -> Result<String, DetectError> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            DetectError::VersionNotFound {
                ecosystem,
                path: path.to_path_buf(),
            }
        } else {
            DetectError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}
