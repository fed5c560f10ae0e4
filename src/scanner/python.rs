//! Python version detection
//!
//! Looks at, in order:
//! - `pyproject.toml`: `requires-python` inside `[project]` or `[tool.poetry]`
//! - `Pipfile`: `python_version` inside `[requires]`
//! - `setup.py`: `python_requires` anywhere
//!
//! The first file that declares a version wins.

use std::path::Path;

use regex::Regex;
use tracing::debug;

use crate::scanner::detector::{DetectError, VersionDetector, read_manifest};

/// Which lines of a manifest may declare the version
enum Sections {
    /// Only lines inside one of these tables
    Within(&'static [&'static str]),
    /// Every line
    Anywhere,
}

struct Manifest {
    file_name: &'static str,
    sections: Sections,
    pattern: Regex,
}

/// Detector for pyproject.toml, Pipfile and setup.py
pub struct PythonDetector {
    manifests: [Manifest; 3],
}

impl PythonDetector {
    pub fn new() -> Self {
        Self {
            manifests: [
                Manifest {
                    file_name: "pyproject.toml",
                    sections: Sections::Within(&["[project]", "[tool.poetry]"]),
                    // Match: requires-python = ">=3.9"
                    pattern: Regex::new(r#"(?i)requires-python\s*=\s*['"]\s*[<>=~!^]*\s*([\d.]+)"#)
                        .unwrap(),
                },
                Manifest {
                    file_name: "Pipfile",
                    sections: Sections::Within(&["[requires]"]),
                    // Match: python_version = "3.11"
                    pattern: Regex::new(r#"(?i)python_version\s*=\s*['"]\s*[<>=~!^]*\s*([\d.]+)"#)
                        .unwrap(),
                },
                Manifest {
                    file_name: "setup.py",
                    sections: Sections::Anywhere,
                    // Match: python_requires=">=3.8"
                    pattern: Regex::new(r#"(?i)python_requires\s*=\s*['"]\s*[<>=~!^]*\s*([\d.]+)"#)
                        .unwrap(),
                },
            ],
        }
    }

    fn find_version(manifest: &Manifest, content: &str) -> Option<String> {
        let mut in_section = false;

        for line in content.lines().map(str::trim) {
            if let Sections::Within(headers) = manifest.sections {
                if line.starts_with('[') {
                    in_section = headers.iter().any(|header| line.starts_with(header));
                    continue;
                }
                if !in_section {
                    continue;
                }
            }

            if let Some(caps) = manifest.pattern.captures(line) {
                return caps.get(1).map(|m| m.as_str().to_string());
            }
        }

        None
    }
}

impl Default for PythonDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionDetector for PythonDetector {
    fn ecosystem(&self) -> &'static str {
        "Python"
    }

    fn product(&self) -> &'static str {
        "python"
    }

    fn detect(&self, project_dir: &Path) -> Result<String, DetectError> {
        for manifest in &self.manifests {
            let path = project_dir.join(manifest.file_name);

            let content = match read_manifest(&path, self.ecosystem()) {
                Ok(content) => content,
                Err(DetectError::VersionNotFound { .. }) => continue,
                Err(e) => return Err(e),
            };

            match Self::find_version(manifest, &content) {
                Some(version) => return Ok(version),
                None => debug!("No Python version requirement found in {:?}", path),
            }
        }

        Err(DetectError::VersionNotFound {
            ecosystem: self.ecosystem(),
            path: project_dir.to_path_buf(),
        })
    }
}
