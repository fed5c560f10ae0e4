//! Go version detection from go.mod
//!
//! The version is the argument of the `go` directive:
//!
//! ```text
//! module example.com/app
//!
//! go 1.21.5
//! ```

use std::path::Path;

use crate::scanner::detector::{DetectError, VersionDetector, read_manifest};

const MANIFEST: &str = "go.mod";

/// Detector for go.mod files
pub struct GoModDetector;

impl GoModDetector {
    pub fn new() -> Self {
        Self
    }

    /// First `go <version>` directive in the file content
    fn parse(content: &str) -> Option<String> {
        content
            .lines()
            .filter_map(|line| line.strip_prefix("go "))
            .map(str::trim)
            .find(|version| !version.is_empty())
            .map(str::to_string)
    }
}

impl Default for GoModDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionDetector for GoModDetector {
    fn ecosystem(&self) -> &'static str {
        "Go"
    }

    fn product(&self) -> &'static str {
        "go"
    }

    fn detect(&self, project_dir: &Path) -> Result<String, DetectError> {
        let path = project_dir.join(MANIFEST);
        let content = read_manifest(&path, self.ecosystem())?;

        Self::parse(&content).ok_or(DetectError::VersionNotFound {
            ecosystem: self.ecosystem(),
            path,
        })
    }
}
