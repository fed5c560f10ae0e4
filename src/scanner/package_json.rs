//! Node.js version detection from package.json (`engines.node`)

use std::path::Path;

use serde::Deserialize;

use crate::scanner::detector::{DetectError, VersionDetector, read_manifest};

const MANIFEST: &str = "package.json";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PackageJson {
    engines: Engines,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Engines {
    node: Option<String>,
}

/// Detector for package.json files
pub struct PackageJsonDetector;

impl PackageJsonDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PackageJsonDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionDetector for PackageJsonDetector {
    fn ecosystem(&self) -> &'static str {
        "Node.js"
    }

    fn product(&self) -> &'static str {
        "nodejs"
    }

    fn detect(&self, project_dir: &Path) -> Result<String, DetectError> {
        let path = project_dir.join(MANIFEST);
        let content = read_manifest(&path, self.ecosystem())?;

        let package: PackageJson =
            serde_json::from_str(&content).map_err(|e| DetectError::Parse {
                path: path.clone(),
                message: e.to_string(),
            })?;

        package
            .engines
            .node
            .map(|node| node.trim().to_string())
            .filter(|node| !node.is_empty())
            .ok_or(DetectError::VersionNotFound {
                ecosystem: self.ecosystem(),
                path,
            })
    }
}
