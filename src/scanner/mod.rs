//! Project scanner
//! - language.rs: Language identification over a project tree
//! - detector.rs: VersionDetector trait and detector lookup by language
//! - go_mod.rs: Go version from go.mod
//! - package_json.rs: Node.js version from package.json
//! - python.rs: Python version from pyproject.toml, Pipfile or setup.py

pub mod detector;
pub mod go_mod;
pub mod language;
pub mod package_json;
pub mod python;

pub use detector::{DetectError, VersionDetector, detector_for};
pub use go_mod::GoModDetector;
pub use language::{Language, ScanError, identify};
pub use package_json::PackageJsonDetector;
pub use python::PythonDetector;
