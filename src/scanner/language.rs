//! Language identification by file extension

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Directories never descended into
const IGNORED_DIRS: [&str; 7] = [
    ".git",
    "node_modules",
    "vendor",
    "target",
    ".venv",
    "venv",
    "__pycache__",
];

/// Manifest file names and the language they declare
const MANIFESTS: [(&str, Language); 6] = [
    ("go.mod", Language::Go),
    ("package.json", Language::JavaScript),
    ("pyproject.toml", Language::Python),
    ("Pipfile", Language::Python),
    ("setup.py", Language::Python),
    ("requirements.txt", Language::Python),
];

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to access files or directories in {root:?}: {source}")]
    Walk {
        root: PathBuf,
        source: walkdir::Error,
    },
}

/// Programming language of a project directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Language {
    Go,
    Python,
    JavaScript,
    TypeScript,
    Java,
    Unknown,
}

impl Language {
    /// Language for a file, judged by its manifest name or else its extension
    /// (case-insensitive)
    pub fn of_path(path: &Path) -> Self {
        let manifest = path.file_name().and_then(|name| name.to_str()).and_then(|name| {
            MANIFESTS
                .iter()
                .find(|(manifest, _)| *manifest == name)
                .map(|(_, language)| *language)
        });
        if let Some(language) = manifest {
            return language;
        }

        let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
            return Language::Unknown;
        };

        match extension.to_ascii_lowercase().as_str() {
            "go" => Language::Go,
            "py" => Language::Python,
            "js" => Language::JavaScript,
            "ts" => Language::TypeScript,
            "java" => Language::Java,
            _ => Language::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Go => "Go",
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
            Language::Java => "Java",
            Language::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_ignored(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| IGNORED_DIRS.contains(&name))
}

/// Map each directory under `root` to the language of its first recognized file.
///
/// A file is recognized by a known manifest name (`go.mod`, `package.json`,
/// `pyproject.toml`, ...) or by its extension.
/// Entries are visited in file-name order. A directory keeps the first language
/// found in it; later files with another language don't replace it. Without
/// `recursive` only files directly inside `root` are considered.
pub fn identify(root: &Path, recursive: bool) -> Result<IndexMap<PathBuf, Language>, ScanError> {
    let mut walker = WalkDir::new(root).follow_links(false).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut languages = IndexMap::new();

    for entry in walker.into_iter().filter_entry(|e| !is_ignored(e)) {
        let entry = entry.map_err(|source| ScanError::Walk {
            root: root.to_path_buf(),
            source,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let language = Language::of_path(entry.path());
        if language == Language::Unknown {
            continue;
        }

        let Some(dir) = entry.path().parent() else {
            continue;
        };

        languages.entry(dir.to_path_buf()).or_insert_with(|| {
            debug!("Detected {} in {:?}", language, dir);
            language
        });
    }

    Ok(languages)
}
