//! Export of API responses to disk

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::EolError;

/// Name of the file written into the export directory
pub const EXPORT_FILE_NAME: &str = "output.json";

/// Write `data` to `<dir>/output.json`, creating `dir` if needed.
///
/// Returns the path of the written file.
pub fn export_to_file(data: &[u8], dir: &Path) -> Result<PathBuf, EolError> {
    fs::create_dir_all(dir).map_err(|source| EolError::Export {
        path: dir.to_path_buf(),
        source,
    })?;

    let file_path = dir.join(EXPORT_FILE_NAME);
    fs::write(&file_path, data).map_err(|source| EolError::Export {
        path: file_path.clone(),
        source,
    })?;

    info!("Content written to {:?}", file_path);
    Ok(file_path)
}
