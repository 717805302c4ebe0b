use crate::error::{ModelsError, Result};
use std::path::Path;

pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| map_permission(e, path))?;
    }
    Ok(())
}

/// Moves a finished download into place, replacing whatever is at `to`.
pub fn replace_file(from: &Path, to: &Path) -> Result<()> {
    std::fs::rename(from, to).map_err(|e| map_permission(e, to))?;
    Ok(())
}

/// Removes a file if present; a missing file is not an error.
pub fn remove_file_if_exists(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(map_permission(e, path)),
    }
}

pub(crate) fn map_permission(e: std::io::Error, path: &Path) -> ModelsError {
    match e.kind() {
        std::io::ErrorKind::PermissionDenied => ModelsError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => ModelsError::from(e),
    }
}
