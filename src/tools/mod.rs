//! Tools module - the content transforms each menu entry runs
//!
//! Every function here works on concrete paths; selection and reporting are
//! handled by the pipeline.

pub mod email;
pub mod error;
pub mod office;
pub mod organize;
pub mod pdf;
pub mod raster;
pub mod word;

pub use error::ToolError;

use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Write `path` through a temporary file in the same folder.
///
/// The destination only appears once `write` has finished successfully.
pub fn write_atomically<F>(path: &Path, write: F) -> Result<(), ToolError>
where
    F: FnOnce(&mut NamedTempFile) -> Result<(), ToolError>,
{
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut file = NamedTempFile::new_in(dir).map_err(|e| ToolError::io(dir, e))?;
    write(&mut file)?;
    file.persist(path)
        .map_err(|e| ToolError::io(path, e.error))?;
    tracing::debug!(path = %path.display(), "output written");
    Ok(())
}

/// `<dir>/<stem><suffix>.<extension>` next to `input`.
pub fn sibling_path(input: &Path, suffix: &str, extension: &str) -> PathBuf {
    let parent = input.parent().unwrap_or_else(|| Path::new("."));
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    parent.join(format!("{}{}.{}", stem, suffix, extension))
}
