//! Folder tidying: move files into per-type or per-month subfolders

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use super::ToolError;
use crate::pipeline::lowercase_extension;

pub const OTHERS_FOLDER: &str = "Others";

/// Grouping rule for [`move_into`] destinations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// `Pdf`, `Txt`, ... or `Others` without an extension
    Type,
    /// `YYYY-MM` of the modification time
    Date,
}

impl SortKey {
    pub fn folder_for(&self, path: &Path) -> Result<String, ToolError> {
        match self {
            SortKey::Type => Ok(type_folder(path)),
            SortKey::Date => date_folder(path),
        }
    }
}

pub fn type_folder(path: &Path) -> String {
    match lowercase_extension(path) {
        Some(ext) => capitalize(&ext),
        None => OTHERS_FOLDER.to_string(),
    }
}

pub fn date_folder(path: &Path) -> Result<String, ToolError> {
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| ToolError::io(path, e))?;
    Ok(DateTime::<Local>::from(modified).format("%Y-%m").to_string())
}

/// Move `file` into `<root>/<folder>/`, creating the folder as needed.
///
/// An existing file at the destination is never replaced.
pub fn move_into(root: &Path, file: &Path, folder: &str) -> Result<PathBuf, ToolError> {
    let name = file
        .file_name()
        .ok_or_else(|| ToolError::Invalid(format!("{} has no file name", file.display())))?;
    let target_dir = root.join(folder);
    fs::create_dir_all(&target_dir).map_err(|e| ToolError::io(&target_dir, e))?;

    let destination = target_dir.join(name);
    if destination.exists() {
        return Err(ToolError::DestinationExists(destination));
    }
    fs::rename(file, &destination).map_err(|e| ToolError::io(file, e))?;
    tracing::debug!(from = %file.display(), to = %destination.display(), "moved");
    Ok(destination)
}

pub fn sort_file(root: &Path, file: &Path, key: SortKey) -> Result<PathBuf, ToolError> {
    let folder = key.folder_for(file)?;
    move_into(root, file, &folder)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
