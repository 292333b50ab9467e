//! Candidate discovery: turn a user-entered path into an ordered listing

use std::fs;
use std::path::{Path, PathBuf};

use super::error::PipelineError;

/// Which directory entries are eligible for a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFilter {
    /// Regular files whose lowercase extension is in the list (without the dot)
    Extensions(&'static [&'static str]),
    /// Any regular file
    RegularFiles,
}

pub const PDF: TypeFilter = TypeFilter::Extensions(&["pdf"]);
pub const WORD: TypeFilter = TypeFilter::Extensions(&["doc", "docx"]);
pub const DOCX: TypeFilter = TypeFilter::Extensions(&["docx"]);
pub const IMAGES: TypeFilter = TypeFilter::Extensions(&["jpg", "jpeg", "png"]);

impl TypeFilter {
    pub fn matches(&self, path: &Path) -> bool {
        if !path.is_file() {
            return false;
        }
        match self {
            TypeFilter::RegularFiles => true,
            TypeFilter::Extensions(allowed) => lowercase_extension(path)
                .map(|ext| allowed.contains(&ext.as_str()))
                .unwrap_or(false),
        }
    }
}

/// A user-entered path after checking what it points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Root {
    File(PathBuf),
    Directory(PathBuf),
}

/// Expand a leading `~` and make the path absolute where possible.
pub fn expand_path(raw: &str) -> PathBuf {
    let raw = raw.trim();
    let expanded = match raw.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') => {
            match dirs::home_dir() {
                Some(home) => home.join(rest.trim_start_matches(['/', '\\'])),
                None => PathBuf::from(raw),
            }
        }
        _ => PathBuf::from(raw),
    };
    fs::canonicalize(&expanded).unwrap_or(expanded)
}

/// Check that `path` exists and classify it.
pub fn resolve_root(path: &Path) -> Result<Root, PipelineError> {
    if path.is_dir() {
        Ok(Root::Directory(path.to_path_buf()))
    } else if path.is_file() {
        Ok(Root::File(path.to_path_buf()))
    } else {
        Err(PipelineError::MissingRoot(path.to_path_buf()))
    }
}

/// List the entries of `dir` accepted by `filter`, sorted by file name.
pub fn enumerate(dir: &Path, filter: TypeFilter) -> Result<Vec<PathBuf>, PipelineError> {
    let io_err = |source| PipelineError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if filter.matches(&path) {
            entries.push(path);
        }
    }
    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    tracing::debug!(dir = %dir.display(), count = entries.len(), "enumerated candidates");
    Ok(entries)
}

pub fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"x").unwrap();
        path
    }

    #[test]
    fn test_extension_filter_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let upper = touch(dir.path(), "SCAN.PDF");
        let other = touch(dir.path(), "notes.txt");
        assert!(PDF.matches(&upper));
        assert!(!PDF.matches(&other));
    }

    #[test]
    fn test_directories_never_match() {
        let dir = TempDir::new().unwrap();
        let folder = dir.path().join("archive.pdf");
        fs::create_dir(&folder).unwrap();
        assert!(!PDF.matches(&folder));
        assert!(!TypeFilter::RegularFiles.matches(&folder));
    }

    #[test]
    fn test_enumerate_sorts_and_filters() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b.png");
        touch(dir.path(), "a.jpg");
        touch(dir.path(), "c.txt");
        fs::create_dir(dir.path().join("sub")).unwrap();

        let names: Vec<String> = enumerate(dir.path(), IMAGES)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.png"]);

        assert_eq!(enumerate(dir.path(), TypeFilter::RegularFiles).unwrap().len(), 3);
    }

    #[test]
    fn test_resolve_root_classifies_paths() {
        let dir = TempDir::new().unwrap();
        let file = touch(dir.path(), "a.pdf");
        assert_eq!(resolve_root(&file).unwrap(), Root::File(file.clone()));
        assert_eq!(
            resolve_root(dir.path()).unwrap(),
            Root::Directory(dir.path().to_path_buf())
        );
        assert!(matches!(
            resolve_root(&dir.path().join("missing")),
            Err(PipelineError::MissingRoot(_))
        ));
    }

    #[test]
    fn test_expand_path_handles_home() {
        if let Some(home) = dirs::home_dir() {
            let expanded = expand_path("~");
            let home = fs::canonicalize(&home).unwrap_or(home);
            assert_eq!(expanded, home);
        }
    }
}
