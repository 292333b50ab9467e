//! Input errors raised by the pipeline itself
//!
//! None of these are fatal: the caller reports them and returns to the menu.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Path not found: {}", .0.display())]
    MissingRoot(PathBuf),

    #[error("Not a folder: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("{} is not a supported {description}", .path.display())]
    WrongType { path: PathBuf, description: String },

    #[error("No {description}s found in {}", .dir.display())]
    NoMatchingItems { dir: PathBuf, description: String },

    #[error("No {description}s selected")]
    NothingSelected { description: String },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Prompt failed: {0}")]
    Prompt(#[from] io::Error),
}
