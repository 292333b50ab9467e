//! Errors raised by the content collaborators

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("PDF is password protected; unlock it first")]
    Encrypted,

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Wrong password")]
    WrongPassword,

    #[error("Word document error: {0}")]
    Word(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("{program} failed: {detail}")]
    External { program: String, detail: String },

    #[error("Destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    #[error("{0}")]
    Invalid(String),
}

impl ToolError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ToolError::Io {
            path: path.into(),
            source,
        }
    }
}
