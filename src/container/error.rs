//! Error types for TXRM container access.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while opening or reading a TXRM container.
#[derive(Error, Debug)]
pub enum ContainerError {
    /// Path does not exist or is not a regular file
    #[error("File does not exist: {}", .0.display())]
    NotFound(PathBuf),

    /// File exists but does not carry the `.txrm` extension
    #[error("File is not a .txrm file: {}", .0.display())]
    WrongExtension(PathBuf),

    /// File is not a compound document (bad signature or unreadable directory)
    #[error("Unsupported file format: {reason}")]
    UnsupportedFormat {
        /// Why the container could not be recognized
        reason: String,
    },

    /// Stream path requested from `read_stream` does not name a stream
    #[error("No stream at '{0}'")]
    NoSuchStream(String),

    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
