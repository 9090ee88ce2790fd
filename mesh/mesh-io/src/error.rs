//! Error types for mesh loading.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for mesh I/O operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors that can occur while loading or saving a mesh.
///
/// Every variant is fatal for a slice job; the loader never retries.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// Extension that no loader handles.
    #[error("unsupported mesh format: .{extension}")]
    UnsupportedFormat {
        /// The unrecognized extension.
        extension: String,
    },

    /// Invalid file content.
    #[error("invalid mesh data: {message}")]
    InvalidContent {
        /// Description of what was invalid.
        message: String,
    },

    /// Binary STL shorter than its declared triangle count.
    #[error("truncated STL: header declares {declared} triangles, data holds {available}")]
    Truncated {
        /// Triangle count from the header.
        declared: u32,
        /// Complete triangles actually present.
        available: usize,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LoadError {
    /// Create an `InvalidContent` error with the given message.
    #[must_use]
    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::InvalidContent {
            message: message.into(),
        }
    }
}
