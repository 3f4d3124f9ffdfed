use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for store IO, dataset consistency, and configuration failures.
#[derive(Debug, Error)]
pub enum SubsetError {
    /// Dataset directory or manifest could not be opened.
    #[error("dataset at '{}' is unavailable: {reason}", .path.display())]
    DatasetUnavailable {
        /// Dataset directory the failure refers to.
        path: PathBuf,
        /// Human-readable failure description.
        reason: String,
    },
    /// On-disk state disagrees with its manifest.
    #[error("dataset at '{}' is inconsistent: {details}", .path.display())]
    DatasetInconsistent {
        /// Dataset directory the failure refers to.
        path: PathBuf,
        /// Human-readable failure description.
        details: String,
    },
    /// Record index outside the dataset's bounds.
    #[error("record index {index} is out of bounds for dataset of length {len}")]
    IndexOutOfBounds {
        /// Requested record index.
        index: usize,
        /// Dataset length at the time of the request.
        len: usize,
    },
    /// Underlying IO failure.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Invalid subset request (bad fraction, conflicting selection).
    #[error("configuration error: {0}")]
    Configuration(String),
}
