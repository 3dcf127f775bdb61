//! Error types for segmentation I/O

use thiserror::Error;

/// Errors that can occur while reading or writing segmentations
#[derive(Error, Debug)]
pub enum IoError {
    #[error("unsupported segmentation format: {extension:?}")]
    UnsupportedFormat { extension: Option<String> },

    #[error("malformed segmentation data: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for segmentation I/O operations
pub type Result<T> = std::result::Result<T, IoError>;
