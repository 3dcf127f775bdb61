//! Error types for bodyseg

use thiserror::Error;

/// Errors produced by the segmentation engine.
///
/// Structural problems (bad mesh, bad parameters) abort a segmentation run
/// entirely; no partial result is returned. Data-quality issues such as
/// out-of-range reference indices are not errors: they are recovered
/// locally and reported through [`crate::Segmentation`] helpers and the
/// transfer report.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for bodyseg operations
pub type Result<T> = std::result::Result<T, Error>;
