//! I/O operations for segmentations
//!
//! This crate persists the segmentation mapping (label name to array of
//! 0-based vertex indices) in the JSON shape the rest of the toolchain
//! (simulation, texturing, visualization) consumes. Mesh file formats are
//! a separate concern and live outside this workspace.

pub mod json;
pub mod error;

pub use error::*;
pub use json::{JsonSegmentationReader, JsonSegmentationWriter};

use bodyseg_core::Segmentation;
use std::path::Path;

/// Trait for reading segmentations from files
pub trait SegmentationReader {
    fn read_segmentation<P: AsRef<Path>>(path: P) -> Result<Segmentation>;
}

/// Trait for writing segmentations to files
pub trait SegmentationWriter {
    fn write_segmentation<P: AsRef<Path>>(segmentation: &Segmentation, path: P) -> Result<()>;
}

/// Auto-detect format from the extension and read a segmentation
pub fn read_segmentation<P: AsRef<Path>>(path: P) -> Result<Segmentation> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => json::JsonSegmentationReader::read_segmentation(path),
        other => Err(IoError::UnsupportedFormat {
            extension: other.map(str::to_string),
        }),
    }
}

/// Auto-detect format from the extension and write a segmentation
pub fn write_segmentation<P: AsRef<Path>>(segmentation: &Segmentation, path: P) -> Result<()> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => json::JsonSegmentationWriter::write_segmentation(segmentation, path),
        other => Err(IoError::UnsupportedFormat {
            extension: other.map(str::to_string),
        }),
    }
}
