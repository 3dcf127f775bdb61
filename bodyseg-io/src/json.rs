//! JSON segmentation format support
//!
//! The persisted shape is a single object mapping label names to arrays of
//! vertex indices:
//!
//! ```json
//! {
//!   "body": [4, 5, 6],
//!   "left_arm": [0, 1]
//! }
//! ```
//!
//! Index order inside an array is not significant and duplicates collapse
//! on read. Output is pretty-printed with sorted labels and ascending
//! indices, so files diff cleanly between runs.

use crate::{Result, SegmentationReader, SegmentationWriter};
use bodyseg_core::Segmentation;
use std::fs;
use std::path::Path;

pub struct JsonSegmentationReader;
pub struct JsonSegmentationWriter;

impl SegmentationReader for JsonSegmentationReader {
    fn read_segmentation<P: AsRef<Path>>(path: P) -> Result<Segmentation> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

impl SegmentationWriter for JsonSegmentationWriter {
    fn write_segmentation<P: AsRef<Path>>(segmentation: &Segmentation, path: P) -> Result<()> {
        let contents = serde_json::to_string_pretty(segmentation)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IoError;

    fn sample_segmentation() -> Segmentation {
        let mut seg = Segmentation::new();
        seg.extend_part("body", [4, 5, 6]);
        seg.extend_part("left_arm", [0, 1]);
        seg.extend_part("right_arm", [2, 3]);
        seg
    }

    #[test]
    fn test_parse_object_shape() {
        let seg: Segmentation =
            serde_json::from_str(r#"{"body": [2, 0, 1], "left_leg": []}"#).unwrap();
        assert_eq!(seg.num_parts(), 2);
        let body: Vec<usize> = seg.part("body").unwrap().iter().copied().collect();
        assert_eq!(body, vec![0, 1, 2]);
        assert!(seg.part("left_leg").unwrap().is_empty());
    }

    #[test]
    fn test_parse_collapses_duplicate_indices() {
        let seg: Segmentation = serde_json::from_str(r#"{"body": [7, 7, 7]}"#).unwrap();
        assert_eq!(seg.part("body").unwrap().len(), 1);
    }

    #[test]
    fn test_serialize_shape() {
        let rendered = serde_json::to_string(&sample_segmentation()).unwrap();
        assert_eq!(
            rendered,
            r#"{"body":[4,5,6],"left_arm":[0,1],"right_arm":[2,3]}"#
        );
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join("bodyseg_json_round_trip.json");
        let seg = sample_segmentation();

        crate::write_segmentation(&seg, &path).unwrap();
        let loaded = crate::read_segmentation(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded, seg);
    }

    #[test]
    fn test_malformed_json_rejected() {
        let path = std::env::temp_dir().join("bodyseg_json_malformed.json");
        fs::write(&path, "{not valid json").unwrap();
        let result = crate::read_segmentation(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(IoError::Malformed(_))));
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let result = crate::read_segmentation("segmentation.obj");
        assert!(matches!(
            result,
            Err(IoError::UnsupportedFormat { extension: Some(ext) }) if ext == "obj"
        ));
    }
}
