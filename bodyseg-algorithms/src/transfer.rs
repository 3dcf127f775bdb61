//! Label transfer from a labeled reference mesh
//!
//! Every target vertex takes the label of its nearest reference vertex.
//! Data-quality problems in the reference (out-of-range indices, vertices
//! no label claims) are recovered locally and surfaced in a report instead
//! of aborting the run.

use crate::nearest_neighbor::BruteForceSearch;
use crate::Segmenter;
use bodyseg_core::{Error, NearestNeighborSearch, Result, Segmentation, TriangleMesh};
use rayon::prelude::*;
use tracing::warn;

/// Recoverable findings from a transfer run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferReport {
    /// Reference indices outside the reference mesh's vertex range,
    /// excluded from their label's effective set
    pub dropped_reference_indices: usize,
    /// Target vertices whose nearest reference vertex carries no label.
    /// These stay out of every part rather than being silently dropped.
    pub unassigned: Vec<usize>,
}

/// A transferred segmentation plus its data-quality report
#[derive(Debug, Clone, PartialEq)]
pub struct TransferResult {
    pub segmentation: Segmentation,
    pub report: TransferReport,
}

/// Transfer a segmentation from a labeled reference mesh onto a target.
///
/// For each target vertex the nearest reference vertex (Euclidean distance,
/// ties to the lowest reference index) is located with a full scan of the
/// reference, O(N·M) overall, parallelized over target vertices. The target vertex
/// joins whichever label claims that reference vertex; when several labels
/// claim it, the lexicographically first label wins.
///
/// The output label set mirrors the reference's labels, including labels no
/// target vertex landed in. Coverage of the target is complete only when
/// the reference segmentation covers the whole reference mesh; anything
/// else ends up in [`TransferReport::unassigned`].
///
/// # Errors
///
/// Returns [`Error::InvalidMesh`] when the target or reference mesh has no
/// vertices.
pub fn transfer_segmentation(
    target: &TriangleMesh,
    reference: &TriangleMesh,
    reference_segmentation: &Segmentation,
) -> Result<TransferResult> {
    if target.is_empty() {
        return Err(Error::InvalidMesh("target mesh has no vertices".to_string()));
    }
    if reference.is_empty() {
        return Err(Error::InvalidMesh(
            "reference mesh has no vertices".to_string(),
        ));
    }

    // Out-of-range reference indices are ignored, not fatal.
    let mut reference_parts = reference_segmentation.clone();
    let dropped = reference_parts.retain_valid(reference.vertex_count());
    if dropped > 0 {
        warn!(
            "ignoring {} reference indices outside [0, {})",
            dropped,
            reference.vertex_count()
        );
    }

    // Reference vertex -> label, first label in iteration order wins.
    let mut reference_labels: Vec<Option<&str>> = vec![None; reference.vertex_count()];
    for (label, indices) in reference_parts.iter() {
        for &index in indices {
            if reference_labels[index].is_none() {
                reference_labels[index] = Some(label.as_str());
            }
        }
    }

    let search = BruteForceSearch::new(&reference.vertices);
    let nearest_labels: Vec<Option<&str>> = target
        .vertices
        .par_iter()
        .map(|vertex| {
            search
                .find_nearest(vertex)
                .and_then(|(index, _)| reference_labels[index])
        })
        .collect();

    let mut segmentation = Segmentation::new();
    for label in reference_parts.labels() {
        segmentation.ensure_part(label);
    }

    let mut unassigned = Vec::new();
    for (index, label) in nearest_labels.into_iter().enumerate() {
        match label {
            Some(label) => segmentation.assign(label, index),
            None => unassigned.push(index),
        }
    }
    if !unassigned.is_empty() {
        warn!(
            "{} target vertices map to unlabeled reference vertices",
            unassigned.len()
        );
    }

    Ok(TransferResult {
        segmentation,
        report: TransferReport {
            dropped_reference_indices: dropped,
            unassigned,
        },
    })
}

/// Strategy wrapper holding the reference mesh and its segmentation
#[derive(Debug, Clone)]
pub struct TransferSegmenter {
    pub reference: TriangleMesh,
    pub reference_segmentation: Segmentation,
}

impl TransferSegmenter {
    pub fn new(reference: TriangleMesh, reference_segmentation: Segmentation) -> Self {
        Self {
            reference,
            reference_segmentation,
        }
    }
}

impl Segmenter for TransferSegmenter {
    fn segment(&self, mesh: &TriangleMesh) -> Result<Segmentation> {
        transfer_segmentation(mesh, &self.reference, &self.reference_segmentation)
            .map(|result| result.segmentation)
    }
}
