//! Geometric body-part segmentation
//!
//! Assigns every vertex to one of six anatomical regions from its normalized
//! height and lateral position. The mesh is centered at its centroid first;
//! Y is assumed to be the up axis and X the left/right axis. Orientation is
//! not detected or corrected.

use crate::normalize::centroid;
use crate::Segmenter;
use bodyseg_core::{Error, Result, Segmentation, TriangleMesh, FALLBACK_LABEL};
use rayon::prelude::*;
use tracing::debug;

/// Regions smaller than this are dissolved into [`FALLBACK_LABEL`]
pub const MIN_REGION_SIZE: usize = 10;

/// A height-band rule: label plus inclusive normalized-height interval.
///
/// Bands are evaluated in declaration order and the first match wins, so
/// the ordering of [`HEIGHT_BANDS`] is part of the contract: a vertex that
/// satisfies both the `body` and `left_arm` rules goes to `body` because
/// `body` is declared first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightBand {
    pub label: &'static str,
    pub min: f32,
    pub max: f32,
}

impl HeightBand {
    /// Interval midpoint, the distance target for fallback assignment
    pub fn midpoint(&self) -> f32 {
        (self.min + self.max) / 2.0
    }

    fn contains(&self, height: f32) -> bool {
        self.min <= height && height <= self.max
    }

    /// Lateral/vertical rule that must hold in addition to the interval
    fn accepts(&self, lateral: f32, height: f32) -> bool {
        match self.label {
            "body" => (0.45..=0.80).contains(&height) && lateral.abs() < 0.3,
            "left_arm" => lateral < 0.0,
            "right_arm" => lateral > 0.0,
            "left_leg" => lateral < 0.0 && height < 0.5,
            "right_leg" => lateral > 0.0 && height < 0.5,
            "face_internal" => height > 0.85,
            _ => true,
        }
    }
}

/// The six fixed bands, in tie-break order
pub const HEIGHT_BANDS: [HeightBand; 6] = [
    HeightBand { label: "body", min: 0.45, max: 0.80 },
    HeightBand { label: "left_arm", min: 0.45, max: 0.80 },
    HeightBand { label: "right_arm", min: 0.45, max: 0.80 },
    HeightBand { label: "left_leg", min: 0.0, max: 0.45 },
    HeightBand { label: "right_leg", min: 0.0, max: 0.45 },
    HeightBand { label: "face_internal", min: 0.85, max: 1.0 },
];

/// First band whose interval and rule both hold; otherwise the band with
/// the midpoint closest to `height`, earliest declared on ties.
fn classify(lateral: f32, height: f32) -> &'static str {
    for band in &HEIGHT_BANDS {
        if band.contains(height) && band.accepts(lateral, height) {
            return band.label;
        }
    }

    let mut closest = &HEIGHT_BANDS[0];
    let mut best = (height - closest.midpoint()).abs();
    for band in &HEIGHT_BANDS[1..] {
        let distance = (height - band.midpoint()).abs();
        if distance < best {
            best = distance;
            closest = band;
        }
    }
    closest.label
}

/// Segment a mesh into body parts from height bands and lateral rules.
///
/// The returned segmentation partitions the full index range: every vertex
/// appears in exactly one label. At most six labels are produced; a band
/// that collects fewer than [`MIN_REGION_SIZE`] vertices is dissolved and
/// its members end up under [`FALLBACK_LABEL`].
///
/// # Errors
///
/// Returns [`Error::InvalidMesh`] for a mesh with no vertices or with zero
/// vertical extent (all vertices coplanar on the up axis).
pub fn geometric_segmentation(mesh: &TriangleMesh) -> Result<Segmentation> {
    if mesh.is_empty() {
        return Err(Error::InvalidMesh("mesh has no vertices".to_string()));
    }

    let center = centroid(mesh);

    let mut min_y = f32::INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for v in &mesh.vertices {
        let y = v.y - center.y;
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    let height = max_y - min_y;
    if height <= 0.0 {
        return Err(Error::InvalidMesh(format!(
            "degenerate vertical extent {height} (all vertices at the same height?)"
        )));
    }

    // Per-vertex classification is independent; merge is index-ordered and
    // therefore deterministic regardless of rayon's work splitting.
    let labels: Vec<&'static str> = mesh
        .vertices
        .par_iter()
        .map(|v| {
            let lateral = v.x - center.x;
            let normalized_height = ((v.y - center.y) - min_y) / height;
            classify(lateral, normalized_height)
        })
        .collect();

    let mut segmentation = Segmentation::new();
    for (index, label) in labels.into_iter().enumerate() {
        segmentation.assign(label, index);
    }

    // Dissolve undersized regions; their members rejoin via the
    // unassigned sweep below.
    let undersized: Vec<String> = segmentation
        .iter()
        .filter(|(_, indices)| indices.len() < MIN_REGION_SIZE)
        .map(|(label, _)| label.clone())
        .collect();
    for label in undersized {
        if let Some(indices) = segmentation.remove_part(&label) {
            debug!(
                "removing small part {:?} ({} vertices)",
                label,
                indices.len()
            );
        }
    }

    let unassigned = segmentation.unassigned(mesh.vertex_count());
    if !unassigned.is_empty() {
        debug!(
            "merging {} unassigned vertices into {:?}",
            unassigned.len(),
            FALLBACK_LABEL
        );
        segmentation.extend_part(FALLBACK_LABEL, unassigned);
    }

    Ok(segmentation)
}

/// Strategy wrapper around [`geometric_segmentation`]
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometricSegmenter;

impl Segmenter for GeometricSegmenter {
    fn segment(&self, mesh: &TriangleMesh) -> Result<Segmentation> {
        geometric_segmentation(mesh)
    }
}
