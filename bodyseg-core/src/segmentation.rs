//! Segmentation mapping and per-label statistics

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Label that absorbs unassigned vertices and undersized regions
/// during geometric post-processing.
pub const FALLBACK_LABEL: &str = "body";

/// A mapping from body-part label to the set of vertex indices it owns.
///
/// Labels are kept in a `BTreeMap`, so iteration over parts is always in
/// lexicographic label order. That order is load-bearing: it is the "stable
/// scan" used when a reference segmentation claims the same vertex under
/// more than one label, and it makes serialized output reproducible.
///
/// Index sets are `BTreeSet`s, so duplicates collapse and indices iterate
/// in ascending order. The persisted shape is the map itself:
/// `label -> [vertex indices]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Segmentation {
    parts: BTreeMap<String, BTreeSet<usize>>,
}

impl Segmentation {
    /// Create a new empty segmentation
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a vertex index to a label, creating the part if needed
    pub fn assign(&mut self, label: &str, index: usize) {
        self.parts.entry(label.to_string()).or_default().insert(index);
    }

    /// Add a part with the given indices, merging into an existing part
    pub fn extend_part<I: IntoIterator<Item = usize>>(&mut self, label: &str, indices: I) {
        self.parts.entry(label.to_string()).or_default().extend(indices);
    }

    /// Create an empty part if it does not exist yet.
    ///
    /// Transfer keeps every reference label in its output, including labels
    /// no target vertex landed in.
    pub fn ensure_part(&mut self, label: &str) {
        self.parts.entry(label.to_string()).or_default();
    }

    /// Remove a part, returning its indices if it existed
    pub fn remove_part(&mut self, label: &str) -> Option<BTreeSet<usize>> {
        self.parts.remove(label)
    }

    /// Get the index set for a label
    pub fn part(&self, label: &str) -> Option<&BTreeSet<usize>> {
        self.parts.get(label)
    }

    /// Whether a label is present
    pub fn contains_label(&self, label: &str) -> bool {
        self.parts.contains_key(label)
    }

    /// Iterate over `(label, indices)` pairs in lexicographic label order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<usize>)> {
        self.parts.iter()
    }

    /// Iterate over labels in lexicographic order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(|s| s.as_str())
    }

    /// Number of parts
    pub fn num_parts(&self) -> usize {
        self.parts.len()
    }

    /// Whether the segmentation has no parts
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Total number of assigned vertex indices across all parts.
    ///
    /// A vertex claimed by more than one label is counted once per label.
    pub fn assigned_count(&self) -> usize {
        self.parts.values().map(|set| set.len()).sum()
    }

    /// Find the label owning a vertex index, if any.
    ///
    /// When several labels claim the index, the lexicographically first
    /// label is returned.
    pub fn label_of(&self, index: usize) -> Option<&str> {
        self.parts
            .iter()
            .find(|(_, set)| set.contains(&index))
            .map(|(label, _)| label.as_str())
    }

    /// Indices in `[0, vertex_count)` that belong to no part
    pub fn unassigned(&self, vertex_count: usize) -> Vec<usize> {
        let assigned: BTreeSet<usize> = self.parts.values().flatten().copied().collect();
        (0..vertex_count).filter(|i| !assigned.contains(i)).collect()
    }

    /// Drop indices outside `[0, vertex_count)` from every part.
    ///
    /// Returns the number of dropped indices. Parts emptied by the pruning
    /// are kept, so the label set is preserved.
    pub fn retain_valid(&mut self, vertex_count: usize) -> usize {
        let mut dropped = 0;
        for set in self.parts.values_mut() {
            let before = set.len();
            set.retain(|&i| i < vertex_count);
            dropped += before - set.len();
        }
        dropped
    }
}

/// Vertex count and coverage for a single label
#[derive(Debug, Clone, PartialEq)]
pub struct PartStats {
    pub label: String,
    pub count: usize,
    /// Share of *total mesh vertices*, in percent
    pub percentage: f64,
}

/// Per-label statistics for a segmentation.
///
/// Percentages are computed against the owning mesh's full vertex count,
/// not against the sum of label counts. When a segmentation leaves vertices
/// unassigned (possible with transfer), the percentages sum to less than
/// 100. That undercount is an observable property of the method and is
/// reported as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentationStats {
    pub parts: Vec<PartStats>,
    pub total_assigned: usize,
    pub total_vertices: usize,
}

impl SegmentationStats {
    /// Compute statistics for a segmentation over a mesh with `vertex_count` vertices
    pub fn compute(segmentation: &Segmentation, vertex_count: usize) -> Self {
        let parts = segmentation
            .iter()
            .map(|(label, indices)| PartStats {
                label: label.clone(),
                count: indices.len(),
                percentage: if vertex_count > 0 {
                    100.0 * indices.len() as f64 / vertex_count as f64
                } else {
                    0.0
                },
            })
            .collect();

        Self {
            parts,
            total_assigned: segmentation.assigned_count(),
            total_vertices: vertex_count,
        }
    }
}

impl fmt::Display for SegmentationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} of {} vertices assigned across {} parts",
            self.total_assigned,
            self.total_vertices,
            self.parts.len()
        )?;
        for part in &self.parts {
            writeln!(
                f,
                "  {}: {} vertices ({:.1}%)",
                part.label, part.count, part.percentage
            )?;
        }
        Ok(())
    }
}
