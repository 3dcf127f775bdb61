//! Clustering-based body-part segmentation
//!
//! Runs k-means over standardized position+normal features, then maps each
//! cluster to an anatomical label by the height of its centroid. Requires
//! per-vertex normals; meshes without them are rejected rather than
//! silently falling back to position-only features.

use crate::Segmenter;
use bodyseg_core::{Error, Result, Segmentation, TriangleMesh};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Default cluster count
pub const DEFAULT_CLUSTERS: usize = 8;

/// Fixed seed: identical input always produces identical clusters
const KMEANS_SEED: u64 = 42;

const MAX_ITERATIONS: usize = 300;

/// Position (3) + normal (3)
const FEATURE_DIM: usize = 6;

/// Labels handed to clusters in ascending centroid-height order; clusters
/// past the sixth all become `body`.
const LABELS_BY_HEIGHT: [&str; 6] = [
    "left_leg",
    "right_leg",
    "body",
    "left_arm",
    "right_arm",
    "face_internal",
];

/// Per-dimension zero-mean/unit-variance feature scaling.
///
/// Uses population variance. A dimension with zero variance keeps a scale
/// of 1 so the transform stays invertible. The fitted mean/scale pair is
/// retained to map cluster centroids back to original units.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    means: [f64; FEATURE_DIM],
    scales: [f64; FEATURE_DIM],
}

impl StandardScaler {
    /// Fit the scaler on a non-empty sample set
    pub fn fit(samples: &[[f64; FEATURE_DIM]]) -> Self {
        let n = samples.len() as f64;

        let mut means = [0.0; FEATURE_DIM];
        for sample in samples {
            for (mean, value) in means.iter_mut().zip(sample) {
                *mean += value;
            }
        }
        for mean in &mut means {
            *mean /= n;
        }

        let mut scales = [0.0; FEATURE_DIM];
        for sample in samples {
            for dim in 0..FEATURE_DIM {
                let delta = sample[dim] - means[dim];
                scales[dim] += delta * delta;
            }
        }
        for scale in &mut scales {
            let std_dev = (*scale / n).sqrt();
            *scale = if std_dev > 0.0 { std_dev } else { 1.0 };
        }

        Self { means, scales }
    }

    /// Map a sample into standardized space
    pub fn transform(&self, sample: &[f64; FEATURE_DIM]) -> [f64; FEATURE_DIM] {
        let mut out = [0.0; FEATURE_DIM];
        for dim in 0..FEATURE_DIM {
            out[dim] = (sample[dim] - self.means[dim]) / self.scales[dim];
        }
        out
    }

    /// Map a standardized sample back to original units
    pub fn inverse_transform(&self, sample: &[f64; FEATURE_DIM]) -> [f64; FEATURE_DIM] {
        let mut out = [0.0; FEATURE_DIM];
        for dim in 0..FEATURE_DIM {
            out[dim] = sample[dim] * self.scales[dim] + self.means[dim];
        }
        out
    }
}

fn distance_squared(a: &[f64; FEATURE_DIM], b: &[f64; FEATURE_DIM]) -> f64 {
    let mut sum = 0.0;
    for dim in 0..FEATURE_DIM {
        let delta = a[dim] - b[dim];
        sum += delta * delta;
    }
    sum
}

/// Index of the closest centroid, lowest index on ties
fn closest_centroid(sample: &[f64; FEATURE_DIM], centroids: &[[f64; FEATURE_DIM]]) -> usize {
    let mut best = 0;
    let mut best_distance = distance_squared(sample, &centroids[0]);
    for (idx, centroid) in centroids.iter().enumerate().skip(1) {
        let distance = distance_squared(sample, centroid);
        if distance < best_distance {
            best_distance = distance;
            best = idx;
        }
    }
    best
}

struct KMeansFit {
    assignments: Vec<usize>,
    centroids: Vec<[f64; FEATURE_DIM]>,
}

/// Seeded k-means with k-means++ initialization and Lloyd refinement.
///
/// Runs sequentially so the seed fully determines the outcome: two runs on
/// identical input produce bit-identical assignments. A cluster that loses
/// all members keeps its previous centroid.
fn kmeans(samples: &[[f64; FEATURE_DIM]], k: usize, seed: u64) -> KMeansFit {
    let mut rng = StdRng::seed_from_u64(seed);

    // k-means++: first centroid uniformly, the rest proportional to the
    // squared distance from the nearest centroid chosen so far.
    let mut centroids: Vec<[f64; FEATURE_DIM]> = Vec::with_capacity(k);
    centroids.push(samples[rng.gen_range(0..samples.len())]);
    while centroids.len() < k {
        let weights: Vec<f64> = samples
            .iter()
            .map(|sample| {
                centroids
                    .iter()
                    .map(|c| distance_squared(sample, c))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();
        let total: f64 = weights.iter().sum();

        let next = if total > 0.0 {
            let mut threshold = rng.gen::<f64>() * total;
            let mut chosen = samples.len() - 1;
            for (idx, weight) in weights.iter().enumerate() {
                threshold -= weight;
                if threshold <= 0.0 {
                    chosen = idx;
                    break;
                }
            }
            chosen
        } else {
            // all samples coincide with a centroid already
            rng.gen_range(0..samples.len())
        };
        centroids.push(samples[next]);
    }

    let mut assignments = vec![usize::MAX; samples.len()];
    for _ in 0..MAX_ITERATIONS {
        let mut changed = false;
        for (idx, sample) in samples.iter().enumerate() {
            let cluster = closest_centroid(sample, &centroids);
            if assignments[idx] != cluster {
                assignments[idx] = cluster;
                changed = true;
            }
        }
        if !changed {
            break;
        }

        let mut sums = vec![[0.0; FEATURE_DIM]; k];
        let mut counts = vec![0usize; k];
        for (sample, &cluster) in samples.iter().zip(&assignments) {
            for dim in 0..FEATURE_DIM {
                sums[cluster][dim] += sample[dim];
            }
            counts[cluster] += 1;
        }
        for cluster in 0..k {
            if counts[cluster] > 0 {
                for dim in 0..FEATURE_DIM {
                    centroids[cluster][dim] = sums[cluster][dim] / counts[cluster] as f64;
                }
            }
        }
    }

    KMeansFit {
        assignments,
        centroids,
    }
}

/// Segment a mesh by clustering position+normal features.
///
/// Every vertex lands in exactly one label; the label set is a subset of
/// the six anatomical names and never empty. Unlike the geometric method,
/// no small-region cleanup is applied.
///
/// # Errors
///
/// Returns [`Error::InvalidMesh`] for a mesh with no vertices or without
/// per-vertex normals, and [`Error::InvalidParameter`] when `clusters` is
/// outside `[1, vertex_count]`. Both checks run before any computation.
pub fn cluster_segmentation(mesh: &TriangleMesh, clusters: usize) -> Result<Segmentation> {
    if mesh.is_empty() {
        return Err(Error::InvalidMesh("mesh has no vertices".to_string()));
    }
    let normals = mesh.normals.as_ref().ok_or_else(|| {
        Error::InvalidMesh("per-vertex normals are required for cluster segmentation".to_string())
    })?;
    if normals.len() != mesh.vertex_count() {
        return Err(Error::InvalidMesh(format!(
            "normal count {} does not match vertex count {}",
            normals.len(),
            mesh.vertex_count()
        )));
    }
    if clusters < 1 || clusters > mesh.vertex_count() {
        return Err(Error::InvalidParameter(format!(
            "cluster count must be in [1, {}], got {}",
            mesh.vertex_count(),
            clusters
        )));
    }

    let features: Vec<[f64; FEATURE_DIM]> = mesh
        .vertices
        .iter()
        .zip(normals)
        .map(|(v, n)| {
            [
                v.x as f64, v.y as f64, v.z as f64,
                n.x as f64, n.y as f64, n.z as f64,
            ]
        })
        .collect();

    let scaler = StandardScaler::fit(&features);
    let standardized: Vec<[f64; FEATURE_DIM]> =
        features.iter().map(|f| scaler.transform(f)).collect();

    let fit = kmeans(&standardized, clusters, KMEANS_SEED);

    // Ascending centroid height in original units; ties keep the lower
    // cluster id because the sort is stable.
    let heights: Vec<f64> = fit
        .centroids
        .iter()
        .map(|c| scaler.inverse_transform(c)[1])
        .collect();
    let mut order: Vec<usize> = (0..clusters).collect();
    order.sort_by(|&a, &b| {
        heights[a]
            .partial_cmp(&heights[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut cluster_labels = vec![""; clusters];
    for (rank, &cluster) in order.iter().enumerate() {
        cluster_labels[cluster] = if rank < LABELS_BY_HEIGHT.len() {
            LABELS_BY_HEIGHT[rank]
        } else {
            "body"
        };
    }
    debug!("cluster heights {:?} labeled {:?}", heights, cluster_labels);

    let mut segmentation = Segmentation::new();
    for (index, &cluster) in fit.assignments.iter().enumerate() {
        segmentation.assign(cluster_labels[cluster], index);
    }
    Ok(segmentation)
}

/// Strategy wrapper around [`cluster_segmentation`]
#[derive(Debug, Clone, Copy)]
pub struct ClusterSegmenter {
    pub clusters: usize,
}

impl ClusterSegmenter {
    pub fn new(clusters: usize) -> Self {
        Self { clusters }
    }
}

impl Default for ClusterSegmenter {
    fn default() -> Self {
        Self {
            clusters: DEFAULT_CLUSTERS,
        }
    }
}

impl Segmenter for ClusterSegmenter {
    fn segment(&self, mesh: &TriangleMesh) -> Result<Segmentation> {
        cluster_segmentation(mesh, self.clusters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bodyseg_core::{Point3f, Vector3f};

    /// Deterministic body-shaped scatter: five vertical blobs at distinct
    /// heights and lateral offsets, outward-pointing synthetic normals.
    fn blob_mesh(per_blob: usize) -> TriangleMesh {
        let blobs = [
            (-0.4_f32, 0.1_f32),
            (0.4, 0.1),
            (0.0, 0.6),
            (-0.8, 0.7),
            (0.8, 0.7),
            (0.0, 1.1),
        ];
        let mut vertices = Vec::new();
        let mut normals = Vec::new();
        for (blob, &(x, y)) in blobs.iter().enumerate() {
            for i in 0..per_blob {
                let jitter = (i as f32 * 0.013) % 0.05;
                vertices.push(Point3f::new(x + jitter, y + jitter * 2.0, jitter));
                let n = Vector3f::new(
                    if x < 0.0 { -1.0 } else { 1.0 },
                    (blob as f32 - 2.5) * 0.2,
                    0.3,
                );
                normals.push(n / n.magnitude());
            }
        }
        let mut mesh = TriangleMesh::from_vertices_and_faces(vertices, vec![]);
        mesh.set_normals(normals);
        mesh
    }

    #[test]
    fn test_missing_normals_fail_fast() {
        let mut mesh = blob_mesh(4);
        mesh.normals = None;
        let result = cluster_segmentation(&mesh, 4);
        assert!(matches!(result, Err(Error::InvalidMesh(_))));
    }

    #[test]
    fn test_cluster_count_validation() {
        let mesh = blob_mesh(4);
        assert!(matches!(
            cluster_segmentation(&mesh, 0),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            cluster_segmentation(&mesh, mesh.vertex_count() + 1),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_empty_mesh_fails() {
        let result = cluster_segmentation(&TriangleMesh::new(), 2);
        assert!(matches!(result, Err(Error::InvalidMesh(_))));
    }

    #[test]
    fn test_every_vertex_assigned_once() {
        let mesh = blob_mesh(6);
        let seg = cluster_segmentation(&mesh, 6).unwrap();
        assert_eq!(seg.assigned_count(), mesh.vertex_count());
        assert!(seg.unassigned(mesh.vertex_count()).is_empty());
    }

    #[test]
    fn test_label_set_bounded_by_six_names() {
        let allowed = [
            "left_leg",
            "right_leg",
            "body",
            "left_arm",
            "right_arm",
            "face_internal",
        ];
        let mesh = blob_mesh(6);
        for k in [1, 3, 6, 9] {
            let seg = cluster_segmentation(&mesh, k).unwrap();
            assert!(!seg.is_empty());
            assert!(seg.num_parts() <= 6);
            for label in seg.labels() {
                assert!(allowed.contains(&label), "unexpected label {:?}", label);
            }
        }
    }

    #[test]
    fn test_extra_clusters_fold_into_body() {
        // 9 clusters over 6 blobs: at least three cluster ids beyond the
        // sixth rank, all labeled body
        let mesh = blob_mesh(8);
        let seg = cluster_segmentation(&mesh, 9).unwrap();
        assert!(seg.contains_label("body"));
        assert_eq!(seg.assigned_count(), mesh.vertex_count());
    }

    #[test]
    fn test_single_cluster_takes_lowest_rank_label() {
        let mesh = blob_mesh(4);
        let seg = cluster_segmentation(&mesh, 1).unwrap();
        assert_eq!(seg.num_parts(), 1);
        assert_eq!(seg.labels().next(), Some("left_leg"));
        assert_eq!(seg.part("left_leg").unwrap().len(), mesh.vertex_count());
    }

    #[test]
    fn test_determinism_bit_identical_runs() {
        let mesh = blob_mesh(7);
        let first = cluster_segmentation(&mesh, DEFAULT_CLUSTERS).unwrap();
        let second = cluster_segmentation(&mesh, DEFAULT_CLUSTERS).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_scaler_standardizes_and_inverts() {
        let samples = vec![
            [0.0, 10.0, -2.0, 1.0, 0.0, 5.0],
            [2.0, 10.0, 2.0, 1.0, 0.0, 7.0],
            [4.0, 10.0, 0.0, 1.0, 0.0, 9.0],
        ];
        let scaler = StandardScaler::fit(&samples);

        // standardized dimensions have zero mean
        let transformed: Vec<_> = samples.iter().map(|s| scaler.transform(s)).collect();
        for dim in 0..6 {
            let mean: f64 = transformed.iter().map(|t| t[dim]).sum::<f64>() / 3.0;
            assert!(mean.abs() < 1e-12, "dim {} mean {}", dim, mean);
        }

        // zero-variance dimensions (y, nx, ny) pass through unchanged
        assert_eq!(transformed[0][1], 0.0);
        assert_eq!(transformed[0][3], 0.0);

        // round trip recovers the input
        for sample in &samples {
            let back = scaler.inverse_transform(&scaler.transform(sample));
            for dim in 0..6 {
                assert!((back[dim] - sample[dim]).abs() < 1e-12);
            }
        }
    }
}
