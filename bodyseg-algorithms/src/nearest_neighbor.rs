//! Nearest neighbor search implementations

use bodyseg_core::{NearestNeighborSearch, Point3f};

/// Brute force nearest neighbor search over a fixed point set.
///
/// Candidates are scanned in ascending index order and only a strictly
/// smaller distance replaces the current best, so equidistant candidates
/// resolve to the lowest index. Some spatial-index libraries leave that
/// tie-break unspecified; transfer segmentation depends on it being stable.
pub struct BruteForceSearch {
    points: Vec<Point3f>,
}

impl BruteForceSearch {
    pub fn new(points: &[Point3f]) -> Self {
        Self {
            points: points.to_vec(),
        }
    }

    /// Number of indexed points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the search set is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl NearestNeighborSearch for BruteForceSearch {
    fn find_nearest(&self, query: &Point3f) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;

        for (idx, point) in self.points.iter().enumerate() {
            let dx = point.x - query.x;
            let dy = point.y - query.y;
            let dz = point.z - query.z;
            let distance_squared = dx * dx + dy * dy + dz * dz;

            match best {
                Some((_, best_squared)) if distance_squared >= best_squared => {}
                _ => best = Some((idx, distance_squared)),
            }
        }

        best.map(|(idx, squared)| (idx, squared.sqrt()))
    }
}
