//! Core traits for bodyseg

use crate::point::Point3f;

/// Trait for nearest neighbor search functionality
pub trait NearestNeighborSearch {
    /// Find the single nearest neighbor to a query point.
    ///
    /// Returns the candidate index and its Euclidean distance, or `None`
    /// when the search set is empty. Implementations must break distance
    /// ties deterministically by returning the lowest candidate index.
    fn find_nearest(&self, query: &Point3f) -> Option<(usize, f32)>;
}
