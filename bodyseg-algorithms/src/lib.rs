//! # Bodyseg Algorithms
//!
//! Vertex-assignment algorithms for anatomical segmentation of 3D human
//! body meshes. Three independent strategies are provided:
//!
//! - [`geometric_segmentation`]: normalized height bands plus
//!   lateral-position rules, with fallback and small-region cleanup
//! - [`cluster_segmentation`]: k-means over standardized position+normal
//!   features, centroids mapped to labels by height order
//! - [`transfer_segmentation`]: nearest-vertex label transfer from a
//!   previously labeled reference mesh

pub mod normalize;
pub mod nearest_neighbor;
pub mod geometric;
pub mod clustering;
pub mod transfer;

pub use normalize::*;
pub use nearest_neighbor::*;
pub use geometric::*;
pub use clustering::*;
pub use transfer::*;

use bodyseg_core::{Result, Segmentation, TriangleMesh};

/// Assign every vertex of a mesh to a named anatomical region.
///
/// Each call builds a fresh [`Segmentation`]; no state is carried between
/// runs. The mesh is assumed to be Y-up with X as the left/right axis;
/// orientation is not detected or corrected.
pub trait Segmenter {
    /// Segment a mesh into labeled vertex-index sets
    fn segment(&self, mesh: &TriangleMesh) -> Result<Segmentation>;
}
