//! Core data structures and traits for bodyseg
//!
//! This crate provides the fundamental types for anatomical segmentation of
//! 3D human body meshes: triangle meshes, the label-to-vertex segmentation
//! mapping, per-label statistics, and essential traits.

pub mod point;
pub mod mesh;
pub mod segmentation;
pub mod traits;
pub mod error;

pub use point::*;
pub use mesh::*;
pub use segmentation::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};

// Type alias for easier imports
pub type Mesh = TriangleMesh;
