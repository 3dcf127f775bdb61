//! Mesh data structures and functionality

use crate::point::*;
use serde::{Deserialize, Serialize};

/// A triangle mesh with vertices, faces and optional per-vertex normals.
///
/// Vertex indices are 0-based and stable: a vertex's index is its position
/// in the `vertices` sequence. The segmentation algorithms operate on vertex
/// positions (and normals where required); face connectivity passes through
/// untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[usize; 3]>,
    pub normals: Option<Vec<Vector3f>>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            normals: None,
        }
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Self {
        Self {
            vertices,
            faces,
            normals: None,
        }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh has no vertices.
    ///
    /// A mesh without faces is still segmentable; only the vertex set
    /// matters here.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Check if per-vertex normals are present
    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// Set vertex normals. Ignored if the count does not match the vertex count.
    pub fn set_normals(&mut self, normals: Vec<Vector3f>) {
        if normals.len() == self.vertices.len() {
            self.normals = Some(normals);
        }
    }

    /// Axis-aligned bounding box of the vertex set.
    ///
    /// Returns a degenerate box at the origin for an empty mesh.
    pub fn bounding_box(&self) -> (Point3f, Point3f) {
        if self.vertices.is_empty() {
            return (Point3f::origin(), Point3f::origin());
        }

        let mut min = self.vertices[0];
        let mut max = self.vertices[0];

        for vertex in &self.vertices {
            min.x = min.x.min(vertex.x);
            min.y = min.y.min(vertex.y);
            min.z = min.z.min(vertex.z);

            max.x = max.x.max(vertex.x);
            max.y = max.y.max(vertex.y);
            max.z = max.z.max(vertex.z);
        }

        (min, max)
    }

    /// Calculate face normals
    pub fn calculate_face_normals(&self) -> Vec<Vector3f> {
        self.faces
            .iter()
            .map(|face| {
                let v0 = self.vertices[face[0]];
                let v1 = self.vertices[face[1]];
                let v2 = self.vertices[face[2]];

                let n = (v1 - v0).cross(&(v2 - v0));
                let len = n.magnitude();
                if len > 1e-12 {
                    n / len
                } else {
                    Vector3f::new(0.0, 0.0, 1.0)
                }
            })
            .collect()
    }

    /// Calculate area-weighted per-vertex normals from face connectivity.
    ///
    /// Each face's unnormalized cross product (proportional to its area) is
    /// accumulated onto its three corners, then the sums are normalized.
    /// Vertices referenced by no face get a +Z unit normal.
    pub fn calculate_vertex_normals(&self) -> Vec<Vector3f> {
        let mut accumulated = vec![Vector3f::zeros(); self.vertices.len()];

        for face in &self.faces {
            let v0 = self.vertices[face[0]];
            let v1 = self.vertices[face[1]];
            let v2 = self.vertices[face[2]];

            let weighted = (v1 - v0).cross(&(v2 - v0));
            for &vi in face {
                accumulated[vi] += weighted;
            }
        }

        accumulated
            .into_iter()
            .map(|n| {
                let len = n.magnitude();
                if len > 1e-12 {
                    n / len
                } else {
                    Vector3f::new(0.0, 0.0, 1.0)
                }
            })
            .collect()
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn make_quad() -> TriangleMesh {
        TriangleMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(1.0, 1.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
    }

    #[test]
    fn test_bounding_box() {
        let mesh = make_quad();
        let (min, max) = mesh.bounding_box();
        assert_relative_eq!(min.x, 0.0);
        assert_relative_eq!(min.y, 0.0);
        assert_relative_eq!(max.x, 1.0);
        assert_relative_eq!(max.y, 1.0);
    }

    #[test]
    fn test_bounding_box_empty() {
        let mesh = TriangleMesh::new();
        let (min, max) = mesh.bounding_box();
        assert_eq!(min, Point3f::origin());
        assert_eq!(max, Point3f::origin());
    }

    #[test]
    fn test_face_normals() {
        let mesh = make_quad();
        let normals = mesh.calculate_face_normals();
        assert_eq!(normals.len(), 2);
        for n in &normals {
            assert_relative_eq!(n.z, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_vertex_normals_planar() {
        let mesh = make_quad();
        let normals = mesh.calculate_vertex_normals();
        assert_eq!(normals.len(), 4);
        for n in &normals {
            assert_relative_eq!(n.z, 1.0, epsilon = 1e-6);
            assert_relative_eq!(n.magnitude(), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_vertex_normals_unreferenced_vertex() {
        let mut mesh = make_quad();
        mesh.vertices.push(Point3f::new(5.0, 5.0, 5.0));
        let normals = mesh.calculate_vertex_normals();
        assert_eq!(normals[4], Vector3f::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_set_normals_length_mismatch() {
        let mut mesh = make_quad();
        mesh.set_normals(vec![Vector3f::new(0.0, 0.0, 1.0)]);
        assert!(!mesh.has_normals());

        mesh.set_normals(vec![Vector3f::new(0.0, 0.0, 1.0); 4]);
        assert!(mesh.has_normals());
    }
}
