//! Mesh centering
//!
//! Shared preprocessing for the geometric and clustering strategies: vertex
//! positions are translated so their centroid sits at the origin. No scaling
//! or rotation is applied. The up-axis is assumed to already be Y; that
//! assumption is a documented limitation, not something corrected here.

use bodyseg_core::{Point3f, TriangleMesh, Vector3f};

/// Mean vertex position of the mesh.
///
/// Accumulates in f64 for stability. Returns the origin for an empty mesh.
pub fn centroid(mesh: &TriangleMesh) -> Point3f {
    if mesh.is_empty() {
        return Point3f::origin();
    }

    let mut sum = [0.0f64; 3];
    for v in &mesh.vertices {
        sum[0] += v.x as f64;
        sum[1] += v.y as f64;
        sum[2] += v.z as f64;
    }
    let n = mesh.vertex_count() as f64;
    Point3f::new(
        (sum[0] / n) as f32,
        (sum[1] / n) as f32,
        (sum[2] / n) as f32,
    )
}

/// Translate all vertices so the mesh centroid lands at the origin.
///
/// Normals are direction vectors and are left untouched.
pub fn center_at_centroid(mesh: &mut TriangleMesh) {
    let center = centroid(mesh);
    let offset = Vector3f::new(center.x, center.y, center.z);
    for v in &mut mesh.vertices {
        *v -= offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn make_mesh(points: &[(f32, f32, f32)]) -> TriangleMesh {
        TriangleMesh::from_vertices_and_faces(
            points.iter().map(|&(x, y, z)| Point3f::new(x, y, z)).collect(),
            vec![],
        )
    }

    #[test]
    fn test_centroid() {
        let mesh = make_mesh(&[(0.0, 0.0, 0.0), (2.0, 4.0, 6.0)]);
        let c = centroid(&mesh);
        assert_relative_eq!(c.x, 1.0);
        assert_relative_eq!(c.y, 2.0);
        assert_relative_eq!(c.z, 3.0);
    }

    #[test]
    fn test_centroid_empty_mesh() {
        assert_eq!(centroid(&TriangleMesh::new()), Point3f::origin());
    }

    #[test]
    fn test_center_at_centroid() {
        let mut mesh = make_mesh(&[(1.0, 1.0, 1.0), (3.0, 5.0, 7.0)]);
        center_at_centroid(&mut mesh);
        let c = centroid(&mesh);
        assert_relative_eq!(c.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(c.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(c.z, 0.0, epsilon = 1e-6);
        // relative geometry is preserved
        assert_relative_eq!(mesh.vertices[1].x - mesh.vertices[0].x, 2.0, epsilon = 1e-6);
    }
}
