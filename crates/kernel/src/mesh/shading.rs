//! Smooth shading: vertex normals and tangent frames.

use nalgebra::Vector4;

use super::MeshBuffer;
use crate::geometry::Vec3;

/// Recompute per-vertex normals as the area-weighted average of adjacent faces.
///
/// Vertices no triangle references get `fallback`.
pub fn recompute_normals(mesh: &mut MeshBuffer, fallback: Vec3) {
    let mut accum = vec![Vec3::zeros(); mesh.vertex_count()];
    for t in 0..mesh.triangle_count() {
        // Unnormalized cross product, so larger faces weigh more.
        let n = mesh.face_normal(t);
        for &i in &mesh.triangles[t] {
            accum[i as usize] += n;
        }
    }

    for (normal, sum) in mesh.normals.iter_mut().zip(accum) {
        *normal = sum.try_normalize(1e-15).unwrap_or(fallback);
    }
}

/// Give each pair of coincident seam vertices one shared normal.
///
/// The seam column of a lofted row is duplicated so UVs can wrap; without
/// this, each copy only sees the faces on its own side of the seam.
pub fn weld_seams(mesh: &mut MeshBuffer, seams: &[(u32, u32)]) {
    for &(a, b) in seams {
        let (a, b) = (a as usize, b as usize);
        let sum = mesh.normals[a] + mesh.normals[b];
        if let Some(n) = sum.try_normalize(1e-15) {
            mesh.normals[a] = n;
            mesh.normals[b] = n;
        }
    }
}

/// Recompute tangents from the UV gradient of each triangle (Lengyel's method).
///
/// Per-triangle tangent and bitangent directions are accumulated at each
/// corner, then the tangent is Gram-Schmidt orthogonalized against the vertex
/// normal. `w` is the sign of `(n × t) · bitangent`.
pub fn recompute_tangents(mesh: &mut MeshBuffer) {
    let count = mesh.vertex_count();
    let mut tan1 = vec![Vec3::zeros(); count];
    let mut tan2 = vec![Vec3::zeros(); count];

    for &[a, b, c] in &mesh.triangles {
        let (a, b, c) = (a as usize, b as usize, c as usize);
        let e1 = mesh.vertices[b] - mesh.vertices[a];
        let e2 = mesh.vertices[c] - mesh.vertices[a];
        let d1 = mesh.uvs[b] - mesh.uvs[a];
        let d2 = mesh.uvs[c] - mesh.uvs[a];

        let det = d1.x * d2.y - d2.x * d1.y;
        if det.abs() < 1e-15 {
            continue;
        }
        let r = 1.0 / det;
        let sdir = (e1 * d2.y - e2 * d1.y) * r;
        let tdir = (e2 * d1.x - e1 * d2.x) * r;

        for i in [a, b, c] {
            tan1[i] += sdir;
            tan2[i] += tdir;
        }
    }

    for i in 0..count {
        let n = mesh.normals[i];
        let t = tan1[i];
        let ortho = (t - n * n.dot(&t))
            .try_normalize(1e-15)
            .unwrap_or_else(|| any_perpendicular(&n));
        let w = if n.cross(&ortho).dot(&tan2[i]) < 0.0 { -1.0 } else { 1.0 };
        mesh.tangents[i] = Vector4::new(ortho.x, ortho.y, ortho.z, w);
    }
}

/// A unit vector perpendicular to `n`, for vertices with no UV gradient.
fn any_perpendicular(n: &Vec3) -> Vec3 {
    let helper = if n.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
    n.cross(&helper).try_normalize(1e-15).unwrap_or_else(Vec3::x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point3;
    use approx::assert_relative_eq;
    use nalgebra::Vector2;

    /// A unit quad in the XZ plane facing +Y, with U along +X and V along +Z.
    fn quad() -> MeshBuffer {
        let mut mesh = MeshBuffer::new();
        let v0 = mesh.push_vertex(Point3::new(0.0, 0.0, 0.0), Vector2::new(0.0, 0.0));
        let v1 = mesh.push_vertex(Point3::new(1.0, 0.0, 0.0), Vector2::new(1.0, 0.0));
        let v2 = mesh.push_vertex(Point3::new(1.0, 0.0, 1.0), Vector2::new(1.0, 1.0));
        let v3 = mesh.push_vertex(Point3::new(0.0, 0.0, 1.0), Vector2::new(0.0, 1.0));
        mesh.push_triangle(v0, v2, v1);
        mesh.push_triangle(v0, v3, v2);
        mesh
    }

    #[test]
    fn test_flat_quad_normals() {
        let mut mesh = quad();
        recompute_normals(&mut mesh, Vec3::x());
        for n in &mesh.normals {
            assert_relative_eq!(n.y, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_unreferenced_vertex_gets_fallback() {
        let mut mesh = quad();
        mesh.push_vertex(Point3::new(5.0, 5.0, 5.0), Vector2::zeros());
        recompute_normals(&mut mesh, Vec3::z());
        assert_eq!(mesh.normals[4], Vec3::z());
    }

    #[test]
    fn test_tangent_follows_u_direction() {
        let mut mesh = quad();
        recompute_normals(&mut mesh, Vec3::y());
        recompute_tangents(&mut mesh);
        for t in &mesh.tangents {
            assert_relative_eq!(t.x, 1.0, epsilon = 1e-12);
            assert_relative_eq!(t.y, 0.0, epsilon = 1e-12);
            // n × t = Y × X = −Z while V runs along +Z.
            assert_relative_eq!(t.w, -1.0);
        }
    }

    #[test]
    fn test_tangent_is_orthogonal_to_normal() {
        let mut mesh = quad();
        recompute_normals(&mut mesh, Vec3::y());
        // Tilt one normal so Gram-Schmidt has work to do.
        mesh.normals[0] = Vec3::new(0.3, 1.0, 0.0).normalize();
        recompute_tangents(&mut mesh);
        let t0 = mesh.tangents[0].xyz();
        assert_relative_eq!(t0.dot(&mesh.normals[0]), 0.0, epsilon = 1e-12);
        assert_relative_eq!(t0.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_weld_seams_shares_normal() {
        let mut mesh = quad();
        mesh.normals[0] = Vec3::x();
        mesh.normals[1] = Vec3::z();
        weld_seams(&mut mesh, &[(0, 1)]);
        assert_eq!(mesh.normals[0], mesh.normals[1]);
        assert_relative_eq!(mesh.normals[0].norm(), 1.0, epsilon = 1e-12);
    }
}
