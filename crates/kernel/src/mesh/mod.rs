pub mod fairing;
pub mod plate;
pub mod shading;

use nalgebra::{Vector2, Vector4};
use serde::{Deserialize, Serialize};

use crate::error::KernelError;
use crate::geometry::{Point3, Vec3};

pub use fairing::{
    DEFAULT_WALL_THICKNESS, FairingLayout, FairingOptions, build_fairing_mesh,
    build_fairing_mesh_with,
};
pub use plate::{PlateLayout, build_plate_mesh, levels_for_height};

/// Tallest vertical step one row of a lofted wall may cover.
pub const MAX_LEVEL_STEP: f64 = 0.1;
/// Most rows a lofted wall may have.
pub const MAX_LEVELS: usize = 10_000;
/// Tallest wall that still fits in [`MAX_LEVELS`] rows.
pub const MAX_MESH_HEIGHT: f64 = MAX_LEVEL_STEP * (MAX_LEVELS - 1) as f64;

/// An indexed, smooth-shaded triangle mesh.
///
/// `normals`, `uvs` and `tangents` are parallel to `vertices`. Tangents carry
/// handedness in `w`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshBuffer {
    pub vertices: Vec<Point3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vector2<f64>>,
    pub tangents: Vec<Vector4<f64>>,
    pub triangles: Vec<[u32; 3]>,
}

impl MeshBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            uvs: Vec::with_capacity(vertices),
            tangents: Vec::with_capacity(vertices),
            triangles: Vec::with_capacity(triangles),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Append a vertex. Normal and tangent are filled in by [`shading`].
    pub fn push_vertex(&mut self, position: Point3, uv: Vector2<f64>) -> u32 {
        let idx = self.vertices.len() as u32;
        self.vertices.push(position);
        self.normals.push(Vec3::zeros());
        self.uvs.push(uv);
        self.tangents.push(Vector4::new(1.0, 0.0, 0.0, 1.0));
        idx
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.triangles.push([a, b, c]);
    }

    /// Unnormalized face normal `(b − a) × (c − a)`; its length is twice the area.
    pub fn face_normal(&self, triangle: usize) -> Vec3 {
        let [a, b, c] = self.triangles[triangle];
        let pa = self.vertices[a as usize];
        let pb = self.vertices[b as usize];
        let pc = self.vertices[c as usize];
        (pb - pa).cross(&(pc - pa))
    }

    /// Check that every triangle index refers to an existing vertex.
    pub fn validate(&self) -> Result<(), KernelError> {
        let vertex_count = self.vertices.len();
        for (triangle, tri) in self.triangles.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(KernelError::IndexOutOfRange {
                    triangle,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }
}

/// A run of consecutive vertex indices forming one ring around the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Row {
    pub start: u32,
    pub width: usize,
}

impl Row {
    pub fn new(start: u32, width: usize) -> Self {
        Self { start, width }
    }

    /// Index of slice `i`. Rows without a seam duplicate wrap back to slice 0.
    pub fn at(&self, i: usize) -> u32 {
        self.start + (i % self.width) as u32
    }
}

/// Which side of a lofted band faces outward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Winding {
    /// Normals point away from the stack axis.
    AwayFromAxis,
    /// Normals point toward the stack axis.
    TowardAxis,
}

/// Stitch `upper` to `lower` with two triangles per slice.
///
/// Every quad is split along the same diagonal, from the lower vertex of
/// slice `i` to the upper vertex of slice `i + 1`.
pub(crate) fn stitch_rows(mesh: &mut MeshBuffer, upper: Row, lower: Row, sides: usize, winding: Winding) {
    for i in 0..sides {
        let (a0, a1) = (upper.at(i), upper.at(i + 1));
        let (b0, b1) = (lower.at(i), lower.at(i + 1));
        match winding {
            Winding::AwayFromAxis => {
                mesh.push_triangle(a0, b0, a1);
                mesh.push_triangle(a1, b0, b1);
            }
            Winding::TowardAxis => {
                mesh.push_triangle(a0, a1, b0);
                mesh.push_triangle(a1, b1, b0);
            }
        }
    }
}

/// Fan a flat cap from `center` through consecutive `rim` vertices.
pub(crate) fn fan_cap(mesh: &mut MeshBuffer, center: u32, rim: Row, sides: usize, facing_up: bool) {
    for i in 0..sides {
        let (r0, r1) = (rim.at(i), rim.at(i + 1));
        if facing_up {
            mesh.push_triangle(center, r0, r1);
        } else {
            mesh.push_triangle(center, r1, r0);
        }
    }
}
