//! Host-facing buffers for the generated meshes.
//!
//! The kernel builds in `f64` with structured vertex types; hosts want flat
//! `f32` arrays. [`TriangleMesh`] carries everything a renderer needs and
//! [`CollisionMesh`] only positions and indices.

pub mod error;
pub mod targets;

use mount_kernel::MeshBuffer;
use mount_kernel::geometry::{Point3, Vec3};
use serde::{Deserialize, Serialize};

pub use error::TessellationError;
pub use targets::{FAIRING_TARGET, ModelTarget, ModelTargets, PLATE_TARGET};

/// A triangle mesh for rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    /// Vertex positions [x, y, z, x, y, z, ...]
    pub positions: Vec<f32>,
    /// Vertex normals [nx, ny, nz, ...]
    pub normals: Vec<f32>,
    /// Texture coordinates [u, v, ...]
    pub uvs: Vec<f32>,
    /// Tangents with handedness [tx, ty, tz, w, ...]
    pub tangents: Vec<f32>,
    /// Triangle indices [i0, i1, i2, ...]
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten a kernel buffer, rejecting out-of-range indices.
    pub fn from_buffer(buffer: &MeshBuffer) -> Result<Self, TessellationError> {
        buffer.validate()?;
        let mut mesh = Self {
            positions: Vec::with_capacity(buffer.vertex_count() * 3),
            normals: Vec::with_capacity(buffer.vertex_count() * 3),
            uvs: Vec::with_capacity(buffer.vertex_count() * 2),
            tangents: Vec::with_capacity(buffer.vertex_count() * 4),
            indices: Vec::with_capacity(buffer.triangle_count() * 3),
        };
        for i in 0..buffer.vertex_count() {
            mesh.add_vertex(buffer.vertices[i], buffer.normals[i]);
            let uv = buffer.uvs[i];
            mesh.uvs.extend([uv.x as f32, uv.y as f32]);
            let t = buffer.tangents[i];
            mesh.tangents.extend([t.x as f32, t.y as f32, t.z as f32, t.w as f32]);
        }
        for &[a, b, c] in &buffer.triangles {
            mesh.add_triangle(a, b, c);
        }
        Ok(mesh)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn add_vertex(&mut self, pos: Point3, normal: Vec3) -> u32 {
        let idx = self.vertex_count() as u32;
        self.positions.extend([pos.x as f32, pos.y as f32, pos.z as f32]);
        self.normals.extend([normal.x as f32, normal.y as f32, normal.z as f32]);
        idx
    }

    fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.extend([i0, i1, i2]);
    }
}

/// Positions and indices only, for the host's physics collider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollisionMesh {
    pub positions: Vec<f32>,
    pub indices: Vec<u32>,
}

impl CollisionMesh {
    pub fn from_buffer(buffer: &MeshBuffer) -> Result<Self, TessellationError> {
        buffer.validate()?;
        Ok(Self {
            positions: buffer
                .vertices
                .iter()
                .flat_map(|p| [p.x as f32, p.y as f32, p.z as f32])
                .collect(),
            indices: buffer.triangles.iter().flatten().copied().collect(),
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }
}
