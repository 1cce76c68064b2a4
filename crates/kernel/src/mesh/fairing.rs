//! The fairing: a hollow sleeve hanging from the plate's base.
//!
//! Layout is `levels` outer-shell rows followed by `levels` inner-shell rows,
//! each `sides + 1` wide. By default only the outer shell is triangulated.
//! The inner shell and the two annular end caps are laid out in the buffer
//! but emit faces only when [`FairingOptions::close_shell`] is set.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::plate::levels_for_height;
use super::shading::{recompute_normals, recompute_tangents, weld_seams};
use super::{MeshBuffer, Row, Winding, stitch_rows};
use crate::error::{KernelError, check_dimension, check_height};
use crate::geometry::{ProfileCurve, Vec3, radial_direction, radial_point, slice_angle};
use crate::profile::{ProfileSample, check_sides};

/// Radial gap between the fairing shells unless configured otherwise.
pub const DEFAULT_WALL_THICKNESS: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FairingOptions {
    /// Radial gap between the inner and outer shells.
    pub wall_thickness: f64,
    /// Also triangulate the inner shell and both end caps.
    pub close_shell: bool,
}

impl Default for FairingOptions {
    fn default() -> Self {
        Self {
            wall_thickness: DEFAULT_WALL_THICKNESS,
            close_shell: false,
        }
    }
}

/// Index arithmetic for the fairing's vertex layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FairingLayout {
    pub sides: usize,
    pub levels: usize,
}

impl FairingLayout {
    pub fn new(sides: usize, levels: usize) -> Self {
        Self { sides, levels }
    }

    fn ring(&self) -> usize {
        self.sides + 1
    }

    pub fn outer_level(&self, k: usize) -> u32 {
        (k * self.ring()) as u32
    }

    pub fn inner_level(&self, k: usize) -> u32 {
        ((self.levels + k) * self.ring()) as u32
    }

    pub fn vertex_count(&self) -> usize {
        2 * self.levels * self.ring()
    }

    pub fn triangle_count(&self, close_shell: bool) -> usize {
        if self.levels == 0 {
            return 0;
        }
        let shell = 2 * self.sides * (self.levels - 1);
        if close_shell {
            2 * shell + 2 * 2 * self.sides
        } else {
            shell
        }
    }
}

/// Build the fairing with default options.
pub fn build_fairing_mesh(
    base_shape: &ProfileSample,
    bottom_radius: f64,
    top_y: f64,
    bottom_y: f64,
) -> Result<MeshBuffer, KernelError> {
    build_fairing_mesh_with(base_shape, bottom_radius, top_y, bottom_y, &FairingOptions::default())
}

/// Build the fairing from `top_y` down to `bottom_y`.
///
/// The inner shell tapers from the base shape to `bottom_radius`; the outer
/// shell runs `wall_thickness` outside it. A zero-height fairing is an empty
/// buffer.
#[instrument(skip(base_shape, options), fields(sides = base_shape.sides()))]
pub fn build_fairing_mesh_with(
    base_shape: &ProfileSample,
    bottom_radius: f64,
    top_y: f64,
    bottom_y: f64,
    options: &FairingOptions,
) -> Result<MeshBuffer, KernelError> {
    let bottom_radius = check_dimension("bottom_radius", bottom_radius)?;
    let wall = check_dimension("wall_thickness", options.wall_thickness)?;
    let height = check_height("fairing_height", top_y - bottom_y)?;

    let sides = check_sides(base_shape.sides())?;
    let layout = FairingLayout::new(sides, levels_for_height(height));
    if layout.levels == 0 {
        debug!("fairing has no height, emitting empty mesh");
        return Ok(MeshBuffer::new());
    }

    let mut mesh = MeshBuffer::with_capacity(
        layout.vertex_count(),
        layout.triangle_count(options.close_shell),
    );

    for offset in [wall, 0.0] {
        let curves: Vec<ProfileCurve> = (0..sides)
            .map(|i| {
                ProfileCurve::taper(base_shape.radius(i) + offset, bottom_radius + offset, top_y, bottom_y)
            })
            .collect();
        for k in 0..layout.levels {
            let t = k as f64 / (layout.levels - 1) as f64;
            for i in 0..=sides {
                let rz = curves[i % sides].point_at(t);
                let uv = Vector2::new(i as f64 / sides as f64, (top_y - rz.y) / height);
                mesh.push_vertex(radial_point(slice_angle(i, sides), rz.x, rz.y), uv);
            }
        }
    }

    let ring = sides + 1;
    for k in 0..layout.levels - 1 {
        stitch_rows(
            &mut mesh,
            Row::new(layout.outer_level(k), ring),
            Row::new(layout.outer_level(k + 1), ring),
            sides,
            Winding::AwayFromAxis,
        );
    }

    if options.close_shell {
        for k in 0..layout.levels - 1 {
            stitch_rows(
                &mut mesh,
                Row::new(layout.inner_level(k), ring),
                Row::new(layout.inner_level(k + 1), ring),
                sides,
                Winding::TowardAxis,
            );
        }
        let last = layout.levels - 1;
        stitch_annulus(
            &mut mesh,
            Row::new(layout.outer_level(0), ring),
            Row::new(layout.inner_level(0), ring),
            sides,
            true,
        );
        stitch_annulus(
            &mut mesh,
            Row::new(layout.outer_level(last), ring),
            Row::new(layout.inner_level(last), ring),
            sides,
            false,
        );
    }

    let seams: Vec<(u32, u32)> = (0..layout.levels)
        .flat_map(|k| [layout.outer_level(k), layout.inner_level(k)])
        .map(|start| (start, start + sides as u32))
        .collect();
    recompute_normals(&mut mesh, Vec3::y());
    if !options.close_shell {
        // Untriangulated inner shell still gets usable normals facing the axis.
        let inner = layout.inner_level(0) as usize;
        for (idx, normal) in mesh.normals.iter_mut().enumerate().skip(inner) {
            let column = (idx - inner) % ring;
            *normal = -radial_direction(slice_angle(column, sides));
        }
    }
    weld_seams(&mut mesh, &seams);
    recompute_tangents(&mut mesh);

    debug!(
        levels = layout.levels,
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        closed = options.close_shell,
        "fairing mesh built"
    );
    Ok(mesh)
}

/// Close the gap between the outer and inner shell rows with a flat ring.
fn stitch_annulus(mesh: &mut MeshBuffer, outer: Row, inner: Row, sides: usize, facing_up: bool) {
    for i in 0..sides {
        let (o0, o1) = (outer.at(i), outer.at(i + 1));
        let (n0, n1) = (inner.at(i), inner.at(i + 1));
        if facing_up {
            mesh.push_triangle(o0, o1, n0);
            mesh.push_triangle(o1, n1, n0);
        } else {
            mesh.push_triangle(o0, n0, o1);
            mesh.push_triangle(o1, n0, n1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn shape(sides: usize) -> ProfileSample {
        ProfileSample::constant(1.0, sides)
    }

    #[test]
    fn test_outer_shell_only_by_default() {
        let sides = 12;
        let mesh = build_fairing_mesh(&shape(sides), 0.6, -0.5, -1.5).unwrap();
        let layout = FairingLayout::new(sides, levels_for_height(1.0));
        assert_eq!(mesh.vertex_count(), layout.vertex_count());
        assert_eq!(mesh.vertex_count(), 2 * 11 * 13);
        assert_eq!(mesh.triangle_count(), layout.triangle_count(false));
        assert!(mesh.validate().is_ok());

        // Nothing references the inner shell.
        let inner_start = layout.inner_level(0);
        assert!(mesh.triangles.iter().flatten().all(|&i| i < inner_start));
    }

    #[test]
    fn test_shell_radii() {
        let sides = 8;
        let mesh = build_fairing_mesh(&shape(sides), 0.6, 0.0, -0.4).unwrap();
        let layout = FairingLayout::new(sides, levels_for_height(0.4));
        let wall = FairingOptions::default().wall_thickness;

        let outer_top = mesh.vertices[layout.outer_level(0) as usize];
        let inner_top = mesh.vertices[layout.inner_level(0) as usize];
        assert_relative_eq!(outer_top.z, 1.0 + wall, epsilon = 1e-12);
        assert_relative_eq!(inner_top.z, 1.0, epsilon = 1e-12);

        let last = layout.levels - 1;
        let outer_bottom = mesh.vertices[layout.outer_level(last) as usize];
        let inner_bottom = mesh.vertices[layout.inner_level(last) as usize];
        assert_relative_eq!(outer_bottom.z, 0.6 + wall, epsilon = 1e-12);
        assert_relative_eq!(inner_bottom.z, 0.6, epsilon = 1e-12);
        assert_relative_eq!(inner_bottom.y, -0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_closed_shell_winding() {
        let sides = 12;
        let options = FairingOptions { close_shell: true, ..FairingOptions::default() };
        let mesh = build_fairing_mesh_with(&shape(sides), 0.6, 0.0, -1.0, &options).unwrap();
        let layout = FairingLayout::new(sides, levels_for_height(1.0));
        assert_eq!(mesh.triangle_count(), layout.triangle_count(true));
        assert!(mesh.validate().is_ok());

        let shell = 2 * sides * (layout.levels - 1);
        for t in 0..shell {
            let n = mesh.face_normal(t);
            let c = mesh.vertices[mesh.triangles[t][0] as usize];
            assert!(n.dot(&Vec3::new(c.x, 0.0, c.z)) > 0.0, "outer face {t} points inward");
        }
        for t in shell..2 * shell {
            let n = mesh.face_normal(t);
            let c = mesh.vertices[mesh.triangles[t][0] as usize];
            assert!(n.dot(&Vec3::new(c.x, 0.0, c.z)) < 0.0, "inner face {t} points outward");
        }
        for t in 2 * shell..2 * shell + 2 * sides {
            assert!(mesh.face_normal(t).y > 0.0);
        }
        for t in 2 * shell + 2 * sides..mesh.triangle_count() {
            assert!(mesh.face_normal(t).y < 0.0);
        }
    }

    #[test]
    fn test_withheld_inner_shell_normals_face_axis() {
        let sides = 8;
        let mesh = build_fairing_mesh(&shape(sides), 0.6, 0.0, -0.5).unwrap();
        let layout = FairingLayout::new(sides, levels_for_height(0.5));
        let idx = layout.inner_level(1) as usize;
        let p = mesh.vertices[idx];
        let radial = Vec3::new(p.x, 0.0, p.z).normalize();
        assert_relative_eq!(mesh.normals[idx].dot(&radial), -1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_height_is_empty() {
        let mesh = build_fairing_mesh(&shape(8), 0.6, -0.5, -0.5).unwrap();
        assert!(mesh.is_empty());
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_inverted_heights_rejected() {
        let err = build_fairing_mesh(&shape(8), 0.6, -1.0, 0.0).unwrap_err();
        assert!(matches!(err, KernelError::InvalidDimension { parameter: "fairing_height", .. }));
    }

    #[test]
    fn test_rejects_degenerate_footprint() {
        let err = build_fairing_mesh(&shape(0), 0.6, 0.0, -1.0).unwrap_err();
        assert!(matches!(err, KernelError::InvalidSides { provided: 0, .. }));
        let err = build_fairing_mesh(&shape(2), 0.6, 0.0, -1.0).unwrap_err();
        assert!(matches!(err, KernelError::InvalidSides { provided: 2, .. }));
    }

    #[test]
    fn test_rejects_fairing_too_deep_to_loft() {
        let err = build_fairing_mesh(&shape(8), 0.6, 0.0, -1e20).unwrap_err();
        assert!(matches!(err, KernelError::ExceedsLimit { parameter: "fairing_height", .. }));
    }
}
