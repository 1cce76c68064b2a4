//! The solid plate: deck cap, tapered wall, flange, base cap.
//!
//! Vertex layout, in order:
//!
//! ```text
//! [0]                      top center
//! [1 .. sides]             top rim at the deck radius, y = 0
//! levels × (sides + 1)     tapered wall rows, seam duplicated
//! 2 × (sides + 1)          flange top and flange bottom rows
//! sides                    bottom rim at the base shape
//! [last]                   bottom center
//! ```
//!
//! The plate hangs below y = 0. Indices are stable for a given
//! `(sides, levels)` pair.

use nalgebra::Vector2;
use tracing::{debug, instrument};

use super::shading::{recompute_normals, recompute_tangents, weld_seams};
use super::{MAX_LEVEL_STEP, MeshBuffer, Row, Winding, fan_cap, stitch_rows};
use crate::error::{KernelError, check_dimension, check_height};
use crate::geometry::{Point3, ProfileCurve, Vec3, radial_point, slice_angle};
use crate::profile::{ProfileSample, check_sides};

/// Index arithmetic for the plate's vertex layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlateLayout {
    pub sides: usize,
    pub levels: usize,
}

impl PlateLayout {
    pub fn new(sides: usize, levels: usize) -> Self {
        Self { sides, levels }
    }

    fn ring(&self) -> usize {
        self.sides + 1
    }

    pub fn top_center(&self) -> u32 {
        0
    }

    pub fn top_rim(&self) -> u32 {
        1
    }

    pub fn level(&self, k: usize) -> u32 {
        (1 + self.sides + k * self.ring()) as u32
    }

    pub fn flange_top(&self) -> u32 {
        self.level(self.levels)
    }

    pub fn flange_bottom(&self) -> u32 {
        self.flange_top() + self.ring() as u32
    }

    pub fn bottom_rim(&self) -> u32 {
        self.flange_bottom() + self.ring() as u32
    }

    pub fn bottom_center(&self) -> u32 {
        self.bottom_rim() + self.sides as u32
    }

    /// `1 + sides + levels·(sides+1) + 2·(sides+1) + sides + 1`.
    pub fn vertex_count(&self) -> usize {
        1 + self.sides + self.levels * self.ring() + 2 * self.ring() + self.sides + 1
    }

    pub fn triangle_count(&self) -> usize {
        let wall_bands = if self.levels == 0 { 1 } else { self.levels - 1 };
        // Two caps, the wall bands, and the flange band.
        2 * self.sides + 2 * self.sides * (wall_bands + 1)
    }
}

/// Number of wall rows needed to sample a taper of `height`.
///
/// One row per [`MAX_LEVEL_STEP`], and never fewer than three so the curve
/// has at least one interior sample. A flat taper has no rows at all.
pub fn levels_for_height(height: f64) -> usize {
    if crate::default_tolerance().is_zero_length(height) {
        return 0;
    }
    let steps = (height / MAX_LEVEL_STEP - 1e-9).ceil() as usize;
    steps.saturating_add(1).max(3)
}

/// Build the plate mesh.
///
/// The wall at slice `i` follows a cubic Bézier from `(top_radius, 0)` to
/// `(base_shape[i], −side_height)`, with both inner control points at half
/// the wall height. A vertical flange of `flange_height` hangs below it.
#[instrument(skip(base_shape), fields(sides = base_shape.sides()))]
pub fn build_plate_mesh(
    top_radius: f64,
    base_shape: &ProfileSample,
    side_height: f64,
    flange_height: f64,
) -> Result<MeshBuffer, KernelError> {
    let top_radius = check_dimension("top_radius", top_radius)?;
    let side_height = check_height("side_height", side_height)?;
    let flange_height = check_height("flange_height", flange_height)?;

    let sides = check_sides(base_shape.sides())?;
    let layout = PlateLayout::new(sides, levels_for_height(side_height));
    let side_bottom = -side_height;
    let bottom_y = side_bottom - flange_height;
    let total_height = side_height + flange_height;
    let cap_extent = base_shape.max_radius().max(top_radius).max(1e-9);

    let mut mesh = MeshBuffer::with_capacity(layout.vertex_count(), layout.triangle_count());

    let cap_uv = |p: &Point3| {
        Vector2::new(0.5 + p.x / (2.0 * cap_extent), 0.5 + p.z / (2.0 * cap_extent))
    };
    let wall_uv = |i: usize, y: f64| {
        let v = if total_height > 0.0 { -y / total_height } else { 0.0 };
        Vector2::new(i as f64 / sides as f64, v)
    };

    // Deck cap.
    let center = Point3::origin();
    mesh.push_vertex(center, cap_uv(&center));
    for i in 0..sides {
        let p = radial_point(slice_angle(i, sides), top_radius, 0.0);
        mesh.push_vertex(p, cap_uv(&p));
    }

    // Tapered wall.
    let curves: Vec<ProfileCurve> = (0..sides)
        .map(|i| ProfileCurve::taper(top_radius, base_shape.radius(i), 0.0, side_bottom))
        .collect();
    for k in 0..layout.levels {
        let t = k as f64 / (layout.levels - 1) as f64;
        for i in 0..=sides {
            let rz = curves[i % sides].point_at(t);
            mesh.push_vertex(radial_point(slice_angle(i, sides), rz.x, rz.y), wall_uv(i, rz.y));
        }
    }

    // Flange.
    for y in [side_bottom, bottom_y] {
        for i in 0..=sides {
            let p = radial_point(slice_angle(i, sides), base_shape.radius(i), y);
            mesh.push_vertex(p, wall_uv(i, y));
        }
    }

    // Base cap.
    for i in 0..sides {
        let p = radial_point(slice_angle(i, sides), base_shape.radius(i), bottom_y);
        mesh.push_vertex(p, cap_uv(&p));
    }
    let bottom_center = Point3::new(0.0, bottom_y, 0.0);
    mesh.push_vertex(bottom_center, cap_uv(&bottom_center));

    debug_assert_eq!(mesh.vertex_count(), layout.vertex_count());

    // Triangles.
    let ring = sides + 1;
    fan_cap(&mut mesh, layout.top_center(), Row::new(layout.top_rim(), sides), sides, true);
    if layout.levels == 0 {
        // Nothing to taper: the deck rim meets the flange directly.
        stitch_rows(
            &mut mesh,
            Row::new(layout.top_rim(), sides),
            Row::new(layout.flange_top(), ring),
            sides,
            Winding::AwayFromAxis,
        );
    } else {
        for k in 0..layout.levels - 1 {
            stitch_rows(
                &mut mesh,
                Row::new(layout.level(k), ring),
                Row::new(layout.level(k + 1), ring),
                sides,
                Winding::AwayFromAxis,
            );
        }
    }
    stitch_rows(
        &mut mesh,
        Row::new(layout.flange_top(), ring),
        Row::new(layout.flange_bottom(), ring),
        sides,
        Winding::AwayFromAxis,
    );
    fan_cap(&mut mesh, layout.bottom_center(), Row::new(layout.bottom_rim(), sides), sides, false);

    // Shading.
    let seams: Vec<(u32, u32)> = (0..layout.levels)
        .map(|k| layout.level(k))
        .chain([layout.flange_top(), layout.flange_bottom()])
        .map(|start| (start, start + sides as u32))
        .collect();
    recompute_normals(&mut mesh, Vec3::y());
    weld_seams(&mut mesh, &seams);
    recompute_tangents(&mut mesh);

    debug!(
        levels = layout.levels,
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "plate mesh built"
    );
    Ok(mesh)
}
