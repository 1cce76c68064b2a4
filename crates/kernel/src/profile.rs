//! Per-angle base radius from ring geometry.
//!
//! The base shape is the footprint the plate must spread to so that every
//! ring point's circular footprint sits inside it. It is sampled at `sides`
//! equally spaced angles and never dips below the deck radius.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::catalog::{PatternSpec, RingSpec};
use crate::error::{KernelError, check_dimension};
use crate::geometry::{reduce_angle, slice_angle};

/// Fewest slices that still describe a closed footprint.
pub const MIN_SIDES: usize = 3;

/// Reject slice counts too small to close a footprint.
pub(crate) fn check_sides(sides: usize) -> Result<usize, KernelError> {
    if sides < MIN_SIDES {
        return Err(KernelError::InvalidSides {
            required: MIN_SIDES,
            provided: sides,
        });
    }
    Ok(sides)
}

/// Radii sampled at equally spaced angles; index `i` is angle `2π·i/sides`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSample {
    radii: Vec<f64>,
}

impl ProfileSample {
    /// A circular profile of constant radius.
    pub fn constant(radius: f64, sides: usize) -> Self {
        Self {
            radii: vec![radius; sides],
        }
    }

    pub fn sides(&self) -> usize {
        self.radii.len()
    }

    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    /// Radius at slice `index`; wraps so the seam duplicate reads slice 0.
    pub fn radius(&self, index: usize) -> f64 {
        self.radii[index % self.radii.len()]
    }

    pub fn max_radius(&self) -> f64 {
        self.radii.iter().copied().fold(0.0, f64::max)
    }
}

/// Far intersection of the ray at `theta` with point `index`'s footprint circle.
///
/// With `R` the ring radius, `r` the footprint radius and `θ′` the angle
/// between the ray and the point, the chord length `t` solves
/// `t² − 2tR·cos θ′ + R² − r² = 0`. The larger root is
/// `R·cos θ′ + √(r² − R²·sin² θ′)`.
///
/// Returns `None` when the ray misses the circle, or when the circle lies
/// entirely behind the center along this ray.
pub fn extended_radius(theta: f64, ring: &RingSpec, index: u32) -> Option<f64> {
    if ring.is_empty() {
        return None;
    }
    let relative = reduce_angle(theta - ring.point_angle(index));
    let (sin, cos) = relative.sin_cos();

    let across = ring.radius * sin;
    let discriminant = ring.node_radius * ring.node_radius - across * across;
    if discriminant < 0.0 {
        return None;
    }

    let far = ring.radius * cos + discriminant.sqrt();
    (far >= 0.0).then_some(far)
}

/// Widest contribution of any point in `ring` along `theta`.
fn ring_extent(theta: f64, ring: &RingSpec) -> Option<f64> {
    (0..ring.count)
        .filter_map(|i| extended_radius(theta, ring, i))
        .reduce(f64::max)
}

/// Compute the base shape for `pattern` around a deck of `top_radius`.
#[instrument(skip(pattern), fields(pattern = %pattern.name))]
pub fn compute_base_shape(
    top_radius: f64,
    pattern: &PatternSpec,
    sides: usize,
) -> Result<ProfileSample, KernelError> {
    check_sides(sides)?;
    let top_radius = check_dimension("top_radius", top_radius)?;

    let radii: Vec<f64> = (0..sides)
        .map(|i| {
            let theta = slice_angle(i, sides);
            pattern
                .rings
                .iter()
                .filter_map(|ring| ring_extent(theta, ring))
                .fold(top_radius, f64::max)
        })
        .collect();

    let sample = ProfileSample { radii };
    debug!(
        sides,
        max_radius = sample.max_radius(),
        "base shape computed"
    );
    Ok(sample)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_4;

    fn four_ring(node_radius: f64) -> PatternSpec {
        PatternSpec::new("four").with_ring(RingSpec::new(4, 0.5, 0.0, node_radius, 1))
    }

    #[test]
    fn test_aligned_slice_reaches_far_edge() {
        let ring = RingSpec::new(4, 0.5, 0.0, 0.5, 1);
        let r = extended_radius(0.0, &ring, 0).unwrap();
        assert_relative_eq!(r, 1.0, epsilon = 1e-12);
        assert!(r > 0.625);
    }

    #[test]
    fn test_between_points_with_wide_footprint() {
        // At 45° both neighbours reach 0.5·cos45 + √(0.25 − 0.125) = √2/2.
        let shape = compute_base_shape(0.625, &four_ring(0.5), 8).unwrap();
        assert_relative_eq!(shape.radius(0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(shape.radius(1), FRAC_PI_4.cos(), epsilon = 1e-12);
    }

    #[test]
    fn test_ray_missing_every_circle_keeps_top_radius() {
        let ring = RingSpec::new(4, 0.5, 0.0, 0.1, 1);
        assert!(extended_radius(FRAC_PI_4, &ring, 0).is_none());
        assert!(extended_radius(FRAC_PI_4, &ring, 1).is_none());

        let shape = compute_base_shape(0.625, &four_ring(0.1), 8).unwrap();
        assert_relative_eq!(shape.radius(1), 0.625);
        assert_relative_eq!(shape.radius(0), 0.625);
    }

    #[test]
    fn test_circle_behind_center_contributes_nothing() {
        // Point at +Z with a small footprint, looking along −Z.
        let ring = RingSpec::new(1, 1.0, 0.0, 0.2, 1);
        assert!(extended_radius(std::f64::consts::PI, &ring, 0).is_none());
    }

    #[test]
    fn test_center_point_is_uniform() {
        let pattern = PatternSpec::new("middle").with_ring(RingSpec::new(1, 0.0, 0.0, 0.8, 1));
        let shape = compute_base_shape(0.5, &pattern, 12).unwrap();
        for &r in shape.radii() {
            assert_relative_eq!(r, 0.8, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_empty_ring_is_constant_profile() {
        let catalog = Catalog::standard();
        let shape = compute_base_shape(0.625, catalog.pattern(0).unwrap(), 24).unwrap();
        assert_eq!(shape, ProfileSample::constant(0.625, 24));
    }

    #[test]
    fn test_offset_rotates_profile() {
        let plain = compute_base_shape(0.3, &four_ring(0.3), 8).unwrap();
        let offset = PatternSpec::new("offset").with_ring(RingSpec::new(4, 0.5, 45.0, 0.3, 1));
        let rotated = compute_base_shape(0.3, &offset, 8).unwrap();
        for i in 0..8 {
            assert_relative_eq!(plain.radius(i), rotated.radius(i + 1), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_rejects_too_few_sides() {
        let err = compute_base_shape(0.5, &four_ring(0.5), 2).unwrap_err();
        assert!(matches!(err, KernelError::InvalidSides { provided: 2, .. }));
    }

    #[test]
    fn test_rejects_negative_top_radius() {
        let err = compute_base_shape(-1.0, &four_ring(0.5), 8).unwrap_err();
        assert!(matches!(err, KernelError::InvalidDimension { parameter: "top_radius", .. }));
    }
}
