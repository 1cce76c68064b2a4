pub mod bezier;

use std::f64::consts::{PI, TAU};

pub use bezier::ProfileCurve;

pub type Point3 = nalgebra::Point3<f64>;
pub type Vec3 = nalgebra::Vector3<f64>;
pub type Point2 = nalgebra::Point2<f64>;

/// Angle of slice `index` when the circle is cut into `sides` equal slices.
///
/// Indices wrap, so `slice_angle(sides, sides)` is exactly zero rather than a
/// rounded `TAU`. Seam duplicates rely on this to land on the same position.
pub fn slice_angle(index: usize, sides: usize) -> f64 {
    TAU * (index % sides) as f64 / sides as f64
}

/// Horizontal unit direction for an angle measured from +Z toward +X.
pub fn radial_direction(angle: f64) -> Vec3 {
    Vec3::new(angle.sin(), 0.0, angle.cos())
}

/// Point at `radius` along `angle`, at height `y`.
pub fn radial_point(angle: f64, radius: f64, y: f64) -> Point3 {
    let dir = radial_direction(angle);
    Point3::new(dir.x * radius, y, dir.z * radius)
}

/// Reduce an angle to the half-open interval (-PI, PI].
pub fn reduce_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    if a > PI { a - TAU } else { a }
}
