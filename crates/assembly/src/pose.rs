//! Rigid placement of a body in world space.
//!
//! Orientation is an axis-angle vector: its direction is the rotation axis
//! and its length the angle in radians, expanded with Rodrigues' formula.

use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

use mount_kernel::geometry::{Point3, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Point3,
    pub orientation: Vec3,
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl Pose {
    pub fn identity() -> Self {
        Self {
            position: Point3::origin(),
            orientation: Vec3::zeros(),
        }
    }

    pub fn new(position: Point3, orientation: Vec3) -> Self {
        Self { position, orientation }
    }

    pub fn at(position: Point3) -> Self {
        Self::new(position, Vec3::zeros())
    }

    pub fn rotation(&self) -> Matrix3<f64> {
        rotation_matrix(&self.orientation)
    }

    /// Body-local point to world: `R · p + position`.
    pub fn transform_point(&self, local: &Point3) -> Point3 {
        self.position + self.rotation() * local.coords
    }

    /// Body-local direction to world, rotation only.
    pub fn transform_direction(&self, local: &Vec3) -> Vec3 {
        self.rotation() * local
    }
}

/// Rodrigues' rotation formula: `R = I + sin θ K + (1 − cos θ) K²`.
fn rotation_matrix(v: &Vec3) -> Matrix3<f64> {
    let theta = v.norm();
    if theta < 1e-14 {
        return Matrix3::identity();
    }
    let k = skew(&(v / theta));
    Matrix3::identity() + theta.sin() * k + (1.0 - theta.cos()) * (k * k)
}

/// Skew-symmetric matrix with `skew(a) * b = a × b`.
fn skew(v: &Vec3) -> Matrix3<f64> {
    Matrix3::new(
        0.0, -v.z, v.y,
        v.z, 0.0, -v.x,
        -v.y, v.x, 0.0,
    )
}
