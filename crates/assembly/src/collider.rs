//! Collision volumes and their reach past a reference plane.

use serde::{Deserialize, Serialize};

use mount_kernel::geometry::{Point3, Vec3};

use crate::error::AssemblyError;
use crate::pose::Pose;

/// The collision geometry a body exposes to the sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CollisionVolume {
    /// Body-local collision mesh vertices.
    Mesh { vertices: Vec<Point3> },
    /// Body-local box with full edge lengths `size`.
    Box { center: Point3, size: Vec3 },
}

impl CollisionVolume {
    /// Largest distance from `plane` to any point of the volume once placed at `pose`.
    pub fn max_distance(&self, pose: &Pose, plane: &ReferencePlane) -> f64 {
        match self {
            CollisionVolume::Mesh { vertices } => vertices
                .iter()
                .map(|v| plane.distance(&pose.transform_point(v)))
                .fold(0.0, f64::max),
            CollisionVolume::Box { center, size } => {
                let rotation = pose.rotation();
                let half = size * 0.5;
                let reach: f64 = (0..3)
                    .map(|k| (half[k] * rotation.column(k).dot(&plane.normal)).abs())
                    .sum();
                plane.distance(&pose.transform_point(center)) + reach
            }
        }
    }
}

/// A plane through `point` with unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferencePlane {
    pub point: Point3,
    pub normal: Vec3,
}

impl ReferencePlane {
    pub fn new(point: Point3, normal: Vec3) -> Result<Self, AssemblyError> {
        let normal = normal.try_normalize(1e-12).ok_or(AssemblyError::DegenerateNormal)?;
        Ok(Self { point, normal })
    }

    /// Unsigned distance from `p` to its projection on the plane.
    pub fn distance(&self, p: &Point3) -> f64 {
        let projected = p + self.normal * (self.point - p).dot(&self.normal);
        (p - projected).norm()
    }
}
