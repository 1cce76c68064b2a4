//! Named ring patterns and size presets.
//!
//! The catalog is static data. Everything downstream (base shape, plate,
//! fairing, node layout) is a function of one pattern entry and two size
//! entries selected from it.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::error::KernelError;

/// One ring of evenly spaced circular mounting points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingSpec {
    /// Number of points in the ring. Zero means "no ring".
    pub count: u32,
    /// Distance of each point's center from the stack axis.
    pub radius: f64,
    /// Angle of the first point, radians from +Z toward +X.
    pub offset_angle: f64,
    /// Radius of the circular footprint reserved around each point.
    pub node_radius: f64,
    /// Attachment size class of the generated nodes.
    pub size: u32,
}

impl RingSpec {
    /// Build a ring from an offset given in degrees.
    pub fn new(count: u32, radius: f64, offset_degrees: f64, node_radius: f64, size: u32) -> Self {
        Self {
            count,
            radius,
            offset_angle: offset_degrees.to_radians(),
            node_radius,
            size,
        }
    }

    /// Angular position of point `index` within the ring.
    pub fn point_angle(&self, index: u32) -> f64 {
        TAU * index as f64 / self.count as f64 + self.offset_angle
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// An ordered list of rings. Order only matters for node numbering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternSpec {
    pub name: String,
    pub rings: Vec<RingSpec>,
}

impl PatternSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rings: Vec::new(),
        }
    }

    pub fn with_ring(mut self, ring: RingSpec) -> Self {
        self.rings.push(ring);
        self
    }

    /// Total number of procedural points this pattern generates.
    pub fn point_count(&self) -> usize {
        self.rings.iter().map(|r| r.count as usize).sum()
    }
}

/// A selectable deck/base diameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeOption {
    pub name: String,
    pub radius: f64,
    /// Attachment size class for nodes of this diameter.
    pub node_size: u32,
}

impl SizeOption {
    pub fn new(name: impl Into<String>, diameter: f64, node_size: u32) -> Self {
        Self {
            name: name.into(),
            radius: diameter * 0.5,
            node_size,
        }
    }
}

/// The set of patterns and sizes a mount can cycle through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub patterns: Vec<PatternSpec>,
    pub sizes: Vec<SizeOption>,
}

/// Ring radius used by the standard patterns.
const STANDARD_RING_RADIUS: f64 = 0.625;

impl Catalog {
    /// The stock pattern and size list.
    pub fn standard() -> Self {
        let sizes = vec![
            SizeOption::new("0.625m", 0.625, 0),
            SizeOption::new("1.25m", 1.25, 1),
            SizeOption::new("2.5m", 2.5, 2),
            SizeOption::new("3.75m", 3.75, 3),
        ];

        // Footprint of a size-1 node.
        let node_radius = sizes[1].radius;
        let ring = |count, radius, offset| RingSpec::new(count, radius, offset, node_radius, 1);
        let r = STANDARD_RING_RADIUS;

        let patterns = vec![
            PatternSpec::new("Empty").with_ring(ring(0, 0.0, 0.0)),
            PatternSpec::new("One in the middle").with_ring(ring(1, 0.0, 0.0)),
            PatternSpec::new("Two on either side").with_ring(ring(2, r, 0.0)),
            PatternSpec::new("Ring of 3").with_ring(ring(3, r, 0.0)),
            PatternSpec::new("Ring of 4").with_ring(ring(4, r, 0.0)),
            PatternSpec::new("Ring of 4, offset 45°").with_ring(ring(4, r, 45.0)),
            PatternSpec::new("Ring of 6").with_ring(ring(6, r, 0.0)),
            PatternSpec::new("Ring of 6 and one in the middle")
                .with_ring(ring(6, r, 0.0))
                .with_ring(ring(1, 0.0, 0.0)),
        ];

        Self { patterns, sizes }
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn size_count(&self) -> usize {
        self.sizes.len()
    }

    pub fn pattern(&self, index: usize) -> Result<&PatternSpec, KernelError> {
        self.patterns.get(index).ok_or(KernelError::UnknownPattern {
            index,
            count: self.patterns.len(),
        })
    }

    pub fn size(&self, index: usize) -> Result<&SizeOption, KernelError> {
        self.sizes.get(index).ok_or(KernelError::UnknownSize {
            index,
            count: self.sizes.len(),
        })
    }

    /// Largest number of procedural points any pattern generates.
    pub fn max_point_count(&self) -> usize {
        self.patterns.iter().map(PatternSpec::point_count).max().unwrap_or(0)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
