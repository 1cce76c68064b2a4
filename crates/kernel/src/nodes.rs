//! Attachment-point layout.
//!
//! The whole node set is a pure function of the pattern and the computed
//! heights. It is regenerated in full on every change and never patched in
//! place, so no stale node can survive a rebuild.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::catalog::PatternSpec;
use crate::geometry::{Point3, Vec3};

/// Id prefix of every node this crate generates.
pub const PROCEDURAL_ID_ROOT: &str = "ProcNode";
/// Most procedural nodes any pattern may need; the unset layout emits this many.
pub const MAX_PROCEDURAL_NODES: usize = 20;
/// Where placeholder nodes are parked so nothing can reach them.
pub const PARKED_OFFSET: f64 = -10000.0;

pub const TOP_NODE_ID: &str = "top";
pub const BOTTOM_NODE_ID: &str = "bottom";

/// Whether `id` names a node generated from a ring pattern.
pub fn is_procedural_id(id: &str) -> bool {
    id.starts_with(PROCEDURAL_ID_ROOT)
}

/// Id of the `seq`-th procedural node, counting from 1.
pub fn procedural_id(seq: usize) -> String {
    format!("{PROCEDURAL_ID_ROOT}{seq}")
}

/// A point where another body can be stacked onto the mount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentPoint {
    pub id: String,
    pub position: Point3,
    /// Unit direction along which an attached body's stack runs.
    pub orientation: Vec3,
    pub size: u32,
}

impl AttachmentPoint {
    pub fn is_procedural(&self) -> bool {
        is_procedural_id(&self.id)
    }
}

/// Heights and sizes the node layout depends on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeLayout {
    /// Depth of the plate's base below the deck, where ring nodes sit.
    pub plate_depth: f64,
    /// Depth of the bottom stack node below the deck.
    pub bottom_depth: f64,
    pub top_size: u32,
    pub bottom_size: u32,
    pub scale: f64,
}

/// Lay out every attachment point: `top`, `bottom`, then the ring nodes.
///
/// Ring nodes follow pattern order, and within a ring run from the offset
/// angle around. With no pattern selected, [`MAX_PROCEDURAL_NODES`]
/// placeholders are parked out of reach so consumers always see a stable
/// node set.
#[instrument(skip_all, fields(pattern = pattern.map(|p| p.name.as_str())))]
pub fn place_nodes(pattern: Option<&PatternSpec>, layout: &NodeLayout) -> Vec<AttachmentPoint> {
    let down = -Vec3::y();
    let mut nodes = vec![
        AttachmentPoint {
            id: TOP_NODE_ID.to_string(),
            position: Point3::origin(),
            orientation: Vec3::y(),
            size: layout.top_size,
        },
        AttachmentPoint {
            id: BOTTOM_NODE_ID.to_string(),
            position: Point3::new(0.0, -layout.bottom_depth, 0.0) * layout.scale,
            orientation: down,
            size: layout.bottom_size,
        },
    ];

    match pattern {
        None => {
            nodes.extend((1..=MAX_PROCEDURAL_NODES).map(|seq| AttachmentPoint {
                id: procedural_id(seq),
                position: Point3::new(PARKED_OFFSET, 0.0, PARKED_OFFSET),
                orientation: down,
                size: 1,
            }));
        }
        Some(pattern) => {
            let mut seq = 1;
            for ring in &pattern.rings {
                for i in 0..ring.count {
                    let (sin, cos) = ring.point_angle(i).sin_cos();
                    let local = Point3::new(sin * ring.radius, -layout.plate_depth, cos * ring.radius);
                    nodes.push(AttachmentPoint {
                        id: procedural_id(seq),
                        position: local * layout.scale,
                        orientation: down,
                        size: ring.size,
                    });
                    seq += 1;
                }
            }
        }
    }

    debug!(
        nodes = %nodes
            .iter()
            .map(|n| format!("{}@({:.3},{:.3},{:.3})", n.id, n.position.x, n.position.y, n.position.z))
            .collect::<Vec<_>>()
            .join(" "),
        "attachment points placed"
    );
    nodes
}
