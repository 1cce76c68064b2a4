//! Clearance sweep across the connected-body tree.

use tracing::{debug, instrument, warn};

use mount_kernel::nodes::is_procedural_id;

use crate::collider::ReferencePlane;
use crate::error::AssemblyError;
use crate::graph::{BodyGraph, BodyId};

/// Farthest any body attached outward from `anchor` reaches past `plane`.
///
/// Every neighbor of `anchor` except `exclude` is visited, and the walk
/// continues outward from each one away from the body it came from. At the
/// top level (`exclude` is `None`) a neighbor joined through a stack node that
/// is not procedural belongs to the anchor's own stack and is skipped.
#[instrument(level = "debug", skip(graph, plane))]
pub fn max_clearance(
    graph: &BodyGraph,
    anchor: BodyId,
    exclude: Option<BodyId>,
    plane: &ReferencePlane,
) -> Result<f64, AssemblyError> {
    let mut max = 0.0_f64;
    for neighbor in graph.neighbors(anchor)? {
        if Some(neighbor) == exclude {
            continue;
        }
        if exclude.is_none() {
            if let Some(node) = graph.node_toward(anchor, neighbor) {
                if !is_procedural_id(node) {
                    debug!(node, "skipping body on the anchor's own stack");
                    continue;
                }
            }
        }
        max = max.max(body_clearance(graph, neighbor, anchor, plane)?);
    }
    Ok(max)
}

/// Reach of `body` itself and of everything beyond it.
fn body_clearance(
    graph: &BodyGraph,
    body: BodyId,
    came_from: BodyId,
    plane: &ReferencePlane,
) -> Result<f64, AssemblyError> {
    let b = graph.body(body)?;
    let own = match &b.collider {
        Some(volume) => volume.max_distance(&b.pose, plane),
        None => {
            warn!(body = %b.name, "no supported collision volume, counting as zero");
            0.0
        }
    };
    debug!(body = %b.name, distance = own, "body measured");
    let beyond = max_clearance(graph, body, Some(came_from), plane)?;
    Ok(own.max(beyond))
}

/// Whether anything is connected to `body` through a procedural node.
pub fn has_procedural_attachments(graph: &BodyGraph, body: BodyId) -> Result<bool, AssemblyError> {
    Ok(graph
        .neighbors(body)?
        .into_iter()
        .filter_map(|n| graph.node_toward(body, n))
        .any(is_procedural_id))
}
