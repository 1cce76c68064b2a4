//! Connected-body graph and the clearance sweep over it.
//!
//! Bodies live in a slotmap arena and connect in a tree: each body has at
//! most one parent and any number of children. The sweep walks that tree
//! outward from an anchor and reports how far the attached geometry reaches
//! past a reference plane.

pub mod clearance;
pub mod collider;
pub mod error;
pub mod graph;
pub mod pose;

pub use clearance::{has_procedural_attachments, max_clearance};
pub use collider::{CollisionVolume, ReferencePlane};
pub use error::AssemblyError;
pub use graph::{Attachment, Body, BodyGraph, BodyId};
pub use pose::Pose;
