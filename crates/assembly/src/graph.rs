use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};

use crate::collider::CollisionVolume;
use crate::error::AssemblyError;
use crate::pose::Pose;

new_key_type! {
    pub struct BodyId;
}

/// How a child body is connected to its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attachment {
    /// Glued to the parent's surface, no node on either side.
    Surface,
    /// Joined through a node on each body.
    Stack { parent_node: String, child_node: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub name: String,
    pub pose: Pose,
    /// `None` when the host exposes no collision geometry the sweep understands.
    pub collider: Option<CollisionVolume>,
    pub parent: Option<BodyId>,
    /// Connection to `parent`; `None` for a root.
    pub attachment: Option<Attachment>,
    pub children: Vec<BodyId>,
}

/// Tree of connected bodies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BodyGraph {
    bodies: SlotMap<BodyId, Body>,
}

impl BodyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn add_root(&mut self, name: impl Into<String>, pose: Pose, collider: Option<CollisionVolume>) -> BodyId {
        self.bodies.insert(Body {
            name: name.into(),
            pose,
            collider,
            parent: None,
            attachment: None,
            children: Vec::new(),
        })
    }

    /// Add a body below `parent`.
    pub fn attach(
        &mut self,
        parent: BodyId,
        name: impl Into<String>,
        pose: Pose,
        collider: Option<CollisionVolume>,
        attachment: Attachment,
    ) -> Result<BodyId, AssemblyError> {
        if !self.bodies.contains_key(parent) {
            return Err(AssemblyError::UnknownBody(parent));
        }
        let child = self.bodies.insert(Body {
            name: name.into(),
            pose,
            collider,
            parent: Some(parent),
            attachment: Some(attachment),
            children: Vec::new(),
        });
        self.bodies[parent].children.push(child);
        Ok(child)
    }

    /// Remove a leaf body. Returns it if it existed and had no children.
    pub fn detach(&mut self, id: BodyId) -> Result<Body, AssemblyError> {
        let body = self.bodies.get(id).ok_or(AssemblyError::UnknownBody(id))?;
        if !body.children.is_empty() {
            return Err(AssemblyError::HasChildren(id));
        }
        let body = self.bodies.remove(id).ok_or(AssemblyError::UnknownBody(id))?;
        if let Some(parent) = body.parent.and_then(|p| self.bodies.get_mut(p)) {
            parent.children.retain(|&c| c != id);
        }
        Ok(body)
    }

    pub fn body(&self, id: BodyId) -> Result<&Body, AssemblyError> {
        self.bodies.get(id).ok_or(AssemblyError::UnknownBody(id))
    }

    /// Children first, in attach order, then the parent.
    pub fn neighbors(&self, id: BodyId) -> Result<Vec<BodyId>, AssemblyError> {
        let body = self.body(id)?;
        Ok(body.children.iter().copied().chain(body.parent).collect())
    }

    /// The node on `body` through which it connects to `neighbor`.
    ///
    /// `None` for surface attachments and for bodies that are not adjacent.
    pub fn node_toward(&self, body: BodyId, neighbor: BodyId) -> Option<&str> {
        let b = self.bodies.get(body)?;
        let n = self.bodies.get(neighbor)?;
        if n.parent == Some(body) {
            match n.attachment.as_ref()? {
                Attachment::Stack { parent_node, .. } => Some(parent_node.as_str()),
                Attachment::Surface => None,
            }
        } else if b.parent == Some(neighbor) {
            match b.attachment.as_ref()? {
                Attachment::Stack { child_node, .. } => Some(child_node.as_str()),
                Attachment::Surface => None,
            }
        } else {
            None
        }
    }

    /// Whether any neighbor is connected through `node` on `body`.
    pub fn is_node_occupied(&self, body: BodyId, node: &str) -> Result<bool, AssemblyError> {
        Ok(self
            .neighbors(body)?
            .into_iter()
            .any(|n| self.node_toward(body, n) == Some(node)))
    }
}
