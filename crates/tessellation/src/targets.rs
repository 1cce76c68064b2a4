//! Named model targets the host renders and collides with.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use mount_kernel::MeshBuffer;

use crate::error::TessellationError;
use crate::{CollisionMesh, TriangleMesh};

pub const PLATE_TARGET: &str = "plate";
pub const FAIRING_TARGET: &str = "fairing";

/// Render and collision geometry for one named model node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelTarget {
    pub render: TriangleMesh,
    pub collision: CollisionMesh,
}

/// The set of model targets an owning body exposes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelTargets {
    targets: HashMap<String, ModelTarget>,
}

impl ModelTargets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty `plate` and `fairing` targets.
    pub fn standard() -> Self {
        Self::with_names([PLATE_TARGET, FAIRING_TARGET])
    }

    pub fn with_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            targets: names
                .into_iter()
                .map(|name| (name.to_string(), ModelTarget::default()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ModelTarget> {
        self.targets.get(name)
    }

    /// Swap both buffers of `name` for ones built from `buffer`.
    ///
    /// The target is left untouched on any error.
    pub fn replace(&mut self, name: &str, buffer: &MeshBuffer) -> Result<(), TessellationError> {
        let target = self
            .targets
            .get_mut(name)
            .ok_or_else(|| TessellationError::MissingTarget(name.to_string()))?;
        let render = TriangleMesh::from_buffer(buffer)?;
        let collision = CollisionMesh::from_buffer(buffer)?;
        *target = ModelTarget { render, collision };
        debug!(target = name, vertices = buffer.vertex_count(), "model target replaced");
        Ok(())
    }
}
