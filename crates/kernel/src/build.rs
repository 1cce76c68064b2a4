//! The full rebuild pipeline: base shape, plate, fairing, nodes.
//!
//! `build_all` is a pure function of the catalog and the two configs, so the
//! caller can always swap a fresh [`BuildOutput`] in whole.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::catalog::{Catalog, PatternSpec};
use crate::config::{BuildConfig, MeshConfig};
use crate::error::KernelError;
use crate::mesh::{FairingOptions, MeshBuffer, build_fairing_mesh_with, build_plate_mesh};
use crate::nodes::{AttachmentPoint, NodeLayout, place_nodes};
use crate::profile::{ProfileSample, compute_base_shape};

/// Heights derived from the base shape, in model units below the deck.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlateDimensions {
    pub top_radius: f64,
    /// Height of the tapered wall.
    pub side_height: f64,
    pub flange_height: f64,
}

impl PlateDimensions {
    /// Derive the wall height from how far the footprint flares past the deck.
    pub fn derive(top_radius: f64, base_shape: &ProfileSample, mesh: &MeshConfig) -> Self {
        let flare = (base_shape.max_radius() - top_radius).max(0.0) * mesh.taper_ratio;
        let side_height = if crate::default_tolerance().is_zero_length(flare) {
            0.0
        } else {
            flare
        };
        Self {
            top_radius,
            side_height,
            flange_height: mesh.flange_height,
        }
    }

    /// Depth of the plate's base below the deck.
    pub fn depth(&self) -> f64 {
        self.side_height + self.flange_height
    }
}

/// Everything one rebuild produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildOutput {
    pub config: BuildConfig,
    pub base_shape: ProfileSample,
    pub dimensions: PlateDimensions,
    pub plate: MeshBuffer,
    pub fairing: MeshBuffer,
    pub nodes: Vec<AttachmentPoint>,
}

impl BuildOutput {
    /// Depth the fairing and bottom node reach below the deck.
    pub fn fairing_depth(&self) -> f64 {
        self.dimensions.depth().max(self.config.fairing_base)
    }

    pub fn node(&self, id: &str) -> Option<&AttachmentPoint> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Run the whole pipeline for `config`.
///
/// The unset pattern builds a plain disc at the deck radius and parks the
/// procedural nodes.
#[instrument(skip(catalog, mesh), fields(pattern = ?config.pattern))]
pub fn build_all(catalog: &Catalog, mesh: &MeshConfig, config: &BuildConfig) -> Result<BuildOutput, KernelError> {
    mesh.validate()?;
    config.validate(catalog)?;

    let pattern = config.pattern.map(|index| catalog.pattern(index)).transpose()?;
    let top = catalog.size(config.top_size)?;
    let bottom = catalog.size(config.bottom_size)?;

    let empty = PatternSpec::new("Unset");
    let base_shape = compute_base_shape(top.radius, pattern.unwrap_or(&empty), mesh.sides)?;
    let dimensions = PlateDimensions::derive(top.radius, &base_shape, mesh);

    let plate = build_plate_mesh(
        top.radius,
        &base_shape,
        dimensions.side_height,
        dimensions.flange_height,
    )?;

    let plate_depth = dimensions.depth();
    let fairing_depth = plate_depth.max(config.fairing_base);
    let options = FairingOptions {
        wall_thickness: mesh.wall_thickness,
        ..FairingOptions::default()
    };
    let fairing = build_fairing_mesh_with(&base_shape, bottom.radius, -plate_depth, -fairing_depth, &options)?;

    let nodes = place_nodes(
        pattern,
        &NodeLayout {
            plate_depth,
            bottom_depth: fairing_depth,
            top_size: top.node_size,
            bottom_size: bottom.node_size,
            scale: config.scale,
        },
    );

    info!(
        plate_triangles = plate.triangle_count(),
        fairing_triangles = fairing.triangle_count(),
        nodes = nodes.len(),
        depth = fairing_depth,
        "mount rebuilt"
    );

    Ok(BuildOutput {
        config: config.clone(),
        base_shape,
        dimensions,
        plate,
        fairing,
        nodes,
    })
}
