use tracing::{info, instrument, warn};

use mount_assembly::{BodyGraph, BodyId, ReferencePlane, has_procedural_attachments, max_clearance};
use mount_kernel::nodes::BOTTOM_NODE_ID;
use mount_kernel::{AttachmentPoint, BuildConfig, BuildOutput, Catalog, MeshConfig, build_all};
use mount_tessellation::{FAIRING_TARGET, ModelTargets, PLATE_TARGET};

use crate::error::MountError;
use crate::notices::Notices;

/// One procedural mount attached to a body in the host's graph.
#[derive(Debug, Clone)]
pub struct ProceduralMount {
    body: BodyId,
    catalog: Catalog,
    mesh_config: MeshConfig,
    output: BuildOutput,
    notices: Notices,
}

impl ProceduralMount {
    /// Build the initial geometry for `config` and write it to `targets`.
    pub fn new(
        body: BodyId,
        catalog: Catalog,
        mesh_config: MeshConfig,
        config: BuildConfig,
        targets: &mut ModelTargets,
    ) -> Result<Self, MountError> {
        let output = build_all(&catalog, &mesh_config, &config)?;
        write_targets(&output, targets);
        Ok(Self {
            body,
            catalog,
            mesh_config,
            output,
            notices: Notices::new(),
        })
    }

    /// Restore from the host's persisted configuration.
    pub fn from_persisted(
        body: BodyId,
        catalog: Catalog,
        mesh_config: MeshConfig,
        persisted: &str,
        targets: &mut ModelTargets,
    ) -> Result<Self, MountError> {
        let config = BuildConfig::from_json(persisted)?;
        Self::new(body, catalog, mesh_config, config, targets)
    }

    pub fn persisted(&self) -> Result<String, MountError> {
        Ok(self.config().to_json()?)
    }

    pub fn body(&self) -> BodyId {
        self.body
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &BuildConfig {
        &self.output.config
    }

    pub fn output(&self) -> &BuildOutput {
        &self.output
    }

    pub fn nodes(&self) -> &[AttachmentPoint] {
        &self.output.nodes
    }

    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }

    /// Rebuild everything for `config` and swap the result in.
    ///
    /// A build error leaves the current output in place. A missing model
    /// target only skips that target's write.
    #[instrument(skip(self, targets))]
    pub fn rebuild(&mut self, config: BuildConfig, targets: &mut ModelTargets) -> Result<(), MountError> {
        let output = build_all(&self.catalog, &self.mesh_config, &config)?;
        write_targets(&output, targets);
        self.output = output;
        Ok(())
    }

    /// Advance to the next ring pattern.
    pub fn cycle_pattern(&mut self, graph: &BodyGraph, targets: &mut ModelTargets, now: f64) -> Result<(), MountError> {
        self.ensure_unoccupied(graph, now, "node pattern")?;
        let config = self.config().next_pattern(self.catalog.pattern_count());
        self.rebuild(config, targets)?;
        let name = self
            .config()
            .pattern
            .and_then(|p| self.catalog.patterns.get(p))
            .map_or("", |p| p.name.as_str())
            .to_string();
        self.notices.info(format!("Node pattern: {name}"), now);
        Ok(())
    }

    /// Advance to the next deck size.
    pub fn cycle_top_size(&mut self, graph: &BodyGraph, targets: &mut ModelTargets, now: f64) -> Result<(), MountError> {
        self.ensure_unoccupied(graph, now, "top size")?;
        let config = self.config().next_top_size(self.catalog.size_count());
        self.rebuild(config, targets)?;
        let size = self.catalog.size(self.config().top_size)?.name.clone();
        self.notices.info(format!("Top size: {size}"), now);
        Ok(())
    }

    /// Advance to the next fairing opening size. Allowed with bodies attached.
    pub fn cycle_bottom_size(&mut self, targets: &mut ModelTargets, now: f64) -> Result<(), MountError> {
        let config = self.config().next_bottom_size(self.catalog.size_count());
        self.rebuild(config, targets)?;
        let size = self.catalog.size(self.config().bottom_size)?.name.clone();
        self.notices.info(format!("Bottom size: {size}"), now);
        Ok(())
    }

    /// Move the bottom node and fairing base down past everything attached.
    ///
    /// Sweeps from the owning body along the bottom node's world direction.
    /// Returns the measured clearance, or `None` when the bottom node is
    /// already occupied and nothing was done.
    #[instrument(skip(self, graph, targets))]
    pub fn float_bottom_node(
        &mut self,
        graph: &BodyGraph,
        targets: &mut ModelTargets,
        now: f64,
    ) -> Result<Option<f64>, MountError> {
        if graph.is_node_occupied(self.body, BOTTOM_NODE_ID)? {
            info!("bottom node occupied, not floating");
            return Ok(None);
        }
        let Some(bottom) = self.output.node(BOTTOM_NODE_ID) else {
            return Ok(None);
        };

        let pose = graph.body(self.body)?.pose;
        let plane = ReferencePlane::new(pose.position, pose.transform_direction(&bottom.orientation))?;
        let clearance = max_clearance(graph, self.body, None, &plane)?;
        info!(clearance, "sweep finished");

        if clearance > 0.0 {
            let scale = self.config().scale;
            let depth = if scale > 0.0 { clearance / scale } else { clearance };
            let config = self.config().with_fairing_base(depth);
            self.rebuild(config, targets)?;
            self.notices.success(format!("Bottom node floated to {clearance:.2} m"), now);
        }
        Ok(Some(clearance))
    }

    fn ensure_unoccupied(&mut self, graph: &BodyGraph, now: f64, what: &str) -> Result<(), MountError> {
        if has_procedural_attachments(graph, self.body)? {
            warn!(change = what, "rejected while procedural nodes are in use");
            self.notices
                .error(format!("Can't change {what} while parts are connected"), now);
            return Err(MountError::ProceduralAttachmentsPresent);
        }
        Ok(())
    }
}

/// Push both meshes to their targets. Each write stands alone.
fn write_targets(output: &BuildOutput, targets: &mut ModelTargets) {
    for (name, mesh) in [(PLATE_TARGET, &output.plate), (FAIRING_TARGET, &output.fairing)] {
        if let Err(err) = targets.replace(name, mesh) {
            warn!(target = name, %err, "model target not updated");
        }
    }
    info!(
        pattern = ?output.config.pattern,
        top_size = output.config.top_size,
        bottom_size = output.config.bottom_size,
        nodes = output.nodes.len(),
        "mount geometry published"
    );
}
