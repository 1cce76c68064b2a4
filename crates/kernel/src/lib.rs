pub mod build;
pub mod catalog;
pub mod config;
pub mod error;
pub mod geometry;
pub mod mesh;
pub mod nodes;
pub mod profile;

// Re-export the pipeline entry points at crate root for convenience.
pub use build::{BuildOutput, PlateDimensions, build_all};
pub use catalog::{Catalog, PatternSpec, RingSpec, SizeOption};
pub use config::{BuildConfig, MeshConfig};
pub use error::KernelError;
pub use mesh::MeshBuffer;
pub use nodes::{AttachmentPoint, NodeLayout, place_nodes};
pub use profile::{ProfileSample, compute_base_shape};

/// Tolerance for deciding when a generated dimension has collapsed to nothing.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Lengths below this are treated as zero (meters).
    pub length: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self { length: 1e-6 }
    }
}

impl Tolerance {
    pub fn is_zero_length(&self, length: f64) -> bool {
        length.abs() < self.length
    }
}

pub fn default_tolerance() -> Tolerance {
    Tolerance::default()
}
