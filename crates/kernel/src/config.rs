//! Build configuration.
//!
//! `BuildConfig` is the persisted selection state of one mount. It is an
//! immutable value: every interaction produces a new config rather than
//! editing fields in place. `MeshConfig` holds tessellation constants.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::{KernelError, check_dimension, check_height};
use crate::mesh::DEFAULT_WALL_THICKNESS;
use crate::profile::check_sides;

/// Tessellation and proportion constants shared by the plate and fairing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshConfig {
    /// Angular slices around the stack axis.
    pub sides: usize,
    /// Height of the constant-radius lip under the taper.
    pub flange_height: f64,
    /// Gap between the fairing's inner and outer shells.
    pub wall_thickness: f64,
    /// Taper height per unit of radial growth from deck to footprint.
    pub taper_ratio: f64,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            sides: 60,
            flange_height: 0.1,
            wall_thickness: DEFAULT_WALL_THICKNESS,
            taper_ratio: 1.0,
        }
    }
}

impl MeshConfig {
    /// A coarse config for previews and tests.
    pub fn coarse() -> Self {
        Self {
            sides: 12,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), KernelError> {
        check_sides(self.sides)?;
        check_height("flange_height", self.flange_height)?;
        check_dimension("wall_thickness", self.wall_thickness)?;
        check_dimension("taper_ratio", self.taper_ratio)?;
        Ok(())
    }
}

/// Selection state of one mount, as persisted by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Selected pattern. `None` until the user first picks one; persisted as `-1`.
    #[serde(with = "pattern_sentinel")]
    pub pattern: Option<usize>,
    /// Index into the catalog's sizes for the deck.
    pub top_size: usize,
    /// Index into the catalog's sizes for the fairing's lower opening.
    pub bottom_size: usize,
    /// Depth below the deck that the fairing must reach, from the last clearance sweep.
    pub fairing_base: f64,
    /// Uniform scale of the owning body.
    pub scale: f64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            pattern: None,
            top_size: 1,
            bottom_size: 1,
            fairing_base: 0.0,
            scale: 1.0,
        }
    }
}

impl BuildConfig {
    pub fn with_pattern(&self, pattern: Option<usize>) -> Self {
        Self {
            pattern,
            ..self.clone()
        }
    }

    pub fn with_fairing_base(&self, fairing_base: f64) -> Self {
        Self {
            fairing_base,
            ..self.clone()
        }
    }

    /// Advance to the next pattern, wrapping. The unset sentinel advances to 0.
    pub fn next_pattern(&self, pattern_count: usize) -> Self {
        let next = self.pattern.map_or(0, |p| p + 1);
        self.with_pattern(Some(next % pattern_count.max(1)))
    }

    pub fn next_top_size(&self, size_count: usize) -> Self {
        Self {
            top_size: (self.top_size + 1) % size_count.max(1),
            ..self.clone()
        }
    }

    pub fn next_bottom_size(&self, size_count: usize) -> Self {
        Self {
            bottom_size: (self.bottom_size + 1) % size_count.max(1),
            ..self.clone()
        }
    }

    /// Check every index against `catalog` and every dimension for sanity.
    pub fn validate(&self, catalog: &Catalog) -> Result<(), KernelError> {
        if let Some(index) = self.pattern {
            catalog.pattern(index)?;
        }
        catalog.size(self.top_size)?;
        catalog.size(self.bottom_size)?;
        check_height("fairing_base", self.fairing_base)?;
        check_dimension("scale", self.scale)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, KernelError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, KernelError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Persist `Option<usize>` as a signed index with `-1` meaning unset.
mod pattern_sentinel {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<usize>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(index) => serializer.serialize_i64(*index as i64),
            None => serializer.serialize_i64(-1),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<usize>, D::Error> {
        match i64::deserialize(deserializer)? {
            -1 => Ok(None),
            raw => usize::try_from(raw)
                .map(Some)
                .map_err(|_| D::Error::custom(format!("pattern index {raw} is neither -1 nor an index"))),
        }
    }
}
