use thiserror::Error;

/// Errors raised while computing profiles, meshes, or node layouts.
#[derive(Debug, Error)]
pub enum KernelError {
    #[error("profile needs at least {required} sides, got {provided}")]
    InvalidSides { required: usize, provided: usize },

    #[error("{parameter} must be finite and non-negative, got {value}")]
    InvalidDimension { parameter: &'static str, value: f64 },

    #[error("{parameter} of {value} exceeds the limit of {limit}")]
    ExceedsLimit {
        parameter: &'static str,
        value: f64,
        limit: f64,
    },

    #[error("pattern index {index} out of range ({count} patterns)")]
    UnknownPattern { index: usize, count: usize },

    #[error("size index {index} out of range ({count} sizes)")]
    UnknownSize { index: usize, count: usize },

    #[error("triangle {triangle} references vertex {index}, mesh has {vertex_count}")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("invalid persisted configuration: {0}")]
    Persistence(#[from] serde_json::Error),
}

/// Reject negative, NaN, and infinite dimensions.
pub(crate) fn check_dimension(parameter: &'static str, value: f64) -> Result<f64, KernelError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(KernelError::InvalidDimension { parameter, value })
    }
}

/// Reject heights too tall to loft within [`crate::mesh::MAX_LEVELS`] rows.
pub(crate) fn check_height(parameter: &'static str, value: f64) -> Result<f64, KernelError> {
    let value = check_dimension(parameter, value)?;
    if value > crate::mesh::MAX_MESH_HEIGHT {
        return Err(KernelError::ExceedsLimit {
            parameter,
            value,
            limit: crate::mesh::MAX_MESH_HEIGHT,
        });
    }
    Ok(value)
}
