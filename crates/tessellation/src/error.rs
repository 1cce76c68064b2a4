use thiserror::Error;

use mount_kernel::KernelError;

#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("no model target named {0:?}")]
    MissingTarget(String),

    #[error("mesh buffer rejected: {0}")]
    InvalidBuffer(#[from] KernelError),
}
