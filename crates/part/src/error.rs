use thiserror::Error;

use mount_assembly::AssemblyError;
use mount_kernel::KernelError;

#[derive(Debug, Error)]
pub enum MountError {
    #[error("can't change the mount while bodies are attached to its procedural nodes")]
    ProceduralAttachmentsPresent,

    #[error(transparent)]
    Kernel(#[from] KernelError),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),
}
