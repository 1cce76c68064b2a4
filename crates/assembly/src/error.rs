use thiserror::Error;

use crate::graph::BodyId;

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("body {0:?} is not in the graph")]
    UnknownBody(BodyId),

    #[error("body {0:?} still has children attached")]
    HasChildren(BodyId),

    #[error("reference plane normal has zero length")]
    DegenerateNormal,
}
