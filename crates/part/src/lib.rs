//! The owning-body controller.
//!
//! [`ProceduralMount`] holds the current configuration and build output of
//! one mount, handles the interactive triggers, and pushes rebuilt geometry
//! into the host's model targets.

pub mod error;
pub mod mount;
pub mod notices;

pub use error::MountError;
pub use mount::ProceduralMount;
pub use notices::{Notice, Notices, Severity};
