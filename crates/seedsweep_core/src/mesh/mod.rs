//! Mesh generation for one seed value.
//!
//! [`MeshTemplate`] renders the journal, and a [`MeshBuilder`] hands it to
//! the meshing tool. The tool is opaque: its failures come back as
//! [`ExternalToolError`](crate::error::ExternalToolError) untouched.

mod builder;
mod template;

pub use builder::*;
pub use template::*;
