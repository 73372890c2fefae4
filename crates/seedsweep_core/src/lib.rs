//! Mesh seed sweep library
//!
//! This crate turns a sweep over the mesh *global seed* (target element size)
//! into concrete, reproducible mesh builds.
//! It supports:
//! - Validating untrusted seed arguments into the non-negative float domain
//! - Declarative parameter schemas with JSON/YAML interchange
//! - Lazy Cartesian-product expansion in a fixed, restartable order
//! - Rendering the meshing journal for one seed
//! - Running the external meshing tool behind a mockable capability trait
//!
//! # Example
//!
//! ```ignore
//! use seedsweep_core::batch::{BatchConfig, BuildPlan, run_builds};
//! use seedsweep_core::mesh::{ExternalMeshBuilder, MeshTemplate};
//! use seedsweep_core::{build_schema, validate_positive_float};
//!
//! let seeds = ["1.0", "0.5"]
//!     .iter()
//!     .map(|s| validate_positive_float(s))
//!     .collect::<Result<Vec<_>, _>>()?;
//! let schema = build_schema(&seeds);
//!
//! let plan = BuildPlan::new(&schema, &MeshTemplate::default(), "out".as_ref(), "model")?;
//! let builder = ExternalMeshBuilder::new("cubit", "out/journals");
//! let results = run_builds(&builder, &plan, &BatchConfig::default(), None);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod batch;
pub mod error;
pub mod io;
pub mod mesh;
pub mod sweep;
pub mod validate;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use error::{ArgumentError, ExternalToolError, SchemaError};
pub use mesh::{MeshArtifact, MeshBuilder, MeshRequest, MeshTemplate};
pub use sweep::{
    DEFAULT_GLOBAL_SEED, GLOBAL_SEED, ParameterSet, Schema, build_default_schema, build_schema,
};
pub use validate::{Seed, validate_positive_float};
