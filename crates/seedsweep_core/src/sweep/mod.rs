//! Parameter schemas and their Cartesian-product expansion.
//!
//! A [`Schema`] maps parameter names to ordered candidate values. Expanding it
//! enumerates every combination as a [`ParameterSet`]:
//!
//! ```
//! use seedsweep_core::sweep::Schema;
//!
//! let schema = Schema::new()
//!     .parameter("a", &[1, 2])
//!     .parameter("b", &[10, 20]);
//!
//! let sets: Vec<String> = schema
//!     .expand()
//!     .unwrap()
//!     .map(|set| set.to_string())
//!     .collect();
//!
//! assert_eq!(sets, ["{a: 1, b: 10}", "{a: 1, b: 20}", "{a: 2, b: 10}", "{a: 2, b: 20}"]);
//! ```
//!
//! The mesh seed sweep is the one-parameter case built by [`build_schema`].
//!
//! # N-Dimensional Grid
//!
//! Per-set results are stored in a [`SweepGrid`] shaped like the schema, with
//! each set's [`ParameterSet::indices`] addressing its cell.

mod expand;
mod grid;
mod schema;

pub use expand::*;
pub use grid::*;
pub use schema::*;
