//! Scenario tests for the seed sweep
//!
//! Tests are organized by topic:
//! - `expansion` - Schema construction and Cartesian-product expansion
//! - `batch` - Build planning and the batch runner against a mock builder
//! - `pipeline` - Argument text through to rendered journals

mod batch;
mod expansion;
mod pipeline;
