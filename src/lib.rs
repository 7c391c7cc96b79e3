//! Enrollment streamgraph library
//!
//! Loads enrollment records, pivots student counts by term and department,
//! and renders them as a wiggle-stacked streamgraph document.
//!
//! Module organization:
//! - `enrollment`: reading, cleaning and aggregating records; properties and palettes
//! - `chart`: scales, stacking, paths, hover reducer and the renderer
//! - `config`: typed configuration built from properties
//! - `pipeline`: the async load → render entry point

pub mod chart;
pub mod config;
pub mod enrollment;
pub mod pipeline;
