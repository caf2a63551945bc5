//! Scene field: the per-pixel coverage, tone, depth, and flow direction that drives
//! stroke placement.
//!
//! The field is produced outside this crate (typically by rasterizing a 3D scene)
//! and handed over as a dense raster. [`FieldGrid`] turns that raster into a
//! continuous, clamped, bilinearly sampled view.
pub mod grid;
pub mod sample;

pub use grid::{FieldGrid, CHANNELS, SAMPLE_EPSILON};
pub use sample::{GridSample, COVERED_THRESHOLD};
