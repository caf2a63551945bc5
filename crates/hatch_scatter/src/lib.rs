#![forbid(unsafe_code)]
//! hatch_scatter: Screen-space hatching and stippling driven by a rasterized scene field.
//!
//! Modules:
//! - field: the coverage/tone/depth/direction raster and its bilinear sampler
//! - registry: spatial hash enforcing minimum separation between strokes
//! - sampling: seed generation and injected-generator random helpers
//! - hatching: evenly spaced flow-aligned streamlines (Jobard-Lefer)
//! - stippling: Poisson-disk stipples, dashes, and scribble paths
//! - polyline: Visvalingam-Whyatt simplification and Catmull-Rom interpolation
//! - projection: mapping pixel-space strokes onto a 3D drawing plane
//! - pipeline: plans, runner, and events tying the above together
//!
//! For examples, see the README and the `hatch_scatter_examples` crate.
pub mod error;
pub mod field;
pub mod hatching;
pub mod pipeline;
pub mod polyline;
pub mod projection;
pub mod registry;
pub mod sampling;
pub mod stippling;

/// Convenient re-exports for common types. Import with `use hatch_scatter::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::field::{FieldGrid, GridSample};
    pub use crate::hatching::{
        separation_for_value, trace_streamlines, HatchingConfig, HatchingOutput, HatchingStats,
        StreamlineTracer,
    };
    pub use crate::pipeline::events::{
        EventSink, FnSink, MultiSink, PipelineEvent, PipelineEventKind, VecSink,
    };
    pub use crate::pipeline::plan::{
        HatchPass, HatchingPlan, Plan, StippleOutput, StipplingPlan, Technique, TechniqueKind,
        DEFAULT_CROSSING_OFFSET, DEFAULT_SEED,
    };
    pub use crate::pipeline::runner::{
        run_plan, run_plan_with_events, run_plan_with_rng, PassDetail, PassStats, PipelineRunner,
        RunResult, RunStats,
    };
    pub use crate::polyline::{catmull_rom, interpolate, simplify, simplify_paths, triangle_area};
    pub use crate::projection::{DrawingPlane, StrokeBatch};
    pub use crate::registry::{OwnerId, SpatialRegistry};
    pub use crate::sampling::{JitterGridSeeds, SeedSampling};
    pub use crate::stippling::{
        build_scribble, build_scribbles, grow_stipples, radius_for_value, stipple_dashes,
        ScribbleConfig, Stipple, StipplingConfig, StipplingOutput, StipplingStats,
    };
}
