//! Generation pipeline: runs a [`plan::Plan`] on a field and turns the placed
//! streamlines or stipples into projected strokes.
//!
//! Hatching runs one pass per [`plan::HatchPass`] over a rotated copy of the field,
//! each with a fresh registry and a generator seeded from [`plan::Plan::seed`], and
//! simplifies every line. Stippling grows one
//! pass of stipples and emits them as points, dashes, or interpolated scribbles.
pub mod events;
pub mod plan;
pub mod runner;

pub use events::{EventSink, FnSink, MultiSink, PipelineEvent, PipelineEventKind, VecSink};
pub use plan::{
    HatchPass, HatchingPlan, Plan, StippleOutput, StipplingPlan, Technique, TechniqueKind,
    DEFAULT_CROSSING_OFFSET, DEFAULT_POINTS_PER_SEGMENT, DEFAULT_SEED, DEFAULT_SIMPLIFY_MAX_AREA,
};
pub use runner::{
    run_plan, run_plan_with_events, run_plan_with_rng, PassDetail, PassStats, PipelineRunner,
    RunResult, RunStats,
};
