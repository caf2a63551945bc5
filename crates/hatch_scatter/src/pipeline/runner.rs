//! High-level runner executing a plan on a field: placement, post-processing,
//! and projection onto the drawing plane.
use std::borrow::Cow;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::field::FieldGrid;
use crate::hatching::{trace_streamlines, HatchingStats};
use crate::pipeline::events::{EventSink, PipelineEvent, PipelineEventKind};
use crate::pipeline::plan::{HatchPass, HatchingPlan, Plan, StippleOutput, StipplingPlan, Technique};
use crate::polyline::{interpolate, simplify, simplify_paths};
use crate::projection::StrokeBatch;
use crate::stippling::{build_scribbles, grow_stipples, stipple_dashes, StipplingStats};

/// Technique-specific counters of one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassDetail {
    Hatching(HatchingStats),
    Stippling(StipplingStats),
}

/// Summary of one pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassStats {
    /// Index of the pass in the plan.
    pub index: usize,
    /// Rotation applied to the field directions, in radians.
    pub orientation_offset: f32,
    /// Strokes emitted by the pass.
    pub strokes: usize,
    /// Points over all emitted strokes.
    pub points: usize,
    pub detail: PassDetail,
}

/// Aggregated statistics of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub passes: Vec<PassStats>,
    /// Strokes over all passes.
    pub strokes: usize,
    /// Points over all passes.
    pub points: usize,
}

/// Result of running a plan.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct RunResult {
    /// Strokes projected onto the plan's drawing plane.
    pub strokes: StrokeBatch,
    /// The same strokes in pixel space.
    pub polylines: Vec<Vec<Vec2>>,
    pub stats: RunStats,
}

/// Runs a validated plan repeatedly, e.g. once per rendered frame.
pub struct PipelineRunner {
    /// Plan applied by this runner.
    pub plan: Plan,
}

impl PipelineRunner {
    pub fn try_new(plan: Plan) -> Result<Self> {
        plan.validate()?;
        Ok(Self { plan })
    }

    /// Runs the plan on `grid`, seeding every pass from the plan's seed.
    pub fn run(&mut self, grid: &FieldGrid) -> Result<RunResult> {
        run_plan(&self.plan, grid, None)
    }

    pub fn run_with_events(
        &mut self,
        grid: &FieldGrid,
        sink: &mut dyn EventSink,
    ) -> Result<RunResult> {
        run_plan_with_events(&self.plan, grid, sink)
    }

    /// Runs the plan drawing every pass from `rng` instead of the plan's seed.
    pub fn run_with_rng(
        &mut self,
        grid: &FieldGrid,
        rng: &mut impl RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<RunResult> {
        run_plan_with_rng(&self.plan, grid, rng, sink)
    }
}

/// Source of randomness for the passes of one run.
enum PassGenerator<'a> {
    /// A fresh `StdRng` seeded with the same value for every pass.
    Seeded(u64),
    /// One caller-owned generator shared by all passes.
    Shared(&'a mut dyn RngCore),
}

impl PassGenerator<'_> {
    fn with_pass<T>(&mut self, f: impl FnOnce(&mut dyn RngCore) -> T) -> T {
        match self {
            PassGenerator::Seeded(seed) => f(&mut StdRng::seed_from_u64(*seed)),
            PassGenerator::Shared(rng) => f(&mut **rng),
        }
    }
}

/// Runs `plan` on `grid`. Each pass uses a generator seeded with `plan.seed`, so
/// passes over the same field draw identical random sequences.
pub fn run_plan(
    plan: &Plan,
    grid: &FieldGrid,
    sink: Option<&mut dyn EventSink>,
) -> Result<RunResult> {
    let generator = PassGenerator::Seeded(plan.seed);
    if let Some(s) = sink {
        run(plan, grid, generator, s)
    } else {
        run(plan, grid, generator, &mut ())
    }
}

pub fn run_plan_with_events(
    plan: &Plan,
    grid: &FieldGrid,
    sink: &mut dyn EventSink,
) -> Result<RunResult> {
    run(plan, grid, PassGenerator::Seeded(plan.seed), sink)
}

/// Runs `plan` drawing every pass from `rng`; `plan.seed` is ignored.
pub fn run_plan_with_rng<R: RngCore>(
    plan: &Plan,
    grid: &FieldGrid,
    rng: &mut R,
    sink: &mut dyn EventSink,
) -> Result<RunResult> {
    run(plan, grid, PassGenerator::Shared(rng), sink)
}

fn run(
    plan: &Plan,
    grid: &FieldGrid,
    mut generator: PassGenerator<'_>,
    sink: &mut dyn EventSink,
) -> Result<RunResult> {
    plan.validate()?;

    if sink.wants(PipelineEventKind::RunStarted) {
        sink.send(PipelineEvent::RunStarted {
            technique: plan.technique.kind(),
            pass_count: plan.technique.pass_count(),
            size_px: (grid.width(), grid.height()),
        });
    }

    match grid.value_range() {
        Some((min, max)) => debug!("Field tone range: {min:.3}..{max:.3}."),
        None => debug!("Field has no covered pixels."),
    }

    let mut polylines: Vec<Vec<Vec2>> = Vec::new();
    let mut stats = RunStats::default();

    match &plan.technique {
        Technique::Hatching(hatching) => {
            if hatching.passes.is_empty() {
                warn!("Hatching plan has no passes.");
                if sink.wants(PipelineEventKind::Warning) {
                    sink.send(PipelineEvent::Warning {
                        context: "plan".into(),
                        message: "Hatching plan has no passes".into(),
                    });
                }
            }
            for (index, pass) in hatching.passes.iter().enumerate() {
                let (lines, pass_stats) = generator.with_pass(|rng| {
                    run_hatch_pass(plan, hatching, pass, index, grid, rng, sink)
                })?;
                record_pass(&mut polylines, &mut stats, lines, pass_stats, sink);
            }
        }
        Technique::Stippling(stippling) => {
            let (lines, pass_stats) =
                generator.with_pass(|rng| run_stipple_pass(plan, stippling, grid, rng, sink))?;
            record_pass(&mut polylines, &mut stats, lines, pass_stats, sink);
        }
    }

    let strokes = plan.plane.project_paths(&polylines, grid.width(), grid.height());
    info!("Run finished: {} strokes, {} points.", stats.strokes, stats.points);

    if sink.wants(PipelineEventKind::RunFinished) {
        sink.send(PipelineEvent::RunFinished {
            stats: stats.clone(),
        });
    }

    Ok(RunResult {
        strokes,
        polylines,
        stats,
    })
}

fn record_pass(
    polylines: &mut Vec<Vec<Vec2>>,
    stats: &mut RunStats,
    lines: Vec<Vec<Vec2>>,
    pass: PassStats,
    sink: &mut dyn EventSink,
) {
    stats.strokes += pass.strokes;
    stats.points += pass.points;
    stats.passes.push(pass);
    if sink.wants(PipelineEventKind::PassFinished) {
        sink.send(PipelineEvent::PassFinished { stats: pass });
    }
    polylines.extend(lines);
}

fn rotated(grid: &FieldGrid, orientation_offset: f32) -> Cow<'_, FieldGrid> {
    if orientation_offset == 0.0 {
        Cow::Borrowed(grid)
    } else {
        Cow::Owned(grid.with_orientation_offset(orientation_offset))
    }
}

fn emit_strokes(sink: &mut dyn EventSink, pass_index: usize, lines: &[Vec<Vec2>]) {
    if sink.wants(PipelineEventKind::StrokeEmitted) {
        for line in lines {
            sink.send(PipelineEvent::StrokeEmitted {
                pass_index,
                polyline: line.clone(),
            });
        }
    }
}

fn pass_started(sink: &mut dyn EventSink, index: usize, orientation_offset: f32) {
    if sink.wants(PipelineEventKind::PassStarted) {
        sink.send(PipelineEvent::PassStarted {
            index,
            orientation_offset,
        });
    }
}

fn run_hatch_pass(
    plan: &Plan,
    hatching: &HatchingPlan,
    pass: &HatchPass,
    index: usize,
    grid: &FieldGrid,
    rng: &mut dyn RngCore,
    sink: &mut dyn EventSink,
) -> Result<(Vec<Vec<Vec2>>, PassStats)> {
    info!(
        "Hatching pass {}: orientation offset {:.5} rad, max value {}.",
        index, pass.orientation_offset, pass.max_value
    );
    pass_started(sink, index, pass.orientation_offset);

    let field = rotated(grid, pass.orientation_offset);
    let config = hatching.config.clone().with_max_value(pass.max_value);
    let output = trace_streamlines(&field, &config, rng)?;

    let lines = simplify_paths(&output.streamlines, plan.simplify_max_area);
    let points = lines.iter().map(Vec::len).sum();
    debug!("Simplified {} to {} points.", output.stats.points, points);
    emit_strokes(sink, index, &lines);

    let stats = PassStats {
        index,
        orientation_offset: pass.orientation_offset,
        strokes: lines.len(),
        points,
        detail: PassDetail::Hatching(output.stats),
    };
    Ok((lines, stats))
}

fn run_stipple_pass(
    plan: &Plan,
    stippling: &StipplingPlan,
    grid: &FieldGrid,
    rng: &mut dyn RngCore,
    sink: &mut dyn EventSink,
) -> Result<(Vec<Vec<Vec2>>, PassStats)> {
    pass_started(sink, 0, stippling.orientation_offset);

    let field = rotated(grid, stippling.orientation_offset);
    let output = grow_stipples(&field, &stippling.config, rng)?;

    let lines = match &stippling.output {
        StippleOutput::Points => stipple_dashes(&output.stipples, 0.0),
        StippleOutput::Dashes { length } => stipple_dashes(&output.stipples, *length),
        StippleOutput::Scribbles {
            config,
            iterations,
            points_per_segment,
        } => {
            let mut lines = Vec::with_capacity(*iterations);
            for (i, path) in build_scribbles(&output.stipples, config, *iterations, rng)
                .into_iter()
                .enumerate()
            {
                if path.len() < 4 {
                    warn!(
                        "Scribble {} has {} points; too short to interpolate, dropping.",
                        i,
                        path.len()
                    );
                    if sink.wants(PipelineEventKind::Warning) {
                        sink.send(PipelineEvent::Warning {
                            context: format!("scribble:{i}"),
                            message: format!("Dropped scribble with {} points", path.len()),
                        });
                    }
                    continue;
                }
                let smooth = interpolate(&path, *points_per_segment)?;
                lines.push(simplify(&smooth, plan.simplify_max_area));
            }
            lines
        }
    };

    let points = lines.iter().map(Vec::len).sum();
    info!(
        "Stippling pass: {} stipples, {} strokes, {} points.",
        output.stats.stipples,
        lines.len(),
        points
    );
    emit_strokes(sink, 0, &lines);

    let stats = PassStats {
        index: 0,
        orientation_offset: stippling.orientation_offset,
        strokes: lines.len(),
        points,
        detail: PassDetail::Stippling(output.stats),
    };
    Ok((lines, stats))
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;
    use crate::error::Error;
    use crate::field::GridSample;
    use crate::hatching::HatchingConfig;
    use crate::pipeline::events::VecSink;
    use crate::stippling::{ScribbleConfig, StipplingConfig};

    fn uniform_grid(size: usize, value: f32) -> FieldGrid {
        FieldGrid::uniform(size, size, GridSample::new(1.0, value, 1.0, Vec2::X)).unwrap()
    }

    fn hatching_plan() -> HatchingPlan {
        HatchingPlan::new(HatchingConfig::new(8.0).with_steps(60, 5))
    }

    fn strokes_of_pass(events: &[PipelineEvent], pass: usize) -> Vec<Vec<Vec2>> {
        events
            .iter()
            .filter_map(|event| match event {
                PipelineEvent::StrokeEmitted {
                    pass_index,
                    polyline,
                } if *pass_index == pass => Some(polyline.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn hatching_run_projects_simplified_lines() {
        let grid = uniform_grid(64, 0.5);
        let plan = Plan::new(hatching_plan());
        let result = run_plan(&plan, &grid, None).unwrap();

        assert!(!result.polylines.is_empty());
        // Straight lines collapse to their endpoints.
        assert!(result.polylines.iter().all(|l| l.len() == 2));
        assert_eq!(result.strokes.len(), result.polylines.len());
        assert_eq!(
            result.strokes.counts.iter().sum::<usize>(),
            result.strokes.positions.len()
        );
        assert_eq!(result.stats.points, result.strokes.positions.len());
        assert!(matches!(
            result.stats.passes[0].detail,
            PassDetail::Hatching(_)
        ));
    }

    #[test]
    fn crosshatching_adds_rotated_pass() {
        let grid = uniform_grid(64, 0.5);
        let plan = Plan::new(hatching_plan().with_crosshatching(FRAC_PI_2, 10.0)).with_seed(7);
        let mut sink = VecSink::new();
        let result = run_plan_with_events(&plan, &grid, &mut sink).unwrap();
        assert_eq!(result.stats.passes.len(), 2);

        let events = sink.into_inner();
        let first = strokes_of_pass(&events, 0);
        let second = strokes_of_pass(&events, 1);
        assert!(!first.is_empty() && !second.is_empty());
        for line in &first {
            assert!((line[0].y - line[line.len() - 1].y).abs() < 1e-3);
        }
        for line in &second {
            assert!((line[0].x - line[line.len() - 1].x).abs() < 1e-3);
        }
    }

    #[test]
    fn events_bracket_the_run() {
        let grid = uniform_grid(32, 0.5);
        let plan = Plan::new(hatching_plan()).with_seed(1);
        let mut sink = VecSink::new();
        run_plan_with_events(&plan, &grid, &mut sink).unwrap();

        let events = sink.into_inner();
        assert!(matches!(
            events.first(),
            Some(PipelineEvent::RunStarted { pass_count: 1, size_px: (32, 32), .. })
        ));
        assert!(matches!(events.last(), Some(PipelineEvent::RunFinished { .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, PipelineEvent::PassFinished { stats } if stats.index == 0)));
    }

    #[test]
    fn empty_hatching_plan_warns_and_returns_nothing() {
        let grid = uniform_grid(16, 0.5);
        let plan = Plan::new(hatching_plan().with_passes(Vec::new()));
        let mut sink = VecSink::with_kinds([PipelineEventKind::Warning]);
        let result = run_plan_with_events(&plan, &grid, &mut sink).unwrap();
        assert!(result.strokes.is_empty());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn stippling_outputs_points_or_dashes() {
        let grid = uniform_grid(48, 0.3);
        let config = StipplingConfig::new(2.0, 6.0);

        let points_plan = Plan::new(StipplingPlan::new(config.clone())).with_seed(3);
        let points = run_plan(&points_plan, &grid, None).unwrap();
        assert!(!points.polylines.is_empty());
        assert!(points.polylines.iter().all(|l| l.len() == 1));

        let dash_plan = Plan::new(
            StipplingPlan::new(config).with_output(StippleOutput::Dashes { length: 2.0 }),
        )
        .with_seed(3);
        let dashes = run_plan(&dash_plan, &grid, None).unwrap();
        assert_eq!(dashes.polylines.len(), points.polylines.len());
        assert!(dashes.polylines.iter().all(|l| l.len() == 2));
        assert_eq!(dashes.strokes.positions.len(), 2 * points.strokes.positions.len());
    }

    #[test]
    fn scribbles_are_interpolated_and_simplified() {
        let grid = uniform_grid(48, 0.3);
        let output = StippleOutput::Scribbles {
            config: ScribbleConfig::default(),
            iterations: 2,
            points_per_segment: 4,
        };
        let stippling = StipplingPlan::new(StipplingConfig::new(2.0, 6.0)).with_output(output);
        let plan = Plan::new(stippling).with_seed(9);
        let result = run_plan(&plan, &grid, None).unwrap();

        assert_eq!(result.polylines.len(), 2);
        assert!(result.polylines.iter().all(|l| l.len() >= 2));
        match result.stats.passes[0].detail {
            PassDetail::Stippling(s) => assert!(s.stipples >= 4),
            PassDetail::Hatching(_) => panic!("expected stippling stats"),
        }
    }

    #[test]
    fn same_seed_reproduces_the_run() {
        let grid = uniform_grid(40, 0.4);
        let plan = Plan::new(StipplingPlan::new(StipplingConfig::new(2.0, 5.0))).with_seed(5);
        let mut runner = PipelineRunner::try_new(plan).unwrap();
        let a = runner.run(&grid).unwrap();
        let b = runner.run(&grid).unwrap();
        assert_eq!(a.strokes, b.strokes);

        let mut rng = StdRng::seed_from_u64(5);
        let shared = runner.run_with_rng(&grid, &mut rng, &mut ()).unwrap();
        assert_eq!(shared.strokes, a.strokes);
    }

    #[test]
    fn every_pass_is_seeded_from_the_plan() {
        let grid = uniform_grid(64, 0.5);
        let passes = vec![HatchPass::new(0.3, 10.0), HatchPass::new(0.3, 10.0)];
        let plan = Plan::new(hatching_plan().with_passes(passes)).with_seed(42);
        let mut sink = VecSink::with_kinds([PipelineEventKind::StrokeEmitted]);
        run_plan_with_events(&plan, &grid, &mut sink).unwrap();

        let events = sink.into_inner();
        let first = strokes_of_pass(&events, 0);
        assert!(!first.is_empty());
        assert_eq!(first, strokes_of_pass(&events, 1));
    }

    #[test]
    fn shared_generator_matches_seeded_first_pass() {
        let grid = uniform_grid(64, 0.5);
        let plan = Plan::new(hatching_plan().with_crosshatching(FRAC_PI_2, 10.0)).with_seed(11);
        let mut seeded = VecSink::with_kinds([PipelineEventKind::StrokeEmitted]);
        run_plan_with_events(&plan, &grid, &mut seeded).unwrap();

        let mut rng = StdRng::seed_from_u64(11);
        let mut shared = VecSink::with_kinds([PipelineEventKind::StrokeEmitted]);
        let result = run_plan_with_rng(&plan, &grid, &mut rng, &mut shared).unwrap();

        assert_eq!(result.stats.passes.len(), 2);
        assert_eq!(
            strokes_of_pass(seeded.as_slice(), 0),
            strokes_of_pass(shared.as_slice(), 0)
        );
    }

    #[test]
    fn invalid_plan_is_rejected() {
        let plan = Plan::new(StipplingPlan::new(StipplingConfig::new(6.0, 2.0)));
        assert!(matches!(
            PipelineRunner::try_new(plan.clone()),
            Err(Error::InvalidConfig(_))
        ));
        let grid = uniform_grid(8, 0.5);
        let result = run_plan(&plan, &grid, None);
        assert!(result.is_err());
    }
}
