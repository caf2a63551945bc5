//! Streamline tracing and frontier-driven growth of a whole hatching pass.
use std::collections::VecDeque;

use glam::Vec2;
use rand::RngCore;
use tracing::{debug, info};

use super::HatchingConfig;
use crate::error::Result;
use crate::field::FieldGrid;
use crate::registry::{OwnerId, SpatialRegistry};
use crate::sampling::{JitterGridSeeds, SeedSampling};

/// Counters collected while tracing one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HatchingStats {
    /// Seeds proposed by the seed grid.
    pub grid_seeds: usize,
    /// Seeds proposed next to accepted lines.
    pub frontier_seeds: usize,
    /// Lines accepted.
    pub streamlines: usize,
    /// Points over all accepted lines.
    pub points: usize,
}

/// Result of one hatching pass.
#[derive(Debug, Clone, Default)]
pub struct HatchingOutput {
    /// Accepted lines in acceptance order.
    pub streamlines: Vec<Vec<Vec2>>,
    pub stats: HatchingStats,
}

/// Traces single streamlines through a field against a registry of existing lines.
pub struct StreamlineTracer<'a> {
    grid: &'a FieldGrid,
    config: &'a HatchingConfig,
}

impl<'a> StreamlineTracer<'a> {
    pub fn new(grid: &'a FieldGrid, config: &'a HatchingConfig) -> Self {
        Self { grid, config }
    }

    /// Traces a line through `seed` in both directions.
    ///
    /// `parent` is the line the seed was proposed from; the seed may lie as close
    /// as `d_test_factor * d_sep` to it. Returns `None` when the seed is uncovered,
    /// too bright, too close to existing lines, or the line ends up too short.
    pub fn trace(
        &self,
        registry: &SpatialRegistry,
        seed: Vec2,
        parent: OwnerId,
    ) -> Option<Vec<Vec2>> {
        let config = self.config;
        let start = self.grid.sample(seed);
        if !start.is_covered() || start.value > config.max_value {
            return None;
        }

        let d_sep = config.separation(start.value);
        if !registry.is_allowed(seed, d_sep, config.d_test_factor * d_sep, parent) {
            return None;
        }

        let half_steps = config.max_steps / 2;
        let half_budget = 0.5 * config.max_accum_angle;
        let forward = self.continue_line(
            registry,
            seed,
            start.direction,
            start.depth,
            config.step,
            half_budget,
            half_steps,
        );
        let backward = self.continue_line(
            registry,
            seed,
            start.direction,
            start.depth,
            -config.step,
            half_budget,
            half_steps,
        );

        let mut line = Vec::with_capacity(backward.len() + 1 + forward.len());
        line.extend(backward.into_iter().rev());
        line.push(seed);
        line.extend(forward);

        (line.len() > config.min_steps + 1).then_some(line)
    }

    /// Integrates from `origin` for at most `steps` steps of signed length `step`.
    ///
    /// The returned points exclude `origin`. Integration stops before the first
    /// point that leaves coverage, exceeds the turning budget, jumps in depth,
    /// is too bright, or comes too close to a registered line.
    #[allow(clippy::too_many_arguments)]
    fn continue_line(
        &self,
        registry: &SpatialRegistry,
        origin: Vec2,
        direction: Vec2,
        depth: f32,
        step: f32,
        accum_limit: f32,
        steps: usize,
    ) -> Vec<Vec2> {
        let config = self.config;
        let mut line = Vec::new();
        let mut last = origin;
        let mut dir = direction;
        let mut last_depth = depth;
        let mut accum_angle = 0.0f32;

        for _ in 0..steps {
            let p = last + dir * step;
            let s = self.grid.sample(p);
            accum_angle += dir.dot(s.direction).clamp(-1.0, 1.0).acos();

            let d_test = config.d_test_factor * config.separation(s.value);
            if !s.is_covered()
                || accum_angle > accum_limit
                || (s.depth - last_depth).abs() > config.max_depth_step
                || s.value > config.max_value
                || !registry.is_allowed(p, d_test, d_test, OwnerId::NONE)
            {
                break;
            }

            line.push(p);
            last = p;
            dir = s.direction;
            last_depth = s.depth;
        }

        line
    }
}

/// Traces a full hatching pass, seeding from a jittered grid of
/// `config.seed_box_size()` cells.
pub fn trace_streamlines(
    grid: &FieldGrid,
    config: &HatchingConfig,
    rng: &mut dyn RngCore,
) -> Result<HatchingOutput> {
    let seeds = JitterGridSeeds::new(config.seed_box_size());
    trace_streamlines_with(grid, config, &seeds, rng)
}

/// Traces a full hatching pass using the given seed strategy.
///
/// Lines accepted from seeds enter a FIFO frontier. Each popped line proposes,
/// for every point, one seed a separation distance to either side across the
/// local flow; those seeds may start close to the popped line.
pub fn trace_streamlines_with(
    grid: &FieldGrid,
    config: &HatchingConfig,
    seeds: &dyn SeedSampling,
    rng: &mut dyn RngCore,
) -> Result<HatchingOutput> {
    config.validate()?;
    debug!(
        "Hatching pass: {}x{} px, d_sep_max {}, shadow {}, gamma {}, max value {}.",
        grid.width(),
        grid.height(),
        config.d_sep_max,
        config.shadow_factor,
        config.gamma,
        config.max_value
    );

    let mut registry = SpatialRegistry::new(grid.width(), grid.height(), config.d_sep_max)?;
    let tracer = StreamlineTracer::new(grid, config);
    let mut streamlines: Vec<Vec<Vec2>> = Vec::new();
    let mut frontier: VecDeque<(OwnerId, usize)> = VecDeque::new();
    let mut stats = HatchingStats::default();

    for seed in seeds.generate(grid.extent().into(), rng) {
        stats.grid_seeds += 1;
        if let Some(line) = tracer.trace(&registry, Vec2::from(seed), OwnerId::NONE) {
            let owner = registry.insert_path(&line);
            frontier.push_back((owner, streamlines.len()));
            streamlines.push(line);
        }
    }

    while let Some((owner, index)) = frontier.pop_front() {
        for k in 0..streamlines[index].len() {
            let p = streamlines[index][k];
            let s = grid.sample(p);
            let offset = s.direction.perp() * config.separation(s.value);
            for candidate in [p - offset, p + offset] {
                stats.frontier_seeds += 1;
                if let Some(line) = tracer.trace(&registry, candidate, owner) {
                    let child = registry.insert_path(&line);
                    frontier.push_back((child, streamlines.len()));
                    streamlines.push(line);
                }
            }
        }
    }

    stats.streamlines = streamlines.len();
    stats.points = streamlines.iter().map(Vec::len).sum();
    info!(
        "Traced {} streamlines with {} points ({} grid seeds, {} frontier seeds).",
        stats.streamlines, stats.points, stats.grid_seeds, stats.frontier_seeds
    );

    Ok(HatchingOutput { streamlines, stats })
}
