//! Poisson-disk stipple growth with tone-dependent radii.
use std::collections::VecDeque;
use std::f32::consts::TAU;

use glam::Vec2;
use rand::RngCore;
use tracing::{debug, info};

use super::{Stipple, StipplingConfig};
use crate::error::Result;
use crate::field::FieldGrid;
use crate::registry::{OwnerId, SpatialRegistry};
use crate::sampling::{rand01, JitterGridSeeds, SeedSampling};

/// Counters collected while growing one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StipplingStats {
    /// Seeds proposed by the seed grid.
    pub grid_seeds: usize,
    /// Children proposed around accepted stipples.
    pub candidates: usize,
    /// Stipples accepted.
    pub stipples: usize,
}

/// Result of one stippling pass.
#[derive(Debug, Clone, Default)]
pub struct StipplingOutput {
    /// Accepted stipples in acceptance order.
    pub stipples: Vec<Stipple>,
    pub stats: StipplingStats,
}

/// Grows a stippling pass seeded from a jittered grid of `config.seed_box_size()` cells.
pub fn grow_stipples(
    grid: &FieldGrid,
    config: &StipplingConfig,
    rng: &mut dyn RngCore,
) -> Result<StipplingOutput> {
    let seeds = JitterGridSeeds::new(config.seed_box_size());
    grow_stipples_with(grid, config, &seeds, rng)
}

/// Grows a stippling pass using the given seed strategy.
///
/// Accepted seeds enter a FIFO frontier. Each popped stipple proposes
/// `child_count` candidates in the annulus `[r, 2r)` around it; a candidate must
/// keep its own radius from every other stipple.
pub fn grow_stipples_with(
    grid: &FieldGrid,
    config: &StipplingConfig,
    seeds: &dyn SeedSampling,
    rng: &mut dyn RngCore,
) -> Result<StipplingOutput> {
    config.validate()?;
    debug!(
        "Stippling pass: {}x{} px, r {}..{}, gamma {}, max value {}, {} children.",
        grid.width(),
        grid.height(),
        config.r_min,
        config.r_max,
        config.gamma,
        config.max_value,
        config.child_count
    );

    let mut registry = SpatialRegistry::new(grid.width(), grid.height(), config.r_max)?;
    let mut frontier: VecDeque<(OwnerId, f32, Vec2)> = VecDeque::new();
    let mut stipples = Vec::new();
    let mut stats = StipplingStats::default();

    for seed in seeds.generate(grid.extent().into(), rng) {
        stats.grid_seeds += 1;
        let p = Vec2::from(seed);
        let s = grid.sample(p);
        let r = config.radius(s.value);
        if s.is_covered()
            && s.value <= config.max_value
            && registry.is_allowed(p, r, r, OwnerId::NONE)
        {
            let id = registry.insert_point(p);
            frontier.push_back((id, r, p));
            stipples.push(Stipple::new(p, s.depth, s.direction));
        }
    }

    while let Some((parent, r_center, center)) = frontier.pop_front() {
        for _ in 0..config.child_count {
            stats.candidates += 1;
            let angle = TAU * rand01(rng);
            let d = r_center * (1.0 + rand01(rng));
            let p = center + d * Vec2::from_angle(angle);

            let s = grid.sample(p);
            let r = config.radius(s.value);
            if s.is_covered()
                && s.value <= config.max_value
                && registry.is_allowed(p, r, config.parent_relaxed_factor * r, parent)
            {
                let id = registry.insert_point(p);
                frontier.push_back((id, r, p));
                stipples.push(Stipple::new(p, s.depth, s.direction));
            }
        }
    }

    stats.stipples = stipples.len();
    info!(
        "Grew {} stipples ({} grid seeds, {} candidates).",
        stats.stipples, stats.grid_seeds, stats.candidates
    );

    Ok(StipplingOutput { stipples, stats })
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::field::GridSample;

    fn uniform_grid(size: usize, value: f32) -> FieldGrid {
        FieldGrid::uniform(size, size, GridSample::new(1.0, value, 2.0, Vec2::Y)).unwrap()
    }

    fn pairwise_min_distance(stipples: &[Stipple]) -> f32 {
        let mut min = f32::MAX;
        for i in 0..stipples.len() {
            for j in (i + 1)..stipples.len() {
                min = min.min(stipples[i].position.distance(stipples[j].position));
            }
        }
        min
    }

    #[test]
    fn stipples_keep_minimum_radius_apart() {
        let grid = uniform_grid(64, 0.5);
        let config = StipplingConfig::new(1.3, 8.0).with_gamma(1.0);
        let mut rng = StdRng::seed_from_u64(123);
        let out = grow_stipples(&grid, &config, &mut rng).unwrap();

        assert!(out.stipples.len() > 10);
        let r = config.radius(0.5);
        let min = pairwise_min_distance(&out.stipples);
        assert!(min >= config.r_min, "min distance {min}");
        assert!(min >= r - 1e-3, "min distance {min} below radius {r}");
    }

    #[test]
    fn stipples_stay_inside_domain_and_cache_field_data() {
        let grid = uniform_grid(48, 0.2);
        let config = StipplingConfig::new(2.0, 6.0);
        let mut rng = StdRng::seed_from_u64(5);
        let out = grow_stipples(&grid, &config, &mut rng).unwrap();

        for s in &out.stipples {
            assert!(s.position.x >= 0.0 && s.position.x < 47.0);
            assert!(s.position.y >= 0.0 && s.position.y < 47.0);
            assert!((s.depth - 2.0).abs() < 1e-4);
            assert!((s.direction - Vec2::Y).length() < 1e-4);
        }
        assert_eq!(out.stats.stipples, out.stipples.len());
        assert_eq!(out.stats.candidates, out.stipples.len() * config.child_count);
    }

    #[test]
    fn darker_tone_packs_more_stipples() {
        let config = StipplingConfig::new(2.0, 8.0).with_gamma(2.0);
        let mut rng = StdRng::seed_from_u64(1);
        let dark = grow_stipples(&uniform_grid(64, 0.0), &config, &mut rng).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let light = grow_stipples(&uniform_grid(64, 1.0), &config, &mut rng).unwrap();
        assert!(dark.stipples.len() > light.stipples.len());
    }

    #[test]
    fn same_seed_gives_identical_stipples() {
        let grid = uniform_grid(40, 0.4);
        let config = StipplingConfig::new(2.0, 6.0);
        let a = grow_stipples(&grid, &config, &mut StdRng::seed_from_u64(77)).unwrap();
        let b = grow_stipples(&grid, &config, &mut StdRng::seed_from_u64(77)).unwrap();
        assert_eq!(a.stipples, b.stipples);
    }

    #[test]
    fn bright_or_uncovered_regions_stay_empty() {
        let config = StipplingConfig::new(2.0, 6.0).with_max_value(0.3);
        let mut rng = StdRng::seed_from_u64(9);
        let bright = grow_stipples(&uniform_grid(32, 0.5), &config, &mut rng).unwrap();
        assert!(bright.stipples.is_empty());

        let empty = FieldGrid::uniform(32, 32, GridSample::UNCOVERED).unwrap();
        let out = grow_stipples(&empty, &config, &mut rng).unwrap();
        assert!(out.stipples.is_empty());
        assert_eq!(out.stats.candidates, 0);
    }

    #[test]
    fn half_covered_field_only_stipples_covered_side() {
        let grid = FieldGrid::from_fn(64, 32, |x, _| {
            if x < 32 {
                GridSample::new(1.0, 0.3, 1.0, Vec2::X)
            } else {
                GridSample::UNCOVERED
            }
        })
        .unwrap();
        let config = StipplingConfig::new(2.0, 5.0);
        let out = grow_stipples(&grid, &config, &mut StdRng::seed_from_u64(4)).unwrap();
        assert!(!out.stipples.is_empty());
        // Coverage drops below the threshold within one pixel of the edge.
        assert!(out.stipples.iter().all(|s| s.position.x < 31.1));
    }

    struct FixedSeeds(Vec<Vec2>);

    impl SeedSampling for FixedSeeds {
        fn generate(
            &self,
            _extent: mint::Vector2<f32>,
            _rng: &mut dyn RngCore,
        ) -> Vec<mint::Vector2<f32>> {
            self.0.iter().map(|&p| p.into()).collect()
        }
    }

    #[test]
    fn children_land_in_annulus_around_parent() {
        let grid = uniform_grid(64, 0.5);
        // One child per stipple turns the frontier into a chain of parent/child pairs.
        let config = StipplingConfig::new(4.0, 4.0).with_child_count(1);
        let seeds = FixedSeeds(vec![Vec2::new(32.0, 32.0)]);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let out = grow_stipples_with(&grid, &config, &seeds, &mut rng).unwrap();
            assert!(out.stipples.len() >= 2, "seed {seed}");
            assert_eq!(out.stats.candidates, out.stipples.len());
            for pair in out.stipples.windows(2) {
                let d = pair[0].position.distance(pair[1].position);
                assert!(d > 4.0 - 1e-3 && d < 8.0 + 1e-3, "child at {d} px from parent");
            }
        }
    }

    #[test]
    fn first_child_of_a_seed_lies_within_twice_its_radius() {
        let grid = uniform_grid(64, 0.5);
        let config = StipplingConfig::new(3.0, 3.0);
        let seeds = FixedSeeds(vec![Vec2::new(20.0, 40.0)]);
        let mut rng = StdRng::seed_from_u64(31);
        let out = grow_stipples_with(&grid, &config, &seeds, &mut rng).unwrap();
        let d = out.stipples[0].position.distance(out.stipples[1].position);
        assert!(d > 3.0 - 1e-3 && d < 6.0 + 1e-3, "first child at {d} px");
    }

    #[test]
    fn default_factor_ignores_parent_but_not_other_stipples() {
        // Dark single pixel at the seed, bright elsewhere: children need a large radius
        // that their parent, but no other stipple, may violate.
        let grid = FieldGrid::from_fn(64, 64, |x, y| {
            let value = if (x, y) == (32, 32) { 0.0 } else { 1.0 };
            GridSample::new(1.0, value, 1.0, Vec2::X)
        })
        .unwrap();
        let config = StipplingConfig::new(2.0, 10.0);
        assert_eq!(config.parent_relaxed_factor, 0.0);
        let seeds = FixedSeeds(vec![Vec2::new(32.0, 32.0)]);

        let mut rng = StdRng::seed_from_u64(2);
        let out = grow_stipples_with(&grid, &config, &seeds, &mut rng).unwrap();
        assert!(out.stipples.len() >= 2);
        let parent = out.stipples[0].position;
        let child = out.stipples[1].position;
        let d = parent.distance(child);
        assert!(d < config.radius(grid.sample(child).value), "child at {d} px");

        // The same spot is rejected when the close point is not the parent.
        let mut registry = SpatialRegistry::new(64, 64, config.r_max).unwrap();
        let other = registry.insert_point(parent);
        let r = config.radius(1.0);
        let relaxed = config.parent_relaxed_factor * r;
        assert!(registry.is_allowed(child, r, relaxed, other));
        assert!(!registry.is_allowed(child, r, relaxed, OwnerId::NONE));

        let strict = config.with_parent_relaxed_factor(1.0);
        let mut rng = StdRng::seed_from_u64(2);
        let out = grow_stipples_with(&grid, &strict, &seeds, &mut rng).unwrap();
        assert_eq!(out.stipples.len(), 1);
    }

    #[test]
    fn unbounded_radius_does_not_panic() {
        let grid = uniform_grid(32, 1.0e30);
        let config = StipplingConfig::new(2.0, 6.0).with_max_value(f32::INFINITY);
        let out = grow_stipples(&grid, &config, &mut StdRng::seed_from_u64(3)).unwrap();
        assert!(!out.stipples.is_empty());
    }

    #[test]
    fn relaxed_parent_factor_keeps_children_away_from_parent() {
        let grid = uniform_grid(64, 0.5);
        let config = StipplingConfig::new(3.0, 3.0).with_parent_relaxed_factor(1.0);
        let out = grow_stipples(&grid, &config, &mut StdRng::seed_from_u64(8)).unwrap();
        assert!(pairwise_min_distance(&out.stipples) >= 3.0 - 1e-3);
    }
}
