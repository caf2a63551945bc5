//! Seed generation and the random helpers shared by all stochastic passes.
//!
//! Every function that draws random numbers takes an injected generator; nothing
//! in the crate touches ambient random state.
use mint::Vector2;
use rand::distr::{Distribution, Uniform};
use rand::RngCore;

pub mod jitter_grid;

pub use jitter_grid::JitterGridSeeds;

/// Trait for strategies that propose seed positions in pixel space.
///
/// Positions lie in `[0, extent.x) x [0, extent.y)`.
pub trait SeedSampling: Send + Sync {
    fn generate(&self, extent: Vector2<f32>, rng: &mut dyn RngCore) -> Vec<Vector2<f32>>;
}

/// Generate a random float in the range [0, 1].
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Generate a uniformly distributed integer in `0..=upper`.
#[inline]
pub(crate) fn rand_inclusive(rng: &mut dyn RngCore, upper: usize) -> usize {
    Uniform::new_inclusive(0, upper).map_or(0, |range| range.sample(rng))
}

/// Compute the next smaller representable float value.
///
/// Returns a value that is strictly less than the input, useful for
/// ensuring bounds are strictly inside a domain. Handles edge cases
/// safely including very small positive values and zero.
#[inline]
pub(crate) fn next_down(val: f32) -> f32 {
    if val.is_nan() {
        return f32::NAN;
    }

    if val == f32::NEG_INFINITY {
        return f32::NEG_INFINITY;
    }

    if val == f32::INFINITY {
        return f32::MAX;
    }

    if val == 0.0 {
        return -f32::MIN_POSITIVE;
    }

    let bits = val.to_bits();
    if val > 0.0 {
        f32::from_bits(bits.saturating_sub(1))
    } else {
        f32::from_bits(bits.saturating_add(1))
    }
}
