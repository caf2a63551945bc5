//! Scribble paths: greedy, windowed nearest-neighbour tours over stipples.
use glam::Vec2;
use rand::seq::SliceRandom;
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Stipple;
use crate::error::{Error, Result};
use crate::sampling::rand_inclusive;

/// Parameters of the scribble path builder.
#[non_exhaustive]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScribbleConfig {
    /// Upper bound of the random stride through the remaining stipples,
    /// scaled by the fraction still unvisited.
    pub sampling_rate: usize,
    /// The tour stops once this fraction of stipples is left.
    pub min_remaining_fraction: f32,
    /// Weight of the relative depth difference added to the squared distance.
    pub depth_factor: f32,
    /// When positive, each visited stipple becomes a dash of this length.
    pub dash_length: f32,
}

impl Default for ScribbleConfig {
    fn default() -> Self {
        Self {
            sampling_rate: 50,
            min_remaining_fraction: 0.025,
            depth_factor: 1.0,
            dash_length: 0.0,
        }
    }
}

impl ScribbleConfig {
    pub fn with_sampling_rate(mut self, sampling_rate: usize) -> Self {
        self.sampling_rate = sampling_rate;
        self
    }

    pub fn with_min_remaining_fraction(mut self, fraction: f32) -> Self {
        self.min_remaining_fraction = fraction;
        self
    }

    pub fn with_depth_factor(mut self, depth_factor: f32) -> Self {
        self.depth_factor = depth_factor;
        self
    }

    pub fn with_dash_length(mut self, dash_length: f32) -> Self {
        self.dash_length = dash_length;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.min_remaining_fraction) {
            return Err(Error::InvalidConfig(format!(
                "min_remaining_fraction must be in [0, 1), got {}",
                self.min_remaining_fraction
            )));
        }
        if !(self.depth_factor >= 0.0 && self.depth_factor.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "depth_factor must be finite and >= 0, got {}",
                self.depth_factor
            )));
        }
        if !(self.dash_length >= 0.0 && self.dash_length.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "dash_length must be finite and >= 0, got {}",
                self.dash_length
            )));
        }
        Ok(())
    }
}

/// Squared planar distance plus a depth penalty relative to the summed depths.
#[inline]
fn scribble_distance(a: &Stipple, b: &Stipple, depth_factor: f32) -> f32 {
    let mut d = a.position.distance_squared(b.position);
    let depth_sum = a.depth + b.depth;
    if depth_sum > 0.0 {
        d += depth_factor * (a.depth - b.depth).abs() / depth_sum;
    }
    d
}

fn push_visit(path: &mut Vec<Vec2>, stipple: &Stipple, dash_length: f32) {
    if dash_length > 0.0 {
        path.extend(stipple.dash(dash_length));
    } else {
        path.push(stipple.position);
    }
}

/// Builds one scribble path through a shuffled copy of `stipples`.
///
/// Starting from the first shuffled stipple, each step scans the remaining
/// stipples with a random stride, moves to the closest one found and removes it.
/// The tour ends once the remaining fraction drops to
/// `config.min_remaining_fraction`. Returns an empty path for fewer than two
/// stipples.
pub fn build_scribble(
    stipples: &[Stipple],
    config: &ScribbleConfig,
    rng: &mut dyn RngCore,
) -> Vec<Vec2> {
    if stipples.len() < 2 {
        return Vec::new();
    }

    let mut remaining = stipples.to_vec();
    remaining.shuffle(rng);
    let total = remaining.len() as f32;

    let mut current = remaining.remove(0);
    let per_visit = if config.dash_length > 0.0 { 2 } else { 1 };
    let mut path = Vec::with_capacity(stipples.len() * per_visit);
    push_visit(&mut path, &current, config.dash_length);

    while !remaining.is_empty() && remaining.len() as f32 / total > config.min_remaining_fraction {
        let fraction = remaining.len() as f32 / total;
        let rate = ((config.sampling_rate as f32 * fraction) as usize).max(1);

        let mut i = rand_inclusive(rng, rate).min(remaining.len() - 1);
        let mut best = i;
        let mut best_distance = f32::INFINITY;
        while i < remaining.len() {
            let d = scribble_distance(&current, &remaining[i], config.depth_factor);
            if d < best_distance {
                best_distance = d;
                best = i;
            }
            i += 1 + rand_inclusive(rng, rate);
        }

        current = remaining.remove(best);
        push_visit(&mut path, &current, config.dash_length);
    }

    debug!(
        "Scribble visited {} of {} stipples.",
        stipples.len() - remaining.len(),
        stipples.len()
    );
    path
}

/// Builds `iterations` independent scribble paths over the same stipples.
pub fn build_scribbles(
    stipples: &[Stipple],
    config: &ScribbleConfig,
    iterations: usize,
    rng: &mut dyn RngCore,
) -> Vec<Vec<Vec2>> {
    (0..iterations)
        .map(|_| build_scribble(stipples, config, rng))
        .filter(|path| !path.is_empty())
        .collect()
}

/// One stroke per stipple: its position, or a two-point dash when `dash_length > 0`.
pub fn stipple_dashes(stipples: &[Stipple], dash_length: f32) -> Vec<Vec<Vec2>> {
    stipples
        .iter()
        .map(|s| {
            let mut stroke = Vec::with_capacity(2);
            push_visit(&mut stroke, s, dash_length);
            stroke
        })
        .collect()
}
