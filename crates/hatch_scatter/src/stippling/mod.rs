//! Stippling: tone-driven Poisson-disk point scatter, optional dashes, and
//! scribble paths connecting the points.
use glam::Vec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, Error, Result};

pub mod grower;
pub mod scribble;

pub use grower::{grow_stipples, grow_stipples_with, StipplingOutput, StipplingStats};
pub use scribble::{build_scribble, build_scribbles, stipple_dashes, ScribbleConfig};

/// An accepted stipple with the field data at its position.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Stipple {
    pub position: Vec2,
    pub depth: f32,
    /// Unit flow direction, used to orient dashes.
    pub direction: Vec2,
}

impl Stipple {
    pub fn new(position: Vec2, depth: f32, direction: Vec2) -> Self {
        Self {
            position,
            depth,
            direction,
        }
    }

    /// Endpoints of a dash of `length` centered on the stipple along its direction.
    pub fn dash(&self, length: f32) -> [Vec2; 2] {
        let half = 0.5 * length * self.direction;
        [self.position - half, self.position + half]
    }
}

/// Exclusion radius for a given tone: `r_min + (r_max - r_min) * value^(gamma / 2)`.
///
/// Negative tone is treated as 0.
#[inline]
pub fn radius_for_value(r_min: f32, r_max: f32, gamma: f32, value: f32) -> f32 {
    r_min + (r_max - r_min) * value.max(0.0).powf(0.5 * gamma)
}

/// Parameters of one stippling pass.
#[non_exhaustive]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StipplingConfig {
    /// Seed grid cell size as a multiple of `r_max`.
    pub seed_box_size_factor: f32,
    /// Radius in the brightest regions, in pixels.
    pub r_max: f32,
    /// Radius in the darkest regions, in pixels.
    pub r_min: f32,
    /// Tone exponent; the radius uses half of it.
    pub gamma: f32,
    /// Tone above which nothing is stippled.
    pub max_value: f32,
    /// Candidates proposed around every accepted stipple.
    pub child_count: usize,
    /// Distance to the parent a child must keep, as a fraction of its own radius.
    ///
    /// `0.0` lets children ignore their parent in the proximity test.
    pub parent_relaxed_factor: f32,
}

impl Default for StipplingConfig {
    fn default() -> Self {
        Self {
            seed_box_size_factor: 1.9,
            r_max: 15.0,
            r_min: 3.0,
            gamma: 3.0,
            max_value: 1.0,
            child_count: 30,
            parent_relaxed_factor: 0.0,
        }
    }
}

impl StipplingConfig {
    /// Creates a config with the given radius range and defaults elsewhere.
    pub fn new(r_min: f32, r_max: f32) -> Self {
        Self {
            r_min,
            r_max,
            ..Default::default()
        }
    }

    pub fn with_seed_box_size_factor(mut self, factor: f32) -> Self {
        self.seed_box_size_factor = factor;
        self
    }

    pub fn with_gamma(mut self, gamma: f32) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_max_value(mut self, max_value: f32) -> Self {
        self.max_value = max_value;
        self
    }

    pub fn with_child_count(mut self, child_count: usize) -> Self {
        self.child_count = child_count;
        self
    }

    pub fn with_parent_relaxed_factor(mut self, factor: f32) -> Self {
        self.parent_relaxed_factor = factor;
        self
    }

    #[inline]
    pub fn radius(&self, value: f32) -> f32 {
        radius_for_value(self.r_min, self.r_max, self.gamma, value)
    }

    /// Cell size of the seed grid in pixels.
    pub fn seed_box_size(&self) -> f32 {
        self.seed_box_size_factor * self.r_max
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("r_max", self.r_max)?;
        ensure_positive("r_min", self.r_min)?;
        ensure_positive("gamma", self.gamma)?;
        ensure_positive("seed_box_size_factor", self.seed_box_size_factor)?;
        if self.r_min > self.r_max {
            return Err(Error::InvalidConfig(format!(
                "r_min ({}) must not exceed r_max ({})",
                self.r_min, self.r_max
            )));
        }
        if !(0.0..=1.0).contains(&self.parent_relaxed_factor) {
            return Err(Error::InvalidConfig(format!(
                "parent_relaxed_factor must be in [0, 1], got {}",
                self.parent_relaxed_factor
            )));
        }
        if self.max_value.is_nan() {
            return Err(Error::InvalidConfig("max_value must not be NaN".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_uses_half_gamma() {
        assert_eq!(radius_for_value(1.0, 9.0, 2.0, 0.0), 1.0);
        assert_eq!(radius_for_value(1.0, 9.0, 2.0, 1.0), 9.0);
        assert!((radius_for_value(1.0, 9.0, 4.0, 0.5) - 3.0).abs() < 1e-6);
        assert_eq!(radius_for_value(2.0, 8.0, 3.0, -0.5), 2.0);
    }

    #[test]
    fn dash_is_centered_along_direction() {
        let s = Stipple::new(Vec2::new(10.0, 5.0), 1.0, Vec2::Y);
        assert_eq!(s.dash(4.0), [Vec2::new(10.0, 3.0), Vec2::new(10.0, 7.0)]);
    }

    #[test]
    fn default_config_is_valid() {
        let config = StipplingConfig::default();
        config.validate().expect("defaults validate");
        assert!((config.seed_box_size() - 28.5).abs() < 1e-4);
    }

    #[test]
    fn validate_rejects_inverted_radii() {
        assert!(StipplingConfig::new(5.0, 2.0).validate().is_err());
        assert!(StipplingConfig::new(0.0, 2.0).validate().is_err());
        assert!(StipplingConfig::default()
            .with_parent_relaxed_factor(1.5)
            .validate()
            .is_err());
    }
}
