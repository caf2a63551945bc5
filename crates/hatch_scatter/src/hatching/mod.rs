//! Hatching: evenly spaced, flow-aligned streamlines whose density follows tone.
//!
//! Lines are grown Jobard-Lefer style. Seeds come from a jittered grid, every
//! accepted line spawns candidate seeds one separation distance to either side,
//! and a [`crate::registry::SpatialRegistry`] keeps lines from different lineages
//! apart.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, Error, Result};

pub mod tracer;

pub use tracer::{
    trace_streamlines, trace_streamlines_with, HatchingOutput, HatchingStats, StreamlineTracer,
};

/// Separation distance for a given tone.
///
/// `d_sep_min + (d_sep_max - d_sep_min) * value^gamma` with
/// `d_sep_min = d_sep_max * shadow_factor`. Negative tone is treated as 0.
#[inline]
pub fn separation_for_value(d_sep_max: f32, shadow_factor: f32, gamma: f32, value: f32) -> f32 {
    let d_sep_min = d_sep_max * shadow_factor;
    d_sep_min + (d_sep_max - d_sep_min) * value.max(0.0).powf(gamma)
}

/// Parameters of one hatching pass.
#[non_exhaustive]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HatchingConfig {
    /// Seed grid cell size as a multiple of `d_sep_max`.
    pub seed_box_size_factor: f32,
    /// Separation distance in the brightest regions, in pixels.
    pub d_sep_max: f32,
    /// Ratio of the darkest separation to `d_sep_max`, in (0, 1].
    pub shadow_factor: f32,
    /// Tone exponent applied before mapping tone to separation.
    pub gamma: f32,
    /// Fraction of the separation enforced while a line grows, in (0, 1].
    pub d_test_factor: f32,
    /// Integration step length in pixels.
    pub step: f32,
    /// Maximum steps per line, split evenly between both directions.
    pub max_steps: usize,
    /// Lines with `min_steps + 1` points or fewer are dropped.
    pub min_steps: usize,
    /// Largest depth change allowed between consecutive points.
    pub max_depth_step: f32,
    /// Total turning budget in radians, split evenly between both directions.
    pub max_accum_angle: f32,
    /// Tone above which nothing is hatched.
    pub max_value: f32,
}

impl Default for HatchingConfig {
    fn default() -> Self {
        Self {
            seed_box_size_factor: 1.9,
            d_sep_max: 10.0,
            shadow_factor: 1.0,
            gamma: 1.0,
            d_test_factor: 0.75,
            step: 1.0,
            max_steps: 100,
            min_steps: 10,
            max_depth_step: 0.05,
            max_accum_angle: 5.0,
            max_value: 10.0,
        }
    }
}

impl HatchingConfig {
    /// Creates a config with the given maximum separation and defaults elsewhere.
    pub fn new(d_sep_max: f32) -> Self {
        Self {
            d_sep_max,
            ..Default::default()
        }
    }

    pub fn with_seed_box_size_factor(mut self, factor: f32) -> Self {
        self.seed_box_size_factor = factor;
        self
    }

    pub fn with_shadow_factor(mut self, shadow_factor: f32) -> Self {
        self.shadow_factor = shadow_factor;
        self
    }

    pub fn with_gamma(mut self, gamma: f32) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_d_test_factor(mut self, d_test_factor: f32) -> Self {
        self.d_test_factor = d_test_factor;
        self
    }

    pub fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    /// Sets the maximum and minimum step counts.
    pub fn with_steps(mut self, max_steps: usize, min_steps: usize) -> Self {
        self.max_steps = max_steps;
        self.min_steps = min_steps;
        self
    }

    pub fn with_max_depth_step(mut self, max_depth_step: f32) -> Self {
        self.max_depth_step = max_depth_step;
        self
    }

    pub fn with_max_accum_angle(mut self, max_accum_angle: f32) -> Self {
        self.max_accum_angle = max_accum_angle;
        self
    }

    pub fn with_max_value(mut self, max_value: f32) -> Self {
        self.max_value = max_value;
        self
    }

    /// Separation distance at the given tone.
    #[inline]
    pub fn separation(&self, value: f32) -> f32 {
        separation_for_value(self.d_sep_max, self.shadow_factor, self.gamma, value)
    }

    /// Cell size of the seed grid in pixels.
    pub fn seed_box_size(&self) -> f32 {
        self.seed_box_size_factor * self.d_sep_max
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("d_sep_max", self.d_sep_max)?;
        ensure_positive("seed_box_size_factor", self.seed_box_size_factor)?;
        ensure_positive("gamma", self.gamma)?;
        ensure_positive("step", self.step)?;
        ensure_positive("max_depth_step", self.max_depth_step)?;
        ensure_positive("max_accum_angle", self.max_accum_angle)?;
        if !(self.shadow_factor > 0.0 && self.shadow_factor <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "shadow_factor must be in (0, 1], got {}",
                self.shadow_factor
            )));
        }
        if !(self.d_test_factor > 0.0 && self.d_test_factor <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "d_test_factor must be in (0, 1], got {}",
                self.d_test_factor
            )));
        }
        if self.max_steps == 0 {
            return Err(Error::InvalidConfig("max_steps must be >= 1".into()));
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
    fn separation_spans_shadow_to_max() {
        assert_eq!(separation_for_value(10.0, 0.2, 1.0, 0.0), 2.0);
        assert_eq!(separation_for_value(10.0, 0.2, 1.0, 1.0), 10.0);
        assert!((separation_for_value(10.0, 0.2, 2.0, 0.5) - 4.0).abs() < 1e-6);
    }

    #[test]
    fn separation_is_constant_without_shadow_range() {
        for v in [0.0, 0.3, 0.9, 4.0] {
            assert_eq!(separation_for_value(10.0, 1.0, 1.0, v), 10.0);
        }
    }

    #[test]
    fn negative_tone_maps_to_darkest_separation() {
        assert_eq!(separation_for_value(10.0, 0.5, 0.5, -1.0), 5.0);
    }

    #[test]
    fn default_config_is_valid() {
        let config = HatchingConfig::default();
        config.validate().expect("defaults validate");
        assert!((config.seed_box_size() - 19.0).abs() < 1e-5);
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(HatchingConfig::new(0.0).validate().is_err());
        assert!(HatchingConfig::default().with_d_test_factor(1.5).validate().is_err());
        assert!(HatchingConfig::default().with_shadow_factor(0.0).validate().is_err());
        assert!(HatchingConfig::default().with_steps(0, 0).validate().is_err());
        assert!(HatchingConfig::default().with_step(-1.0).validate().is_err());
        assert!(HatchingConfig::default()
            .with_max_value(f32::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn builders_set_fields() {
        let config = HatchingConfig::new(8.0)
            .with_gamma(2.0)
            .with_steps(40, 4)
            .with_max_accum_angle(1.0)
            .with_max_depth_step(0.5)
            .with_max_value(0.8);
        assert_eq!(config.d_sep_max, 8.0);
        assert_eq!(config.gamma, 2.0);
        assert_eq!((config.max_steps, config.min_steps), (40, 4));
        assert_eq!(config.max_accum_angle, 1.0);
        assert_eq!(config.max_depth_step, 0.5);
        assert_eq!(config.max_value, 0.8);
    }
}
