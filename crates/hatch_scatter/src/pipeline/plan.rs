//! Planning module describing which technique to run and how to post-process it.
use std::f32::consts::FRAC_PI_4;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hatching::HatchingConfig;
use crate::projection::DrawingPlane;
use crate::stippling::{ScribbleConfig, StipplingConfig};

/// Angle between the hatching and the cross-hatching pass.
pub const DEFAULT_CROSSING_OFFSET: f32 = FRAC_PI_4;

/// Default area threshold for Visvalingam-Whyatt simplification, in square pixels.
pub const DEFAULT_SIMPLIFY_MAX_AREA: f32 = 0.02;

/// Default seed for the per-pass generators.
pub const DEFAULT_SEED: u64 = 42;

/// Default number of spline samples per scribble segment.
pub const DEFAULT_POINTS_PER_SEGMENT: usize = 10;

/// One hatching pass over the field rotated by `orientation_offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HatchPass {
    /// Rotation applied to the field directions, in radians.
    pub orientation_offset: f32,
    /// Tone above which this pass leaves the field blank.
    pub max_value: f32,
}

impl HatchPass {
    pub fn new(orientation_offset: f32, max_value: f32) -> Self {
        Self {
            orientation_offset,
            max_value,
        }
    }
}

/// Hatching with one pass, or several for cross-hatching.
#[non_exhaustive]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HatchingPlan {
    pub config: HatchingConfig,
    pub passes: Vec<HatchPass>,
}

impl HatchingPlan {
    /// A single unrotated pass using the config's tone ceiling.
    pub fn new(config: HatchingConfig) -> Self {
        let pass = HatchPass::new(0.0, config.max_value);
        Self {
            config,
            passes: vec![pass],
        }
    }

    /// Replaces all passes.
    pub fn with_passes(mut self, passes: Vec<HatchPass>) -> Self {
        self.passes = passes;
        self
    }

    /// Rotates every pass by `offset` radians.
    pub fn with_orientation_offset(mut self, offset: f32) -> Self {
        for pass in &mut self.passes {
            pass.orientation_offset += offset;
        }
        self
    }

    /// Adds a crossing pass rotated by `crossing_offset` relative to the first pass.
    pub fn with_crosshatching(mut self, crossing_offset: f32, max_value: f32) -> Self {
        let base = self.passes.first().map_or(0.0, |p| p.orientation_offset);
        self.passes.push(HatchPass::new(base + crossing_offset, max_value));
        self
    }
}

/// How accepted stipples turn into strokes.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StippleOutput {
    /// One single-point stroke per stipple.
    Points,
    /// One two-point dash of `length` pixels per stipple, along the flow.
    Dashes { length: f32 },
    /// `iterations` scribble paths, smoothed with `points_per_segment` spline
    /// samples per segment.
    Scribbles {
        config: ScribbleConfig,
        iterations: usize,
        points_per_segment: usize,
    },
}

impl StippleOutput {
    /// A single scribble with default settings.
    pub fn scribbles() -> Self {
        StippleOutput::Scribbles {
            config: ScribbleConfig::default(),
            iterations: 1,
            points_per_segment: DEFAULT_POINTS_PER_SEGMENT,
        }
    }
}

/// Stippling over the field rotated by `orientation_offset`.
#[non_exhaustive]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StipplingPlan {
    pub config: StipplingConfig,
    /// Rotation applied to the field directions, in radians; orients dashes.
    pub orientation_offset: f32,
    pub output: StippleOutput,
}

impl StipplingPlan {
    pub fn new(config: StipplingConfig) -> Self {
        Self {
            config,
            orientation_offset: 0.0,
            output: StippleOutput::Points,
        }
    }

    pub fn with_orientation_offset(mut self, offset: f32) -> Self {
        self.orientation_offset = offset;
        self
    }

    pub fn with_output(mut self, output: StippleOutput) -> Self {
        self.output = output;
        self
    }
}

/// The drawing technique a plan runs.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Technique {
    Hatching(HatchingPlan),
    Stippling(StipplingPlan),
}

/// Technique discriminant reported in events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TechniqueKind {
    Hatching,
    Stippling,
}

impl Technique {
    pub fn kind(&self) -> TechniqueKind {
        match self {
            Technique::Hatching(_) => TechniqueKind::Hatching,
            Technique::Stippling(_) => TechniqueKind::Stippling,
        }
    }

    /// Number of passes the technique runs.
    pub fn pass_count(&self) -> usize {
        match self {
            Technique::Hatching(h) => h.passes.len(),
            Technique::Stippling(_) => 1,
        }
    }
}

impl From<HatchingPlan> for Technique {
    fn from(plan: HatchingPlan) -> Self {
        Technique::Hatching(plan)
    }
}

impl From<StipplingPlan> for Technique {
    fn from(plan: StipplingPlan) -> Self {
        Technique::Stippling(plan)
    }
}

/// A complete generation plan: technique, seed, simplification and output plane.
#[non_exhaustive]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Plan {
    pub technique: Technique,
    /// Every pass draws from a fresh generator seeded with this value.
    pub seed: u64,
    /// Area threshold for polyline simplification; `0` disables it.
    pub simplify_max_area: f32,
    /// Plane the pixel-space strokes are projected onto.
    pub plane: DrawingPlane,
}

impl Default for Plan {
    fn default() -> Self {
        Self::new(HatchingPlan::new(HatchingConfig::default()))
    }
}

impl Plan {
    /// Create a new plan for the given technique.
    pub fn new(technique: impl Into<Technique>) -> Self {
        Self {
            technique: technique.into(),
            seed: DEFAULT_SEED,
            simplify_max_area: DEFAULT_SIMPLIFY_MAX_AREA,
            plane: DrawingPlane::default(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_simplify_max_area(mut self, max_area: f32) -> Self {
        self.simplify_max_area = max_area;
        self
    }

    pub fn with_plane(mut self, plane: DrawingPlane) -> Self {
        self.plane = plane;
        self
    }

    /// Validates the plan and every config it carries.
    pub fn validate(&self) -> Result<()> {
        if !(self.simplify_max_area >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "simplify_max_area must be >= 0, got {}",
                self.simplify_max_area
            )));
        }
        match &self.technique {
            Technique::Hatching(h) => {
                h.config.validate()?;
                for pass in &h.passes {
                    if !pass.orientation_offset.is_finite() || pass.max_value.is_nan() {
                        return Err(Error::InvalidConfig(format!(
                            "invalid hatch pass {pass:?}"
                        )));
                    }
                }
            }
            Technique::Stippling(s) => {
                s.config.validate()?;
                if !s.orientation_offset.is_finite() {
                    return Err(Error::InvalidConfig(
                        "orientation_offset must be finite".into(),
                    ));
                }
                match &s.output {
                    StippleOutput::Points => {}
                    StippleOutput::Dashes { length } => {
                        if !(*length >= 0.0 && length.is_finite()) {
                            return Err(Error::InvalidConfig(format!(
                                "dash length must be finite and >= 0, got {length}"
                            )));
                        }
                    }
                    StippleOutput::Scribbles {
                        config,
                        points_per_segment,
                        ..
                    } => {
                        config.validate()?;
                        if *points_per_segment == 0 {
                            return Err(Error::InvalidConfig(
                                "points_per_segment must be >= 1".into(),
                            ));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
