//! Single scene-field sample.
use glam::Vec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Coverage above which a sample counts as lying on visible geometry.
pub const COVERED_THRESHOLD: f32 = 0.9;

/// One sample of the scene field: how much of the pixel is covered, its tone, its
/// linear depth, and the local flow direction as a unit vector.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridSample {
    /// Fraction of the pixel covered by geometry in [0, 1].
    pub coverage: f32,
    /// Tone (luminance-like) driving spacing and radius.
    pub value: f32,
    /// Linear depth.
    pub depth: f32,
    /// Unit flow direction (cos, sin of the orientation angle).
    pub direction: Vec2,
}

impl GridSample {
    /// Canonical sample returned wherever nothing is covered.
    pub const UNCOVERED: Self = Self {
        coverage: 0.0,
        value: 0.0,
        depth: 0.0,
        direction: Vec2::X,
    };

    pub fn new(coverage: f32, value: f32, depth: f32, direction: Vec2) -> Self {
        Self {
            coverage,
            value,
            depth,
            direction,
        }
    }

    /// Fully covered sample whose direction is given as an angle in radians.
    pub fn covered_with_angle(value: f32, depth: f32, angle: f32) -> Self {
        Self::new(1.0, value, depth, Vec2::from_angle(angle))
    }

    #[inline]
    pub fn is_covered(&self) -> bool {
        self.coverage > COVERED_THRESHOLD
    }
}

impl Default for GridSample {
    fn default() -> Self {
        Self::UNCOVERED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncovered_sample_is_canonical() {
        let s = GridSample::default();
        assert_eq!(s, GridSample::UNCOVERED);
        assert!(!s.is_covered());
        assert_eq!(s.direction, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn coverage_threshold_is_exclusive() {
        assert!(!GridSample::new(COVERED_THRESHOLD, 0.0, 0.0, Vec2::X).is_covered());
        assert!(GridSample::new(0.95, 0.0, 0.0, Vec2::X).is_covered());
    }

    #[test]
    fn angle_constructor_builds_unit_direction() {
        let s = GridSample::covered_with_angle(0.5, 2.0, std::f32::consts::FRAC_PI_2);
        assert!((s.direction.length() - 1.0).abs() < 1e-6);
        assert!(s.direction.x.abs() < 1e-6);
        assert!((s.direction.y - 1.0).abs() < 1e-6);
    }
}
