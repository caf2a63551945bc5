//! Uniform Catmull-Rom interpolation.
use glam::Vec2;

use crate::error::{Error, Result};

/// Evaluates the uniform Catmull-Rom segment between `p1` and `p2` at `t` in `[0, 1]`.
#[inline]
pub fn catmull_rom(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let t2 = t * t;
    let t3 = t2 * t;

    let b0 = -0.5 * t3 + t2 - 0.5 * t;
    let b1 = 1.5 * t3 - 2.5 * t2 + 1.0;
    let b2 = -1.5 * t3 + 2.0 * t2 + 0.5 * t;
    let b3 = 0.5 * t3 - 0.5 * t2;

    b0 * p0 + b1 * p1 + b2 * p2 + b3 * p3
}

/// Samples `points_per_segment` points on every segment of the Catmull-Rom
/// curve through `points`.
///
/// A window `points[i..i + 4]` yields the segment from `points[i + 1]` to
/// `points[i + 2]`, sampled at `t = j / points_per_segment`, so the first and
/// last control points only shape the curve. Requires at least four points and a
/// non-zero `points_per_segment`.
pub fn interpolate(points: &[Vec2], points_per_segment: usize) -> Result<Vec<Vec2>> {
    if points.len() < 4 {
        return Err(Error::PreconditionViolation(format!(
            "catmull-rom interpolation needs at least 4 points, got {}",
            points.len()
        )));
    }
    if points_per_segment == 0 {
        return Err(Error::PreconditionViolation(
            "points_per_segment must be >= 1".into(),
        ));
    }

    let mut out = Vec::with_capacity((points.len() - 3) * points_per_segment);
    for w in points.windows(4) {
        for j in 0..points_per_segment {
            let t = j as f32 / points_per_segment as f32;
            out.push(catmull_rom(w[0], w[1], w[2], w[3], t));
        }
    }
    Ok(out)
}
