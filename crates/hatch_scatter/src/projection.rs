//! Mapping pixel-space strokes onto a drawing plane in 3D.
use glam::{Vec2, Vec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A parallelogram in world space spanned by `x_axis` and `y_axis` from `origin`.
///
/// Pixel `(0, 0)` maps to `origin`, pixel `(width, height)` to
/// `origin + x_axis + y_axis`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DrawingPlane {
    pub origin: Vec3,
    pub x_axis: Vec3,
    pub y_axis: Vec3,
}

impl Default for DrawingPlane {
    /// The unit square in the XY plane with pixel rows going down along -Y.
    fn default() -> Self {
        Self {
            origin: Vec3::new(0.0, 1.0, 0.0),
            x_axis: Vec3::X,
            y_axis: Vec3::NEG_Y,
        }
    }
}

impl DrawingPlane {
    pub fn new(origin: Vec3, x_axis: Vec3, y_axis: Vec3) -> Self {
        Self {
            origin,
            x_axis,
            y_axis,
        }
    }

    /// Builds a plane whose pixel centers are laid out symmetrically around `center`.
    pub fn centered(center: Vec3, x_axis: Vec3, y_axis: Vec3, width: usize, height: usize) -> Self {
        let half_x = 0.5 - 0.5 / width.max(1) as f32;
        let half_y = 0.5 - 0.5 / height.max(1) as f32;
        Self {
            origin: center - half_x * x_axis - half_y * y_axis,
            x_axis,
            y_axis,
        }
    }

    /// Projects pixel position `p` of a `width x height` raster onto the plane.
    #[inline]
    pub fn project(&self, p: Vec2, width: usize, height: usize) -> Vec3 {
        let u = p.x / width.max(1) as f32;
        let v = p.y / height.max(1) as f32;
        self.origin + u * self.x_axis + v * self.y_axis
    }

    pub fn project_path(&self, path: &[Vec2], width: usize, height: usize) -> Vec<Vec3> {
        path.iter().map(|&p| self.project(p, width, height)).collect()
    }

    /// Projects every non-empty path into one flat batch.
    pub fn project_paths(&self, paths: &[Vec<Vec2>], width: usize, height: usize) -> StrokeBatch {
        let mut batch = StrokeBatch::default();
        for path in paths {
            batch.push_stroke(path.iter().map(|&p| self.project(p, width, height)));
        }
        batch
    }
}

/// Stroke points stored back to back with the point count of every stroke.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StrokeBatch {
    pub positions: Vec<Vec3>,
    pub counts: Vec<usize>,
}

impl StrokeBatch {
    /// Appends one stroke; empty strokes are skipped.
    pub fn push_stroke(&mut self, points: impl IntoIterator<Item = Vec3>) {
        let before = self.positions.len();
        self.positions.extend(points);
        let count = self.positions.len() - before;
        if count > 0 {
            self.counts.push(count);
        }
    }

    /// Appends all strokes of `other`.
    pub fn append(&mut self, other: StrokeBatch) {
        self.positions.extend(other.positions);
        self.counts.extend(other.counts);
    }

    /// Number of strokes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates over the strokes as slices of `positions`.
    pub fn iter(&self) -> impl Iterator<Item = &[Vec3]> + '_ {
        let mut start = 0;
        self.counts.iter().map(move |&count| {
            let stroke = &self.positions[start..start + count];
            start += count;
            stroke
        })
    }

    /// Per-stroke copies of the positions.
    pub fn strokes(&self) -> Vec<Vec<Vec3>> {
        self.iter().map(<[Vec3]>::to_vec).collect()
    }

    /// Positions as `mint` vectors for consumers outside the glam ecosystem.
    pub fn to_mint(&self) -> Vec<mint::Vector3<f32>> {
        self.positions.iter().map(|&p| p.into()).collect()
    }
}
