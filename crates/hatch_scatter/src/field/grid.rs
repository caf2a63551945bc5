//! Bilinearly sampled raster of scene-field samples.
//!
//! The raster stores coverage-premultiplied channels so that pixels at the
//! silhouette of an object fade out instead of dragging tone, depth, and
//! direction towards zero.
use glam::Vec2;

use super::sample::GridSample;
use crate::error::{Error, Result};

/// Channels per pixel in the external raster: coverage, value, depth, cos, sin.
pub const CHANNELS: usize = 5;

/// Clamp margin and degeneracy threshold used while sampling.
pub const SAMPLE_EPSILON: f32 = 1.0e-5;

/// Immutable `width x height` scene field with continuous sampling.
#[derive(Clone, Debug)]
pub struct FieldGrid {
    width: usize,
    height: usize,
    /// Row-major premultiplied `[coverage, c*value, c*depth, c*cos, c*sin]`.
    data: Vec<[f32; CHANNELS]>,
}

impl FieldGrid {
    /// Builds a grid from the producer's row-major raster with [`CHANNELS`] floats per
    /// pixel (`coverage, value, depth, cos, sin`). Value, depth, and direction are
    /// weighted by coverage here.
    pub fn from_channels(width: usize, height: usize, channels: &[f32]) -> Result<Self> {
        check_dimensions(width, height)?;
        let expected = width * height * CHANNELS;
        if channels.len() != expected {
            return Err(Error::InvalidField(format!(
                "expected {expected} floats for {width}x{height}x{CHANNELS}, got {}",
                channels.len()
            )));
        }

        let data = channels
            .chunks_exact(CHANNELS)
            .map(|px| {
                let c = px[0];
                [c, c * px[1], c * px[2], c * px[3], c * px[4]]
            })
            .collect();

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Builds a grid by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> GridSample,
    {
        check_dimensions(width, height)?;
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(premultiply(f(x, y)));
            }
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Builds a grid from row-major samples.
    pub fn from_samples(width: usize, height: usize, samples: &[GridSample]) -> Result<Self> {
        if samples.len() != width * height {
            return Err(Error::InvalidField(format!(
                "expected {} samples for {width}x{height}, got {}",
                width * height,
                samples.len()
            )));
        }
        Self::from_fn(width, height, |x, y| samples[y * width + x])
    }

    /// Grid where every pixel holds the same sample.
    pub fn uniform(width: usize, height: usize, sample: GridSample) -> Result<Self> {
        Self::from_fn(width, height, |_, _| sample)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Size as a vector in pixel units.
    pub fn extent(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Returns the stored sample at integer pixel coordinates, or `None` if out of bounds.
    pub fn pixel(&self, ix: usize, iy: usize) -> Option<GridSample> {
        if ix >= self.width || iy >= self.height {
            return None;
        }
        Some(unpremultiply(&self.data[iy * self.width + ix]))
    }

    /// Samples the field at a real-valued position using bilinear interpolation.
    ///
    /// Each axis is clamped to `[0, dim - 1 - eps]`. Interpolated value and depth are
    /// renormalized by interpolated coverage and the direction by its length.
    pub fn sample(&self, p: Vec2) -> GridSample {
        let x = clamp_axis(p.x, self.width);
        let y = clamp_axis(p.y, self.height);

        let x0 = x as usize;
        let y0 = y as usize;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let fx = x - x0 as f32;
        let fy = y - y0 as f32;

        let corners = [
            (&self.data[y0 * self.width + x0], (1.0 - fy) * (1.0 - fx)),
            (&self.data[y0 * self.width + x1], (1.0 - fy) * fx),
            (&self.data[y1 * self.width + x0], fy * (1.0 - fx)),
            (&self.data[y1 * self.width + x1], fy * fx),
        ];

        let mut acc = [0.0f32; CHANNELS];
        for (px, w) in corners {
            for (a, v) in acc.iter_mut().zip(px.iter()) {
                *a += v * w;
            }
        }

        unpremultiply(&acc)
    }

    /// Returns a copy whose directions are rotated by `angle` radians.
    ///
    /// Used to derive the crossing pass of cross-hatching from a single field.
    pub fn with_orientation_offset(&self, angle: f32) -> Self {
        let rot = Vec2::from_angle(angle);
        let data = self
            .data
            .iter()
            .map(|px| {
                let d = rot.rotate(Vec2::new(px[3], px[4]));
                [px[0], px[1], px[2], d.x, d.y]
            })
            .collect();
        Self {
            width: self.width,
            height: self.height,
            data,
        }
    }

    /// Minimum and maximum value over covered pixels, if any pixel is covered.
    pub fn value_range(&self) -> Option<(f32, f32)> {
        self.data
            .iter()
            .map(unpremultiply)
            .filter(GridSample::is_covered)
            .map(|s| s.value)
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidField(format!(
            "grid dimensions must be > 0, got {width}x{height}"
        )));
    }
    Ok(())
}

#[inline]
fn clamp_axis(v: f32, dim: usize) -> f32 {
    let hi = dim as f32 - 1.0 - SAMPLE_EPSILON;
    if v.is_nan() {
        return 0.0;
    }
    v.min(hi).max(0.0)
}

#[inline]
fn premultiply(s: GridSample) -> [f32; CHANNELS] {
    let c = s.coverage;
    [
        c,
        c * s.value,
        c * s.depth,
        c * s.direction.x,
        c * s.direction.y,
    ]
}

fn unpremultiply(px: &[f32; CHANNELS]) -> GridSample {
    let coverage = px[0];
    if coverage < SAMPLE_EPSILON {
        return GridSample::UNCOVERED;
    }

    let inv = 1.0 / coverage;
    let dir = Vec2::new(px[3], px[4]);
    let len = dir.length();
    let direction = if len > SAMPLE_EPSILON {
        dir / len
    } else {
        Vec2::X
    };

    GridSample {
        coverage,
        value: px[1] * inv,
        depth: px[2] * inv,
        direction,
    }
}
