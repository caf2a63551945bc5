//! Jittered-grid seed sampling.
use glam::Vec2;
use mint::Vector2;
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sampling::{next_down, rand01, SeedSampling};

/// One seed per grid cell, offset randomly inside its cell.
///
/// The cell count per axis is `floor(extent / cell_size)` (at least 1) and the cells
/// are stretched to tile the extent exactly.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JitterGridSeeds {
    /// Jitter amount in [0, 1], where 0 is cell centers and 1 spans the whole cell.
    pub jitter: f32,
    /// Target cell size in pixels.
    pub cell_size: f32,
}

impl JitterGridSeeds {
    /// Seeds with full-cell jitter.
    pub fn new(cell_size: f32) -> Self {
        Self {
            jitter: 1.0,
            cell_size,
        }
    }

    /// Sets the jitter amount (clamped to [0, 1]).
    pub fn with_jitter(mut self, jitter: f32) -> Self {
        self.jitter = jitter.clamp(0.0, 1.0);
        self
    }
}

impl SeedSampling for JitterGridSeeds {
    fn generate(&self, extent: Vector2<f32>, rng: &mut dyn RngCore) -> Vec<Vector2<f32>> {
        let extent = Vec2::from(extent);
        if !(extent.x > 0.0 && extent.y > 0.0) {
            return Vec::new();
        }
        let eff = if self.cell_size.is_finite() && self.cell_size > 0.0 {
            self.cell_size
        } else {
            (extent.x.min(extent.y) / 10.0).max(1.0)
        };

        let cols = ((extent.x / eff).floor() as usize).max(1);
        let rows = ((extent.y / eff).floor() as usize).max(1);
        let cell_w = extent.x / cols as f32;
        let cell_h = extent.y / rows as f32;
        let max_x = next_down(extent.x);
        let max_y = next_down(extent.y);

        let mut points = Vec::with_capacity(cols * rows);
        for iy in 0..rows {
            for ix in 0..cols {
                let ox = 0.5 + self.jitter * (rand01(rng) - 0.5);
                let oy = 0.5 + self.jitter * (rand01(rng) - 0.5);
                let px = (cell_w * (ix as f32 + ox)).clamp(0.0, max_x);
                let py = (cell_h * (iy as f32 + oy)).clamp(0.0, max_y);
                points.push(Vec2::new(px, py));
            }
        }

        points.into_iter().map(Into::into).collect()
    }
}
