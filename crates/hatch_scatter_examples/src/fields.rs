use std::f32::consts::FRAC_PI_2;

use glam::{Vec2, Vec3};
use hatch_scatter::field::{FieldGrid, GridSample};

/// A diffusely lit unit sphere seen head-on, rasterized into a field.
///
/// Tone is Lambertian shading, depth is the camera distance in sphere radii,
/// and the flow runs along circles around the view axis.
#[derive(Debug, Clone)]
pub struct SphereScene {
    /// Field size in pixels (square).
    pub size: usize,
    /// Direction towards the light, in view space (x right, y down, z to camera).
    pub light: Vec3,
    /// Sphere radius as a fraction of the field size.
    pub radius_fraction: f32,
    /// Constant tone added to the shading.
    pub ambient: f32,
}

impl Default for SphereScene {
    fn default() -> Self {
        Self {
            size: 512,
            light: Vec3::new(-0.5, -0.6, 0.8),
            radius_fraction: 0.42,
            ambient: 0.05,
        }
    }
}

impl SphereScene {
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_light(mut self, light: Vec3) -> Self {
        self.light = light;
        self
    }

    pub fn field(&self) -> hatch_scatter::error::Result<FieldGrid> {
        let light = self.light.normalize_or(Vec3::Z);
        let center = Vec2::splat(0.5 * self.size as f32);
        let radius = (self.radius_fraction * self.size as f32).max(1.0);

        FieldGrid::from_fn(self.size, self.size, |x, y| {
            let d = (Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center) / radius;
            let r2 = d.length_squared();
            if r2 >= 1.0 {
                return GridSample::UNCOVERED;
            }
            let normal = Vec3::new(d.x, d.y, (1.0 - r2).sqrt());
            let value = (self.ambient + normal.dot(light).max(0.0)).min(1.0);
            let angle = d.y.atan2(d.x) + FRAC_PI_2;
            GridSample::covered_with_angle(value, 2.0 - normal.z, angle)
        })
    }
}

/// Field of the default sphere scene at the given size.
pub fn sphere_field(size: usize) -> anyhow::Result<FieldGrid> {
    Ok(SphereScene::default().with_size(size).field()?)
}
