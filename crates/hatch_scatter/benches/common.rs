use std::time::Duration;

use criterion::{Criterion, Throughput};
use glam::{Vec2, Vec3};
use hatch_scatter::field::{FieldGrid, GridSample};

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// Diffusely lit sphere filling most of a `size x size` field, flow along latitude circles.
pub fn sphere_field(size: usize) -> FieldGrid {
    let light = Vec3::new(-0.5, -0.6, 0.8).normalize();
    let center = Vec2::splat(0.5 * size as f32);
    let radius = 0.45 * size as f32;
    FieldGrid::from_fn(size, size, |x, y| {
        let d = (Vec2::new(x as f32, y as f32) - center) / radius;
        let r2 = d.length_squared();
        if r2 >= 1.0 {
            return GridSample::UNCOVERED;
        }
        let normal = Vec3::new(d.x, d.y, (1.0 - r2).sqrt());
        let value = normal.dot(light).max(0.0);
        let angle = d.y.atan2(d.x) + std::f32::consts::FRAC_PI_2;
        GridSample::covered_with_angle(value, 2.0 - normal.z, angle)
    })
    .expect("valid sphere field")
}
