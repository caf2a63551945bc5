//! Polyline post-processing: Visvalingam-Whyatt simplification and Catmull-Rom
//! interpolation.
use glam::Vec2;

pub mod simplify;
pub mod spline;

pub use simplify::{simplify, simplify_paths};
pub use spline::{catmull_rom, interpolate};

/// Area of the triangle `(a, b, c)`: `0.5 * |cross(b - a, c - a)|`.
#[inline]
pub fn triangle_area(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    0.5 * (b - a).perp_dot(c - a).abs()
}
