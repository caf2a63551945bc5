#![forbid(unsafe_code)]

mod fields;
mod rendering;

pub use fields::{sphere_field, SphereScene};
pub use rendering::{init_tracing, render_polylines_to_png, RenderConfig};
