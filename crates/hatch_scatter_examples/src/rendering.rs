use std::path::Path;

use glam::Vec2;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// How pixel-space strokes are drawn into a PNG.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Output image size in pixels (width, height).
    pub image_size: (u32, u32),
    /// Size of the field the strokes were generated on (width, height).
    pub field_size: (usize, usize),
    pub background: [u8; 3],
    pub stroke_color: [u8; 3],
    /// Radius of single-point strokes in output pixels.
    pub dot_radius: i32,
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32), field_size: (usize, usize)) -> Self {
        Self {
            image_size,
            field_size,
            background: [255, 255, 255],
            stroke_color: [20, 20, 20],
            dot_radius: 1,
        }
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn with_stroke_color(mut self, stroke_color: [u8; 3]) -> Self {
        self.stroke_color = stroke_color;
        self
    }

    pub fn with_dot_radius(mut self, dot_radius: i32) -> Self {
        self.dot_radius = dot_radius;
        self
    }

    fn scale(&self) -> Vec2 {
        Vec2::new(
            self.image_size.0 as f32 / self.field_size.0.max(1) as f32,
            self.image_size.1 as f32 / self.field_size.1.max(1) as f32,
        )
    }
}

/// Draws every polyline into a new image and writes it as PNG.
pub fn render_polylines_to_png(
    polylines: &[Vec<Vec2>],
    config: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let (w, h) = config.image_size;
    let mut image = RgbImage::from_pixel(w, h, Rgb(config.background));
    let color = Rgb(config.stroke_color);
    let scale = config.scale();

    for line in polylines {
        match line.as_slice() {
            [] => {}
            [p] => {
                let c = *p * scale;
                draw_filled_circle_mut(
                    &mut image,
                    (c.x.round() as i32, c.y.round() as i32),
                    config.dot_radius,
                    color,
                );
            }
            points => {
                for seg in points.windows(2) {
                    let a = seg[0] * scale;
                    let b = seg[1] * scale;
                    draw_line_segment_mut(&mut image, (a.x, a.y), (b.x, b.y), color);
                }
            }
        }
    }

    let path = path.as_ref();
    image.save(path)?;
    info!("Wrote {} strokes to {}.", polylines.len(), path.display());
    Ok(())
}
