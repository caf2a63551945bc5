use hatch_scatter::prelude::*;
use hatch_scatter_examples::{init_tracing, render_polylines_to_png, sphere_field, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

const FIELD_SIZE: usize = 512;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let grid = sphere_field(FIELD_SIZE)?;

    let stippling = StipplingPlan::new(StipplingConfig::new(3.0, 15.0)).with_output(
        StippleOutput::Scribbles {
            config: ScribbleConfig::default().with_depth_factor(2.0),
            iterations: 2,
            points_per_segment: 6,
        },
    );
    let plan = Plan::new(stippling).with_simplify_max_area(0.05);

    // Optional seed as the first argument.
    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(DEFAULT_SEED);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut runner = PipelineRunner::try_new(plan)?;
    let result = runner.run_with_rng(&grid, &mut rng, &mut ())?;
    println!(
        "{} scribbles, {} points on the drawing plane",
        result.strokes.len(),
        result.strokes.positions.len()
    );

    let render = RenderConfig::new((1024, 1024), (FIELD_SIZE, FIELD_SIZE));
    render_polylines_to_png(&result.polylines, &render, "stippling-scribble-sphere.png")?;
    Ok(())
}
