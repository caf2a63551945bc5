use hatch_scatter::prelude::*;
use hatch_scatter_examples::{init_tracing, render_polylines_to_png, sphere_field, RenderConfig};

const FIELD_SIZE: usize = 512;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let grid = sphere_field(FIELD_SIZE)?;
    let render = RenderConfig::new((1024, 1024), (FIELD_SIZE, FIELD_SIZE));

    let config = StipplingConfig::new(2.0, 12.0).with_max_value(0.95);

    let points = Plan::new(StipplingPlan::new(config.clone()));
    let result = run_plan(&points, &grid, None)?;
    render_polylines_to_png(&result.polylines, &render, "stippling-points-sphere.png")?;

    let dashes = Plan::new(
        StipplingPlan::new(config).with_output(StippleOutput::Dashes { length: 4.0 }),
    );
    let result = run_plan(&dashes, &grid, None)?;
    render_polylines_to_png(&result.polylines, &render, "stippling-dashes-sphere.png")?;
    Ok(())
}
