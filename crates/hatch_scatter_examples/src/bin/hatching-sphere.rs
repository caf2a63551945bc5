use hatch_scatter::prelude::*;
use hatch_scatter_examples::{init_tracing, render_polylines_to_png, sphere_field, RenderConfig};

const FIELD_SIZE: usize = 512;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let grid = sphere_field(FIELD_SIZE)?;

    let config = HatchingConfig::new(8.0)
        .with_shadow_factor(0.25)
        .with_gamma(1.5)
        .with_max_value(0.95);
    let plan = Plan::new(HatchingPlan::new(config)).with_seed(42);

    let mut runner = PipelineRunner::try_new(plan)?;
    let result = runner.run(&grid)?;

    let render = RenderConfig::new((1024, 1024), (FIELD_SIZE, FIELD_SIZE));
    render_polylines_to_png(&result.polylines, &render, "hatching-sphere.png")?;
    Ok(())
}
