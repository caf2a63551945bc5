use hatch_scatter::prelude::*;
use hatch_scatter_examples::{init_tracing, render_polylines_to_png, sphere_field, RenderConfig};

const FIELD_SIZE: usize = 512;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let grid = sphere_field(FIELD_SIZE)?;

    let config = HatchingConfig::new(7.0)
        .with_shadow_factor(0.4)
        .with_max_value(0.9);
    // The crossing pass only darkens the shadow side.
    let hatching = HatchingPlan::new(config).with_crosshatching(DEFAULT_CROSSING_OFFSET, 0.4);
    let plan = Plan::new(hatching).with_seed(42);

    let mut sink = VecSink::with_kinds([PipelineEventKind::PassFinished]);
    let result = run_plan_with_events(&plan, &grid, &mut sink)?;

    for event in sink.as_slice() {
        if let PipelineEvent::PassFinished { stats } = event {
            println!(
                "pass {}: {} strokes, {} points",
                stats.index, stats.strokes, stats.points
            );
        }
    }

    let render = RenderConfig::new((1024, 1024), (FIELD_SIZE, FIELD_SIZE));
    render_polylines_to_png(&result.polylines, &render, "crosshatching-sphere.png")?;
    Ok(())
}
