use zoomgraph::api::{ChartEngine, ChartEngineConfig};
use zoomgraph::core::{CanvasSize, ChartDataModel, SeriesId, XSeries, YSeries};
use zoomgraph::extensions::{CustomLayer, CustomLayerContext};
use zoomgraph::interaction::PointerButton;
use zoomgraph::render::{
    Color, LayerId, LayerRecomputeStats, Primitive, RecordingSurface, TextHAlign, TextPrimitive,
};

fn sample_model(points: usize) -> ChartDataModel {
    let x = XSeries::new((0..points).map(|i| i as f64).collect());
    let speed = (0..points).map(|i| (i % 10) as f64).collect();
    ChartDataModel::new(x)
        .with_title("Morning ride")
        .with_series(YSeries::new(SeriesId(1), "speed", speed))
}

fn build_engine() -> ChartEngine<RecordingSurface> {
    let config = ChartEngineConfig::new(CanvasSize::new(1000, 250));
    let mut engine = ChartEngine::new(RecordingSurface::default(), config).expect("engine init");
    engine.set_data_model(sample_model(101)).expect("set data");
    engine
}

fn stats(series: u64, decorated: u64, custom: u64, overlay: u64) -> LayerRecomputeStats {
    LayerRecomputeStats {
        series,
        decorated,
        custom,
        overlay,
    }
}

struct LapLayer;

impl CustomLayer for LapLayer {
    fn id(&self) -> &str {
        "laps"
    }

    fn paint(&self, context: &CustomLayerContext) -> Vec<Primitive> {
        let x = context.value_positions.get(50).copied().unwrap_or(0.0);
        vec![Primitive::Text(TextPrimitive::new(
            "lap 1",
            x,
            30.0,
            11.0,
            Color::rgb(0.2, 0.2, 0.2),
            TextHAlign::Center,
        ))]
    }
}

#[test]
fn render_requests_are_coalesced_into_one_composition() {
    let mut engine = build_engine();
    assert!(engine.is_render_pending());
    assert_eq!(engine.pending_task_count(), 1);

    let executed = engine.run_pending_tasks(0).expect("run tasks");
    assert_eq!(executed, 1);
    assert!(!engine.is_render_pending());
    assert_eq!(engine.layer_recompute_stats(), stats(1, 1, 1, 1));
    assert_eq!(engine.surface().allocated_layers(), 4);
}

#[test]
fn clean_layers_are_not_recomposed() {
    let mut engine = build_engine();
    engine.run_pending_tasks(0).expect("first composition");
    let draw_calls = engine.surface().draw_calls();

    engine.render_now().expect("second render");
    assert_eq!(engine.layer_recompute_stats(), stats(1, 1, 1, 1));
    assert_eq!(engine.surface().draw_calls(), draw_calls);
}

#[test]
fn host_render_requests_coalesce_and_reuse_clean_layers() {
    let mut engine = build_engine();
    engine.run_pending_tasks(0).expect("first composition");
    let draw_calls = engine.surface().draw_calls();

    for _ in 0..5 {
        engine.request_render().expect("request render");
    }
    assert_eq!(engine.pending_task_count(), 1);
    assert_eq!(engine.run_pending_tasks(0).expect("run tasks"), 1);
    assert_eq!(engine.pending_task_count(), 0);
    assert_eq!(engine.layer_recompute_stats(), stats(1, 1, 1, 1));
    assert_eq!(engine.surface().draw_calls(), draw_calls);

    engine.dispose();
    assert!(engine.request_render().is_err());
}

#[test]
fn hover_only_recomposes_the_overlay() {
    let mut engine = build_engine();
    engine.run_pending_tasks(0).expect("first composition");

    engine.pointer_move(252.0, 100.0).expect("hover");
    assert_eq!(engine.hover_index(), Some(25));
    engine.run_pending_tasks(0).expect("hover composition");

    assert_eq!(engine.layer_recompute_stats(), stats(1, 1, 1, 2));
}

#[test]
fn chart_drag_moves_the_bitmap_without_recomposing() {
    let mut engine = build_engine();
    engine.zoom_by(2.0, Some(500.0)).expect("zoom");
    engine.run_pending_tasks(0).expect("zoomed composition");
    assert_eq!(engine.left_border(), 500);
    let after_zoom = engine.layer_recompute_stats();

    engine
        .pointer_down(400.0, 100.0, PointerButton::Primary)
        .expect("grab chart");
    engine.pointer_move(300.0, 100.0).expect("drag chart");
    engine.run_pending_tasks(0).expect("drag tasks");

    assert_eq!(engine.presentation_offset(), -100.0);
    assert_eq!(engine.left_border(), 500);
    assert_eq!(engine.layer_recompute_stats().series, after_zoom.series);

    engine.pointer_up(300.0, 100.0).expect("release chart");
    engine.run_pending_tasks(0).expect("pan composition");
    assert_eq!(engine.presentation_offset(), 0.0);
    assert_eq!(engine.left_border(), 600);
    assert_eq!(engine.layer_recompute_stats().series, after_zoom.series + 1);
}

#[test]
fn zero_area_resize_keeps_previous_layers() {
    let mut engine = build_engine();
    engine.run_pending_tasks(0).expect("first composition");

    engine.resize(CanvasSize::new(0, 250)).expect("zero width resize");
    assert_eq!(engine.pending_task_count(), 0);
    engine.render_now().expect("render zero area");

    assert_eq!(engine.surface().allocated_layers(), 4);
    assert_eq!(engine.surface().disposed_layers(), 0);
    assert_eq!(engine.layer_recompute_stats(), stats(1, 1, 1, 1));
}

#[test]
fn resize_reallocates_and_recomposes_every_layer() {
    let mut engine = build_engine();
    engine.run_pending_tasks(0).expect("first composition");

    engine.resize(CanvasSize::new(800, 250)).expect("resize");
    engine.run_pending_tasks(0).expect("resized composition");

    assert_eq!(engine.surface().allocated_layers(), 8);
    assert_eq!(engine.surface().disposed_layers(), 4);
    assert_eq!(engine.layer_recompute_stats(), stats(2, 2, 2, 2));
    let presented = engine.presented_layer().expect("presented layer");
    assert_eq!(presented.size, CanvasSize::new(800, 250));
}

#[test]
fn empty_model_renders_the_no_data_message() {
    let config = ChartEngineConfig::new(CanvasSize::new(400, 200));
    let mut engine = ChartEngine::new(RecordingSurface::default(), config).expect("engine init");
    engine.render_now().expect("render");

    assert!(!engine.has_graph());
    let decorated = engine.render_layer(LayerId::Decorated).expect("decorated layer");
    assert_eq!(decorated.texts(), vec!["No data"]);
}

#[test]
fn error_message_replaces_the_chart() {
    let mut engine = build_engine();
    engine
        .set_data_model(ChartDataModel::default().with_error_message("GPS signal lost"))
        .expect("set error model");
    engine.render_now().expect("render");

    let decorated = engine.render_layer(LayerId::Decorated).expect("decorated layer");
    assert_eq!(decorated.texts(), vec!["GPS signal lost"]);
}

#[test]
fn custom_layers_are_painted_and_invalidated_alone() {
    let mut engine = build_engine();
    engine
        .register_custom_layer(Box::new(LapLayer))
        .expect("register laps");
    assert!(engine.register_custom_layer(Box::new(LapLayer)).is_err());
    engine.run_pending_tasks(0).expect("first composition");

    let custom = engine.render_layer(LayerId::Custom).expect("custom layer");
    assert!(custom.texts().contains(&"lap 1"));

    engine.invalidate_custom_layers().expect("invalidate custom");
    engine.run_pending_tasks(0).expect("custom composition");
    assert_eq!(engine.layer_recompute_stats(), stats(1, 1, 2, 2));

    assert!(engine.unregister_custom_layer("laps"));
    assert!(!engine.has_custom_layer("laps"));
}

#[test]
fn disposed_engine_rejects_calls_and_releases_layers() {
    let mut engine = build_engine();
    engine.run_pending_tasks(0).expect("first composition");

    engine.dispose();
    engine.dispose();

    assert!(engine.is_disposed());
    assert_eq!(engine.surface().disposed_layers(), 4);
    assert_eq!(engine.pending_task_count(), 0);
    assert!(engine.set_data_model(sample_model(10)).is_err());
    assert!(engine.run_pending_tasks(10).is_err());
    assert!(engine.render_now().is_err());
    assert!(engine.snapshot().disposed);
}
