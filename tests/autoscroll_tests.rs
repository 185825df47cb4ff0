use zoomgraph::api::{ChartEngine, ChartEngineConfig, MarkerPositionOptions};
use zoomgraph::core::{CanvasSize, ChartDataModel, MarkerKind, SeriesId, XSeries, YSeries};
use zoomgraph::interaction::{
    AutoscrollController, LEFT_EDGE_STEPS, PointerButton, RIGHT_EDGE_STEPS, ScrollEdge,
    autoscroll_step, edge_penetration,
};
use zoomgraph::render::RecordingSurface;

fn sample_model(points: usize) -> ChartDataModel {
    let x = XSeries::new((0..points).map(|i| i as f64).collect());
    let cadence = (0..points).map(|i| 80.0 + (i % 7) as f64).collect();
    ChartDataModel::new(x).with_series(YSeries::new(SeriesId(1), "cadence", cadence))
}

/// Zoomed 4x around the middle with marker A at device x 500.
fn build_zoomed_engine() -> ChartEngine<RecordingSurface> {
    let config = ChartEngineConfig::new(CanvasSize::new(1000, 250));
    let mut engine = ChartEngine::new(RecordingSurface::default(), config).expect("engine init");
    engine.set_data_model(sample_model(101)).expect("set data");
    engine.zoom_by(4.0, Some(500.0)).expect("zoom");
    engine
        .set_marker_position(MarkerKind::RangeA, 50, MarkerPositionOptions::silent())
        .expect("place a");
    engine.run_pending_tasks(0).expect("compose");
    assert_eq!(engine.left_border(), 1500);
    engine
}

#[test]
fn step_tables_grow_with_penetration_depth() {
    for table in [&LEFT_EDGE_STEPS[..], &RIGHT_EDGE_STEPS[..]] {
        for rows in table.windows(2) {
            assert!(rows[0].0 > rows[1].0);
            assert!(rows[0].1 > rows[1].1);
        }
    }
    assert_eq!(autoscroll_step(ScrollEdge::Left, 20), 20);
    assert_eq!(autoscroll_step(ScrollEdge::Left, 37), 20);
    assert_eq!(autoscroll_step(ScrollEdge::Left, 400), 200);
    assert_eq!(autoscroll_step(ScrollEdge::Right, 39), 20);
    assert_eq!(autoscroll_step(ScrollEdge::Right, 1), 1);
    assert_eq!(autoscroll_step(ScrollEdge::Left, 1), 0);
}

#[test]
fn penetration_is_none_inside_the_viewport() {
    assert_eq!(edge_penetration(-20.0, 1000), Some((ScrollEdge::Left, 20)));
    assert_eq!(edge_penetration(1000.0, 1000), None);
    assert_eq!(edge_penetration(1001.0, 1000), Some((ScrollEdge::Right, 1)));
    assert_eq!(edge_penetration(-1.0, 1000), None);
    assert_eq!(edge_penetration(999.5, 1000), None);
    assert_eq!(edge_penetration(f64::NAN, 1000), None);
}

#[test]
fn dragging_past_the_left_edge_scrolls_by_the_table_step() {
    let mut engine = build_zoomed_engine();
    engine
        .pointer_down(500.0, 100.0, PointerButton::Primary)
        .expect("grab a");
    engine.pointer_move(-20.0, 100.0).expect("drag past left edge");

    assert!(engine.is_autoscrolling());
    assert_eq!(engine.marker_index(MarkerKind::RangeA), Some(37));

    engine.run_pending_tasks(19).expect("before first tick");
    assert_eq!(engine.left_border(), 1500);

    engine.run_pending_tasks(20).expect("first tick");
    assert_eq!(engine.left_border(), 1480);
    assert!(engine.is_autoscrolling());
}

#[test]
fn autoscroll_halts_at_the_content_start() {
    let mut engine = build_zoomed_engine();
    engine
        .pointer_down(500.0, 100.0, PointerButton::Primary)
        .expect("grab a");
    engine.pointer_move(-20.0, 100.0).expect("drag past left edge");

    let mut now = 0;
    while engine.is_autoscrolling() && now < 100_000 {
        now += 20;
        engine.run_pending_tasks(now).expect("tick");
    }

    assert!(!engine.is_autoscrolling());
    assert_eq!(engine.left_border(), 0);
    assert_eq!(engine.marker_index(MarkerKind::RangeA), Some(0));
    assert_eq!(engine.markers().marker(MarkerKind::RangeA).expect("a").device_position, 0);
}

#[test]
fn releasing_the_marker_stops_pending_ticks() {
    let mut engine = build_zoomed_engine();
    engine
        .pointer_down(500.0, 100.0, PointerButton::Primary)
        .expect("grab a");
    engine.pointer_move(-20.0, 100.0).expect("drag past left edge");
    engine.run_pending_tasks(20).expect("first tick");
    assert_eq!(engine.left_border(), 1480);

    engine.pointer_up(-20.0, 100.0).expect("release");
    assert!(!engine.is_autoscrolling());
    engine.run_pending_tasks(1_000).expect("late tasks");
    assert_eq!(engine.left_border(), 1480);
}

#[test]
fn moving_back_inside_stops_autoscroll() {
    let mut engine = build_zoomed_engine();
    engine
        .pointer_down(500.0, 100.0, PointerButton::Primary)
        .expect("grab a");
    engine.pointer_move(-20.0, 100.0).expect("drag past left edge");
    assert!(engine.is_autoscrolling());

    engine.pointer_move(300.0, 100.0).expect("drag back inside");
    assert!(!engine.is_autoscrolling());
    engine.run_pending_tasks(200).expect("late tasks");
    assert_eq!(engine.left_border(), 1500);
}

#[test]
fn dragging_past_the_right_edge_scrolls_right() {
    let mut engine = build_zoomed_engine();
    engine
        .pointer_down(500.0, 100.0, PointerButton::Primary)
        .expect("grab a");
    engine.pointer_move(1039.0, 100.0).expect("drag past right edge");

    engine.run_pending_tasks(20).expect("first tick");
    assert_eq!(engine.left_border(), 1520);
    assert_eq!(engine.marker_index(MarkerKind::RangeA), Some(63));
}

#[test]
fn cancelled_session_makes_queued_ticks_stale() {
    let mut controller = AutoscrollController::new();
    let first = controller.begin();
    assert!(controller.is_current(first));

    controller.cancel();
    assert!(!controller.is_current(first));
    assert!(!controller.is_active());

    let second = controller.begin();
    assert_ne!(first, second);
    assert!(controller.is_current(second));
}
