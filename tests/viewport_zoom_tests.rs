use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_abs_diff_eq;
use zoomgraph::api::{ChartEngine, ChartEngineConfig, ZoomParts};
use zoomgraph::core::{CanvasSize, ChartDataModel, SeriesId, ViewportTransform, XSeries, YSeries};
use zoomgraph::extensions::ViewportResized;
use zoomgraph::interaction::PointerButton;
use zoomgraph::render::RecordingSurface;

fn sample_model(points: usize) -> ChartDataModel {
    let x = XSeries::new((0..points).map(|i| i as f64).collect());
    let altitude = (0..points).map(|i| 400.0 + (i % 50) as f64).collect();
    ChartDataModel::new(x).with_series(YSeries::new(SeriesId(1), "altitude", altitude))
}

fn build_engine(points: usize) -> ChartEngine<RecordingSurface> {
    let config = ChartEngineConfig::new(CanvasSize::new(1000, 250));
    let mut engine = ChartEngine::new(RecordingSurface::default(), config).expect("engine init");
    engine.set_data_model(sample_model(points)).expect("set data");
    engine
}

#[test]
fn fresh_model_fits_the_viewport() {
    let engine = build_engine(101);
    let state = engine.viewport_state();
    assert_eq!(state.zoom_ratio, 1.0);
    assert_eq!(state.virtual_width, 1000);
    assert_eq!(state.left_border, 0);
    assert_abs_diff_eq!(engine.viewport().value_to_device(37.0), 370.0, epsilon = 1e-9);
}

#[test]
fn zoom_keeps_the_value_under_the_pivot() {
    let mut engine = build_engine(1001);
    let before = engine.viewport().value_to_device(500.0);

    for _ in 0..3 {
        let pivot = engine.viewport().value_to_device(500.0);
        engine.zoom_in(Some(pivot)).expect("zoom in");
    }

    assert!(engine.zoom_ratio() > 2.0);
    let after = engine.viewport().value_to_device(500.0);
    assert!((after - before).abs() <= 1.0, "pivot drifted from {before} to {after}");
}

#[test]
fn threefold_zoom_at_the_middle_point_keeps_it_in_place() {
    let mut engine = build_engine(1000);
    let before = engine.viewport().value_to_device(500.0);

    engine.zoom_by(3.0, Some(before)).expect("zoom 3x");

    assert_abs_diff_eq!(engine.zoom_ratio(), 3.0, epsilon = 1e-12);
    assert_eq!(engine.viewport_state().virtual_width, 3000);
    let after = engine.viewport().value_to_device(500.0);
    assert!((after - before).abs() <= 1.0, "pivot drifted from {before} to {after}");
}

#[test]
fn zoom_in_then_out_restores_the_fit() {
    let mut engine = build_engine(101);
    engine.zoom_in(Some(300.0)).expect("zoom in");
    assert_abs_diff_eq!(engine.zoom_ratio(), 1.3, epsilon = 1e-12);
    assert!(engine.left_border() > 0);

    engine.zoom_out(Some(300.0)).expect("zoom out");
    assert_eq!(engine.zoom_ratio(), 1.0);
    assert_eq!(engine.left_border(), 0);
}

#[test]
fn zoom_without_pivot_uses_the_stored_pivot() {
    let mut engine = build_engine(101);
    assert_eq!(engine.zoom_pivot_ratio(), 0.5);

    engine.zoom_in(None).expect("zoom around center");
    assert_eq!(engine.viewport_state().virtual_width, 1300);
    assert_eq!(engine.left_border(), 150);
}

#[test]
fn zoom_out_never_goes_below_fit() {
    let mut engine = build_engine(101);
    let changed = engine.zoom_out(None).expect("zoom out");
    assert!(!changed);
    assert_eq!(engine.zoom_ratio(), 1.0);
}

#[test]
fn pan_is_clamped_to_the_virtual_width() {
    let mut engine = build_engine(101);
    engine.zoom_by(2.0, Some(0.0)).expect("zoom");
    assert_eq!(engine.left_border(), 0);

    assert_eq!(engine.pan_by(-50).expect("pan left"), 0);
    assert_eq!(engine.pan_by(5_000).expect("pan right"), 1000);
    assert_eq!(engine.left_border(), 1000);
}

#[test]
fn zoom_to_index_range_fills_the_viewport() {
    let mut engine = build_engine(101);
    engine.zoom_to_index_range(20, 40).expect("zoom to range");

    assert_abs_diff_eq!(engine.zoom_ratio(), 5.0, epsilon = 1e-9);
    assert_abs_diff_eq!(engine.viewport().value_to_device(20.0), 0.0, epsilon = 0.5);
    assert_abs_diff_eq!(engine.viewport().value_to_device(40.0), 1000.0, epsilon = 0.5);
}

#[test]
fn viewport_changes_are_reported_to_listeners() {
    let mut engine = build_engine(101);
    let seen: Rc<RefCell<Vec<ViewportResized>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _subscription = engine.on_viewport_resized(move |event| sink.borrow_mut().push(*event));

    engine.zoom_in(Some(500.0)).expect("zoom");
    engine.pan_by(0).expect("no-op pan");

    let events = seen.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].state.virtual_width, 1300);
}

#[test]
fn double_click_on_a_line_zooms_in() {
    let mut engine = build_engine(101);
    engine.run_pending_tasks(0).expect("compose");
    engine.double_click(250.0, 100.0).expect("double click");
    assert_abs_diff_eq!(engine.zoom_ratio(), 1.3, epsilon = 1e-12);
}

#[test]
fn back_button_fits_the_chart() {
    let mut engine = build_engine(101);
    engine.zoom_by(4.0, Some(500.0)).expect("zoom");
    engine
        .pointer_down(10.0, 100.0, PointerButton::Back)
        .expect("back button");
    assert_eq!(engine.zoom_ratio(), 1.0);
    assert_eq!(engine.left_border(), 0);
}

#[test]
fn resize_keeps_zoom_and_relative_scroll() {
    let mut engine = build_engine(101);
    engine.zoom_by(2.0, Some(500.0)).expect("zoom");
    assert_eq!(engine.left_border(), 500);

    engine.resize(CanvasSize::new(500, 250)).expect("resize");
    let state = engine.viewport_state();
    assert_eq!(state.zoom_ratio, 2.0);
    assert_eq!(state.virtual_width, 1000);
    assert_eq!(state.left_border, 250);
}

#[test]
fn synch_configuration_mirrors_zoom_and_markers() {
    let mut leader = build_engine(101);
    leader.zoom_to_index_range(10, 60).expect("zoom leader");
    let config = leader.synch_configuration();

    let mut follower = build_engine(101);
    follower
        .apply_synch_configuration(config)
        .expect("apply synch");

    assert_abs_diff_eq!(follower.zoom_ratio(), leader.zoom_ratio(), epsilon = 1e-9);
    assert_eq!(follower.left_border(), leader.left_border());
    assert_eq!(follower.left_marker_index(), leader.left_marker_index());
    assert_eq!(follower.right_marker_index(), leader.right_marker_index());
}

#[test]
fn huge_zoom_stays_within_the_virtual_width_limit() {
    let mut transform = ViewportTransform::new(1000);
    transform.set_value_range(0.0, 1.0);
    transform.set_zoom_ratio(1e15, Some(500.0));
    assert!(transform.virtual_width() <= zoomgraph::core::MAX_VIRTUAL_WIDTH);
    assert!(transform.left_border() <= transform.max_left_border());
}

#[test]
fn zoom_with_parts_pages_forward_and_back() {
    let mut engine = build_engine(101);
    assert!(engine.zoom_with_parts(4, 1).expect("zoom with parts"));
    assert_eq!(engine.viewport_state().virtual_width, 3200);
    assert_eq!(engine.left_border(), 699);

    assert!(engine.move_to_next_part().expect("part 2"));
    assert_eq!(engine.left_border(), 1499);
    assert!(engine.move_to_next_part().expect("part 3"));
    assert_eq!(engine.left_border(), 2200);
    assert!(!engine.move_to_next_part().expect("no part after the last"));
    assert_eq!(engine.zoom_parts(), Some(ZoomParts { parts: 4, position: 3 }));

    assert!(engine.move_to_previous_part().expect("back to part 2"));
    assert_eq!(engine.left_border(), 1499);
    assert!(engine.zoom_with_parts(0, 0).is_err());
}

#[test]
fn resize_reapplies_the_part_zoom_and_other_zooms_end_it() {
    let mut engine = build_engine(101);
    engine.zoom_with_parts(4, 2).expect("zoom with parts");

    engine.resize(CanvasSize::new(500, 250)).expect("resize");
    assert_eq!(engine.viewport_state().virtual_width, 1600);
    assert_eq!(engine.left_border(), 749);
    assert_eq!(engine.zoom_parts(), Some(ZoomParts { parts: 4, position: 2 }));

    engine.zoom_in(None).expect("zoom in");
    assert_eq!(engine.zoom_parts(), None);
    assert!(!engine.move_to_next_part().expect("no part zoom"));
}

#[test]
fn smooth_scroll_moves_five_pixels_per_tick() {
    let mut engine = build_engine(101);
    engine.zoom_by(4.0, Some(0.0)).expect("zoom");
    engine.run_pending_tasks(0).expect("compose");

    assert!(engine.scroll_smoothly_to(23).expect("start smooth scroll"));
    for (now, expected) in [(10, 5), (20, 10), (30, 15), (40, 20)] {
        engine.run_pending_tasks(now).expect("tick");
        assert_eq!(engine.left_border(), expected);
        assert!(engine.is_smooth_scrolling());
    }
    engine.run_pending_tasks(50).expect("last tick");
    assert_eq!(engine.left_border(), 23);
    assert!(!engine.is_smooth_scrolling());
    assert!(!engine.scroll_smoothly_to(23).expect("already there"));
}

#[test]
fn explicit_pan_stops_a_smooth_scroll() {
    let mut engine = build_engine(101);
    engine.zoom_by(4.0, Some(0.0)).expect("zoom");
    engine.scroll_smoothly_to(2_000).expect("start smooth scroll");
    engine.run_pending_tasks(10).expect("first tick");
    assert_eq!(engine.left_border(), 5);

    engine.pan_by(100).expect("pan");
    assert!(!engine.is_smooth_scrolling());
    engine.run_pending_tasks(100).expect("later ticks");
    assert_eq!(engine.left_border(), 105);
}
