use std::cell::RefCell;
use std::rc::Rc;

use zoomgraph::api::{ChartEngine, ChartEngineConfig};
use zoomgraph::core::{CanvasSize, ChartDataModel, GraphKind, SeriesId, XSeries, YSeries};
use zoomgraph::extensions::PointSelected;
use zoomgraph::interaction::{Key, Modifiers, PointerButton};
use zoomgraph::render::{LayerId, Primitive, RecordingSurface};

fn bar_model(points: usize) -> ChartDataModel {
    let x = XSeries::new((0..points).map(|i| i as f64).collect());
    let laps = (0..points).map(|i| (i % 10 + 1) as f64).collect();
    ChartDataModel::new(x)
        .with_series(YSeries::new(SeriesId(2), "lap time", laps).with_kind(GraphKind::Bar))
}

fn build_engine() -> ChartEngine<RecordingSurface> {
    let config = ChartEngineConfig::new(CanvasSize::new(1000, 250));
    let mut engine = ChartEngine::new(RecordingSurface::default(), config).expect("engine init");
    engine.set_data_model(bar_model(101)).expect("set data");
    engine.run_pending_tasks(0).expect("compose");
    engine
}

fn selected(engine: &ChartEngine<RecordingSurface>) -> Vec<usize> {
    engine.selected_bars().iter().copied().collect()
}

fn highlighted_bar_count(engine: &ChartEngine<RecordingSurface>) -> usize {
    let fill = engine.style().selection_color.with_alpha(0.25);
    engine.render_layer(LayerId::Overlay).map_or(0, |layer| {
        layer
            .primitives
            .iter()
            .filter(|primitive| {
                matches!(primitive, Primitive::Rect(rect) if rect.fill_color == fill)
            })
            .count()
    })
}

/// Listeners stay registered after their subscription handle is dropped.
fn selection_events(engine: &ChartEngine<RecordingSurface>) -> Rc<RefCell<Vec<PointSelected>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _subscription = engine.on_point_selected(move |event| sink.borrow_mut().push(*event));
    seen
}

#[test]
fn several_bars_are_highlighted_silently() {
    let mut engine = build_engine();
    let seen = selection_events(&engine);

    engine
        .set_selected_bars(&[75, 3, 500, 3])
        .expect("select bars");
    engine.run_pending_tasks(0).expect("overlay");

    assert_eq!(selected(&engine), vec![3, 75]);
    assert_eq!(highlighted_bar_count(&engine), 2);
    assert!(seen.borrow().is_empty());
    assert!(!engine.is_smooth_scrolling());

    engine.set_selected_bars(&[]).expect("clear bars");
    engine.run_pending_tasks(0).expect("overlay");
    assert_eq!(highlighted_bar_count(&engine), 0);
}

#[test]
fn clicking_a_bar_replaces_the_selected_bars() {
    let mut engine = build_engine();
    engine.set_selected_bars(&[3, 75]).expect("select bars");

    engine
        .pointer_down(590.0, 150.0, PointerButton::Primary)
        .expect("click bar");

    assert_eq!(selected(&engine), vec![59]);
}

#[test]
fn arrow_keys_step_through_bars_and_wrap() {
    let mut engine = build_engine();
    let seen = selection_events(&engine);
    let markers = (engine.left_marker_index(), engine.right_marker_index());

    assert!(engine.key_down(Key::Left, Modifiers::NONE).expect("left"));
    assert_eq!(selected(&engine), vec![0]);
    assert!(engine.key_down(Key::Left, Modifiers::NONE).expect("left wraps"));
    assert_eq!(selected(&engine), vec![100]);
    assert!(engine.key_down(Key::Right, Modifiers::NONE).expect("right wraps"));
    assert_eq!(selected(&engine), vec![0]);
    assert_eq!(engine.select_next_bar().expect("next"), Some(1));

    let events = seen.borrow();
    assert_eq!(events.len(), 4);
    assert_eq!(
        events.last().copied(),
        Some(PointSelected {
            series_id: Some(SeriesId(2)),
            value_index: 1
        })
    );
    assert_eq!((engine.left_marker_index(), engine.right_marker_index()), markers);
}

#[test]
fn next_bar_starts_from_the_first_selected_one() {
    let mut engine = build_engine();
    engine.set_selected_bars(&[40, 12]).expect("select bars");

    assert_eq!(engine.select_next_bar().expect("next"), Some(13));
    assert_eq!(selected(&engine), vec![13]);
    assert_eq!(engine.select_previous_bar().expect("previous"), Some(12));
}

#[test]
fn zoomed_chart_scrolls_smoothly_to_the_first_selected_bar() {
    let mut engine = build_engine();
    engine.zoom_with_parts(5, 0).expect("zoom with parts");
    assert_eq!(engine.viewport_state().virtual_width, 4000);

    engine.set_selected_bars(&[50]).expect("select bar");
    assert_eq!(engine.zoom_parts(), None);
    assert!(engine.is_smooth_scrolling());
    assert_eq!(engine.left_border(), 0);

    let mut now = 0;
    while engine.is_smooth_scrolling() && now < 10_000 {
        now += 10;
        engine.run_pending_tasks(now).expect("smooth scroll tick");
    }

    assert_eq!(engine.left_border(), 1500);
    assert_eq!(now, 3000);
}

#[test]
fn data_updates_keep_only_existing_bars() {
    let mut engine = build_engine();
    engine.set_selected_bars(&[10, 90]).expect("select bars");

    engine.update_data_model(bar_model(50)).expect("shorter data");
    assert_eq!(selected(&engine), vec![10]);
    assert_eq!(engine.snapshot().selected_bars, vec![10]);

    engine.set_data_model(bar_model(50)).expect("new data");
    assert!(engine.selected_bars().is_empty());
}
