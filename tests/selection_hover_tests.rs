use std::cell::RefCell;
use std::rc::Rc;

use zoomgraph::api::{ChartEngine, ChartEngineConfig, Selection};
use zoomgraph::core::{CanvasSize, ChartDataModel, GraphKind, SeriesId, XSeries, YSeries};
use zoomgraph::extensions::{HoveredValueChanged, PointDoubleClicked, PointSelected};
use zoomgraph::interaction::PointerButton;
use zoomgraph::render::RecordingSurface;

fn line_model(points: usize) -> ChartDataModel {
    let x = XSeries::new((0..points).map(|i| i as f64).collect());
    let speed = (0..points).map(|i| (i % 10) as f64).collect();
    ChartDataModel::new(x).with_series(YSeries::new(SeriesId(1), "speed", speed))
}

fn bar_model(points: usize) -> ChartDataModel {
    let x = XSeries::new((0..points).map(|i| i as f64).collect());
    let laps = (0..points).map(|i| (i % 10 + 1) as f64).collect();
    ChartDataModel::new(x)
        .with_series(YSeries::new(SeriesId(2), "lap time", laps).with_kind(GraphKind::Bar))
}

fn build_engine(data: ChartDataModel) -> ChartEngine<RecordingSurface> {
    let config = ChartEngineConfig::new(CanvasSize::new(1000, 250));
    let mut engine = ChartEngine::new(RecordingSurface::default(), config).expect("engine init");
    engine.set_data_model(data).expect("set data");
    engine.run_pending_tasks(0).expect("compose");
    engine
}

fn collect<E: Copy + 'static>() -> (Rc<RefCell<Vec<E>>>, impl Fn(&E) + 'static) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    (seen, move |event: &E| sink.borrow_mut().push(*event))
}

#[test]
fn hover_follows_the_tiled_focus_areas() {
    let mut engine = build_engine(line_model(101));
    let (seen, callback) = collect::<HoveredValueChanged>();
    let _subscription = engine.on_hovered_value_changed(callback);

    engine.pointer_move(244.0, 100.0).expect("hover 24");
    engine.pointer_move(246.0, 100.0).expect("hover 25");
    engine.pointer_move(247.0, 120.0).expect("still 25");

    assert_eq!(engine.hover_index(), Some(25));
    assert_eq!(
        seen.borrow().as_slice(),
        &[
            HoveredValueChanged {
                value_index: Some(24)
            },
            HoveredValueChanged {
                value_index: Some(25)
            },
        ]
    );
}

#[test]
fn hover_clears_outside_the_graph_band_and_on_leave() {
    let mut engine = build_engine(line_model(101));
    let (seen, callback) = collect::<HoveredValueChanged>();
    let _subscription = engine.on_hovered_value_changed(callback);

    engine.pointer_move(500.0, 100.0).expect("hover");
    engine.pointer_move(500.0, 5.0).expect("above the band");
    assert_eq!(engine.hover_index(), None);

    engine.pointer_move(500.0, 100.0).expect("hover again");
    engine.pointer_leave().expect("leave");
    assert_eq!(engine.hover_index(), None);
    assert_eq!(seen.borrow().len(), 4);
    assert_eq!(seen.borrow().last().copied(), Some(HoveredValueChanged { value_index: None }));
}

#[test]
fn host_hover_mirroring_is_silent() {
    let mut engine = build_engine(line_model(101));
    let (seen, callback) = collect::<HoveredValueChanged>();
    let _subscription = engine.on_hovered_value_changed(callback);

    engine.set_hover_index(Some(42)).expect("mirror hover");
    assert_eq!(engine.hover_index(), Some(42));
    engine.set_hover_index(Some(5_000)).expect("mirror past the end");
    assert_eq!(engine.hover_index(), Some(100));
    assert!(seen.borrow().is_empty());
}

#[test]
fn click_on_a_line_selects_the_point() {
    let mut engine = build_engine(line_model(101));
    let (seen, callback) = collect::<PointSelected>();
    let _subscription = engine.on_point_selected(callback);

    engine
        .pointer_down(252.0, 100.0, PointerButton::Primary)
        .expect("click");
    engine.pointer_up(252.0, 100.0).expect("release");

    let expected = Selection {
        series_id: None,
        value_index: 25,
    };
    assert_eq!(engine.selection(), Some(expected));
    assert_eq!(
        seen.borrow().as_slice(),
        &[PointSelected {
            series_id: None,
            value_index: 25
        }]
    );
}

#[test]
fn click_on_a_bar_selects_it_with_its_series() {
    let mut engine = build_engine(bar_model(101));
    let (seen, callback) = collect::<PointSelected>();
    let _subscription = engine.on_point_selected(callback);

    engine
        .pointer_down(590.0, 150.0, PointerButton::Primary)
        .expect("click bar");

    assert_eq!(
        engine.selection(),
        Some(Selection {
            series_id: Some(SeriesId(2)),
            value_index: 59
        })
    );
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn double_click_on_a_bar_is_reported_without_zooming() {
    let mut engine = build_engine(bar_model(101));
    let (seen, callback) = collect::<PointDoubleClicked>();
    let _subscription = engine.on_point_double_clicked(callback);

    engine.double_click(590.0, 150.0).expect("double click bar");
    assert_eq!(
        seen.borrow().as_slice(),
        &[PointDoubleClicked {
            series_id: SeriesId(2),
            value_index: 59
        }]
    );
    assert_eq!(engine.zoom_ratio(), 1.0);

    engine.double_click(590.0, 5.0).expect("double click above bars");
    assert!(engine.zoom_ratio() > 1.0);
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn short_press_while_zoomed_selects_instead_of_panning() {
    let mut engine = build_engine(line_model(101));
    engine.zoom_by(2.0, Some(500.0)).expect("zoom");
    engine.run_pending_tasks(0).expect("compose");

    engine
        .pointer_down(400.0, 100.0, PointerButton::Primary)
        .expect("press");
    engine.pointer_move(401.0, 100.0).expect("jitter");
    engine.pointer_up(401.0, 100.0).expect("release");

    assert_eq!(engine.left_border(), 500);
    assert_eq!(
        engine.selection(),
        Some(Selection {
            series_id: None,
            value_index: 45
        })
    );
}

#[test]
fn set_selection_is_clamped_and_silent() {
    let mut engine = build_engine(line_model(101));
    let (seen, callback) = collect::<PointSelected>();
    let _subscription = engine.on_point_selected(callback);

    engine
        .set_selection(Some(Selection {
            series_id: Some(SeriesId(1)),
            value_index: 900,
        }))
        .expect("select");
    assert_eq!(engine.selection().map(|selection| selection.value_index), Some(100));
    engine.set_selection(None).expect("clear selection");
    assert_eq!(engine.selection(), None);
    assert!(seen.borrow().is_empty());
}

#[test]
fn unsubscribed_listener_stops_receiving_events() {
    let mut engine = build_engine(line_model(101));
    let (seen, callback) = collect::<PointSelected>();
    let subscription = engine.on_point_selected(callback);

    engine
        .pointer_down(252.0, 100.0, PointerButton::Primary)
        .expect("first click");
    assert!(subscription.unsubscribe());
    assert!(!subscription.unsubscribe());
    engine
        .pointer_down(352.0, 100.0, PointerButton::Primary)
        .expect("second click");

    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(engine.selection().map(|selection| selection.value_index), Some(35));
}
