use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use zoomgraph::api::{ChartEngine, ChartEngineConfig};
use zoomgraph::core::{
    CanvasSize, ChartDataModel, DeviceRect, HitTestIndex, SeriesId, ViewportTransform, XSeries,
    YSeries,
};
use zoomgraph::render::RecordingSurface;

fn bench_viewport_round_trip(c: &mut Criterion) {
    let mut viewport = ViewportTransform::new(1920);
    viewport.set_value_range(0.0, 86_400.0);
    viewport.set_zoom_ratio(250.0, Some(960.0));

    c.bench_function("viewport_round_trip", |b| {
        b.iter(|| {
            let device = viewport.value_to_device(black_box(43_210.5));
            let _ = viewport.device_to_value(device);
        })
    });
}

fn bench_tiled_hit_index_100k(c: &mut Criterion) {
    let band = DeviceRect::new(0.0, 20.0, 1920.0, 400.0);
    let device_xs: Vec<Option<f64>> = (0..100_000)
        .map(|i| Some(f64::from(i) * 0.0192))
        .collect();

    c.bench_function("tiled_hit_index_build_100k", |b| {
        b.iter(|| {
            let mut index = HitTestIndex::new(1920.0);
            index.push_tiled_graph(SeriesId(1), band, black_box(&device_xs));
            index
        })
    });

    let mut index = HitTestIndex::new(1920.0);
    index.push_tiled_graph(SeriesId(1), band, &device_xs);
    c.bench_function("tiled_hit_resolve", |b| {
        b.iter(|| index.resolve(black_box(1_234.5), black_box(200.0)))
    });
}

fn bench_engine_compose_50k(c: &mut Criterion) {
    let points = 50_000;
    let x = XSeries::new((0..points).map(f64::from).collect());
    let speed = (0..points).map(|i| 20.0 + f64::from(i % 97) * 0.1).collect();
    let model =
        ChartDataModel::new(x).with_series(YSeries::new(SeriesId(1), "speed", speed));
    let config = ChartEngineConfig::new(CanvasSize::new(1920, 400));
    let mut engine = ChartEngine::new(RecordingSurface::default(), config).expect("engine init");
    engine.set_data_model(model).expect("set data");

    c.bench_function("engine_zoom_and_compose_50k", |b| {
        b.iter(|| {
            engine.zoom_in(Some(black_box(960.0))).expect("zoom in");
            engine.render_now().expect("render");
            engine.fit_to_content().expect("fit");
        })
    });
}

criterion_group!(
    benches,
    bench_viewport_round_trip,
    bench_tiled_hit_index_100k,
    bench_engine_compose_50k
);
criterion_main!(benches);
